//! `moodoo` CLI binary.
//!
//! ```text
//! moodoo catalog --featured
//! moodoo show 4
//! moodoo browse
//! moodoo login --email admin@moodoo.com
//! moodoo admin create --title "Amóre Chili" --price 10500 --shopier-url https://... --image chili.jpg
//! moodoo admin move 3 1
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use moodoo::console::commands::admin::{
    AdminCreateCommand, AdminDeleteCommand, AdminEditCommand, AdminListCommand, AdminMoveCommand,
    AdminReorderCommand, ProductFields,
};
use moodoo::console::commands::storefront::{
    BrowseCommand, CatalogCommand, LoginCommand, LogoutCommand, ShowCommand, WhoamiCommand,
};
use moodoo::console::commands::CallableTrait;
use moodoo::telemetry::{get_subscriber, init_subscriber};

#[derive(Parser, Debug)]
#[command(
    name = "moodoo",
    version,
    about = "Moodoo Studio storefront and admin client",
    long_about = "Moodoo Studio: browse the stained-glass catalog and manage products.\n\n\
        Catalog data, admin sign-in and product images live in the hosted backend\n\
        configured through configuration.yaml or SUPABASE_URL / SUPABASE_ANON_KEY.\n\
        Set MOODOO__OFFLINE_DEMO=true to try it against a built-in demo catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: MoodooCommands,
}

#[derive(Debug, Subcommand)]
enum MoodooCommands {
    /// List the catalog in display order
    Catalog {
        /// Only featured products
        #[arg(long)]
        featured: bool,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Show one product with its images and checkout link
    Show {
        id: i64,
        /// Output in JSON format
        #[arg(long)]
        json: bool,
    },
    /// Interactive storefront
    Browse,
    /// Sign in as admin
    Login {
        #[arg(long)]
        email: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in admin
    Whoami,
    /// Manage products (requires login)
    Admin {
        #[command(subcommand)]
        command: AdminCommands,
    },
}

#[derive(Debug, Args)]
struct FieldArgs {
    #[arg(long)]
    title: Option<String>,
    /// Price in lira, `10500` or `10500,50`
    #[arg(long)]
    price: Option<String>,
    /// External checkout link
    #[arg(long = "shopier-url")]
    shopier_url: Option<String>,
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    materials: Option<String>,
    /// Free-form size, e.g. "35cm x 45cm"
    #[arg(long)]
    dimensions: Option<String>,
    #[arg(long)]
    stock: Option<String>,
    /// Show on the featured list (true/false)
    #[arg(long)]
    featured: Option<bool>,
}

impl From<FieldArgs> for ProductFields {
    fn from(args: FieldArgs) -> Self {
        Self {
            title: args.title,
            price: args.price,
            shopier_url: args.shopier_url,
            description: args.description,
            materials: args.materials,
            dimensions: args.dimensions,
            stock: args.stock,
            featured: args.featured,
        }
    }
}

#[derive(Debug, Subcommand)]
enum AdminCommands {
    /// List products with their positions
    List {
        #[arg(long)]
        json: bool,
    },
    /// Create a product from fields and image files
    Create {
        #[command(flatten)]
        fields: FieldArgs,
        /// Image file to upload (repeatable)
        #[arg(long = "image", value_name = "FILE")]
        images: Vec<PathBuf>,
    },
    /// Edit a product; omitted fields keep their value
    Edit {
        id: i64,
        #[command(flatten)]
        fields: FieldArgs,
        /// Image file to add (repeatable)
        #[arg(long = "image", value_name = "FILE")]
        add_images: Vec<PathBuf>,
        /// Stored image to drop, by URL or 1-based position (repeatable)
        #[arg(long = "remove-image", value_name = "URL|N")]
        remove_images: Vec<String>,
    },
    /// Delete a product and its images
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(long, short = 'y')]
        yes: bool,
    },
    /// Move the product at position FROM to position TO (1-based)
    Move { from: usize, to: usize },
    /// Set the full display order by product id
    Reorder {
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = get_subscriber("moodoo".into(), "warn".into(), std::io::stderr);
    init_subscriber(subscriber)?;

    let cli = Cli::parse();
    let command = get_command(cli);
    if let Err(err) = command.call() {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
    Ok(())
}

fn get_command(cli: Cli) -> Box<dyn CallableTrait> {
    match cli.command {
        MoodooCommands::Catalog { featured, json } => {
            Box::new(CatalogCommand::new(featured, json))
        }
        MoodooCommands::Show { id, json } => Box::new(ShowCommand::new(id, json)),
        MoodooCommands::Browse => Box::new(BrowseCommand::new()),
        MoodooCommands::Login { email } => Box::new(LoginCommand::new(email)),
        MoodooCommands::Logout => Box::new(LogoutCommand::new()),
        MoodooCommands::Whoami => Box::new(WhoamiCommand::new()),
        MoodooCommands::Admin { command } => match command {
            AdminCommands::List { json } => Box::new(AdminListCommand::new(json)),
            AdminCommands::Create { fields, images } => {
                Box::new(AdminCreateCommand::new(fields.into(), images))
            }
            AdminCommands::Edit {
                id,
                fields,
                add_images,
                remove_images,
            } => Box::new(AdminEditCommand::new(
                id,
                fields.into(),
                add_images,
                remove_images,
            )),
            AdminCommands::Delete { id, yes } => Box::new(AdminDeleteCommand::new(id, yes)),
            AdminCommands::Move { from, to } => Box::new(AdminMoveCommand::new(from, to)),
            AdminCommands::Reorder { ids } => Box::new(AdminReorderCommand::new(ids)),
        },
    }
}
