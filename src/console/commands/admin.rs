use std::path::PathBuf;

use crate::admin::{AdminPanel, DeleteOutcome, ProductDraft, StageOutcome};
use crate::cli::context::{build_runtime, AppContext};
use crate::cli::credentials::SessionManager;
use crate::cli::error::CliError;
use crate::cli::progress;
use crate::console::commands::CallableTrait;
use crate::forms::ProductForm;
use crate::models::Product;
use crate::services::ImageFile;
use crate::views::presentation::{format_price, render_admin_table, render_draft};
use dialoguer::Confirm;

/// Authenticated context for an admin command.
fn admin_context(feature: &str) -> Result<AppContext, CliError> {
    let session = SessionManager::with_default_store().require_valid_session(feature)?;
    AppContext::authenticated(&session)
}

/// Admin panel with the product list loaded.
async fn loaded_panel(ctx: &AppContext) -> Result<AdminPanel, CliError> {
    let mut panel = ctx.admin_panel();
    let pb = progress::spinner("Loading products...");
    match panel.load().await {
        Ok(()) => {
            progress::finish_success(&pb, &format!("{} products", panel.products().len()));
            Ok(panel)
        }
        Err(err) => {
            progress::finish_error(&pb, "Failed to load products");
            Err(err.into())
        }
    }
}

fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageFile>, CliError> {
    paths
        .iter()
        .map(|path| ImageFile::from_path(path).map_err(CliError::from))
        .collect()
}

fn report_staging(outcome: StageOutcome, max_images: usize) {
    if outcome.not_images > 0 {
        eprintln!("  Skipped {} file(s) that are not images", outcome.not_images);
    }
    if outcome.over_limit > 0 {
        eprintln!(
            "  Skipped {} image(s): at most {} images per product",
            outcome.over_limit, max_images
        );
    }
}

/// Resolve `--remove-image` values: a stored URL or its 1-based position.
pub fn resolve_image_refs(images: &[String], refs: &[String]) -> Result<Vec<String>, CliError> {
    refs.iter()
        .map(|reference| match reference.parse::<usize>() {
            Ok(position) => position
                .checked_sub(1)
                .and_then(|index| images.get(index))
                .cloned()
                .ok_or_else(|| {
                    CliError::InvalidInput(format!(
                        "image position {} out of range (1..={})",
                        position,
                        images.len()
                    ))
                }),
            Err(_) if images.contains(reference) => Ok(reference.clone()),
            Err(_) => Err(CliError::InvalidInput(format!(
                "product has no image {}",
                reference
            ))),
        })
        .collect()
}

/// 1-based list position to index.
fn to_index(position: usize, len: usize) -> Result<usize, CliError> {
    if position == 0 || position > len {
        return Err(CliError::InvalidInput(format!(
            "position {} out of range (1..={})",
            position, len
        )));
    }
    Ok(position - 1)
}

async fn save_draft(panel: &mut AdminPanel, draft: ProductDraft) -> Result<Product, CliError> {
    eprint!("{}", render_draft(&draft));
    let pb = progress::spinner("Saving product...");
    match panel.save(draft).await {
        Ok(product) => {
            progress::finish_success(
                &pb,
                &format!("Saved #{} {} ({})", product.id, product.title, format_price(product.price)),
            );
            Ok(product)
        }
        Err(err) => {
            progress::finish_error(&pb, "Save failed");
            Err(err.into())
        }
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// admin list
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo admin list [--json]`
pub struct AdminListCommand {
    pub json: bool,
}

impl AdminListCommand {
    pub fn new(json: bool) -> Self {
        Self { json }
    }
}

impl CallableTrait for AdminListCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin list")?;
        let rt = build_runtime()?;
        let panel = rt.block_on(loaded_panel(&ctx))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(panel.products())?);
        } else {
            print!("{}", render_admin_table(panel.products()));
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// admin create
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Field values shared by `admin create` and `admin edit`.
#[derive(Debug, Clone, Default)]
pub struct ProductFields {
    pub title: Option<String>,
    pub price: Option<String>,
    pub shopier_url: Option<String>,
    pub description: Option<String>,
    pub materials: Option<String>,
    pub dimensions: Option<String>,
    pub stock: Option<String>,
    pub featured: Option<bool>,
}

impl ProductFields {
    /// Overwrite the form fields that were given.
    pub fn apply(&self, form: &mut ProductForm) {
        let text_fields = [
            (&self.title, &mut form.title),
            (&self.price, &mut form.price),
            (&self.shopier_url, &mut form.shopier_url),
            (&self.description, &mut form.description),
            (&self.materials, &mut form.materials),
            (&self.dimensions, &mut form.dimensions),
            (&self.stock, &mut form.stock),
        ];
        for (value, field) in text_fields {
            if let Some(value) = value {
                *field = value.clone();
            }
        }
        if let Some(featured) = self.featured {
            form.is_featured = featured;
        }
    }
}

/// `moodoo admin create --title .. --price .. --shopier-url .. --image <file>...`
pub struct AdminCreateCommand {
    pub fields: ProductFields,
    pub images: Vec<PathBuf>,
}

impl AdminCreateCommand {
    pub fn new(fields: ProductFields, images: Vec<PathBuf>) -> Self {
        Self { fields, images }
    }
}

impl CallableTrait for AdminCreateCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin create")?;
        let max_images = ctx.settings.storefront.max_images;

        let mut draft = ProductDraft::create().with_max_images(max_images);
        self.fields.apply(&mut draft.form);
        let outcome = draft.stage_images(read_images(&self.images)?);
        report_staging(outcome, max_images);

        let rt = build_runtime()?;
        let product = rt.block_on(async {
            let mut panel = ctx.admin_panel();
            save_draft(&mut panel, draft).await
        })?;

        println!("{}", product.id);
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// admin edit
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo admin edit <id> [fields] [--image <file>...] [--remove-image <url|n>...]`
pub struct AdminEditCommand {
    pub id: i64,
    pub fields: ProductFields,
    pub add_images: Vec<PathBuf>,
    pub remove_images: Vec<String>,
}

impl AdminEditCommand {
    pub fn new(
        id: i64,
        fields: ProductFields,
        add_images: Vec<PathBuf>,
        remove_images: Vec<String>,
    ) -> Self {
        Self {
            id,
            fields,
            add_images,
            remove_images,
        }
    }
}

impl CallableTrait for AdminEditCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin edit")?;
        let max_images = ctx.settings.storefront.max_images;
        let new_files = read_images(&self.add_images)?;
        let rt = build_runtime()?;

        rt.block_on(async {
            let mut panel = loaded_panel(&ctx).await?;
            let product = panel
                .find(self.id)
                .cloned()
                .ok_or(CliError::ProductNotFound { id: self.id })?;

            let mut draft = ProductDraft::edit(&product).with_max_images(max_images);
            self.fields.apply(&mut draft.form);
            for url in resolve_image_refs(&product.images, &self.remove_images)? {
                draft.remove_existing(&url);
            }
            let outcome = draft.stage_images(new_files);
            report_staging(outcome, max_images);

            save_draft(&mut panel, draft).await.map(|_| ())
        })?;
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// admin delete
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo admin delete <id> [--yes]`
pub struct AdminDeleteCommand {
    pub id: i64,
    pub yes: bool,
}

impl AdminDeleteCommand {
    pub fn new(id: i64, yes: bool) -> Self {
        Self { id, yes }
    }
}

fn confirm_delete(product: &Product) -> bool {
    Confirm::new()
        .with_prompt(format!(
            "Delete \"{}\" (#{}) and its {} image(s)?",
            product.title,
            product.id,
            product.images.len()
        ))
        .default(false)
        .interact()
        .unwrap_or(false)
}

impl CallableTrait for AdminDeleteCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin delete")?;
        let rt = build_runtime()?;
        let yes = self.yes;

        let outcome = rt.block_on(async {
            let mut panel = loaded_panel(&ctx).await?;
            panel
                .delete(self.id, |product| yes || confirm_delete(product))
                .await
                .map_err(CliError::from)
        })?;

        match outcome {
            DeleteOutcome::Deleted(product) => {
                eprintln!("✓ Deleted #{} {}", product.id, product.title)
            }
            DeleteOutcome::Cancelled => eprintln!("Cancelled."),
        }
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// admin move / reorder
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo admin move <from> <to>` with 1-based list positions.
pub struct AdminMoveCommand {
    pub from: usize,
    pub to: usize,
}

impl AdminMoveCommand {
    pub fn new(from: usize, to: usize) -> Self {
        Self { from, to }
    }
}

impl CallableTrait for AdminMoveCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin move")?;
        let rt = build_runtime()?;

        let table = rt.block_on(async {
            let mut panel = loaded_panel(&ctx).await?;
            let len = panel.products().len();
            let from = to_index(self.from, len)?;
            let to = to_index(self.to, len)?;

            let pb = progress::spinner("Saving order...");
            if let Err(err) = panel.move_item(from, to).await {
                progress::finish_error(&pb, "Reorder failed, previous order kept");
                return Err(CliError::from(err));
            }
            progress::finish_success(&pb, "Order saved");
            Ok(render_admin_table(panel.products()))
        })?;

        print!("{}", table);
        Ok(())
    }
}

/// `moodoo admin reorder <id>...` listing every product id in the new order.
pub struct AdminReorderCommand {
    pub ids: Vec<i64>,
}

impl AdminReorderCommand {
    pub fn new(ids: Vec<i64>) -> Self {
        Self { ids }
    }
}

impl CallableTrait for AdminReorderCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = admin_context("admin reorder")?;
        let rt = build_runtime()?;

        let table = rt.block_on(async {
            let mut panel = loaded_panel(&ctx).await?;
            let pb = progress::spinner("Saving order...");
            if let Err(err) = panel.apply_order(&self.ids).await {
                progress::finish_error(&pb, "Reorder failed, previous order kept");
                return Err(CliError::from(err));
            }
            progress::finish_success(&pb, "Order saved");
            Ok(render_admin_table(panel.products()))
        })?;

        print!("{}", table);
        Ok(())
    }
}
