use crate::cli::context::{build_runtime, AppContext};
use crate::cli::credentials::SessionManager;
use crate::cli::error::CliError;
use crate::cli::progress;
use crate::console::commands::CallableTrait;
use crate::models::Product;
use crate::views::presentation::{render_admin_table, render_catalog, render_detail, render_hero};
use crate::views::{CatalogView, NavEvent, Navigator, ViewState};
use dialoguer::{FuzzySelect, Select};

/// Menu entries on the detail page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailAction {
    NextImage,
    PreviousImage,
    PickImage,
    Buy,
    Back,
}

impl DetailAction {
    pub fn label(&self) -> &'static str {
        match self {
            DetailAction::NextImage => "Next image",
            DetailAction::PreviousImage => "Previous image",
            DetailAction::PickImage => "Pick image",
            DetailAction::Buy => "Buy (show checkout link)",
            DetailAction::Back => "Back",
        }
    }
}

/// Actions offered for `product`. Image navigation is left out for rows
/// without images.
pub fn detail_actions(product: &Product) -> Vec<DetailAction> {
    let mut actions = Vec::with_capacity(5);
    if !product.images.is_empty() {
        actions.extend([
            DetailAction::NextImage,
            DetailAction::PreviousImage,
            DetailAction::PickImage,
        ]);
    }
    actions.extend([DetailAction::Buy, DetailAction::Back]);
    actions
}

/// `moodoo browse`
///
/// Interactive storefront: home page with the catalog, product detail with
/// an image carousel, and the admin list for a logged-in admin.
pub struct BrowseCommand;

impl BrowseCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Default for BrowseCommand {
    fn default() -> Self {
        Self::new()
    }
}

fn select(prompt: &str, items: &[String]) -> Result<Option<usize>, CliError> {
    Select::new()
        .with_prompt(prompt)
        .items(items)
        .default(0)
        .interact_opt()
        .map_err(CliError::from)
}

/// Fetch the catalog behind a spinner. Failures become `CatalogView::Failed`.
pub fn fetch_catalog(rt: &tokio::runtime::Runtime, ctx: &AppContext) -> CatalogView {
    let loading = render_catalog(&CatalogView::Loading);
    let pb = progress::spinner(loading.trim_end());
    match rt.block_on(ctx.repository().list_all()) {
        Ok(products) => {
            progress::finish_success(&pb, &format!("{} products", products.len()));
            CatalogView::Loaded(products)
        }
        Err(err) => {
            progress::finish_error(&pb, "Failed to load products");
            CatalogView::Failed(err.to_string())
        }
    }
}

/// Home page: hero, grid, and a pick list. `None` quits.
fn home_page(rt: &tokio::runtime::Runtime, ctx: &AppContext) -> Result<Option<NavEvent>, CliError> {
    println!("{}", render_hero());
    let view = fetch_catalog(rt, ctx);
    print!("{}", render_catalog(&view));

    let products: Vec<Product> = match view {
        CatalogView::Loaded(products) => products,
        _ => Vec::new(),
    };
    let mut items: Vec<String> = products.iter().map(|p| p.title.clone()).collect();
    items.push("Admin panel".to_string());
    items.push("Quit".to_string());

    let choice = FuzzySelect::new()
        .with_prompt("Open")
        .items(&items)
        .default(0)
        .interact_opt()
        .map_err(CliError::from)?;

    Ok(match choice {
        Some(index) if index < products.len() => {
            Some(NavEvent::ProductClicked(products[index].clone()))
        }
        Some(index) if index == products.len() => Some(NavEvent::AdminClicked),
        _ => None,
    })
}

fn detail_page(nav: &mut Navigator) -> Result<(), CliError> {
    let Some(product) = nav.selected().cloned() else {
        nav.dispatch(NavEvent::Back);
        return Ok(());
    };
    println!();
    print!("{}", render_detail(&product, nav.cursor()));

    let actions = detail_actions(&product);
    let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();
    let choice = select("Action", &labels)?.and_then(|index| actions.get(index).copied());
    match choice {
        Some(DetailAction::NextImage) => nav.cursor_mut().next(),
        Some(DetailAction::PreviousImage) => nav.cursor_mut().prev(),
        Some(DetailAction::PickImage) => {
            let images: Vec<String> = (1..=product.images.len())
                .map(|n| format!("Image {}", n))
                .collect();
            if let Some(index) = select("Image", &images)? {
                nav.cursor_mut().select(index);
            }
        }
        Some(DetailAction::Buy) => println!("\nCheckout: {}\n", product.shopier_url),
        Some(DetailAction::Back) | None => {
            nav.dispatch(NavEvent::Back);
        }
    }
    Ok(())
}

fn admin_page(rt: &tokio::runtime::Runtime, nav: &mut Navigator) -> Result<(), CliError> {
    let manager = SessionManager::with_default_store();
    let session = match manager.require_valid_session("the admin panel") {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{}", err);
            nav.dispatch(NavEvent::Back);
            return Ok(());
        }
    };

    let ctx = AppContext::authenticated(&session)?;
    let mut panel = ctx.admin_panel();
    match rt.block_on(panel.load()) {
        Ok(()) => print!("{}", render_admin_table(panel.products())),
        Err(err) => eprintln!("Failed to load products: {}", err),
    }
    println!("{}", session);

    let actions = vec!["Back to store".to_string(), "Log out".to_string()];
    match select("Admin", &actions)? {
        Some(1) => {
            if let Err(err) = rt.block_on(ctx.auth().sign_out(&session)) {
                tracing::warn!("Remote sign-out failed: {}", err);
            }
            manager.logout()?;
            nav.dispatch(NavEvent::AdminLoggedOut);
        }
        _ => {
            nav.dispatch(NavEvent::LogoClicked);
        }
    }
    Ok(())
}

impl CallableTrait for BrowseCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = AppContext::anonymous()?;
        let rt = build_runtime()?;
        let mut nav = Navigator::new();

        loop {
            let state = nav.state().clone();
            match state {
                ViewState::Home => match home_page(&rt, &ctx)? {
                    Some(event) => {
                        nav.dispatch(event);
                    }
                    None => break,
                },
                ViewState::ProductDetail(_) => detail_page(&mut nav)?,
                ViewState::Admin => admin_page(&rt, &mut nav)?,
            }
        }
        Ok(())
    }
}
