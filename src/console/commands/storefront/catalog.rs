use crate::cli::context::{build_runtime, AppContext};
use crate::cli::error::CliError;
use crate::cli::progress;
use crate::console::commands::CallableTrait;
use crate::models::Product;
use crate::views::navigation::ImageCursor;
use crate::views::presentation::{render_catalog, render_detail, render_hero};
use crate::views::CatalogView;

/// Catalog listing as printed to stdout.
pub fn catalog_output(products: Vec<Product>, json: bool) -> Result<String, CliError> {
    if json {
        return serde_json::to_string_pretty(&products)
            .map_err(|e| CliError::InvalidInput(format!("failed to encode products: {e}")));
    }
    Ok(format!(
        "{}\n{}",
        render_hero(),
        render_catalog(&CatalogView::Loaded(products))
    ))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// catalog
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo catalog [--featured] [--json]`
pub struct CatalogCommand {
    pub featured: bool,
    pub json: bool,
}

impl CatalogCommand {
    pub fn new(featured: bool, json: bool) -> Self {
        Self { featured, json }
    }
}

impl CallableTrait for CatalogCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = AppContext::anonymous()?;
        let rt = build_runtime()?;

        let output = rt.block_on(async {
            let repository = ctx.repository();
            let pb = progress::spinner("Loading products...");
            let result = if self.featured {
                repository.list_featured().await
            } else {
                repository.list_all().await
            };
            match result {
                Ok(products) => {
                    progress::finish_success(&pb, &format!("{} products", products.len()));
                    catalog_output(products, self.json)
                }
                Err(err) => {
                    progress::finish_error(&pb, "Failed to load products");
                    Err(CliError::from(err))
                }
            }
        })?;

        print!("{}", output);
        Ok(())
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// show
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// `moodoo show <id> [--json]`
pub struct ShowCommand {
    pub id: i64,
    pub json: bool,
}

impl ShowCommand {
    pub fn new(id: i64, json: bool) -> Self {
        Self { id, json }
    }
}

impl CallableTrait for ShowCommand {
    fn call(&self) -> Result<(), Box<dyn std::error::Error>> {
        let ctx = AppContext::anonymous()?;
        let rt = build_runtime()?;

        let product = rt
            .block_on(ctx.repository().get_by_id(self.id))?
            .ok_or(CliError::ProductNotFound { id: self.id })?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&product)?);
        } else {
            let cursor = ImageCursor::new(product.images.len());
            print!("{}", render_detail(&product, &cursor));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::MockRemoteStore;
    use crate::services::ProductRepository;
    use std::sync::Arc;

    fn demo_products() -> Vec<Product> {
        let repository = ProductRepository::new(Arc::new(MockRemoteStore::demo()));
        build_runtime().unwrap().block_on(repository.list_all()).unwrap()
    }

    #[test]
    fn test_catalog_output_table() {
        let out = catalog_output(demo_products(), false).unwrap();
        assert!(out.contains("Moodoo Studio"));
        assert!(out.contains("Amóre Chili"));
        assert!(out.contains("₺10.500"));
    }

    #[test]
    fn test_catalog_output_json() {
        let out = catalog_output(demo_products(), true).unwrap();
        let parsed: Vec<Product> = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed.len(), 3);
    }
}
