//! Product repository
//!
//! Maps catalog intents onto the remote `products` table. Every operation is a
//! single request except `reorder`, which is a sequential pipeline of updates.

use crate::connectors::{ProductQuery, ProductTable};
use crate::errors::CatalogError;
use crate::models::{NewProduct, Product, ProductPatch};
use std::sync::Arc;

#[derive(Clone)]
pub struct ProductRepository {
    table: Arc<dyn ProductTable>,
}

impl ProductRepository {
    pub fn new(table: Arc<dyn ProductTable>) -> Self {
        Self { table }
    }

    /// Every product in catalog order.
    pub async fn list_all(&self) -> Result<Vec<Product>, CatalogError> {
        self.table
            .select(&ProductQuery::all())
            .await
            .map_err(CatalogError::Remote)
    }

    /// Featured products in catalog order.
    pub async fn list_featured(&self) -> Result<Vec<Product>, CatalogError> {
        self.table
            .select(&ProductQuery::featured())
            .await
            .map_err(CatalogError::Remote)
    }

    /// `Ok(None)` when no row has this id.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Product>, CatalogError> {
        let rows = self
            .table
            .select(&ProductQuery::by_id(id))
            .await
            .map_err(CatalogError::Remote)?;
        Ok(rows.into_iter().next())
    }

    pub async fn create(&self, product: &NewProduct) -> Result<Product, CatalogError> {
        let created = self
            .table
            .insert(product)
            .await
            .map_err(CatalogError::Remote)?;
        tracing::info!(id = created.id, title = %created.title, "Product created");
        Ok(created)
    }

    pub async fn update(&self, id: i64, patch: &ProductPatch) -> Result<Product, CatalogError> {
        let updated = self
            .table
            .update(id, patch)
            .await
            .map_err(CatalogError::Remote)?;
        tracing::info!(id = id, "Product updated");
        Ok(updated)
    }

    pub async fn delete(&self, id: i64) -> Result<(), CatalogError> {
        self.table.delete(id).await.map_err(CatalogError::Remote)?;
        tracing::info!(id = id, "Product deleted");
        Ok(())
    }

    /// Persist `ordered_ids` as `display_order = position + 1`.
    ///
    /// Updates go out one at a time in input order. The first failure stops the
    /// pipeline and is returned; rows already updated keep their new position.
    /// Not atomic: a batched or transactional write would be needed to make a
    /// partial reorder impossible.
    pub async fn reorder(&self, ordered_ids: &[i64]) -> Result<(), CatalogError> {
        for (position, id) in ordered_ids.iter().enumerate() {
            let display_order = position as i32 + 1;
            if let Err(err) = self
                .table
                .update(*id, &ProductPatch::display_order(display_order))
                .await
            {
                tracing::error!(
                    id = id,
                    applied = position,
                    total = ordered_ids.len(),
                    "Reorder stopped: {}",
                    err
                );
                return Err(CatalogError::Remote(err));
            }
        }
        tracing::info!(count = ordered_ids.len(), "Products reordered");
        Ok(())
    }
}
