use super::draft::{DraftParts, ProductDraft};
use crate::connectors::ConnectorError;
use crate::errors::CatalogError;
use crate::models::{sort_catalog, Product, ProductPatch};
use crate::services::{ImageStore, ProductRepository};

/// Result of a delete request.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    Deleted(Product),
    Cancelled,
}

/// Admin list view: the loaded products plus the flows that mutate them.
///
/// The list is only replaced on success; a failing flow leaves it as it was
/// (reorder restores its snapshot).
pub struct AdminPanel {
    repository: ProductRepository,
    images: ImageStore,
    products: Vec<Product>,
}

impl AdminPanel {
    pub fn new(repository: ProductRepository, images: ImageStore) -> Self {
        Self {
            repository,
            images,
            products: Vec::new(),
        }
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn find(&self, id: i64) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn position(&self, id: i64) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    #[tracing::instrument(name = "Load admin product list", skip(self))]
    pub async fn load(&mut self) -> Result<(), CatalogError> {
        match self.repository.list_all().await {
            Ok(products) => {
                self.products = products;
                Ok(())
            }
            Err(err) => {
                tracing::error!("Failed to load products, keeping previous list: {}", err);
                Err(err)
            }
        }
    }

    /// Persist a draft: local checks, staged uploads, removed-image cleanup,
    /// then create or update.
    #[tracing::instrument(name = "Save product draft", skip(self, draft))]
    pub async fn save(&mut self, draft: ProductDraft) -> Result<Product, CatalogError> {
        if draft.total_images() == 0 {
            return Err(CatalogError::validation("at least one image is required"));
        }
        draft.form.check()?;

        let DraftParts {
            form,
            editing,
            mut existing_images,
            new_images,
            removed_images,
        } = draft.into_parts();
        let product_id = editing.as_ref().map(|p| p.id);

        let uploaded = self.images.upload_many(&new_images, product_id).await?;
        existing_images.extend(uploaded);

        self.images.discard(&removed_images).await;

        let payload = form.into_new_product(existing_images)?;
        match editing {
            Some(original) => {
                let updated = self
                    .repository
                    .update(original.id, &ProductPatch::from(payload))
                    .await?;
                match self.position(updated.id) {
                    Some(index) => self.products[index] = updated.clone(),
                    None => {
                        self.products.push(updated.clone());
                        sort_catalog(&mut self.products);
                    }
                }
                Ok(updated)
            }
            None => {
                let created = self.repository.create(&payload).await?;
                self.products.push(created.clone());
                sort_catalog(&mut self.products);
                Ok(created)
            }
        }
    }

    /// Delete after `confirm` agrees. The row goes first, then its images are
    /// removed best-effort.
    #[tracing::instrument(name = "Delete product", skip(self, confirm))]
    pub async fn delete<F>(&mut self, id: i64, confirm: F) -> Result<DeleteOutcome, CatalogError>
    where
        F: FnOnce(&Product) -> bool,
    {
        let product = match self.find(id) {
            Some(product) => product.clone(),
            None => self.repository.get_by_id(id).await?.ok_or_else(|| {
                CatalogError::Remote(ConnectorError::NotFound(format!("product {}", id)))
            })?,
        };

        if !confirm(&product) {
            tracing::debug!("Delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }

        self.repository.delete(product.id).await?;
        self.products.retain(|p| p.id != product.id);
        self.images.discard(&product.images).await;

        Ok(DeleteOutcome::Deleted(product))
    }

    /// Move the item at `from` to `to` and persist the new order.
    pub async fn move_item(&mut self, from: usize, to: usize) -> Result<(), CatalogError> {
        let len = self.products.len();
        if from >= len || to >= len {
            return Err(CatalogError::validation(format!(
                "position out of range: list has {} products",
                len
            )));
        }
        if from == to {
            return Ok(());
        }

        let mut reordered = self.products.clone();
        let item = reordered.remove(from);
        reordered.insert(to, item);
        self.commit_order(reordered).await
    }

    /// Persist an explicit order. `ordered_ids` must name every loaded
    /// product exactly once.
    pub async fn apply_order(&mut self, ordered_ids: &[i64]) -> Result<(), CatalogError> {
        let mut current: Vec<i64> = self.products.iter().map(|p| p.id).collect();
        let mut requested = ordered_ids.to_vec();
        current.sort_unstable();
        requested.sort_unstable();
        if current != requested {
            return Err(CatalogError::validation(
                "new order must list every product exactly once",
            ));
        }

        let reordered = ordered_ids
            .iter()
            .filter_map(|id| self.find(*id).cloned())
            .collect();
        self.commit_order(reordered).await
    }

    #[tracing::instrument(name = "Reorder products", skip(self, reordered))]
    async fn commit_order(&mut self, reordered: Vec<Product>) -> Result<(), CatalogError> {
        let snapshot = std::mem::replace(&mut self.products, reordered);
        let ids: Vec<i64> = self.products.iter().map(|p| p.id).collect();

        match self.repository.reorder(&ids).await {
            Ok(()) => {
                for (position, product) in self.products.iter_mut().enumerate() {
                    product.display_order = Some(position as i32 + 1);
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Reorder failed, restoring previous order");
                self.products = snapshot;
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connectors::{MockRemoteStore, RemoteCall};
    use crate::models::NewProduct;
    use crate::services::ImageFile;
    use std::sync::Arc;

    fn new_product(title: &str, order: Option<i32>) -> NewProduct {
        NewProduct {
            title: title.to_string(),
            description: None,
            price: 100.0,
            images: vec![format!(
                "https://mock.supabase.test/storage/v1/object/public/product-images/seed/{}.png",
                title
            )],
            shopier_url: "https://www.shopier.com/x".to_string(),
            dimensions: None,
            materials: None,
            stock: 1,
            is_featured: false,
            display_order: order,
        }
    }

    fn panel(remote: &MockRemoteStore) -> AdminPanel {
        let shared = Arc::new(remote.clone());
        AdminPanel::new(
            ProductRepository::new(shared.clone()),
            ImageStore::new(shared),
        )
    }

    fn filled_draft() -> ProductDraft {
        let mut draft = ProductDraft::create();
        draft.form.title = "Lumen".to_string();
        draft.form.price = "750".to_string();
        draft.form.shopier_url = "https://www.shopier.com/lumen".to_string();
        draft
    }

    #[tokio::test]
    async fn test_save_without_images_makes_no_remote_call() {
        let remote = MockRemoteStore::new();
        let mut panel = panel(&remote);

        let err = panel.save(filled_draft()).await.unwrap_err();

        assert!(matches!(err, CatalogError::Validation(_)));
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_save_with_bad_price_uploads_nothing() {
        let remote = MockRemoteStore::new();
        let mut panel = panel(&remote);
        let mut draft = filled_draft();
        draft.form.price = "-5".to_string();
        draft.stage_images(vec![ImageFile::new("a.png", "image/png", vec![1])]);

        assert!(panel.save(draft).await.is_err());
        assert!(remote.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_uploads_under_temp_and_inserts() {
        let remote = MockRemoteStore::new();
        let mut panel = panel(&remote);
        let mut draft = filled_draft();
        draft.stage_images(vec![ImageFile::new("a.png", "image/png", vec![1])]);

        let created = panel.save(draft).await.unwrap();

        assert_eq!(created.images.len(), 1);
        assert!(created.images[0].contains("/product-images/temp/"));
        assert_eq!(panel.products().len(), 1);
        assert!(matches!(remote.calls()[0], RemoteCall::Upload { .. }));
        assert!(matches!(remote.calls()[1], RemoteCall::Insert { .. }));
    }

    #[tokio::test]
    async fn test_edit_removes_dropped_images_and_keeps_order() {
        let remote = MockRemoteStore::new();
        let stored = remote.seed(new_product("Aurora", Some(3)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();

        let mut draft = ProductDraft::edit(&stored);
        draft.form.title = "Aurora II".to_string();
        draft.stage_images(vec![ImageFile::new("b.jpg", "image/jpeg", vec![2])]);
        draft.remove_existing(&stored.images[0]);

        let updated = panel.save(draft).await.unwrap();

        assert_eq!(updated.title, "Aurora II");
        assert_eq!(updated.display_order, Some(3));
        assert_eq!(updated.images.len(), 1);
        assert!(updated.images[0].contains(&format!("/product-images/{}/", stored.id)));
        assert_eq!(panel.products()[0].title, "Aurora II");
        assert!(remote
            .calls()
            .iter()
            .any(|call| matches!(call, RemoteCall::Remove { paths } if paths == &vec!["seed/Aurora.png".to_string()])));
    }

    #[tokio::test]
    async fn test_failed_update_leaves_list_untouched() {
        let remote = MockRemoteStore::new();
        let stored = remote.seed(new_product("Aurora", Some(1)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        remote.fail_updates_for(stored.id);

        let mut draft = ProductDraft::edit(&stored);
        draft.form.title = "Renamed".to_string();

        assert!(panel.save(draft).await.is_err());
        assert_eq!(panel.products()[0].title, "Aurora");
    }

    #[tokio::test]
    async fn test_delete_cancelled_makes_no_remote_call() {
        let remote = MockRemoteStore::new();
        let stored = remote.seed(new_product("Aurora", None));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        remote.clear_calls();

        let outcome = panel.delete(stored.id, |_| false).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Cancelled);
        assert!(remote.calls().is_empty());
        assert_eq!(panel.products().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_removes_row_then_images() {
        let remote = MockRemoteStore::new();
        let stored = remote.seed(new_product("Aurora", None));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        remote.clear_calls();

        let outcome = panel.delete(stored.id, |_| true).await.unwrap();

        assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
        assert!(panel.products().is_empty());
        assert!(remote.row(stored.id).is_none());
        let calls = remote.calls();
        assert_eq!(calls[0], RemoteCall::Delete { id: stored.id });
        assert!(matches!(calls[1], RemoteCall::Remove { .. }));
    }

    #[tokio::test]
    async fn test_delete_survives_image_cleanup_failure() {
        let remote = MockRemoteStore::new();
        let stored = remote.seed(new_product("Aurora", None));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        remote.fail_removes(true);

        let outcome = panel.delete(stored.id, |_| true).await.unwrap();
        assert!(matches!(outcome, DeleteOutcome::Deleted(_)));
    }

    #[tokio::test]
    async fn test_move_item_renumbers_on_success() {
        let remote = MockRemoteStore::new();
        let a = remote.seed(new_product("A", Some(1)));
        let b = remote.seed(new_product("B", Some(2)));
        let c = remote.seed(new_product("C", Some(3)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();

        panel.move_item(2, 0).await.unwrap();

        let ids: Vec<i64> = panel.products().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![c.id, a.id, b.id]);
        assert_eq!(panel.products()[0].display_order, Some(1));
        assert_eq!(remote.row(c.id).unwrap().display_order, Some(1));
    }

    #[tokio::test]
    async fn test_move_item_restores_snapshot_on_failure() {
        let remote = MockRemoteStore::new();
        let a = remote.seed(new_product("A", Some(1)));
        let b = remote.seed(new_product("B", Some(2)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        let before = panel.products().to_vec();
        remote.fail_updates_for(a.id);

        let result = panel.move_item(0, 1).await;

        assert!(result.is_err());
        assert_eq!(panel.products(), before.as_slice());
        assert_eq!(remote.row(b.id).unwrap().display_order, Some(1));
    }

    #[tokio::test]
    async fn test_move_item_out_of_range() {
        let remote = MockRemoteStore::new();
        remote.seed(new_product("A", Some(1)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();

        assert!(matches!(
            panel.move_item(0, 4).await,
            Err(CatalogError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_apply_order_requires_permutation() {
        let remote = MockRemoteStore::new();
        let a = remote.seed(new_product("A", Some(1)));
        let b = remote.seed(new_product("B", Some(2)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();

        assert!(panel.apply_order(&[a.id]).await.is_err());
        panel.apply_order(&[b.id, a.id]).await.unwrap();
        assert_eq!(panel.products()[0].id, b.id);
    }

    #[tokio::test]
    async fn test_load_failure_keeps_previous_list() {
        let remote = MockRemoteStore::new();
        remote.seed(new_product("A", Some(1)));
        let mut panel = panel(&remote);
        panel.load().await.unwrap();
        remote.fail_selects(true);

        assert!(panel.load().await.is_err());
        assert_eq!(panel.products().len(), 1);
    }
}
