use crate::forms::ProductForm;
use crate::models::Product;
use crate::services::ImageFile;

/// Upper bound on images per product (existing plus staged).
pub const MAX_IMAGES: usize = 10;

/// What happened to a batch of picked files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StageOutcome {
    pub accepted: usize,
    pub not_images: usize,
    pub over_limit: usize,
}

/// State of the create/edit modal.
///
/// Picked files are only staged here; they are uploaded when the draft is
/// saved. URLs the admin removes are remembered so the save can clean them up.
#[derive(Debug, Clone)]
pub struct ProductDraft {
    pub form: ProductForm,
    editing: Option<Product>,
    existing_images: Vec<String>,
    new_images: Vec<ImageFile>,
    removed_images: Vec<String>,
    max_images: usize,
}

impl Default for ProductDraft {
    fn default() -> Self {
        Self::create()
    }
}

impl ProductDraft {
    /// Empty draft for a new product.
    pub fn create() -> Self {
        Self {
            form: ProductForm::default(),
            editing: None,
            existing_images: Vec::new(),
            new_images: Vec::new(),
            removed_images: Vec::new(),
            max_images: MAX_IMAGES,
        }
    }

    /// Draft pre-filled from a stored product.
    pub fn edit(product: &Product) -> Self {
        Self {
            form: ProductForm::from(product),
            editing: Some(product.clone()),
            existing_images: product.images.clone(),
            ..Self::create()
        }
    }

    pub fn with_max_images(mut self, max_images: usize) -> Self {
        self.max_images = max_images;
        self
    }

    pub fn editing(&self) -> Option<&Product> {
        self.editing.as_ref()
    }

    pub fn product_id(&self) -> Option<i64> {
        self.editing.as_ref().map(|p| p.id)
    }

    pub fn existing_images(&self) -> &[String] {
        &self.existing_images
    }

    pub fn new_images(&self) -> &[ImageFile] {
        &self.new_images
    }

    pub fn removed_images(&self) -> &[String] {
        &self.removed_images
    }

    pub fn total_images(&self) -> usize {
        self.existing_images.len() + self.new_images.len()
    }

    pub fn can_add_more(&self) -> bool {
        self.total_images() < self.max_images
    }

    /// Stage picked files. Non-images are dropped, and files beyond the
    /// per-product limit are dropped in pick order.
    pub fn stage_images(&mut self, files: Vec<ImageFile>) -> StageOutcome {
        let mut outcome = StageOutcome::default();
        for file in files {
            if !file.is_image() {
                outcome.not_images += 1;
            } else if !self.can_add_more() {
                outcome.over_limit += 1;
            } else {
                self.new_images.push(file);
                outcome.accepted += 1;
            }
        }
        outcome
    }

    pub fn unstage(&mut self, index: usize) -> Option<ImageFile> {
        (index < self.new_images.len()).then(|| self.new_images.remove(index))
    }

    /// Drop a stored image from the product; it is deleted on save.
    pub fn remove_existing(&mut self, url: &str) -> bool {
        let before = self.existing_images.len();
        self.existing_images.retain(|existing| existing != url);
        let removed = self.existing_images.len() != before;
        if removed {
            self.removed_images.push(url.to_string());
        }
        removed
    }

    pub(crate) fn into_parts(self) -> DraftParts {
        DraftParts {
            form: self.form,
            editing: self.editing,
            existing_images: self.existing_images,
            new_images: self.new_images,
            removed_images: self.removed_images,
        }
    }
}

pub(crate) struct DraftParts {
    pub form: ProductForm,
    pub editing: Option<Product>,
    pub existing_images: Vec<String>,
    pub new_images: Vec<ImageFile>,
    pub removed_images: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn image(name: &str) -> ImageFile {
        ImageFile::new(name, "image/png", vec![1])
    }

    fn stored() -> Product {
        Product {
            id: 9,
            title: "Aurora".to_string(),
            description: None,
            price: 1500.0,
            images: vec![
                "https://cdn/product-images/9/a.png".to_string(),
                "https://cdn/product-images/9/b.png".to_string(),
            ],
            shopier_url: "https://www.shopier.com/9".to_string(),
            dimensions: None,
            materials: None,
            stock: 2,
            is_featured: true,
            display_order: Some(1),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_draft_is_empty() {
        let draft = ProductDraft::create();
        assert_eq!(draft.total_images(), 0);
        assert_eq!(draft.product_id(), None);
        assert_eq!(draft.form.stock, "1");
    }

    #[test]
    fn test_edit_draft_prefills() {
        let draft = ProductDraft::edit(&stored());
        assert_eq!(draft.product_id(), Some(9));
        assert_eq!(draft.existing_images().len(), 2);
        assert_eq!(draft.form.title, "Aurora");
        assert!(draft.form.is_featured);
    }

    #[test]
    fn test_stage_filters_non_images_and_caps_total() {
        let mut draft = ProductDraft::edit(&stored()).with_max_images(4);
        let outcome = draft.stage_images(vec![
            image("c.png"),
            ImageFile::new("notes.txt", "text/plain", vec![]),
            image("d.png"),
            image("e.png"),
        ]);

        assert_eq!(
            outcome,
            StageOutcome {
                accepted: 2,
                not_images: 1,
                over_limit: 1
            }
        );
        assert_eq!(draft.total_images(), 4);
        assert!(!draft.can_add_more());
    }

    #[test]
    fn test_remove_existing_tracks_removed_urls() {
        let mut draft = ProductDraft::edit(&stored());
        assert!(draft.remove_existing("https://cdn/product-images/9/a.png"));
        assert!(!draft.remove_existing("https://cdn/product-images/9/zzz.png"));

        assert_eq!(draft.existing_images().len(), 1);
        assert_eq!(
            draft.removed_images(),
            &["https://cdn/product-images/9/a.png".to_string()]
        );
    }

    #[test]
    fn test_unstage() {
        let mut draft = ProductDraft::create();
        draft.stage_images(vec![image("a.png"), image("b.png")]);
        assert_eq!(draft.unstage(0).unwrap().file_name, "a.png");
        assert!(draft.unstage(5).is_none());
        assert_eq!(draft.new_images().len(), 1);
    }
}
