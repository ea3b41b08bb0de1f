use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::cmp::Ordering;

/// A catalog item as stored in the remote `products` table.
///
/// `id` and `created_at` are assigned by the remote store and never sent back
/// on insert or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
    pub shopier_url: String,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub materials: Option<String>,
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub display_order: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// First image, used as the card/table thumbnail.
    pub fn cover_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    pub fn in_stock(&self) -> bool {
        self.stock > 0
    }
}

/// Insert payload for the `products` table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct NewProduct {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    pub title: String,
    pub description: Option<String>,
    #[validate(minimum = 0.0)]
    pub price: f64,
    #[validate(min_items = 1)]
    pub images: Vec<String>,
    #[validate(pattern = r"^https?://\S+$")]
    pub shopier_url: String,
    pub dimensions: Option<String>,
    pub materials: Option<String>,
    #[validate(minimum = 0)]
    pub stock: i32,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

/// Partial update for a product row. Absent fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shopier_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub materials: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stock: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_featured: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

impl ProductPatch {
    pub fn display_order(position: i32) -> Self {
        Self {
            display_order: Some(position),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply the present fields onto a stored row.
    pub fn apply(self, product: &mut Product) {
        if let Some(title) = self.title {
            product.title = title;
        }
        if let Some(description) = self.description {
            product.description = description;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(images) = self.images {
            product.images = images;
        }
        if let Some(shopier_url) = self.shopier_url {
            product.shopier_url = shopier_url;
        }
        if let Some(dimensions) = self.dimensions {
            product.dimensions = dimensions;
        }
        if let Some(materials) = self.materials {
            product.materials = materials;
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        if let Some(is_featured) = self.is_featured {
            product.is_featured = is_featured;
        }
        if let Some(display_order) = self.display_order {
            product.display_order = Some(display_order);
        }
    }
}

/// An admin edit replaces every editable field. `display_order` is only carried
/// over when the form set one explicitly.
impl From<NewProduct> for ProductPatch {
    fn from(val: NewProduct) -> Self {
        Self {
            title: Some(val.title),
            description: Some(val.description),
            price: Some(val.price),
            images: Some(val.images),
            shopier_url: Some(val.shopier_url),
            dimensions: Some(val.dimensions),
            materials: Some(val.materials),
            stock: Some(val.stock),
            is_featured: Some(val.is_featured),
            display_order: val.display_order,
        }
    }
}

impl From<&Product> for NewProduct {
    fn from(val: &Product) -> Self {
        Self {
            title: val.title.clone(),
            description: val.description.clone(),
            price: val.price,
            images: val.images.clone(),
            shopier_url: val.shopier_url.clone(),
            dimensions: val.dimensions.clone(),
            materials: val.materials.clone(),
            stock: val.stock,
            is_featured: val.is_featured,
            display_order: val.display_order,
        }
    }
}

/// Catalog ordering: `display_order` ascending with unranked rows last, then
/// newest first.
pub fn catalog_order(a: &Product, b: &Product) -> Ordering {
    let rank = match (a.display_order, b.display_order) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    rank.then_with(|| b.created_at.cmp(&a.created_at))
}

pub fn sort_catalog(products: &mut [Product]) {
    products.sort_by(catalog_order);
}
