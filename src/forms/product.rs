use crate::errors::CatalogError;
use crate::models::{NewProduct, Product};
use serde::{Deserialize, Serialize};
use serde_valid::Validate;

/// Product fields as typed into the admin form.
///
/// Numbers stay text until `into_new_product` so a half-typed price never
/// reaches the remote store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct ProductForm {
    #[validate(min_length = 1)]
    #[validate(max_length = 200)]
    pub title: String,
    #[validate(min_length = 1)]
    pub price: String,
    #[validate(min_length = 1)]
    pub shopier_url: String,
    #[serde(default)]
    #[validate(max_length = 5000)]
    pub description: String,
    #[serde(default)]
    pub materials: String,
    #[serde(default)]
    pub dimensions: String,
    #[validate(min_length = 1)]
    pub stock: String,
    #[serde(default)]
    pub is_featured: bool,
}

impl Default for ProductForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            price: String::new(),
            shopier_url: String::new(),
            description: String::new(),
            materials: String::new(),
            dimensions: String::new(),
            stock: "1".to_string(),
            is_featured: false,
        }
    }
}

impl From<&Product> for ProductForm {
    fn from(product: &Product) -> Self {
        Self {
            title: product.title.clone(),
            price: product.price.to_string(),
            shopier_url: product.shopier_url.clone(),
            description: product.description.clone().unwrap_or_default(),
            materials: product.materials.clone().unwrap_or_default(),
            dimensions: product.dimensions.clone().unwrap_or_default(),
            stock: product.stock.to_string(),
            is_featured: product.is_featured,
        }
    }
}

fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Accepts `10500`, `10500.50` and the comma decimal form `10500,50`.
pub fn parse_price(value: &str) -> Result<f64, CatalogError> {
    let normalized = value.trim().replace(',', ".");
    let price: f64 = normalized
        .parse()
        .map_err(|_| CatalogError::validation(format!("price is not a number: {:?}", value)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(CatalogError::validation("price must be zero or more"));
    }
    Ok(price)
}

pub fn parse_stock(value: &str) -> Result<i32, CatalogError> {
    let stock: i32 = value
        .trim()
        .parse()
        .map_err(|_| CatalogError::validation(format!("stock is not a whole number: {:?}", value)))?;
    if stock < 0 {
        return Err(CatalogError::validation("stock must be zero or more"));
    }
    Ok(stock)
}

impl ProductForm {
    /// Validate the typed fields and build the row payload with `images`.
    pub fn into_new_product(self, images: Vec<String>) -> Result<NewProduct, CatalogError> {
        self.validate()?;

        let product = NewProduct {
            title: self.title.trim().to_string(),
            description: optional_text(&self.description),
            price: parse_price(&self.price)?,
            images,
            shopier_url: self.shopier_url.trim().to_string(),
            dimensions: optional_text(&self.dimensions),
            materials: optional_text(&self.materials),
            stock: parse_stock(&self.stock)?,
            is_featured: self.is_featured,
            display_order: None,
        };
        product.validate()?;
        Ok(product)
    }

    /// Field checks that need no images, run before anything is uploaded.
    pub fn check(&self) -> Result<(), CatalogError> {
        self.clone()
            .into_new_product(vec!["pending".to_string()])
            .map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> ProductForm {
        ProductForm {
            title: "Amóre Chili".to_string(),
            price: "10500".to_string(),
            shopier_url: "https://www.shopier.com/moodoo/1".to_string(),
            description: "  ".to_string(),
            materials: "Orijinal vitray camı, bakır folyo".to_string(),
            dimensions: "35cm x 45cm".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_default_stock_is_one() {
        assert_eq!(ProductForm::default().stock, "1");
    }

    #[test]
    fn test_into_new_product() {
        let product = form()
            .into_new_product(vec!["https://cdn/product-images/1/a.jpg".to_string()])
            .unwrap();

        assert_eq!(product.title, "Amóre Chili");
        assert_eq!(product.price, 10500.0);
        assert_eq!(product.stock, 1);
        assert_eq!(product.description, None);
        assert_eq!(product.dimensions.as_deref(), Some("35cm x 45cm"));
        assert_eq!(product.display_order, None);
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("10500").unwrap(), 10500.0);
        assert_eq!(parse_price(" 99,90 ").unwrap(), 99.9);
        assert!(parse_price("-1").is_err());
        assert!(parse_price("abc").is_err());
        assert!(parse_price("NaN").is_err());
    }

    #[test]
    fn test_parse_stock() {
        assert_eq!(parse_stock("0").unwrap(), 0);
        assert!(parse_stock("-3").is_err());
        assert!(parse_stock("1.5").is_err());
    }

    #[test]
    fn test_check_rejects_bad_fields() {
        assert!(form().check().is_ok());

        let mut blank_title = form();
        blank_title.title = String::new();
        assert!(matches!(blank_title.check(), Err(CatalogError::Validation(_))));

        let mut bad_url = form();
        bad_url.shopier_url = "www.shopier.com".to_string();
        assert!(bad_url.check().is_err());
    }

    #[test]
    fn test_round_trip_from_product() {
        let product = form()
            .into_new_product(vec!["https://cdn/product-images/1/a.jpg".to_string()])
            .unwrap();
        let stored = Product {
            id: 1,
            title: product.title.clone(),
            description: product.description.clone(),
            price: product.price,
            images: product.images.clone(),
            shopier_url: product.shopier_url.clone(),
            dimensions: product.dimensions.clone(),
            materials: product.materials.clone(),
            stock: product.stock,
            is_featured: product.is_featured,
            display_order: Some(4),
            created_at: chrono::Utc::now(),
        };
        let edited = ProductForm::from(&stored);
        assert_eq!(edited.price, "10500");
        assert_eq!(edited.description, "");
    }
}
