//! Product types as served by the catalog API.

use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Price text shown for products that cannot be bought.
pub const PRICELESS_LABEL: &str = "Priceless";

/// A product in the catalog.
///
/// Products are immutable once fetched. A product without a price is shown in
/// the catalog but can never be bought.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Product title.
    pub title: String,
    /// Full description.
    #[serde(default)]
    pub description: String,
    /// Image path relative to the CDN base.
    #[serde(default)]
    pub image: String,
    /// Category label.
    #[serde(default)]
    pub category: String,
    /// Price, or `None` when the product is not for sale.
    #[serde(default)]
    pub price: Option<Money>,
}

impl Product {
    /// Create a product with a price and empty descriptive fields.
    pub fn new(id: impl Into<ProductId>, title: impl Into<String>, price: Option<Money>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            image: String::new(),
            category: String::new(),
            price,
        }
    }

    /// Set the category label.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the image path.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// Check if the product can be put in a basket.
    pub fn is_for_sale(&self) -> bool {
        self.price.is_some()
    }

    /// Price text for cards and previews.
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => price.display_with_unit(),
            None => PRICELESS_LABEL.to_string(),
        }
    }

    /// Resolve the image path against a CDN base URL.
    pub fn image_url(&self, cdn_base: &str) -> String {
        if self.image.starts_with("http://") || self.image.starts_with("https://") {
            return self.image.clone();
        }
        format!(
            "{}/{}",
            cdn_base.trim_end_matches('/'),
            self.image.trim_start_matches('/')
        )
    }
}

/// Response body of the product list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductListResponse {
    /// Total number of products the server knows about.
    pub total: u64,
    /// The products.
    pub items: Vec<Product>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_deserialization() {
        let json = r#"{
            "id": "854cef69-976d-4c2a-a18c-2aa45046c390",
            "description": "If you plan to solve tasks in the tracker",
            "image": "/5_Dots.svg",
            "title": "+1 hour in a day",
            "category": "soft-skill",
            "price": 750
        }"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, Some(Money::new(750)));
        assert!(product.is_for_sale());
    }

    #[test]
    fn test_null_price_is_not_for_sale() {
        let json = r#"{"id": "p", "title": "Mystery", "price": null}"#;
        let product: Product = serde_json::from_str(json).unwrap();
        assert_eq!(product.price, None);
        assert!(!product.is_for_sale());
        assert!(product.description.is_empty());
    }

    #[test]
    fn test_price_label() {
        let priced = Product::new("p", "Pen", Some(Money::new(750))).with_category("other");
        assert_eq!(priced.price_label(), "750 synapses");
        assert_eq!(priced.category, "other");

        let priceless = Product::new("s", "Stone", None);
        assert_eq!(priceless.price_label(), PRICELESS_LABEL);
    }

    #[test]
    fn test_image_url() {
        let product = Product::new("p", "P", None).with_image("/5_Dots.svg");
        assert_eq!(
            product.image_url("https://larek.example/content/weblarek/"),
            "https://larek.example/content/weblarek/5_Dots.svg"
        );
    }
}
