//! Product catalog loaded from the API.

use larek_data::{endpoints, ApiClient};

use crate::catalog::{Product, ProductListResponse};
use crate::error::CommerceError;
use crate::ids::ProductId;

/// The products fetched for this session.
///
/// A failed load leaves the catalog empty rather than partially filled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCatalog {
    products: Vec<Product>,
}

impl ProductCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from already-fetched products.
    pub fn from_products(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Fetch the product list, replacing the current contents.
    ///
    /// Returns the number of products loaded.
    pub async fn load(&mut self, api: &dyn ApiClient) -> Result<usize, CommerceError> {
        self.products.clear();

        let value = api.get(endpoints::PRODUCT_LIST).await?;
        let listing: ProductListResponse = serde_json::from_value(value)
            .map_err(|e| CommerceError::InvalidResponse(e.to_string()))?;

        if listing.total != listing.items.len() as u64 {
            tracing::debug!(
                reported = listing.total,
                received = listing.items.len(),
                "product list total differs from item count"
            );
        }

        self.products = listing.items;
        tracing::info!(count = self.products.len(), "catalog loaded");
        Ok(self.products.len())
    }

    /// Look up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Look up a product by id, failing when it is unknown.
    pub fn require(&self, id: &ProductId) -> Result<&Product, CommerceError> {
        self.get(id)
            .ok_or_else(|| CommerceError::ProductNotFound(id.to_string()))
    }

    /// All products in server order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Products that have a price.
    pub fn for_sale(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.is_for_sale())
    }

    /// Number of products.
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Check if the catalog is empty.
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use larek_data::{FetchError, ScriptedApiClient};
    use serde_json::json;

    fn listing() -> serde_json::Value {
        json!({
            "total": 2,
            "items": [
                {"id": "a", "title": "A", "description": "", "image": "/a.svg", "category": "other", "price": 100},
                {"id": "b", "title": "B", "description": "", "image": "/b.svg", "category": "other", "price": null}
            ]
        })
    }

    #[tokio::test]
    async fn test_load_and_lookup() {
        let api = ScriptedApiClient::new().on_get(endpoints::PRODUCT_LIST, listing());
        let mut catalog = ProductCatalog::new();

        assert_eq!(catalog.load(&api).await.unwrap(), 2);
        assert_eq!(
            catalog.get(&ProductId::new("a")).unwrap().price,
            Some(Money::new(100))
        );
        assert!(catalog.get(&ProductId::new("zzz")).is_none());
        assert_eq!(catalog.for_sale().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_load_leaves_catalog_empty() {
        let api = ScriptedApiClient::new()
            .on_get(endpoints::PRODUCT_LIST, listing())
            .fail_get(endpoints::PRODUCT_LIST, FetchError::Timeout);
        let mut catalog = ProductCatalog::new();

        catalog.load(&api).await.unwrap();
        assert_eq!(catalog.len(), 2);

        let err = catalog.load(&api).await.unwrap_err();
        assert!(matches!(err, CommerceError::Fetch(FetchError::Timeout)));
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_malformed_listing() {
        let api = ScriptedApiClient::new().on_get(endpoints::PRODUCT_LIST, json!({"items": 3}));
        let mut catalog = ProductCatalog::new();

        let err = catalog.load(&api).await.unwrap_err();
        assert!(matches!(err, CommerceError::InvalidResponse(_)));
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_require_unknown_product() {
        let catalog = ProductCatalog::from_products(vec![Product::new("a", "A", None)]);
        assert!(catalog.require(&ProductId::new("a")).is_ok());
        assert!(matches!(
            catalog.require(&ProductId::new("b")),
            Err(CommerceError::ProductNotFound(_))
        ));
    }
}
