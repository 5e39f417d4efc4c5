//! Storefront assembly.

use std::path::Path;
use std::sync::Arc;

use larek_commerce::basket::{BasketAggregate, BasketMode};
use larek_commerce::catalog::Product;
use larek_data::{ApiClient, HttpApiClient};
use larek_observability::{init_logging, ObservabilityError};

use crate::config::StoreConfig;
use crate::coordinator::CheckoutCoordinator;
use crate::error::StorefrontError;
use crate::events::EventBus;

/// Builder for a [`CheckoutCoordinator`].
///
/// Construction is two-phase: `build` wires the domain together, and views
/// subscribe to [`CheckoutCoordinator::events`] afterwards.
///
/// # Example
///
/// ```rust,ignore
/// let coordinator = StorefrontBuilder::new()
///     .with_api(Arc::new(HttpApiClient::new("https://larek.example/api/weblarek")?))
///     .with_basket_mode(BasketMode::Uniqueness)
///     .build()?;
///
/// coordinator.events().subscribe(|event| render(event));
/// ```
#[derive(Default)]
pub struct StorefrontBuilder {
    api: Option<Arc<dyn ApiClient>>,
    basket_mode: BasketMode,
    initial_basket: Vec<(Product, u32)>,
    events: Option<Arc<EventBus>>,
}

impl StorefrontBuilder {
    /// Create a builder with no collaborators.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with an HTTP client and basket mode from config.
    pub fn from_config(config: &StoreConfig) -> Result<Self, StorefrontError> {
        config.validate()?;
        let client = HttpApiClient::with_policy(config.api_base_url(), config.fetch_policy())?;
        Ok(Self::new()
            .with_api(Arc::new(client))
            .with_basket_mode(config.basket_mode))
    }

    /// Set the API client.
    pub fn with_api(mut self, api: Arc<dyn ApiClient>) -> Self {
        self.api = Some(api);
        self
    }

    /// Set the basket mode.
    pub fn with_basket_mode(mut self, mode: BasketMode) -> Self {
        self.basket_mode = mode;
        self
    }

    /// Seed the basket with `(product, quantity)` pairs.
    pub fn with_initial_basket(mut self, items: impl IntoIterator<Item = (Product, u32)>) -> Self {
        self.initial_basket.extend(items);
        self
    }

    /// Share an existing event bus instead of creating one.
    pub fn with_event_bus(mut self, events: Arc<EventBus>) -> Self {
        self.events = Some(events);
        self
    }

    /// Build the coordinator.
    ///
    /// Fails with [`StorefrontError::MissingCollaborator`] when no API client
    /// was supplied.
    pub fn build(self) -> Result<CheckoutCoordinator, StorefrontError> {
        let api = self
            .api
            .ok_or(StorefrontError::MissingCollaborator("api client"))?;
        let basket = BasketAggregate::with_entries(self.basket_mode, self.initial_basket);
        let events = self.events.unwrap_or_default();

        tracing::debug!(
            basket_mode = self.basket_mode.as_str(),
            seeded = basket.item_count(),
            "storefront built"
        );
        Ok(CheckoutCoordinator::new(api, basket, events))
    }
}

/// Load config, start logging, build the coordinator and fetch the catalog.
///
/// A failed catalog fetch is not fatal: the store starts with an empty
/// gallery and the failure is published as `CatalogFailed`.
pub async fn bootstrap(config_path: impl AsRef<Path>) -> Result<CheckoutCoordinator, StorefrontError> {
    let config = StoreConfig::load(config_path)?;
    match init_logging(&config.logging) {
        Ok(()) | Err(ObservabilityError::AlreadyInitialized(_)) => {}
        Err(err) => return Err(err.into()),
    }

    let mut coordinator = StorefrontBuilder::from_config(&config)?.build()?;
    if let Err(err) = coordinator.load_catalog().await {
        tracing::warn!(error = %err, "starting with an empty catalog");
    }
    Ok(coordinator)
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_commerce::{Money, ProductId};
    use larek_data::ScriptedApiClient;

    #[test]
    fn test_missing_api_fails_fast() {
        let err = StorefrontBuilder::new().build().unwrap_err();
        assert!(matches!(err, StorefrontError::MissingCollaborator("api client")));
    }

    #[test]
    fn test_build_with_seeded_basket() {
        let coordinator = StorefrontBuilder::new()
            .with_api(Arc::new(ScriptedApiClient::new()))
            .with_basket_mode(BasketMode::Uniqueness)
            .with_initial_basket(vec![
                (Product::new("a", "Pen", Some(Money::new(100))), 3),
                (Product::new("b", "Priceless", None), 1),
            ])
            .build()
            .unwrap();

        let basket = coordinator.basket();
        assert_eq!(basket.mode(), BasketMode::Uniqueness);
        assert_eq!(basket.item_count(), 1);
        assert!(basket.contains(&ProductId::new("a")));
    }

    #[test]
    fn test_shared_event_bus() {
        let events = Arc::new(EventBus::new());
        let coordinator = StorefrontBuilder::new()
            .with_api(Arc::new(ScriptedApiClient::new()))
            .with_event_bus(Arc::clone(&events))
            .build()
            .unwrap();

        assert!(Arc::ptr_eq(coordinator.events(), &events));
    }

    #[test]
    fn test_from_config() {
        let config = StoreConfig::new("https://larek.example")
            .with_basket_mode(BasketMode::Uniqueness)
            .with_request_timeout_ms(2_000);
        let coordinator = StorefrontBuilder::from_config(&config).unwrap().build().unwrap();
        assert_eq!(coordinator.basket().mode(), BasketMode::Uniqueness);
    }

    #[test]
    fn test_from_config_rejects_missing_origin() {
        assert!(matches!(
            StorefrontBuilder::from_config(&StoreConfig::default()),
            Err(StorefrontError::Config(_))
        ));
    }
}
