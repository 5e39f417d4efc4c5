//! Storefront domain types and logic for Larek.
//!
//! This crate holds the state a shopper builds up in one session:
//!
//! - **Catalog**: products loaded once from the API, looked up by id
//! - **Basket**: selected products, quantities and the running total
//! - **Checkout**: the two-step order draft, its validation and submission
//!
//! Nothing here knows about screens or navigation; the storefront crate
//! drives these types and reacts to their results.
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_commerce::prelude::*;
//!
//! let mut catalog = ProductCatalog::new();
//! catalog.load(&api).await?;
//!
//! let mut basket = BasketAggregate::new(BasketMode::Multiplicity);
//! basket.add(catalog.require(&ProductId::new("a"))?);
//!
//! let mut checkout = CheckoutAggregate::new();
//! checkout.set_items(basket.identifiers());
//! checkout.set_total(basket.total());
//! checkout.set_payment(PaymentMethod::Online);
//! checkout.set_address("Main St 1");
//! checkout.set_contacts("buyer@example.com", "+79000000000");
//!
//! let confirmation = checkout.submit(&api).await?.into_confirmation()?;
//! println!("Charged {}", confirmation.total.display_with_unit());
//! ```

pub mod error;
pub mod ids;
pub mod money;

pub mod basket;
pub mod catalog;
pub mod checkout;

pub use error::CommerceError;
pub use ids::*;
pub use money::{Money, CURRENCY_UNIT};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CommerceError;
    pub use crate::ids::*;
    pub use crate::money::{Money, CURRENCY_UNIT};

    // Catalog
    pub use crate::catalog::{Product, ProductCatalog, ProductListResponse};

    // Basket
    pub use crate::basket::{
        BasketAggregate, BasketChange, BasketEntry, BasketMode, BasketRejection, BasketSummary,
    };

    // Checkout
    pub use crate::checkout::{
        CheckoutAggregate, CheckoutDraft, CheckoutStage, OrderConfirmation,
        OrderSubmissionPayload, OrderSubmissionResult, PaymentMethod,
    };
}
