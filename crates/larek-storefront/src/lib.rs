//! Storefront layer for Larek.
//!
//! Sits between the commerce aggregates and whatever renders the store:
//!
//! - [`CheckoutCoordinator`] - the step machine from catalog to confirmation
//! - [`FieldChange`] - inbound form edits
//! - [`EventBus`] / [`StoreEvent`] - outbound redraw notifications
//! - [`StoreConfig`] - origin, paths, basket mode, timeouts and logging
//! - [`StorefrontBuilder`] - assembles the coordinator and fails fast on
//!   missing collaborators
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_storefront::prelude::*;
//!
//! let mut store = bootstrap("larek.toml").await?;
//! store.events().subscribe(|event| println!("{:?}", event));
//!
//! store.add_to_basket(&ProductId::new("854cef69"))?;
//! store.begin_checkout()?;
//! store.on_field_changed(FieldChange::parse("payment", "card")?)?;
//! store.on_field_changed(FieldChange::parse("address", "Main St 1")?)?;
//! store.proceed()?;
//! store.on_field_changed(FieldChange::parse("email", "buyer@example.com")?)?;
//! store.on_field_changed(FieldChange::parse("phone", "+79000000000")?)?;
//!
//! if let SubmissionOutcome::Confirmed(order) = store.submit().await? {
//!     println!("order {} placed", order.id);
//! }
//! ```

mod app;
mod config;
mod coordinator;
mod error;
mod events;
mod fields;

pub use app::{bootstrap, StorefrontBuilder};
pub use config::{StoreConfig, API_ORIGIN_ENV};
pub use coordinator::{CheckoutCoordinator, CheckoutStep, SubmissionOutcome, SubmissionTicket};
pub use error::{ConfigError, StorefrontError};
pub use events::{EventBus, EventLog, StoreEvent};
pub use fields::FieldChange;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        bootstrap, CheckoutCoordinator, CheckoutStep, EventBus, FieldChange, StoreConfig,
        StoreEvent, StorefrontBuilder, StorefrontError, SubmissionOutcome,
    };
    pub use larek_commerce::prelude::*;
}
