//! Commerce error types.

use larek_data::FetchError;
use thiserror::Error;

/// Errors that can occur in catalog, basket and checkout operations.
///
/// Basket rejections are not errors; see
/// [`BasketChange::Rejected`](crate::basket::BasketChange::Rejected).
#[derive(Error, Debug)]
pub enum CommerceError {
    /// Product not found in the loaded catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Checkout cannot start from an empty basket.
    #[error("Basket is empty")]
    EmptyBasket,

    /// A checkout step is incomplete.
    #[error("Checkout incomplete: {0}")]
    CheckoutIncomplete(String),

    /// Invalid checkout state transition.
    #[error("Invalid checkout transition from {from} to {to}")]
    InvalidCheckoutTransition { from: String, to: String },

    /// The draft was already submitted; reset it before reuse.
    #[error("Order already submitted")]
    AlreadySubmitted,

    /// Another submission attempt is still outstanding.
    #[error("Order submission already in progress")]
    SubmissionInProgress,

    /// The server declined the order.
    #[error("Order rejected: {0}")]
    OrderRejected(String),

    /// Amount that cannot be represented as [`Money`](crate::Money).
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Server response did not match the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Transport or HTTP failure from the API client.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for CommerceError {
    fn from(e: serde_json::Error) -> Self {
        CommerceError::SerializationError(e.to_string())
    }
}
