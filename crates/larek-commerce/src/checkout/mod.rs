//! Checkout module.
//!
//! Contains the checkout draft, its validation, and order submission.

mod aggregate;
mod draft;
mod order;

pub use aggregate::{
    CheckoutAggregate, CheckoutStage, MISSING_ADDRESS, MISSING_EMAIL, MISSING_PAYMENT,
    MISSING_PHONE,
};
pub use draft::{CheckoutDraft, PaymentMethod};
pub use order::{OrderConfirmation, OrderSubmissionPayload, OrderSubmissionResult};
