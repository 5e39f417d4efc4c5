//! Inbound form edits.

use larek_commerce::checkout::{CheckoutAggregate, PaymentMethod};

use crate::coordinator::CheckoutStep;
use crate::error::StorefrontError;

/// A single edit from one of the checkout forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Payment(PaymentMethod),
    Address(String),
    Email(String),
    Phone(String),
}

impl FieldChange {
    /// Build a change from a form input's name and value.
    ///
    /// Names are the form input names: `payment`, `address`, `email`,
    /// `phone`. Payment values accept `online`, `card` and `cash`.
    pub fn parse(name: &str, value: impl Into<String>) -> Result<Self, StorefrontError> {
        let value = value.into();
        match name.trim() {
            "payment" => Ok(FieldChange::Payment(value.parse()?)),
            "address" => Ok(FieldChange::Address(value)),
            "email" => Ok(FieldChange::Email(value)),
            "phone" => Ok(FieldChange::Phone(value)),
            other => Err(StorefrontError::UnknownField(other.to_string())),
        }
    }

    /// Form input name.
    pub fn field_name(&self) -> &'static str {
        match self {
            FieldChange::Payment(_) => "payment",
            FieldChange::Address(_) => "address",
            FieldChange::Email(_) => "email",
            FieldChange::Phone(_) => "phone",
        }
    }

    /// The step whose form owns this field.
    pub fn step(&self) -> CheckoutStep {
        match self {
            FieldChange::Payment(_) | FieldChange::Address(_) => CheckoutStep::Payment,
            FieldChange::Email(_) | FieldChange::Phone(_) => CheckoutStep::Contacts,
        }
    }

    pub(crate) fn apply(self, checkout: &mut CheckoutAggregate) {
        match self {
            FieldChange::Payment(method) => checkout.set_payment(method),
            FieldChange::Address(address) => checkout.set_address(address),
            FieldChange::Email(email) => checkout.set_email(email),
            FieldChange::Phone(phone) => checkout.set_phone(phone),
        }
    }
}
