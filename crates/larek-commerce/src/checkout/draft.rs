//! The in-progress order and its payment method.

use std::fmt;
use std::str::FromStr;

use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Card payment online.
    Online,
    /// Cash on delivery.
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Online => "online",
            PaymentMethod::Cash => "cash",
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CommerceError;

    /// Accepts the wire names plus `card`, the name of the online payment button.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "online" | "card" => Ok(PaymentMethod::Online),
            "cash" => Ok(PaymentMethod::Cash),
            other => Err(CommerceError::CheckoutIncomplete(format!(
                "unknown payment method '{}'",
                other
            ))),
        }
    }
}

/// Checkout fields as entered so far.
///
/// Strings are stored exactly as typed; trimming happens only when validating
/// or building the payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutDraft {
    /// Selected payment method.
    pub payment: Option<PaymentMethod>,
    /// Delivery address.
    pub address: String,
    /// Customer email.
    pub email: String,
    /// Customer phone.
    pub phone: String,
    /// Basket product ids captured at checkout start.
    pub items: Vec<ProductId>,
    /// Basket total captured at checkout start.
    pub total: Money,
}

impl CheckoutDraft {
    /// Payment chosen and address not blank.
    pub fn step1_complete(&self) -> bool {
        self.payment.is_some() && !self.address.trim().is_empty()
    }

    /// Email and phone not blank.
    pub fn step2_complete(&self) -> bool {
        !self.email.trim().is_empty() && !self.phone.trim().is_empty()
    }
}
