//! Checkout aggregate: draft fields, step validation and submission.

use larek_data::ApiClient;
use serde::{Deserialize, Serialize};

use crate::checkout::{
    CheckoutDraft, OrderConfirmation, OrderSubmissionPayload, OrderSubmissionResult, PaymentMethod,
};
use crate::error::CommerceError;
use crate::ids::ProductId;
use crate::money::Money;

pub const MISSING_PAYMENT: &str = "Choose a payment method.";
pub const MISSING_ADDRESS: &str = "Enter a delivery address.";
pub const MISSING_EMAIL: &str = "Enter an email.";
pub const MISSING_PHONE: &str = "Enter a phone number.";

/// Where a checkout stands, derived from which fields are filled in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStage {
    /// Nothing usable entered.
    Empty,
    /// Payment chosen, address still blank.
    PaymentChosen,
    /// Payment and address complete.
    Step1Valid,
    /// Contacts complete as well; ready to submit.
    Step2Valid,
    /// Accepted by the server. Only [`CheckoutAggregate::reset`] leaves this stage.
    Submitted,
}

impl CheckoutStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStage::Empty => "empty",
            CheckoutStage::PaymentChosen => "payment_chosen",
            CheckoutStage::Step1Valid => "step1_valid",
            CheckoutStage::Step2Valid => "step2_valid",
            CheckoutStage::Submitted => "submitted",
        }
    }
}

/// Owns the checkout draft for one application session.
///
/// Setters are idempotent and order-independent; validity is recomputed from
/// the current field values on every call, so a step that was valid can
/// become invalid again after an edit. [`build_payload`](Self::build_payload)
/// re-checks both steps, so a regressed draft is never submitted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckoutAggregate {
    draft: CheckoutDraft,
    confirmation: Option<OrderConfirmation>,
}

impl CheckoutAggregate {
    /// Create an empty checkout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the payment method.
    pub fn set_payment(&mut self, method: PaymentMethod) {
        self.draft.payment = Some(method);
    }

    /// Set the delivery address, stored as typed.
    pub fn set_address(&mut self, address: impl Into<String>) {
        self.draft.address = address.into();
    }

    /// Set both contact fields, stored as typed.
    pub fn set_contacts(&mut self, email: impl Into<String>, phone: impl Into<String>) {
        self.draft.email = email.into();
        self.draft.phone = phone.into();
    }

    /// Set only the email.
    pub fn set_email(&mut self, email: impl Into<String>) {
        self.draft.email = email.into();
    }

    /// Set only the phone.
    pub fn set_phone(&mut self, phone: impl Into<String>) {
        self.draft.phone = phone.into();
    }

    /// Snapshot the basket's product ids.
    pub fn set_items(&mut self, items: Vec<ProductId>) {
        self.draft.items = items;
    }

    /// Snapshot the basket's total.
    pub fn set_total(&mut self, total: Money) {
        self.draft.total = total;
    }

    pub fn payment(&self) -> Option<PaymentMethod> {
        self.draft.payment
    }

    pub fn address(&self) -> &str {
        &self.draft.address
    }

    pub fn email(&self) -> &str {
        &self.draft.email
    }

    pub fn phone(&self) -> &str {
        &self.draft.phone
    }

    pub fn items(&self) -> &[ProductId] {
        &self.draft.items
    }

    pub fn total(&self) -> Money {
        self.draft.total
    }

    /// The whole draft.
    pub fn draft(&self) -> &CheckoutDraft {
        &self.draft
    }

    /// Server confirmation, once submitted.
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Payment chosen and address not blank.
    pub fn validate_step1(&self) -> bool {
        self.draft.step1_complete()
    }

    /// Email and phone not blank. Their format is not checked.
    pub fn validate_step2(&self) -> bool {
        self.draft.step2_complete()
    }

    /// First reason step 1 is incomplete, payment before address.
    pub fn step1_error(&self) -> Option<&'static str> {
        if self.draft.payment.is_none() {
            Some(MISSING_PAYMENT)
        } else if self.draft.address.trim().is_empty() {
            Some(MISSING_ADDRESS)
        } else {
            None
        }
    }

    /// First reason step 2 is incomplete, email before phone.
    pub fn step2_error(&self) -> Option<&'static str> {
        if self.draft.email.trim().is_empty() {
            Some(MISSING_EMAIL)
        } else if self.draft.phone.trim().is_empty() {
            Some(MISSING_PHONE)
        } else {
            None
        }
    }

    /// Every missing field category, in step order.
    pub fn missing(&self) -> Vec<&'static str> {
        self.step1_error()
            .into_iter()
            .chain(self.step2_error())
            .collect()
    }

    /// Derived stage of the draft.
    pub fn stage(&self) -> CheckoutStage {
        if self.confirmation.is_some() {
            CheckoutStage::Submitted
        } else if self.validate_step1() && self.validate_step2() {
            CheckoutStage::Step2Valid
        } else if self.validate_step1() {
            CheckoutStage::Step1Valid
        } else if self.draft.payment.is_some() {
            CheckoutStage::PaymentChosen
        } else {
            CheckoutStage::Empty
        }
    }

    /// Submission payload, or `None` unless both steps validate.
    pub fn build_payload(&self) -> Option<OrderSubmissionPayload> {
        OrderSubmissionPayload::from_draft(&self.draft)
    }

    /// Send the order to the server.
    ///
    /// Fails with [`CommerceError::CheckoutIncomplete`] before any request
    /// when the draft is incomplete, and with [`CommerceError::AlreadySubmitted`]
    /// when the draft was already accepted. Transport failures are returned
    /// unchanged. The server's answer is returned as-is; recording it is the
    /// caller's job via [`mark_submitted`](Self::mark_submitted).
    pub async fn submit(&self, api: &dyn ApiClient) -> Result<OrderSubmissionResult, CommerceError> {
        if self.confirmation.is_some() {
            return Err(CommerceError::AlreadySubmitted);
        }
        let payload = self
            .build_payload()
            .ok_or_else(|| CommerceError::CheckoutIncomplete(self.missing().join(" ")))?;
        payload.submit(api).await
    }

    /// Record the server's acceptance.
    pub fn mark_submitted(&mut self, confirmation: OrderConfirmation) {
        self.confirmation = Some(confirmation);
    }

    /// Clear every field back to the initial state. Safe in any stage.
    pub fn reset(&mut self) {
        self.draft = CheckoutDraft::default();
        self.confirmation = None;
    }
}
