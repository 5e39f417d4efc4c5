//! Order submission payload and server outcome.

use larek_data::{endpoints, ApiClient};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::checkout::{CheckoutDraft, PaymentMethod};
use crate::error::CommerceError;
use crate::ids::{OrderId, ProductId};
use crate::money::Money;

/// Immutable, submission-ready snapshot of a complete draft.
///
/// Only [`CheckoutAggregate::build_payload`](crate::checkout::CheckoutAggregate::build_payload)
/// creates one, and only when both checkout steps validate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSubmissionPayload {
    payment: PaymentMethod,
    email: String,
    phone: String,
    address: String,
    total: Money,
    items: Vec<ProductId>,
}

impl OrderSubmissionPayload {
    pub(crate) fn from_draft(draft: &CheckoutDraft) -> Option<Self> {
        if !draft.step1_complete() || !draft.step2_complete() {
            return None;
        }
        Some(Self {
            payment: draft.payment?,
            email: draft.email.trim().to_string(),
            phone: draft.phone.trim().to_string(),
            address: draft.address.trim().to_string(),
            total: draft.total,
            items: draft.items.clone(),
        })
    }

    pub fn payment(&self) -> PaymentMethod {
        self.payment
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    /// Total captured at checkout start.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    /// Request body for the order endpoint.
    pub fn to_json(&self) -> Result<Value, CommerceError> {
        Ok(serde_json::to_value(self)?)
    }

    /// Post this payload to the order endpoint.
    ///
    /// Transport failures come back unchanged as [`CommerceError::Fetch`];
    /// there is no retry.
    pub async fn submit(&self, api: &dyn ApiClient) -> Result<OrderSubmissionResult, CommerceError> {
        let body = self.to_json()?;
        let response = api.post(endpoints::ORDER, body).await?;
        OrderSubmissionResult::from_response(response)
    }
}

/// Successful order as acknowledged by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    /// Server-assigned order id.
    pub id: OrderId,
    /// Total the server charged.
    pub total: Money,
}

/// Outcome of an order submission that reached the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderSubmissionResult {
    /// The order was accepted.
    Confirmed(OrderConfirmation),
    /// The server answered with `{ "error": ... }`.
    Rejected { error: String },
}

impl OrderSubmissionResult {
    /// Classify a server response.
    ///
    /// A non-null `error` key means rejection regardless of other keys;
    /// otherwise `id` and `total` must both be present.
    pub fn from_response(value: Value) -> Result<Self, CommerceError> {
        if let Some(error) = value.get("error").filter(|e| !e.is_null()) {
            let error = error
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Ok(Self::Rejected { error });
        }

        serde_json::from_value::<OrderConfirmation>(value)
            .map(Self::Confirmed)
            .map_err(|e| CommerceError::InvalidResponse(e.to_string()))
    }

    /// Check if the order was accepted.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, Self::Confirmed(_))
    }

    /// Turn a rejection into [`CommerceError::OrderRejected`].
    pub fn into_confirmation(self) -> Result<OrderConfirmation, CommerceError> {
        match self {
            Self::Confirmed(confirmation) => Ok(confirmation),
            Self::Rejected { error } => Err(CommerceError::OrderRejected(error)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn complete_draft() -> CheckoutDraft {
        CheckoutDraft {
            payment: Some(PaymentMethod::Online),
            address: "  Main St 1 ".into(),
            email: " buyer@example.com".into(),
            phone: "+7 900 000 00 00 ".into(),
            items: vec![ProductId::new("a"), ProductId::new("b")],
            total: Money::new(300),
        }
    }

    #[test]
    fn test_payload_is_trimmed() {
        let payload = OrderSubmissionPayload::from_draft(&complete_draft()).unwrap();
        assert_eq!(
            payload.to_json().unwrap(),
            json!({
                "payment": "online",
                "email": "buyer@example.com",
                "phone": "+7 900 000 00 00",
                "address": "Main St 1",
                "total": 300,
                "items": ["a", "b"]
            })
        );
    }

    #[test]
    fn test_incomplete_draft_yields_nothing() {
        let mut draft = complete_draft();
        draft.phone = " ".into();
        assert!(OrderSubmissionPayload::from_draft(&draft).is_none());
    }

    #[test]
    fn test_success_response() {
        let result = OrderSubmissionResult::from_response(json!({"id": "o1", "total": 300})).unwrap();
        assert_eq!(
            result,
            OrderSubmissionResult::Confirmed(OrderConfirmation {
                id: OrderId::new("o1"),
                total: Money::new(300),
            })
        );
    }

    #[test]
    fn test_error_key_wins() {
        let result =
            OrderSubmissionResult::from_response(json!({"id": "o1", "total": 300, "error": "Wrong total"}))
                .unwrap();
        assert_eq!(
            result,
            OrderSubmissionResult::Rejected {
                error: "Wrong total".into()
            }
        );
        assert!(matches!(
            result.into_confirmation(),
            Err(CommerceError::OrderRejected(msg)) if msg == "Wrong total"
        ));
    }

    #[test]
    fn test_null_error_is_ignored() {
        let result =
            OrderSubmissionResult::from_response(json!({"id": "o1", "total": 5, "error": null}))
                .unwrap();
        assert!(result.is_confirmed());
    }

    #[test]
    fn test_shapeless_response_is_invalid() {
        let err = OrderSubmissionResult::from_response(json!({"id": "o1"})).unwrap_err();
        assert!(matches!(err, CommerceError::InvalidResponse(_)));
    }
}
