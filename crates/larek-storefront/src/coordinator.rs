//! Checkout coordinator.
//!
//! Sequences the storefront: catalog, basket, the two checkout forms, order
//! submission and the confirmation screen. The commerce aggregates hold the
//! data; this type decides which operation is allowed when and tells the
//! presentation layer what changed.

use std::fmt;
use std::sync::Arc;

use larek_commerce::basket::{BasketAggregate, BasketChange, BasketSummary};
use larek_commerce::catalog::{Product, ProductCatalog};
use larek_commerce::checkout::{
    CheckoutAggregate, OrderConfirmation, OrderSubmissionPayload, OrderSubmissionResult,
};
use larek_commerce::{CommerceError, ProductId};
use larek_data::ApiClient;
use serde::{Deserialize, Serialize};

use crate::error::StorefrontError;
use crate::events::{EventBus, StoreEvent};
use crate::fields::FieldChange;

/// What the shopper is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CheckoutStep {
    /// Product gallery, nothing open.
    Catalog,
    /// Basket list.
    Basket,
    /// Payment method and address form.
    Payment,
    /// Email and phone form.
    Contacts,
    /// Order request outstanding.
    Submitting,
    /// Order accepted.
    Confirmation,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Catalog => "catalog",
            CheckoutStep::Basket => "basket",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Contacts => "contacts",
            CheckoutStep::Submitting => "submitting",
            CheckoutStep::Confirmation => "confirmation",
        }
    }
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One order submission attempt.
///
/// Issued by [`CheckoutCoordinator::begin_submission`] and handed back to
/// [`CheckoutCoordinator::complete_submission`] with the server's answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionTicket {
    session: u64,
    attempt: u64,
    payload: OrderSubmissionPayload,
}

impl SubmissionTicket {
    /// Checkout session the attempt belongs to.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Attempt number, unique per coordinator.
    pub fn attempt(&self) -> u64 {
        self.attempt
    }

    /// What is being submitted.
    pub fn payload(&self) -> &OrderSubmissionPayload {
        &self.payload
    }
}

/// What happened to a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Accepted. `total` is the submitted total.
    Confirmed(OrderConfirmation),
    /// Rejected or not delivered; the contacts form is back with the draft intact.
    Failed { reason: String },
    /// An abandoned attempt was accepted after all. Its items left the
    /// basket; the visible step only changes when a checkout form was left
    /// with nothing to buy.
    Settled(OrderConfirmation),
    /// The ticket is not the outstanding attempt. Nothing changed.
    Stale,
}

impl SubmissionOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, SubmissionOutcome::Confirmed(_))
    }
}

/// Drives catalog, basket and checkout for one application session.
///
/// Steps move strictly:
///
/// ```text
/// Catalog <-> Basket
///    |          |
///    +----+-----+ begin_checkout
///         v
///      Payment --proceed--> Contacts --submit--> Submitting --ok--> Confirmation
///         ^                   |   ^                  |                   |
///         +-------back--------+   +-----failure------+    dismiss -> Catalog
/// ```
///
/// Any other call is refused with
/// [`CommerceError::InvalidCheckoutTransition`]. `close` returns to the
/// catalog from every step; closing while an order is in flight abandons
/// that attempt.
pub struct CheckoutCoordinator {
    api: Arc<dyn ApiClient>,
    events: Arc<EventBus>,
    catalog: ProductCatalog,
    basket: BasketAggregate,
    checkout: CheckoutAggregate,
    step: CheckoutStep,
    confirmation: Option<OrderConfirmation>,
    session: u64,
    attempts: u64,
    in_flight: Option<u64>,
    abandoned: Vec<u64>,
}

impl CheckoutCoordinator {
    /// Create a coordinator on the catalog step.
    ///
    /// Usually built through [`StorefrontBuilder`](crate::StorefrontBuilder).
    pub fn new(api: Arc<dyn ApiClient>, basket: BasketAggregate, events: Arc<EventBus>) -> Self {
        Self {
            api,
            events,
            catalog: ProductCatalog::new(),
            basket,
            checkout: CheckoutAggregate::new(),
            step: CheckoutStep::Catalog,
            confirmation: None,
            session: 0,
            attempts: 0,
            in_flight: None,
            abandoned: Vec::new(),
        }
    }

    // === Accessors ===

    pub fn step(&self) -> CheckoutStep {
        self.step
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn basket(&self) -> &BasketAggregate {
        &self.basket
    }

    pub fn checkout(&self) -> &CheckoutAggregate {
        &self.checkout
    }

    /// Bus the presentation layer subscribes to.
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Current checkout session. Bumped by every `begin_checkout`.
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Check if an order request is outstanding.
    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Header badge values.
    pub fn basket_summary(&self) -> BasketSummary {
        self.basket.summary()
    }

    /// Last accepted order, with the submitted total.
    pub fn confirmation(&self) -> Option<&OrderConfirmation> {
        self.confirmation.as_ref()
    }

    /// Text for the confirmation screen.
    pub fn confirmation_message(&self) -> Option<String> {
        self.confirmation
            .as_ref()
            .map(|c| format!("Charged {}", c.total.display_with_unit()))
    }

    // === Catalog and basket ===

    /// Fetch the product list, replacing the current catalog.
    ///
    /// On failure the catalog is left empty and `CatalogFailed` is published.
    pub async fn load_catalog(&mut self) -> Result<usize, StorefrontError> {
        match self.catalog.load(&*self.api).await {
            Ok(count) => {
                self.events.publish(StoreEvent::CatalogLoaded { count });
                Ok(count)
            }
            Err(err) => {
                tracing::error!(error = %err, "catalog load failed");
                self.events.publish(StoreEvent::CatalogFailed {
                    reason: err.to_string(),
                });
                Err(err.into())
            }
        }
    }

    /// Open a product card from the gallery.
    pub fn open_product(&self, id: &ProductId) -> Result<&Product, StorefrontError> {
        self.require_step(&[CheckoutStep::Catalog], "product")?;
        let product = self.catalog.require(id)?;
        self.events.publish(StoreEvent::ProductOpened {
            product_id: product.id.clone(),
            in_basket: self.basket.contains(&product.id),
            for_sale: product.is_for_sale(),
            price_label: product.price_label(),
        });
        Ok(product)
    }

    /// Add one unit of a catalog product to the basket.
    ///
    /// A refused add is not an error; it comes back as
    /// [`BasketChange::Rejected`] and publishes nothing.
    pub fn add_to_basket(&mut self, id: &ProductId) -> Result<BasketChange, StorefrontError> {
        self.require_step(&[CheckoutStep::Catalog, CheckoutStep::Basket], "add_to_basket")?;
        let product = self.catalog.require(id)?;
        let change = self.basket.add(product);
        if change.is_applied() {
            self.publish_basket();
        }
        Ok(change)
    }

    /// Remove a product from the basket. Removing an absent product is a no-op.
    pub fn remove_from_basket(&mut self, id: &ProductId) -> Result<bool, StorefrontError> {
        self.require_step(
            &[CheckoutStep::Catalog, CheckoutStep::Basket],
            "remove_from_basket",
        )?;
        let removed = self.basket.remove(id);
        if removed {
            self.publish_basket();
        }
        Ok(removed)
    }

    /// Show the basket.
    pub fn open_basket(&mut self) -> Result<(), StorefrontError> {
        self.require_step(&[CheckoutStep::Catalog], CheckoutStep::Basket.as_str())?;
        self.set_step(CheckoutStep::Basket);
        Ok(())
    }

    /// Close whatever is open and return to the catalog.
    ///
    /// Closing during submission abandons the attempt. A late failure is
    /// reported as [`SubmissionOutcome::Stale`]; a late acceptance still
    /// removes the ordered items and is reported as
    /// [`SubmissionOutcome::Settled`].
    pub fn close(&mut self) {
        if self.step == CheckoutStep::Submitting {
            tracing::warn!(
                session = self.session,
                attempt = ?self.in_flight,
                "checkout closed with an order in flight"
            );
            self.abandon_session();
        }
        self.set_step(CheckoutStep::Catalog);
    }

    // === Checkout ===

    /// Start a checkout from the current basket.
    ///
    /// Resets the draft, snapshots basket ids and total, and shows the
    /// payment form with its submit control disabled.
    pub fn begin_checkout(&mut self) -> Result<(), StorefrontError> {
        self.require_step(
            &[CheckoutStep::Catalog, CheckoutStep::Basket],
            CheckoutStep::Payment.as_str(),
        )?;
        if self.basket.is_empty() {
            return Err(CommerceError::EmptyBasket.into());
        }

        self.abandon_session();
        self.checkout.reset();
        self.confirmation = None;
        self.checkout.set_items(self.basket.identifiers());
        self.checkout.set_total(self.basket.total());
        tracing::debug!(
            session = self.session,
            items = self.checkout.items().len(),
            total = %self.checkout.total(),
            "checkout started"
        );

        self.set_step(CheckoutStep::Payment);
        self.publish_validity();
        Ok(())
    }

    /// Apply an edit from the visible form and report its validity.
    pub fn on_field_changed(&mut self, change: FieldChange) -> Result<bool, StorefrontError> {
        if change.step() != self.step {
            return Err(StorefrontError::FieldNotEditable {
                field: change.field_name(),
                step: self.step,
            });
        }
        change.apply(&mut self.checkout);
        Ok(self.publish_validity())
    }

    /// Move from the payment form to the contacts form.
    pub fn proceed(&mut self) -> Result<(), StorefrontError> {
        self.require_step(&[CheckoutStep::Payment], CheckoutStep::Contacts.as_str())?;
        if let Some(reason) = self.checkout.step1_error() {
            return Err(CommerceError::CheckoutIncomplete(reason.to_string()).into());
        }
        self.set_step(CheckoutStep::Contacts);
        self.publish_validity();
        Ok(())
    }

    /// Go back from the contacts form to the payment form.
    pub fn back(&mut self) -> Result<(), StorefrontError> {
        self.require_step(&[CheckoutStep::Contacts], CheckoutStep::Payment.as_str())?;
        self.set_step(CheckoutStep::Payment);
        self.publish_validity();
        Ok(())
    }

    /// Submit the order and wait for the answer.
    ///
    /// Errors are returned only when the attempt cannot start. Delivery
    /// failures and rejections come back as [`SubmissionOutcome::Failed`].
    pub async fn submit(&mut self) -> Result<SubmissionOutcome, StorefrontError> {
        let ticket = self.begin_submission()?;
        let result = ticket.payload().submit(&*self.api).await;
        Ok(self.complete_submission(ticket, result))
    }

    /// Start a submission attempt.
    ///
    /// Refused with [`CommerceError::SubmissionInProgress`] while another
    /// attempt is outstanding.
    pub fn begin_submission(&mut self) -> Result<SubmissionTicket, StorefrontError> {
        if self.in_flight.is_some() {
            return Err(CommerceError::SubmissionInProgress.into());
        }
        self.require_step(&[CheckoutStep::Contacts], CheckoutStep::Submitting.as_str())?;
        let payload = self.checkout.build_payload().ok_or_else(|| {
            CommerceError::CheckoutIncomplete(self.checkout.missing().join(" "))
        })?;

        self.attempts += 1;
        self.in_flight = Some(self.attempts);
        tracing::info!(
            session = self.session,
            attempt = self.attempts,
            total = %payload.total(),
            items = payload.items().len(),
            "submitting order"
        );
        self.set_step(CheckoutStep::Submitting);

        Ok(SubmissionTicket {
            session: self.session,
            attempt: self.attempts,
            payload,
        })
    }

    /// Apply the answer to a submission attempt.
    ///
    /// Only the outstanding attempt of the current session is applied. On
    /// success the basket is cleared and the confirmation carries the
    /// ticket's total. On failure the contacts form comes back with the
    /// draft and basket untouched. An attempt abandoned by `close` or a new
    /// checkout is settled once if it was accepted, otherwise it is stale.
    pub fn complete_submission(
        &mut self,
        ticket: SubmissionTicket,
        result: Result<OrderSubmissionResult, CommerceError>,
    ) -> SubmissionOutcome {
        if ticket.session != self.session || self.in_flight != Some(ticket.attempt) {
            let Some(pos) = self.abandoned.iter().position(|a| *a == ticket.attempt) else {
                tracing::debug!(attempt = ticket.attempt, "ignoring stale submission result");
                return SubmissionOutcome::Stale;
            };
            self.abandoned.swap_remove(pos);
            return match result {
                Ok(OrderSubmissionResult::Confirmed(confirmation)) => {
                    self.settle(ticket, confirmation)
                }
                _ => {
                    tracing::debug!(attempt = ticket.attempt, "abandoned attempt failed");
                    SubmissionOutcome::Stale
                }
            };
        }
        self.in_flight = None;

        let reason = match result {
            Ok(OrderSubmissionResult::Confirmed(confirmation)) => {
                return self.confirm(ticket, confirmation);
            }
            Ok(OrderSubmissionResult::Rejected { error }) => error,
            Err(err) => err.to_string(),
        };

        tracing::warn!(attempt = ticket.attempt, reason = %reason, "order submission failed");
        self.set_step(CheckoutStep::Contacts);
        self.events.publish(StoreEvent::SubmissionFailed {
            reason: reason.clone(),
        });
        self.publish_validity();
        SubmissionOutcome::Failed { reason }
    }

    /// Leave the confirmation screen.
    pub fn dismiss_confirmation(&mut self) -> Result<(), StorefrontError> {
        self.require_step(&[CheckoutStep::Confirmation], CheckoutStep::Catalog.as_str())?;
        self.set_step(CheckoutStep::Catalog);
        Ok(())
    }

    // === Internals ===

    fn confirm(
        &mut self,
        ticket: SubmissionTicket,
        confirmation: OrderConfirmation,
    ) -> SubmissionOutcome {
        let total = ticket.payload.total();
        if confirmation.total != total {
            tracing::warn!(
                order_id = %confirmation.id,
                charged = %confirmation.total,
                submitted = %total,
                "server total differs from submitted total"
            );
        }
        tracing::info!(order_id = %confirmation.id, total = %total, "order confirmed");

        let shown = OrderConfirmation {
            id: confirmation.id.clone(),
            total,
        };
        self.checkout.mark_submitted(confirmation);
        self.confirmation = Some(shown.clone());
        self.basket.clear();

        self.publish_basket();
        self.set_step(CheckoutStep::Confirmation);
        self.events.publish(StoreEvent::OrderConfirmed {
            order_id: shown.id.clone(),
            total,
        });
        SubmissionOutcome::Confirmed(shown)
    }

    /// Apply a late acceptance of an abandoned attempt.
    fn settle(
        &mut self,
        ticket: SubmissionTicket,
        confirmation: OrderConfirmation,
    ) -> SubmissionOutcome {
        let total = ticket.payload.total();
        tracing::warn!(
            order_id = %confirmation.id,
            attempt = ticket.attempt,
            total = %total,
            "abandoned order was accepted"
        );

        let mut removed = false;
        for id in ticket.payload.items() {
            removed |= self.basket.remove(id);
        }
        if removed {
            self.publish_basket();
        }
        let settled = OrderConfirmation {
            id: confirmation.id,
            total,
        };
        self.events.publish(StoreEvent::OrderConfirmed {
            order_id: settled.id.clone(),
            total,
        });

        if removed && matches!(self.step, CheckoutStep::Payment | CheckoutStep::Contacts) {
            if self.basket.is_empty() {
                self.abandon_session();
                self.set_step(CheckoutStep::Catalog);
            } else {
                self.checkout.set_items(self.basket.identifiers());
                self.checkout.set_total(self.basket.total());
                self.publish_validity();
            }
        }
        SubmissionOutcome::Settled(settled)
    }

    fn abandon_session(&mut self) {
        self.session += 1;
        if let Some(attempt) = self.in_flight.take() {
            self.abandoned.push(attempt);
        }
    }

    fn require_step(&self, allowed: &[CheckoutStep], target: &str) -> Result<(), StorefrontError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: target.to_string(),
            }
            .into())
        }
    }

    fn set_step(&mut self, to: CheckoutStep) {
        let from = self.step;
        if from == to {
            return;
        }
        self.step = to;
        tracing::debug!(from = from.as_str(), to = to.as_str(), "step changed");
        self.events.publish(StoreEvent::StepChanged { from, to });
    }

    fn publish_basket(&self) {
        self.events
            .publish(StoreEvent::basket_changed(self.basket.summary()));
    }

    /// Publish validity of the visible form and return it.
    fn publish_validity(&self) -> bool {
        let (valid, error) = match self.step {
            CheckoutStep::Contacts => (self.checkout.validate_step2(), self.checkout.step2_error()),
            _ => (self.checkout.validate_step1(), self.checkout.step1_error()),
        };
        self.events.publish(StoreEvent::ValidityChanged {
            step: self.step,
            valid,
            error,
        });
        valid
    }
}

impl fmt::Debug for CheckoutCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckoutCoordinator")
            .field("step", &self.step)
            .field("session", &self.session)
            .field("in_flight", &self.in_flight)
            .field("catalog", &self.catalog.len())
            .field("basket", &self.basket.summary())
            .finish_non_exhaustive()
    }
}
