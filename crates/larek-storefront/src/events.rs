//! Outbound presentation hooks.
//!
//! The coordinator never talks to a view directly. It publishes
//! [`StoreEvent`]s on an [`EventBus`], and whatever renders the store
//! subscribes after the coordinator is built.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use larek_commerce::basket::BasketSummary;
use larek_commerce::{Money, OrderId, ProductId};

use crate::coordinator::CheckoutStep;

/// Something the presentation layer may want to redraw.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The catalog was fetched.
    CatalogLoaded { count: usize },
    /// The catalog fetch failed; the catalog is empty.
    CatalogFailed { reason: String },
    /// A product card was opened.
    ProductOpened {
        product_id: ProductId,
        in_basket: bool,
        for_sale: bool,
        price_label: String,
    },
    /// Basket contents changed; carries the header badge values.
    BasketChanged { item_count: u32, total: Money },
    /// The visible step changed.
    StepChanged {
        from: CheckoutStep,
        to: CheckoutStep,
    },
    /// Validity of a form step was recomputed.
    ValidityChanged {
        step: CheckoutStep,
        valid: bool,
        error: Option<&'static str>,
    },
    /// The order did not go through; the contacts form is back.
    SubmissionFailed { reason: String },
    /// The order was accepted. `total` is the submitted total.
    OrderConfirmed { order_id: OrderId, total: Money },
}

impl StoreEvent {
    /// Badge event for a basket summary.
    pub fn basket_changed(summary: BasketSummary) -> Self {
        StoreEvent::BasketChanged {
            item_count: summary.item_count,
            total: summary.total,
        }
    }

    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::CatalogLoaded { .. } => "catalog_loaded",
            StoreEvent::CatalogFailed { .. } => "catalog_failed",
            StoreEvent::ProductOpened { .. } => "product_opened",
            StoreEvent::BasketChanged { .. } => "basket_changed",
            StoreEvent::StepChanged { .. } => "step_changed",
            StoreEvent::ValidityChanged { .. } => "validity_changed",
            StoreEvent::SubmissionFailed { .. } => "submission_failed",
            StoreEvent::OrderConfirmed { .. } => "order_confirmed",
        }
    }
}

type Handler = Arc<dyn Fn(&StoreEvent) + Send + Sync>;

/// Fan-out of [`StoreEvent`]s to subscribers.
///
/// Subscribing takes `&self`, so views can attach after the coordinator
/// owns the bus. Handlers run synchronously in subscription order.
#[derive(Default)]
pub struct EventBus {
    handlers: Mutex<Vec<Handler>>,
}

impl EventBus {
    /// Create a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a handler.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&StoreEvent) + Send + Sync + 'static,
    {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Arc::new(handler));
    }

    /// Deliver an event to every handler.
    ///
    /// Handlers may subscribe further handlers; those see the next event.
    pub fn publish(&self, event: StoreEvent) {
        let handlers: Vec<Handler> = self
            .handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();
        tracing::trace!(event = event.name(), subscribers = handlers.len(), "publish");
        for handler in &handlers {
            handler(&event);
        }
    }

    /// Number of attached handlers.
    pub fn subscriber_count(&self) -> usize {
        self.handlers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}

/// Subscriber that keeps every event it sees.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<StoreEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe this log to a bus.
    pub fn attach(&self, bus: &EventBus) {
        let events = Arc::clone(&self.events);
        bus.subscribe(move |event| {
            events
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(event.clone());
        });
    }

    /// Events recorded so far, oldest first.
    pub fn events(&self) -> Vec<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Most recent event, if any.
    pub fn last(&self) -> Option<StoreEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let bus = EventBus::new();
        let count = Arc::new(AtomicUsize::new(0));
        for _ in 0..2 {
            let count = Arc::clone(&count);
            bus.subscribe(move |_| {
                count.fetch_add(1, Ordering::SeqCst);
            });
        }

        bus.publish(StoreEvent::CatalogLoaded { count: 3 });
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(bus.subscriber_count(), 2);
    }

    #[test]
    fn test_publish_without_subscribers() {
        EventBus::new().publish(StoreEvent::CatalogLoaded { count: 0 });
    }

    #[test]
    fn test_event_log_records_in_order() {
        let bus = EventBus::new();
        let log = EventLog::new();
        log.attach(&bus);

        bus.publish(StoreEvent::CatalogLoaded { count: 1 });
        bus.publish(StoreEvent::basket_changed(BasketSummary::default()));

        assert_eq!(
            log.events(),
            vec![
                StoreEvent::CatalogLoaded { count: 1 },
                StoreEvent::BasketChanged {
                    item_count: 0,
                    total: Money::zero()
                },
            ]
        );

        log.clear();
        assert!(log.last().is_none());
    }

    #[test]
    fn test_subscribe_from_handler_does_not_deadlock() {
        let bus = Arc::new(EventBus::new());
        let inner = Arc::clone(&bus);
        bus.subscribe(move |_| inner.subscribe(|_| {}));

        bus.publish(StoreEvent::CatalogLoaded { count: 0 });
        assert_eq!(bus.subscriber_count(), 2);
    }
}
