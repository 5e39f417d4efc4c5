//! Shopping basket module.
//!
//! Contains the basket aggregate, its entries and the badge summary.

mod basket;
mod summary;

pub use basket::{BasketAggregate, BasketChange, BasketEntry, BasketMode, BasketRejection};
pub use summary::BasketSummary;
