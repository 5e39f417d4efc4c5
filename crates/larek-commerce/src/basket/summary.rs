//! Basket summary for the header badge.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Item count and total of the basket at one point in time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BasketSummary {
    /// Sum of quantities.
    pub item_count: u32,
    /// Sum of line totals.
    pub total: Money,
}

impl BasketSummary {
    /// Check if the basket was empty.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}
