//! Basket aggregate and its entries.

use std::fmt;

use crate::basket::BasketSummary;
use crate::catalog::Product;
use crate::ids::ProductId;
use crate::money::Money;
use serde::{Deserialize, Serialize};

/// How repeated adds of the same product are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BasketMode {
    /// Repeated adds increment the entry's quantity.
    #[default]
    Multiplicity,
    /// A product is either present or not; a second add is rejected.
    Uniqueness,
}

impl BasketMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BasketMode::Multiplicity => "multiplicity",
            BasketMode::Uniqueness => "uniqueness",
        }
    }
}

/// Why an add was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasketRejection {
    /// The product has no price.
    NotForSale,
    /// Uniqueness mode and the product is already in the basket.
    AlreadyInBasket,
}

impl fmt::Display for BasketRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasketRejection::NotForSale => write!(f, "product is not for sale"),
            BasketRejection::AlreadyInBasket => write!(f, "product is already in the basket"),
        }
    }
}

/// Result of [`BasketAggregate::add`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BasketChange {
    /// A new entry was created with quantity 1.
    Added,
    /// An existing entry's quantity was raised.
    Incremented { quantity: u32 },
    /// Nothing changed.
    Rejected(BasketRejection),
}

impl BasketChange {
    /// Check if the basket was mutated.
    pub fn is_applied(&self) -> bool {
        !matches!(self, BasketChange::Rejected(_))
    }
}

/// A product in the basket.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BasketEntry {
    /// The product (denormalized for display).
    pub product: Product,
    /// Unit price, taken from the product when it was added.
    pub unit_price: Money,
    /// Quantity; always 1 in uniqueness mode.
    pub quantity: u32,
}

impl BasketEntry {
    /// Product id of this entry.
    pub fn product_id(&self) -> &ProductId {
        &self.product.id
    }

    /// Unit price times quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// The shopping basket.
///
/// Entries are keyed by product id and kept in insertion order, which is also
/// display order. No entry ever references a product without a price, so
/// totals need no null handling.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BasketAggregate {
    mode: BasketMode,
    entries: Vec<BasketEntry>,
}

impl BasketAggregate {
    /// Create an empty basket.
    pub fn new(mode: BasketMode) -> Self {
        Self {
            mode,
            entries: Vec::new(),
        }
    }

    /// Create a basket pre-filled with `(product, quantity)` pairs.
    ///
    /// Seeds go through the same rules as [`add`](Self::add): unpriced
    /// products are dropped, and uniqueness mode keeps one of each.
    /// Multiplicity quantities saturate at `u32::MAX`.
    pub fn with_entries(mode: BasketMode, seed: impl IntoIterator<Item = (Product, u32)>) -> Self {
        let mut basket = Self::new(mode);
        for (product, quantity) in seed {
            if quantity == 0 || !basket.add(&product).is_applied() {
                continue;
            }
            if mode == BasketMode::Multiplicity {
                if let Some(entry) = basket.entries.iter_mut().find(|e| e.product.id == product.id) {
                    entry.quantity = entry.quantity.saturating_add(quantity - 1);
                }
            }
        }
        basket
    }

    /// Add one unit of a product.
    ///
    /// Never fails: refused adds are logged and reported as
    /// [`BasketChange::Rejected`] with the basket untouched.
    pub fn add(&mut self, product: &Product) -> BasketChange {
        let Some(unit_price) = product.price else {
            tracing::warn!(product_id = %product.id, "rejected basket add: product has no price");
            return BasketChange::Rejected(BasketRejection::NotForSale);
        };

        if let Some(existing) = self.entries.iter_mut().find(|e| e.product.id == product.id) {
            return match self.mode {
                BasketMode::Uniqueness => {
                    tracing::warn!(product_id = %product.id, "rejected basket add: already in basket");
                    BasketChange::Rejected(BasketRejection::AlreadyInBasket)
                }
                BasketMode::Multiplicity => {
                    existing.quantity = existing.quantity.saturating_add(1);
                    BasketChange::Incremented {
                        quantity: existing.quantity,
                    }
                }
            };
        }

        self.entries.push(BasketEntry {
            product: product.clone(),
            unit_price,
            quantity: 1,
        });
        BasketChange::Added
    }

    /// Remove a product's entry. Removing an absent product is a no-op.
    ///
    /// Returns whether an entry was removed.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let len_before = self.entries.len();
        self.entries.retain(|e| &e.product.id != product_id);
        self.entries.len() < len_before
    }

    /// Remove all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of line totals.
    pub fn total(&self) -> Money {
        self.entries.iter().map(BasketEntry::line_total).sum()
    }

    /// Sum of quantities (entry count in uniqueness mode).
    pub fn item_count(&self) -> u32 {
        self.entries
            .iter()
            .fold(0u32, |acc, e| acc.saturating_add(e.quantity))
    }

    /// Product ids in insertion order.
    pub fn identifiers(&self) -> Vec<ProductId> {
        self.entries.iter().map(|e| e.product.id.clone()).collect()
    }

    /// Count and total for the header badge.
    pub fn summary(&self) -> BasketSummary {
        BasketSummary {
            item_count: self.item_count(),
            total: self.total(),
        }
    }

    /// Entries in display order.
    pub fn entries(&self) -> &[BasketEntry] {
        &self.entries
    }

    /// Get the entry for a product.
    pub fn get(&self, product_id: &ProductId) -> Option<&BasketEntry> {
        self.entries.iter().find(|e| &e.product.id == product_id)
    }

    /// Check if a product is in the basket.
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.get(product_id).is_some()
    }

    /// Check if the basket is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The add policy in effect.
    pub fn mode(&self) -> BasketMode {
        self.mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(id: &str, price: u64) -> Product {
        Product::new(id, id.to_uppercase(), Some(Money::new(price)))
    }

    fn unpriced(id: &str) -> Product {
        Product::new(id, id.to_uppercase(), None)
    }

    #[test]
    fn test_two_items_total() {
        for mode in [BasketMode::Multiplicity, BasketMode::Uniqueness] {
            let mut basket = BasketAggregate::new(mode);
            assert_eq!(basket.add(&priced("a", 100)), BasketChange::Added);
            assert_eq!(basket.add(&priced("b", 200)), BasketChange::Added);

            assert_eq!(basket.total(), Money::new(300));
            assert_eq!(basket.item_count(), 2);
        }
    }

    #[test]
    fn test_unpriced_product_is_rejected() {
        let mut basket = BasketAggregate::new(BasketMode::Multiplicity);
        let change = basket.add(&unpriced("x"));

        assert_eq!(change, BasketChange::Rejected(BasketRejection::NotForSale));
        assert!(basket.is_empty());
        assert_eq!(basket.item_count(), 0);
        assert_eq!(basket.total(), Money::zero());
    }

    #[test]
    fn test_multiplicity_increments() {
        let mut basket = BasketAggregate::new(BasketMode::Multiplicity);
        let product = priced("a", 750);

        basket.add(&product);
        assert_eq!(
            basket.add(&product),
            BasketChange::Incremented { quantity: 2 }
        );
        assert_eq!(basket.entries().len(), 1);
        assert_eq!(basket.item_count(), 2);
        assert_eq!(basket.total(), Money::new(1500));
    }

    #[test]
    fn test_uniqueness_rejects_duplicate() {
        let mut basket = BasketAggregate::new(BasketMode::Uniqueness);
        let product = priced("a", 750);

        basket.add(&product);
        assert_eq!(
            basket.add(&product),
            BasketChange::Rejected(BasketRejection::AlreadyInBasket)
        );
        assert_eq!(basket.item_count(), 1);
        assert_eq!(basket.total(), Money::new(750));
    }

    #[test]
    fn test_add_then_remove_restores_totals() {
        for mode in [BasketMode::Multiplicity, BasketMode::Uniqueness] {
            let mut basket = BasketAggregate::new(mode);
            basket.add(&priced("a", 100));
            let (count, total) = (basket.item_count(), basket.total());

            let product = priced("b", 2500);
            basket.add(&product);
            assert!(basket.remove(&product.id));

            assert_eq!(basket.item_count(), count);
            assert_eq!(basket.total(), total);
        }
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut basket = BasketAggregate::new(BasketMode::Multiplicity);
        basket.add(&priced("a", 100));

        assert!(basket.remove(&ProductId::new("a")));
        assert!(!basket.remove(&ProductId::new("a")));
        assert!(!basket.remove(&ProductId::new("never-added")));
        assert!(basket.is_empty());
    }

    #[test]
    fn test_identifiers_keep_insertion_order() {
        let mut basket = BasketAggregate::new(BasketMode::Multiplicity);
        basket.add(&priced("c", 1));
        basket.add(&priced("a", 1));
        basket.add(&priced("b", 1));
        basket.add(&priced("a", 1));

        let ids: Vec<String> = basket
            .identifiers()
            .into_iter()
            .map(ProductId::into_inner)
            .collect();
        assert_eq!(ids, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_clear() {
        let mut basket = BasketAggregate::new(BasketMode::Uniqueness);
        basket.add(&priced("a", 1));
        basket.add(&priced("b", 1));
        basket.clear();

        assert!(basket.is_empty());
        assert_eq!(basket.summary(), BasketSummary::default());
    }

    #[test]
    fn test_seeded_basket_follows_add_rules() {
        let multi = BasketAggregate::with_entries(
            BasketMode::Multiplicity,
            vec![(priced("a", 10), 3), (unpriced("x"), 2)],
        );
        assert_eq!(multi.item_count(), 3);
        assert_eq!(multi.total(), Money::new(30));

        let unique =
            BasketAggregate::with_entries(BasketMode::Uniqueness, vec![(priced("a", 10), 3)]);
        assert_eq!(unique.item_count(), 1);
    }

    #[test]
    fn test_seeded_quantity_is_set_directly_and_saturates() {
        let basket = BasketAggregate::with_entries(
            BasketMode::Multiplicity,
            vec![
                (priced("a", 1), u32::MAX),
                (priced("a", 1), 5),
                (priced("b", 2), 0),
            ],
        );
        assert_eq!(basket.item_count(), u32::MAX);
        assert_eq!(basket.identifiers(), vec![ProductId::new("a")]);
        assert_eq!(basket.total(), Money::new(u64::from(u32::MAX)));
    }
}
