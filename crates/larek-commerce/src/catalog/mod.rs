//! Product catalog module.
//!
//! Contains the product type and the session catalog fetched from the API.

mod listing;
mod product;

pub use listing::ProductCatalog;
pub use product::{Product, ProductListResponse, PRICELESS_LABEL};
