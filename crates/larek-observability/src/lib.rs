//! Observability for the Larek storefront.
//!
//! Domain crates log through the `tracing` macros; this crate owns the
//! subscriber:
//! - `LoggingConfig` - level and format, loadable from the store config
//! - `init_logging` - installs a `tracing-subscriber` fmt layer

mod logging;

pub use logging::*;

use thiserror::Error;

/// Errors raised while setting up observability.
#[derive(Debug, Error)]
pub enum ObservabilityError {
    /// Unknown log level name.
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// A global subscriber was already installed.
    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(String),
}
