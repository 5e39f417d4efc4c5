//! Storefront error types.

use larek_commerce::CommerceError;
use larek_data::FetchError;
use larek_observability::ObservabilityError;
use thiserror::Error;

use crate::coordinator::CheckoutStep;

/// Errors raised by the storefront layer.
#[derive(Error, Debug)]
pub enum StorefrontError {
    /// A required collaborator was not supplied to the builder.
    #[error("Missing collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A field was edited while its form is not on screen.
    #[error("Field '{field}' cannot be edited during step {step}")]
    FieldNotEditable {
        field: &'static str,
        step: CheckoutStep,
    },

    /// Inbound field name the storefront does not know.
    #[error("Unknown field: {0}")]
    UnknownField(String),

    /// Domain error from catalog, basket or checkout.
    #[error(transparent)]
    Commerce(#[from] CommerceError),

    /// Transport error while building the API client.
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error(transparent)]
    Observability(#[from] ObservabilityError),
}

/// Errors raised while loading [`StoreConfig`](crate::StoreConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {message}")]
    Read { path: String, message: String },

    /// The config file is not valid TOML or JSON.
    #[error("Failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },

    /// A value parsed but makes no sense.
    #[error("Invalid config: {0}")]
    Invalid(String),
}
