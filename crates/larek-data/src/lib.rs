//! Remote API access for the Larek storefront.
//!
//! The storefront talks to a single JSON API with two calls: listing the
//! catalog and submitting an order. This crate provides:
//!
//! - [`ApiClient`] - the `get`/`post` contract every consumer depends on
//! - [`HttpApiClient`] - the `reqwest` transport used in production
//! - [`ScriptedApiClient`] - canned responses for offline runs and tests
//! - [`FetchPolicy`] - per-client timeouts
//!
//! # Example
//!
//! ```rust,ignore
//! use larek_data::{endpoints, ApiClient, HttpApiClient};
//!
//! let client = HttpApiClient::new("https://larek.example/api/weblarek")?;
//! let listing = client.get(endpoints::PRODUCT_LIST).await?;
//! ```

mod error;
mod http;
mod policy;
mod scripted;

use async_trait::async_trait;
use serde_json::Value;

pub use error::FetchError;
pub use http::HttpApiClient;
pub use policy::FetchPolicy;
pub use scripted::{RecordedRequest, ScriptedApiClient};

/// Paths consumed by the storefront, relative to the API base URL.
pub mod endpoints {
    /// `GET` returns `{ total, items: Product[] }`.
    pub const PRODUCT_LIST: &str = "/product/";
    /// `POST` accepts an order payload and returns `{ id, total }` or `{ error }`.
    pub const ORDER: &str = "/order";
}

/// HTTP methods the storefront uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Convert to HTTP method string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimal request/response contract for the remote API.
///
/// Both calls resolve to parsed JSON or fail with an opaque [`FetchError`]
/// on transport failure or a non-success status. Implementations do not
/// retry.
#[async_trait]
pub trait ApiClient: Send + Sync {
    /// Fetch a resource.
    async fn get(&self, path: &str) -> Result<Value, FetchError>;

    /// Send a JSON body and return the parsed response.
    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError>;
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{endpoints, ApiClient, FetchError, FetchPolicy, HttpApiClient, Method};
}
