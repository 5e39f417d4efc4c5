//! `reqwest`-backed API client.

use async_trait::async_trait;
use serde_json::Value;

use crate::{ApiClient, FetchError, FetchPolicy, Method};

/// HTTP client for the storefront API.
///
/// Relative paths are joined onto the base URL; absolute URLs are sent as-is.
#[derive(Debug, Clone)]
pub struct HttpApiClient {
    base_url: String,
    policy: FetchPolicy,
    inner: reqwest::Client,
}

impl HttpApiClient {
    /// Create a client with the default [`FetchPolicy`].
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_policy(base_url, FetchPolicy::default())
    }

    /// Create a client with explicit timeouts.
    pub fn with_policy(base_url: impl Into<String>, policy: FetchPolicy) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }

        let inner = reqwest::Client::builder()
            .connect_timeout(policy.connect)
            .timeout(policy.total)
            .build()?;

        Ok(Self {
            base_url,
            policy,
            inner,
        })
    }

    /// The base URL every relative path is joined onto.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The timeouts in effect.
    pub fn policy(&self) -> FetchPolicy {
        self.policy
    }

    /// Resolve a path against the base URL.
    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else {
            format!("{}{}", self.base_url.trim_end_matches('/'), path)
        }
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, FetchError> {
        let url = self.url_for(path);
        let request = match method {
            Method::Get => self.inner.get(&url),
            Method::Post => self.inner.post(&url).json(&body.unwrap_or(Value::Null)),
        };

        tracing::debug!(method = %method, url = %url, "sending api request");
        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = error_message(&bytes)
                .or_else(|| status.canonical_reason().map(str::to_string))
                .unwrap_or_else(|| status.to_string());
            tracing::warn!(method = %method, url = %url, status = status.as_u16(), %message, "api request failed");
            return Err(FetchError::HttpError {
                status: status.as_u16(),
                message,
            });
        }

        decode_body(&bytes)
    }
}

#[async_trait]
impl ApiClient for HttpApiClient {
    async fn get(&self, path: &str) -> Result<Value, FetchError> {
        self.send(Method::Get, path, None).await
    }

    async fn post(&self, path: &str, body: Value) -> Result<Value, FetchError> {
        self.send(Method::Post, path, Some(body)).await
    }
}

/// Parse a success body. An empty body is `null`.
fn decode_body(bytes: &[u8]) -> Result<Value, FetchError> {
    if bytes.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(bytes).map_err(|e| FetchError::ParseError(e.to_string()))
}

/// The server reports failures as `{ "error": "..." }`.
fn error_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value.get("error")?.as_str().map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let client = HttpApiClient::new("https://larek.example/api/weblarek/").unwrap();
        assert_eq!(
            client.url_for("/product/"),
            "https://larek.example/api/weblarek/product/"
        );
        assert_eq!(
            client.url_for("https://other.example/order"),
            "https://other.example/order"
        );
    }

    #[test]
    fn test_rejects_relative_base() {
        let err = HttpApiClient::new("larek.example").unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl(_)));
    }

    #[test]
    fn test_decode_body() {
        assert_eq!(decode_body(b"").unwrap(), Value::Null);
        assert_eq!(decode_body(br#"{"id":"o1"}"#).unwrap()["id"], "o1");
        assert!(matches!(
            decode_body(b"<html>"),
            Err(FetchError::ParseError(_))
        ));
    }

    #[test]
    fn test_error_message_extraction() {
        assert_eq!(
            error_message(br#"{"error":"Wrong total"}"#),
            Some("Wrong total".to_string())
        );
        assert_eq!(error_message(b"<html>"), None);
        assert_eq!(error_message(br#"{"id":"1"}"#), None);
    }
}
