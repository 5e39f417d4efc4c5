//! Storefront configuration.

use std::path::Path;

use larek_commerce::basket::BasketMode;
use larek_data::FetchPolicy;
use larek_observability::LoggingConfig;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Environment variable that overrides [`StoreConfig::api_origin`].
pub const API_ORIGIN_ENV: &str = "API_ORIGIN";

/// Storefront configuration file.
///
/// Loaded from TOML, or JSON when the file name ends in `.json`. Every key
/// except `api_origin` has a default, and `api_origin` can come from the
/// environment instead.
///
/// ```toml
/// api_origin = "https://larek-api.example"
/// basket_mode = "uniqueness"
///
/// [logging]
/// level = "debug"
/// format = "json"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Scheme and host shared by the API and the CDN.
    #[serde(default)]
    pub api_origin: String,

    /// API path under the origin.
    #[serde(default = "default_api_path")]
    pub api_path: String,

    /// Image CDN path under the origin.
    #[serde(default = "default_cdn_path")]
    pub cdn_path: String,

    /// How repeated adds of the same product behave.
    #[serde(default)]
    pub basket_mode: BasketMode,

    /// Whole-request timeout for API calls.
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    /// Log level and format.
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_api_path() -> String {
    "/api/weblarek".to_string()
}

fn default_cdn_path() -> String {
    "/content/weblarek".to_string()
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            api_origin: String::new(),
            api_path: default_api_path(),
            cdn_path: default_cdn_path(),
            basket_mode: BasketMode::default(),
            request_timeout_ms: default_request_timeout_ms(),
            logging: LoggingConfig::default(),
        }
    }
}

impl StoreConfig {
    /// Create a configuration for the given origin.
    pub fn new(api_origin: impl Into<String>) -> Self {
        Self {
            api_origin: api_origin.into(),
            ..Default::default()
        }
    }

    /// Set the basket mode.
    pub fn with_basket_mode(mut self, mode: BasketMode) -> Self {
        self.basket_mode = mode;
        self
    }

    /// Set the request timeout.
    pub fn with_request_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.request_timeout_ms = timeout_ms;
        self
    }

    /// Set the logging configuration.
    pub fn with_logging(mut self, logging: LoggingConfig) -> Self {
        self.logging = logging;
        self
    }

    /// Load config from a file, then apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            message: e.to_string(),
        })?;

        let parsed = if path.extension().is_some_and(|ext| ext == "json") {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        let config = parsed
            .map_err(|message| ConfigError::Parse {
                path: display,
                message,
            })?
            .with_env_overrides();

        config.validate()?;
        tracing::debug!(
            origin = %config.api_origin,
            basket_mode = config.basket_mode.as_str(),
            "loaded store config"
        );
        Ok(config)
    }

    /// Parse TOML config text. No overrides or validation are applied.
    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Parse JSON config text. No overrides or validation are applied.
    pub fn from_json_str(content: &str) -> Result<Self, String> {
        serde_json::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply `API_ORIGIN` from the process environment, if set.
    pub fn with_env_overrides(self) -> Self {
        self.with_origin_override(std::env::var(API_ORIGIN_ENV).ok())
    }

    /// Replace the origin when `origin` is present and not blank.
    pub fn with_origin_override(mut self, origin: Option<String>) -> Self {
        if let Some(origin) = origin.filter(|o| !o.trim().is_empty()) {
            self.api_origin = origin.trim().to_string();
        }
        self
    }

    /// Check that the config can produce working URLs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let origin = self.api_origin.trim();
        if origin.is_empty() {
            return Err(ConfigError::Invalid(format!(
                "api_origin is not set (set it in the file or via {})",
                API_ORIGIN_ENV
            )));
        }
        if !origin.starts_with("http://") && !origin.starts_with("https://") {
            return Err(ConfigError::Invalid(format!(
                "api_origin must be an http(s) URL, got '{}'",
                origin
            )));
        }
        if self.request_timeout_ms == 0 {
            return Err(ConfigError::Invalid(
                "request_timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Base URL for API calls.
    pub fn api_base_url(&self) -> String {
        join_url(&self.api_origin, &self.api_path)
    }

    /// Base URL for product images.
    pub fn cdn_base_url(&self) -> String {
        join_url(&self.api_origin, &self.cdn_path)
    }

    /// Timeouts for the HTTP client.
    pub fn fetch_policy(&self) -> FetchPolicy {
        FetchPolicy::from_millis(self.request_timeout_ms)
    }
}

fn join_url(origin: &str, path: &str) -> String {
    let origin = origin.trim().trim_end_matches('/');
    let path = path.trim();
    if path.is_empty() {
        origin.to_string()
    } else {
        format!("{}/{}", origin, path.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larek_observability::{LogFormat, LogLevel};

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(config.api_origin.is_empty());
        assert_eq!(config.api_path, "/api/weblarek");
        assert_eq!(config.cdn_path, "/content/weblarek");
        assert_eq!(config.basket_mode, BasketMode::Multiplicity);
        assert_eq!(config.request_timeout_ms, 10_000);
    }

    #[test]
    fn test_urls() {
        let config = StoreConfig::new("https://larek.example/");
        assert_eq!(config.api_base_url(), "https://larek.example/api/weblarek");
        assert_eq!(config.cdn_base_url(), "https://larek.example/content/weblarek");
    }

    #[test]
    fn test_parse_toml() {
        let config = StoreConfig::from_toml_str(
            r#"
            api_origin = "https://larek.example"
            basket_mode = "uniqueness"
            request_timeout_ms = 2500

            [logging]
            level = "debug"
            format = "json"
            "#,
        )
        .unwrap();

        assert_eq!(config.basket_mode, BasketMode::Uniqueness);
        assert_eq!(config.request_timeout_ms, 2500);
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.api_path, "/api/weblarek");
    }

    #[test]
    fn test_parse_json() {
        let config =
            StoreConfig::from_json_str(r#"{"api_origin": "http://localhost:3000", "cdn_path": "/img"}"#)
                .unwrap();
        assert_eq!(config.cdn_base_url(), "http://localhost:3000/img");
        assert_eq!(config.basket_mode, BasketMode::Multiplicity);
    }

    #[test]
    fn test_parse_rejects_unknown_mode() {
        assert!(StoreConfig::from_toml_str(r#"basket_mode = "bag""#).is_err());
    }

    #[test]
    fn test_origin_override() {
        let config = StoreConfig::new("http://file.example");

        let same = config.clone().with_origin_override(None);
        assert_eq!(same.api_origin, "http://file.example");

        let blank = config.clone().with_origin_override(Some("  ".into()));
        assert_eq!(blank.api_origin, "http://file.example");

        let env = config.with_origin_override(Some("https://env.example".into()));
        assert_eq!(env.api_origin, "https://env.example");
    }

    #[test]
    fn test_validate() {
        assert!(StoreConfig::default().validate().is_err());
        assert!(StoreConfig::new("larek.example").validate().is_err());
        assert!(StoreConfig::new("https://larek.example")
            .with_request_timeout_ms(0)
            .validate()
            .is_err());
        assert!(StoreConfig::new("https://larek.example").validate().is_ok());
    }

    #[test]
    fn test_load_missing_file() {
        let err = StoreConfig::load("/nonexistent/larek.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_load_json_file() {
        let path = std::env::temp_dir().join(format!("larek-config-{}.json", std::process::id()));
        std::fs::write(
            &path,
            r#"{"api_origin": "https://larek.example", "basket_mode": "uniqueness"}"#,
        )
        .unwrap();

        let loaded = StoreConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        let config = loaded.unwrap();
        assert_eq!(config.basket_mode, BasketMode::Uniqueness);
        assert!(config.api_base_url().ends_with("/api/weblarek"));
    }
}
