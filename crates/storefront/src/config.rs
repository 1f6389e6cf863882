//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOPFRONT_API_URL` - Base URL of the shop API (falls back to `BACKEND_URL`)
//!
//! ## Optional
//! - `SHOPFRONT_SESSION_FILE` - Where the session is kept between runs
//!   (default: `shopfront-session.json` in the system temp directory)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_SESSION_FILE: &str = "shopfront-session.json";

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the shop API. Always ends with `/`.
    pub api_url: Url,
    /// Session storage file
    pub session_file: PathBuf,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name
    pub sentry_environment: Option<String>,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the API URL is missing or not a valid
    /// `http(s)` URL.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Same as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw_url = lookup("SHOPFRONT_API_URL")
            .or_else(|| lookup("BACKEND_URL"))
            .ok_or_else(|| ConfigError::MissingEnvVar("SHOPFRONT_API_URL".to_string()))?;
        let api_url = parse_api_url(&raw_url)
            .map_err(|e| ConfigError::InvalidEnvVar("SHOPFRONT_API_URL".to_string(), e))?;

        let session_file = lookup("SHOPFRONT_SESSION_FILE")
            .filter(|s| !s.trim().is_empty())
            .map_or_else(default_session_file, PathBuf::from);

        Ok(Self {
            api_url,
            session_file,
            sentry_dsn: lookup("SENTRY_DSN").filter(|s| !s.is_empty()),
            sentry_environment: lookup("SENTRY_ENVIRONMENT").filter(|s| !s.is_empty()),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse and normalize the API base URL so relative joins append to it.
pub(crate) fn parse_api_url(raw: &str) -> Result<Url, String> {
    let mut url = Url::parse(raw.trim()).map_err(|e| e.to_string())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!("unsupported scheme '{}'", url.scheme()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn default_session_file() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_SESSION_FILE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_missing_api_url() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref k) if k == "SHOPFRONT_API_URL"));
    }

    #[test]
    fn test_backend_url_fallback() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("BACKEND_URL", "http://localhost:8080")]))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_api_url_gets_trailing_slash() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[(
            "SHOPFRONT_API_URL",
            "https://shop.example.com/api",
        )]))
        .unwrap();
        assert_eq!(config.api_url.as_str(), "https://shop.example.com/api/");
        assert_eq!(
            config.api_url.join("cart/3").unwrap().as_str(),
            "https://shop.example.com/api/cart/3"
        );
    }

    #[test]
    fn test_invalid_api_url() {
        let err = StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_URL", "not a url")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));

        let err =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_URL", "ftp://host/")]))
                .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_optional_values() {
        let config = StorefrontConfig::from_lookup(lookup_from(&[
            ("SHOPFRONT_API_URL", "http://localhost:8080/"),
            ("SHOPFRONT_SESSION_FILE", "/tmp/custom-session.json"),
            ("SENTRY_DSN", ""),
            ("SENTRY_ENVIRONMENT", "staging"),
        ]))
        .unwrap();
        assert_eq!(config.session_file, PathBuf::from("/tmp/custom-session.json"));
        assert_eq!(config.sentry_dsn, None);
        assert_eq!(config.sentry_environment.as_deref(), Some("staging"));
    }

    #[test]
    fn test_default_session_file() {
        let config =
            StorefrontConfig::from_lookup(lookup_from(&[("SHOPFRONT_API_URL", "http://h/")]))
                .unwrap();
        assert!(config.session_file.ends_with(DEFAULT_SESSION_FILE));
    }
}
