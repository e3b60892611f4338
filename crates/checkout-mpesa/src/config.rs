//! # API Configuration
//!
//! Configuration for the payments backend.
//! Values are loaded from environment variables (and `.env` if present).

use checkout_core::CheckoutError;
use std::env;

/// Env var holding the backend base URL, e.g. `https://api.example.co.ke/api`
pub const BASE_URL_VAR: &str = "CHECKOUT_API_BASE_URL";

/// Env var holding the customer's session token
pub const ACCESS_TOKEN_VAR: &str = "CHECKOUT_ACCESS_TOKEN";

/// Payments backend configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL every endpoint path is appended to (no trailing slash)
    pub base_url: String,

    /// Session token present at startup, if any
    pub access_token: Option<String>,
}

impl ApiConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `CHECKOUT_API_BASE_URL`
    ///
    /// Optional:
    /// - `CHECKOUT_ACCESS_TOKEN`
    pub fn from_env() -> Result<Self, CheckoutError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let base_url = env::var(BASE_URL_VAR)
            .map_err(|_| CheckoutError::Configuration(format!("{} not set", BASE_URL_VAR)))?;

        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(CheckoutError::Configuration(format!(
                "{} must start with http:// or https://",
                BASE_URL_VAR
            )));
        }

        let access_token = env::var(ACCESS_TOKEN_VAR).ok().filter(|t| !t.is_empty());

        Ok(Self::new(base_url).with_access_token_opt(access_token))
    }

    /// Create config with an explicit base URL (for testing)
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize(base_url.into()),
            access_token: None,
        }
    }

    /// Builder: set custom base URL (for testing)
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = normalize(url.into());
        self
    }

    /// Builder: set the session token
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    fn with_access_token_opt(mut self, token: Option<String>) -> Self {
        self.access_token = token;
        self
    }

    /// Full URL for an endpoint path such as `/payments/create-payment/`
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

fn normalize(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_join() {
        let config = ApiConfig::new("https://shop.example.co.ke/api/");
        assert_eq!(
            config.url("/payments/create-payment/"),
            "https://shop.example.co.ke/api/payments/create-payment/"
        );
    }

    #[test]
    fn test_builders() {
        let config = ApiConfig::new("http://localhost:8000")
            .with_base_url("http://127.0.0.1:9000/")
            .with_access_token("tok");
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
        assert_eq!(config.access_token.as_deref(), Some("tok"));
    }

    #[test]
    fn test_from_env_missing_base_url() {
        // Clear any existing env vars
        env::remove_var(BASE_URL_VAR);

        let result = ApiConfig::from_env();
        assert!(matches!(result, Err(CheckoutError::Configuration(_))));
    }
}
