//! # Application State
//!
//! Configuration and the payment gateway shared by every command.

use checkout_core::TokenStore;
use checkout_mpesa::{ApiConfig, EnvTokenStore, FileTokenStore, MpesaGateway, RequestClient};
use std::path::PathBuf;
use std::sync::Arc;

/// Env var pointing at a file holding the session token
pub const TOKEN_FILE_VAR: &str = "CHECKOUT_TOKEN_FILE";

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Payments backend settings
    pub api: ApiConfig,
    /// Token file; the environment is used when absent
    pub token_file: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        let api = ApiConfig::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to load API config: {}", e))?;

        let token_file = std::env::var(TOKEN_FILE_VAR)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);

        Ok(Self { api, token_file })
    }

    /// Token store matching this configuration
    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        match &self.token_file {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(EnvTokenStore),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// M-Pesa gateway
    pub gateway: MpesaGateway,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create state from the environment
    pub fn new() -> anyhow::Result<Self> {
        Self::with_config(AppConfig::from_env()?)
    }

    pub fn with_config(config: AppConfig) -> anyhow::Result<Self> {
        let client = RequestClient::new(config.api.clone(), config.token_store())
            .map_err(|e| anyhow::anyhow!("Failed to initialize request client: {}", e))?;

        Ok(Self {
            gateway: MpesaGateway::new(client),
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_store_selection() {
        let path = std::env::temp_dir().join(format!("cli-token-{}", std::process::id()));
        std::fs::write(&path, "from-file").unwrap();

        let config = AppConfig {
            api: ApiConfig::new("http://localhost:8000"),
            token_file: Some(path.clone()),
        };
        assert_eq!(config.token_store().token().as_deref(), Some("from-file"));

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_state_with_config() {
        let config = AppConfig {
            api: ApiConfig::new("http://localhost:8000/api/"),
            token_file: None,
        };
        let state = AppState::with_config(config).unwrap();
        assert_eq!(state.config.api.base_url, "http://localhost:8000/api");
    }
}
