//! Session token stores backed by the process environment or a file.
//! Both read on every call so a refreshed token is picked up without restart.

use crate::config::ACCESS_TOKEN_VAR;
use checkout_core::TokenStore;
use std::path::PathBuf;
use tracing::debug;

/// Reads the token from `CHECKOUT_ACCESS_TOKEN`
#[derive(Debug, Clone, Default)]
pub struct EnvTokenStore;

impl TokenStore for EnvTokenStore {
    fn token(&self) -> Option<String> {
        std::env::var(ACCESS_TOKEN_VAR).ok().filter(|t| !t.is_empty())
    }
}

/// Reads the token from a file (whitespace trimmed, empty means absent)
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TokenStore for FileTokenStore {
    fn token(&self) -> Option<String> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) => {
                debug!("No token at {}: {}", self.path.display(), e);
                None
            }
        }
    }
}
