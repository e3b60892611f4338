//! # Cart File
//!
//! TOML-backed cart store for the command line.
//!
//! ```toml
//! [[items]]
//! product_id = 12
//! product_name = "Maize Flour 2kg"
//! quantity = 2
//! unit_price = 210.0
//! ```

use checkout_core::{CartItem, CartStore};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Default, Serialize, Deserialize)]
struct CartFile {
    #[serde(default)]
    items: Vec<CartItem>,
}

/// Cart stored in a TOML file; `clear` rewrites it with no items
#[derive(Debug, Clone)]
pub struct TomlCartStore {
    path: PathBuf,
}

impl TomlCartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse the cart file, surfacing read/parse errors
    pub fn load(&self) -> anyhow::Result<Vec<CartItem>> {
        let content = std::fs::read_to_string(&self.path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", self.path.display(), e))?;
        let file: CartFile = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", self.path.display(), e))?;
        Ok(file.items)
    }
}

impl CartStore for TomlCartStore {
    fn cart(&self) -> Vec<CartItem> {
        match self.load() {
            Ok(items) => items,
            Err(e) => {
                warn!("{}; treating cart as empty", e);
                Vec::new()
            }
        }
    }

    fn clear(&self) {
        let result = toml::to_string(&CartFile::default())
            .map_err(|e| e.to_string())
            .and_then(|content| std::fs::write(&self.path, content).map_err(|e| e.to_string()));

        match result {
            Ok(()) => info!("Cleared cart file {}", self.path.display()),
            Err(e) => warn!("Failed to clear cart file {}: {}", self.path.display(), e),
        }
    }
}
