//! # Collaborator Interfaces
//!
//! The checkout core never touches global state. Cart storage, the session
//! token, navigation and notifications are injected through these traits.

use crate::cart::CartItem;
use std::sync::{Arc, RwLock};

/// Path of the cart page
pub const CART_PATH: &str = "/cart";

/// Order confirmation path shown while the M-Pesa prompt is pending
pub fn pending_order_path(sale_id: impl std::fmt::Display) -> String {
    format!("/order/{}?payment=pending", sale_id)
}

/// Persistent cart storage
pub trait CartStore: Send + Sync {
    /// Snapshot of the current cart
    fn cart(&self) -> Vec<CartItem>;

    /// Remove every item. Idempotent.
    fn clear(&self);
}

/// Read-only access to the stored session token
pub trait TokenStore: Send + Sync {
    fn token(&self) -> Option<String>;
}

/// Page navigation
pub trait Navigator: Send + Sync {
    fn redirect(&self, path: &str);
}

/// Kind of toast shown to the customer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
}

/// User-facing notifications
pub trait Notifier: Send + Sync {
    fn notify(&self, message: &str, kind: NotificationKind);
}

/// In-memory cart store
#[derive(Debug, Clone, Default)]
pub struct MemoryCartStore {
    items: Arc<RwLock<Vec<CartItem>>>,
}

impl MemoryCartStore {
    pub fn new(items: Vec<CartItem>) -> Self {
        Self {
            items: Arc::new(RwLock::new(items)),
        }
    }

    /// Add an item to the cart
    pub fn push(&self, item: CartItem) {
        match self.items.write() {
            Ok(mut items) => items.push(item),
            Err(poisoned) => poisoned.into_inner().push(item),
        }
    }
}

impl CartStore for MemoryCartStore {
    fn cart(&self) -> Vec<CartItem> {
        match self.items.read() {
            Ok(items) => items.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn clear(&self) {
        match self.items.write() {
            Ok(mut items) => items.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

/// Token store holding a fixed value
#[derive(Debug, Clone, Default)]
pub struct StaticTokenStore {
    token: Option<String>,
}

impl StaticTokenStore {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
        }
    }

    /// Store with no token (anonymous requests)
    pub fn anonymous() -> Self {
        Self { token: None }
    }
}

impl TokenStore for StaticTokenStore {
    fn token(&self) -> Option<String> {
        self.token.clone()
    }
}
