//! # checkout-cli
//!
//! Command-line front end for the checkout engine.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `checkout pay` | Run one checkout session for a cart file |
//! | `checkout total` | Print the order summary of a cart file |
//! | `checkout status <id>` | Payment by M-Pesa checkout request id |
//! | `checkout sale <id>` | Payment attached to a sale |
//! | `checkout payments` | List payments |

pub mod cart_file;
pub mod commands;
pub mod console;
pub mod state;

pub use cart_file::TomlCartStore;
pub use state::{AppConfig, AppState};
