//! # Cart Types
//!
//! Cart line items as read from the cart store, plus the pure total
//! calculation used by the order summary and the submit button.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Backend identifier. Product and sale ids arrive either as JSON numbers
/// or as strings depending on the backend, and are sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Identifier {
    Number(u64),
    Text(String),
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Identifier::Number(n) => write!(f, "{}", n),
            Identifier::Text(s) => f.write_str(s),
        }
    }
}

impl From<u64> for Identifier {
    fn from(value: u64) -> Self {
        Identifier::Number(value)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::Text(value.to_string())
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier::Text(value)
    }
}

/// A line item in the shopper's cart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID
    pub product_id: Identifier,

    /// Product name (denormalized for display)
    pub product_name: String,

    /// Quantity (positive)
    pub quantity: u32,

    /// Unit price in KES
    pub unit_price: f64,
}

impl CartItem {
    pub fn new(
        product_id: impl Into<Identifier>,
        product_name: impl Into<String>,
        quantity: u32,
        unit_price: f64,
    ) -> Self {
        Self {
            product_id: product_id.into(),
            product_name: product_name.into(),
            quantity,
            unit_price,
        }
    }

    /// Calculate the total price for this line item
    pub fn line_total(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// Sum of `quantity × unit_price` over all items; `0` for an empty cart
pub fn cart_total(items: &[CartItem]) -> f64 {
    items.iter().fold(0.0, |acc, item| acc + item.line_total())
}

/// Format an amount for display, e.g. `KES 200`.
///
/// Halves round up (`102.5` shows as `KES 103`).
pub fn format_kes(amount: f64) -> String {
    // `+ 0.0` folds negative zero
    format!("KES {:.0}", amount.round() + 0.0)
}

/// One row of the order summary panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryLine {
    pub product_name: String,
    pub quantity: u32,
    pub line_total: f64,
}

/// Order summary shown next to the checkout form
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderSummary {
    pub lines: Vec<SummaryLine>,
    pub total: f64,
}

impl OrderSummary {
    pub fn from_items(items: &[CartItem]) -> Self {
        let lines = items
            .iter()
            .map(|item| SummaryLine {
                product_name: item.product_name.clone(),
                quantity: item.quantity,
                line_total: item.line_total(),
            })
            .collect();

        Self {
            lines,
            total: cart_total(items),
        }
    }

    /// Check if the summary has no lines
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Get item count
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
