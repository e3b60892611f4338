//! # Checkout Error Types
//!
//! Typed error handling for the checkout engine.
//! Every checkout operation returns `Result<T, CheckoutError>`.

use crate::form::PaymentMethod;
use thiserror::Error;

/// Text shown to the customer when nothing more specific applies
pub const GENERIC_FAILURE_MESSAGE: &str = "Checkout failed";

/// Core error type for all checkout operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckoutError {
    /// Submit attempted with no items in the cart
    #[error("Cart is empty")]
    EmptyCart,

    /// A required form field is blank after trimming
    #[error("Missing required field: {field}")]
    MissingField { field: &'static str },

    /// Phone number is not a Kenyan MSISDN (07XXXXXXXX / 01XXXXXXXX)
    #[error("Invalid M-Pesa phone number")]
    InvalidPhone,

    /// Payment method is selectable but not wired to a backend flow yet
    #[error("Unsupported payment method: {0}")]
    UnsupportedMethod(PaymentMethod),

    /// Form field name not recognized
    #[error("Unknown form field: {0}")]
    UnknownField(String),

    /// Payment method string could not be parsed
    #[error("Invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// Backend answered with a non-success status or an unreadable body
    #[error("Request failed: {message}")]
    Request {
        status: Option<u16>,
        message: String,
    },

    /// No response was received (connection refused, DNS, TLS, reset)
    #[error("Network error: {0}")]
    Transport(String),

    /// Configuration errors (missing base URL, bad header values)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Serialization/deserialization error outside the HTTP path
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl CheckoutError {
    /// Message surfaced through the notifier
    pub fn user_message(&self) -> String {
        match self {
            CheckoutError::EmptyCart => "Your cart is empty".to_string(),
            CheckoutError::MissingField { .. } => "Please fill all required fields".to_string(),
            CheckoutError::InvalidPhone => {
                "Enter a valid Kenyan phone number (0712345678)".to_string()
            }
            CheckoutError::UnsupportedMethod(PaymentMethod::Cash) => {
                "Cash on delivery coming soon".to_string()
            }
            CheckoutError::UnsupportedMethod(PaymentMethod::Card) => {
                "Card payments coming soon".to_string()
            }
            CheckoutError::UnsupportedMethod(method) => {
                format!("{} payments coming soon", method.display_name())
            }
            CheckoutError::Request { message, .. } if !message.is_empty() => message.clone(),
            _ => GENERIC_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Returns true for local validation failures
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CheckoutError::EmptyCart
                | CheckoutError::MissingField { .. }
                | CheckoutError::InvalidPhone
        )
    }

    /// Returns true if this error could only have been produced by a network call
    pub fn reaches_network(&self) -> bool {
        matches!(
            self,
            CheckoutError::Request { .. } | CheckoutError::Transport(_)
        )
    }

    /// HTTP status carried by a `Request` error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            CheckoutError::Request { status, .. } => *status,
            _ => None,
        }
    }
}

/// Result type alias for checkout operations
pub type CheckoutResult<T> = Result<T, CheckoutError>;
