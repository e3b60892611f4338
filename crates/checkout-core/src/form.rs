//! # Checkout Form
//!
//! Customer input collected on the checkout page, edited one field at a time.

use crate::error::{CheckoutError, CheckoutResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Payment methods offered on the checkout page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// M-Pesa mobile money (STK push)
    Mpesa,
    /// Cash on delivery (placeholder)
    Cash,
    /// Card payment (placeholder)
    Card,
}

impl PaymentMethod {
    /// Wire value used in form fields and query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "mpesa",
            PaymentMethod::Cash => "cash",
            PaymentMethod::Card => "card",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::Mpesa => "M-Pesa",
            PaymentMethod::Cash => "Cash on Delivery",
            PaymentMethod::Card => "Card Payment",
        }
    }

    /// Whether the method's control is enabled on the page.
    /// Disabled methods are still rejected again at submit.
    pub fn is_enabled(&self) -> bool {
        matches!(self, PaymentMethod::Mpesa)
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Mpesa
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = CheckoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mpesa" => Ok(PaymentMethod::Mpesa),
            "cash" => Ok(PaymentMethod::Cash),
            "card" => Ok(PaymentMethod::Card),
            other => Err(CheckoutError::InvalidPaymentMethod(other.to_string())),
        }
    }
}

/// Checkout form state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub customer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,

    #[serde(default)]
    pub customer_phone: String,

    #[serde(default)]
    pub delivery_address: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Empty form with M-Pesa preselected
    pub fn new() -> Self {
        Self::default()
    }

    /// Update a single field by its input name
    pub fn set_field(&mut self, name: &str, value: &str) -> CheckoutResult<()> {
        match name {
            "customer_name" => self.customer_name = value.to_string(),
            "customer_email" => self.customer_email = non_empty(value),
            "customer_phone" => self.customer_phone = value.to_string(),
            "delivery_address" => self.delivery_address = value.to_string(),
            "notes" => self.notes = non_empty(value),
            "payment_method" => self.payment_method = value.parse()?,
            other => return Err(CheckoutError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    /// Builder: set customer name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.customer_name = name.into();
        self
    }

    /// Builder: set customer phone
    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.customer_phone = phone.into();
        self
    }

    /// Builder: set delivery address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.delivery_address = address.into();
        self
    }

    /// Builder: set customer email
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.customer_email = non_empty(&email.into());
        self
    }

    /// Builder: set delivery notes
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = non_empty(&notes.into());
        self
    }

    /// Builder: set payment method
    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("mpesa".parse::<PaymentMethod>().unwrap(), PaymentMethod::Mpesa);
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!(
            "paypal".parse::<PaymentMethod>(),
            Err(CheckoutError::InvalidPaymentMethod("paypal".into()))
        );
    }

    #[test]
    fn test_only_mpesa_enabled() {
        assert!(PaymentMethod::Mpesa.is_enabled());
        assert!(!PaymentMethod::Cash.is_enabled());
        assert!(!PaymentMethod::Card.is_enabled());
    }

    #[test]
    fn test_default_form() {
        let form = CheckoutForm::new();
        assert_eq!(form.payment_method, PaymentMethod::Mpesa);
        assert!(form.customer_name.is_empty());
        assert!(form.customer_email.is_none());
    }

    #[test]
    fn test_set_field() {
        let mut form = CheckoutForm::new();
        form.set_field("customer_name", "Wanjiku").unwrap();
        form.set_field("customer_phone", "0712345678").unwrap();
        form.set_field("payment_method", "card").unwrap();
        form.set_field("notes", "").unwrap();

        assert_eq!(form.customer_name, "Wanjiku");
        assert_eq!(form.customer_phone, "0712345678");
        assert_eq!(form.payment_method, PaymentMethod::Card);
        assert!(form.notes.is_none());

        assert_eq!(
            form.set_field("coupon", "SAVE10"),
            Err(CheckoutError::UnknownField("coupon".into()))
        );
    }

    #[test]
    fn test_payment_method_serde() {
        let json = serde_json::to_string(&PaymentMethod::Mpesa).unwrap();
        assert_eq!(json, "\"mpesa\"");
    }

    #[test]
    fn test_form_deserializes_with_absent_fields() {
        let form: CheckoutForm = serde_json::from_str(r#"{"customer_phone":"0712345678"}"#).unwrap();
        assert_eq!(form.customer_name, "");
        assert_eq!(form.delivery_address, "");
        assert_eq!(form.payment_method, PaymentMethod::Mpesa);
    }
}
