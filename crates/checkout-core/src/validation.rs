//! # Checkout Validation
//!
//! Stateless rules evaluated before any payment is attempted.
//! Rules run in order and the first failure wins:
//!
//! 1. the cart has at least one item
//! 2. name, phone and delivery address are non-blank
//! 3. for M-Pesa, the phone is a Kenyan MSISDN

use crate::cart::CartItem;
use crate::error::{CheckoutError, CheckoutResult};
use crate::form::{CheckoutForm, PaymentMethod};
use once_cell::sync::Lazy;
use regex::Regex;

// `[0-9]` rather than `\d`: the regex crate's `\d` matches any Unicode digit.
static MPESA_PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(07|01)[0-9]{8}$").expect("phone pattern is valid"));

/// Check a phone number against the Safaricom MSISDN format (`0712345678`)
pub fn is_valid_mpesa_phone(phone: &str) -> bool {
    MPESA_PHONE_RE.is_match(phone)
}

/// Validate the cart and form ahead of submission
pub fn validate(cart: &[CartItem], form: &CheckoutForm) -> CheckoutResult<()> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let required = [
        ("customer_name", form.customer_name.as_str()),
        ("customer_phone", form.customer_phone.as_str()),
        ("delivery_address", form.delivery_address.as_str()),
    ];
    if let Some(&(field, _)) = required.iter().find(|(_, value)| value.trim().is_empty()) {
        return Err(CheckoutError::MissingField { field });
    }

    // Matched untrimmed: padded numbers are rejected
    if form.payment_method == PaymentMethod::Mpesa && !is_valid_mpesa_phone(&form.customer_phone) {
        return Err(CheckoutError::InvalidPhone);
    }

    Ok(())
}
