//! # checkout-wasm
//!
//! WebAssembly bindings for the checkout page.
//!
//! Runs the same total and validation rules as the server-side checkout so
//! the page can disable the pay button and show the error before a request
//! is ever made.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { cart_total, validate_checkout, submit_label } from 'checkout-wasm';
//!
//! await init();
//!
//! const items = JSON.stringify(cart);
//! const error = validate_checkout(items, JSON.stringify(form));
//! if (error) showError(error);
//!
//! button.textContent = submit_label(cart_total(items), loading);
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use checkout_core::{CartItem, CheckoutForm};
use wasm_bindgen::prelude::*;

fn parse_items(items_json: &str) -> Result<Vec<CartItem>, String> {
    serde_json::from_str(items_json).map_err(|e| format!("Invalid cart items: {}", e))
}

fn parse_form(form_json: &str) -> Result<CheckoutForm, String> {
    serde_json::from_str(form_json).map_err(|e| format!("Invalid checkout form: {}", e))
}

fn checkout_error(items_json: &str, form_json: &str) -> Result<String, String> {
    let items = parse_items(items_json)?;
    let form = parse_form(form_json)?;

    Ok(match checkout_core::validate(&items, &form) {
        Ok(()) => String::new(),
        Err(e) => e.user_message(),
    })
}

/// Sum of `unit_price × quantity` over a JSON array of cart items
#[wasm_bindgen]
pub fn cart_total(items_json: &str) -> Result<f64, JsValue> {
    parse_items(items_json)
        .map(|items| checkout_core::cart_total(&items))
        .map_err(|e| JsValue::from_str(&e))
}

/// Validate cart and form; returns the message to show, or an empty string
#[wasm_bindgen]
pub fn validate_checkout(items_json: &str, form_json: &str) -> Result<String, JsValue> {
    checkout_error(items_json, form_json).map_err(|e| JsValue::from_str(&e))
}

/// Kenyan mobile number accepted for the STK push (`07XXXXXXXX` or `01XXXXXXXX`)
#[wasm_bindgen]
pub fn is_valid_mpesa_phone(phone: &str) -> bool {
    checkout_core::is_valid_mpesa_phone(phone)
}

/// Format an amount for display (`KES 1200`)
#[wasm_bindgen]
pub fn format_kes(amount: f64) -> String {
    checkout_core::format_kes(amount)
}

/// Pay button label for the given total
#[wasm_bindgen]
pub fn submit_label(total: f64, loading: bool) -> String {
    checkout_core::submit_label(total, loading)
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
