//! # checkout-core
//!
//! Core types and checkout logic for the storefront checkout step.
//!
//! This crate provides:
//! - `CartItem`, `cart_total` and `OrderSummary` for the order summary panel
//! - `CheckoutForm` and `PaymentMethod` for customer input
//! - `validate` for the pre-submit rules
//! - `machine::transition`, the pure checkout state machine
//! - `CheckoutOrchestrator`, which runs the machine against injected stores
//! - `PaymentGateway` trait for the payment backend
//! - `CheckoutError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use checkout_core::{CheckoutContext, CheckoutOrchestrator, CheckoutState};
//!
//! let mut checkout = CheckoutOrchestrator::mount(CheckoutContext {
//!     cart_store,
//!     gateway,
//!     navigator,
//!     notifier,
//! });
//!
//! checkout.set_field("customer_name", "Wanjiku Kamau")?;
//! checkout.set_field("customer_phone", "0712345678")?;
//! checkout.set_field("delivery_address", "Kenyatta Ave, Nairobi")?;
//!
//! if let CheckoutState::Succeeded { sale_id } = checkout.submit().await {
//!     // navigator already sent the customer to /order/{sale_id}?payment=pending
//! }
//! ```

pub mod cart;
pub mod error;
pub mod form;
pub mod gateway;
pub mod machine;
pub mod orchestrator;
pub mod payment;
pub mod store;
pub mod validation;

// Re-exports for convenience
pub use cart::{cart_total, format_kes, CartItem, Identifier, OrderSummary, SummaryLine};
pub use error::{CheckoutError, CheckoutResult, GENERIC_FAILURE_MESSAGE};
pub use form::{CheckoutForm, PaymentMethod};
pub use gateway::{BoxedPaymentGateway, PaymentGateway};
pub use machine::{transition, CheckoutEvent, CheckoutState, Effect, Transition};
pub use orchestrator::{
    submit_label, CheckoutContext, CheckoutOrchestrator, CheckoutReceipt, LoadingFlag,
    LoadingGuard,
};
pub use payment::{
    Payment, PaymentInitiationRequest, PaymentInitiationResponse, PaymentItem, PaymentStatus,
};
pub use store::{
    pending_order_path, CartStore, MemoryCartStore, Navigator, NotificationKind, Notifier,
    StaticTokenStore, TokenStore, CART_PATH,
};
pub use validation::{is_valid_mpesa_phone, validate};
