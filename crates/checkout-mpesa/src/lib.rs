//! # checkout-mpesa
//!
//! M-Pesa payment backend for the checkout engine.
//!
//! This crate provides:
//!
//! 1. **RequestClient** - authenticated JSON requests
//!    - Bearer token from a `TokenStore`
//!    - Caller headers override the JSON defaults
//!    - Uniform `CheckoutError::Request` for non-2xx answers
//!
//! 2. **MpesaGateway** - `PaymentGateway` over `/payments/create-payment/`
//!    - One call creates the sale and sends the STK push
//!    - Read-only payment lookups by checkout request or sale
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use checkout_mpesa::MpesaGateway;
//! use checkout_core::PaymentGateway;
//!
//! // CHECKOUT_API_BASE_URL / CHECKOUT_ACCESS_TOKEN from the environment
//! let gateway = MpesaGateway::from_env()?;
//!
//! let response = gateway.initiate(&request).await?;
//! println!("Sale {} awaiting PIN", response.sale_id);
//! ```

pub mod client;
pub mod config;
pub mod gateway;
pub mod token;

// Re-exports
pub use client::{RequestClient, RequestOptions};
pub use config::ApiConfig;
pub use gateway::{MpesaGateway, CREATE_PAYMENT_ENDPOINT};
pub use token::{EnvTokenStore, FileTokenStore};
