//! # Payment Gateway Trait
//!
//! Seam between the checkout state machine and the backend that starts a
//! payment. The M-Pesa implementation lives in `checkout-mpesa`; tests plug
//! in scripted gateways.
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ CheckoutOrchestrator          │
//! │   └── PaymentGateway (trait)  │
//! │         └── initiate()        │
//! └───────────────┬───────────────┘
//!                 ▼
//!         ┌───────────────┐
//!         │ MpesaGateway  │──► RequestClient ──► POST /payments/create-payment/
//!         └───────────────┘
//! ```

use crate::error::CheckoutResult;
use crate::payment::{PaymentInitiationRequest, PaymentInitiationResponse};
use async_trait::async_trait;
use std::sync::Arc;

/// Backend that creates a sale and starts its payment in one call.
///
/// `initiate` is atomic from the caller's side: it either returns a response
/// carrying both the `sale_id` and the payment identifiers, or fails with
/// nothing to clean up.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn initiate(
        &self,
        request: &PaymentInitiationRequest,
    ) -> CheckoutResult<PaymentInitiationResponse>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared payment gateway (dynamic dispatch)
pub type BoxedPaymentGateway = Arc<dyn PaymentGateway>;
