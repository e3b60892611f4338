//! # Checkout Orchestrator
//!
//! Drives [`machine::transition`](crate::machine::transition) for one
//! checkout page: reads the cart once at mount, owns the form, and runs the
//! effects each transition asks for (validation, the gateway call, toasts,
//! cart clearing, navigation).
//!
//! Only one submission runs at a time: `submit` takes `&mut self`, and the
//! shared [`LoadingFlag`] lets a UI disable its pay button meanwhile.
//!
//! Known limitation: the gateway call has no timeout and no cancellation.
//! Dropping the `submit` future clears the loading flag but leaves the
//! backend request running and the state at `Submitting`.

use crate::cart::{cart_total, format_kes, CartItem, Identifier, OrderSummary};
use crate::error::{CheckoutError, CheckoutResult};
use crate::form::CheckoutForm;
use crate::gateway::BoxedPaymentGateway;
use crate::machine::{transition, CheckoutEvent, CheckoutState, Effect, Transition};
use crate::payment::{PaymentInitiationRequest, PaymentInitiationResponse};
use crate::store::{pending_order_path, CartStore, Navigator, NotificationKind, Notifier, CART_PATH};
use crate::validation::validate;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

/// Shared "payment in flight" indicator
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag(Arc<AtomicBool>);

impl LoadingFlag {
    pub fn is_set(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }

    pub fn set(&self, value: bool) {
        self.0.store(value, Ordering::SeqCst);
    }

    /// Raise the flag until the returned guard is dropped
    pub fn hold(&self) -> LoadingGuard {
        self.set(true);
        LoadingGuard(self.clone())
    }
}

/// Clears the loading flag on drop, including on unwind and cancellation
#[must_use = "the flag is cleared as soon as the guard is dropped"]
pub struct LoadingGuard(LoadingFlag);

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Record of a successful payment initiation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub sale_id: Identifier,
    pub transaction_id: String,
    pub status: String,
    pub message: String,
    pub redirect_path: String,
    pub submitted_at: DateTime<Utc>,
}

impl CheckoutReceipt {
    fn from_response(response: &PaymentInitiationResponse) -> Self {
        Self {
            sale_id: response.sale_id.clone(),
            transaction_id: response.transaction_id.clone(),
            status: response.status.clone(),
            message: response.message.clone(),
            redirect_path: pending_order_path(&response.sale_id),
            submitted_at: Utc::now(),
        }
    }
}

/// Pay button label
pub fn submit_label(total: f64, loading: bool) -> String {
    if loading {
        "Processing...".to_string()
    } else {
        format!("Pay with M-Pesa - {}", format_kes(total))
    }
}

/// Collaborators injected into the orchestrator
#[derive(Clone)]
pub struct CheckoutContext {
    pub cart_store: Arc<dyn CartStore>,
    pub gateway: BoxedPaymentGateway,
    pub navigator: Arc<dyn Navigator>,
    pub notifier: Arc<dyn Notifier>,
}

/// State machine driver for a single checkout page
pub struct CheckoutOrchestrator {
    session_id: Uuid,
    cart: Vec<CartItem>,
    form: CheckoutForm,
    state: CheckoutState,
    loading: LoadingFlag,
    receipt: Option<CheckoutReceipt>,
    ctx: CheckoutContext,
}

impl CheckoutOrchestrator {
    /// Mount the checkout page: snapshot the cart and start with an empty form.
    ///
    /// An empty cart sends the customer back to the cart page.
    pub fn mount(ctx: CheckoutContext) -> Self {
        let session_id = Uuid::new_v4();
        let cart = ctx.cart_store.cart();

        if cart.is_empty() {
            warn!(%session_id, "Checkout mounted with empty cart");
            ctx.notifier
                .notify(&CheckoutError::EmptyCart.user_message(), NotificationKind::Error);
            ctx.navigator.redirect(CART_PATH);
        } else {
            debug!(%session_id, items = cart.len(), "Checkout mounted");
        }

        Self {
            session_id,
            cart,
            form: CheckoutForm::new(),
            state: CheckoutState::Idle,
            loading: LoadingFlag::default(),
            receipt: None,
            ctx,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    /// Cart snapshot taken at mount (empty after a successful submit)
    pub fn cart(&self) -> &[CartItem] {
        &self.cart
    }

    pub fn form(&self) -> &CheckoutForm {
        &self.form
    }

    /// Update one form field by its input name
    pub fn set_field(&mut self, name: &str, value: &str) -> CheckoutResult<()> {
        self.form.set_field(name, value)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_set()
    }

    /// Handle to observe the loading flag from elsewhere
    pub fn loading_flag(&self) -> LoadingFlag {
        self.loading.clone()
    }

    pub fn receipt(&self) -> Option<&CheckoutReceipt> {
        self.receipt.as_ref()
    }

    pub fn total(&self) -> f64 {
        cart_total(&self.cart)
    }

    pub fn summary(&self) -> OrderSummary {
        OrderSummary::from_items(&self.cart)
    }

    /// Whether the pay button is enabled.
    ///
    /// Disabled methods are also rejected by `submit` itself.
    pub fn can_submit(&self) -> bool {
        !self.is_loading() && self.form.payment_method.is_enabled() && self.state.accepts_submit()
    }

    pub fn submit_label(&self) -> String {
        submit_label(self.total(), self.is_loading())
    }

    pub fn phone_prompt(&self) -> String {
        let phone = if self.form.customer_phone.is_empty() {
            "your phone"
        } else {
            self.form.customer_phone.as_str()
        };
        format!("You will receive an M-Pesa prompt on {}", phone)
    }

    /// "Back to Cart"
    pub fn cancel(&self) {
        info!(session_id = %self.session_id, "Checkout cancelled");
        self.ctx.navigator.redirect(CART_PATH);
    }

    /// Run one submission to completion and return the resulting state.
    ///
    /// Never returns an error: every failure ends in `Failed` with a
    /// notification, and the customer may submit again.
    #[instrument(skip(self), fields(session_id = %self.session_id, method = %self.form.payment_method))]
    pub async fn submit(&mut self) -> &CheckoutState {
        let mut next = Some(CheckoutEvent::Submit);

        while let Some(event) = next.take() {
            let Transition { state, effects } = transition(&self.state, event);

            if effects.is_empty() {
                warn!(state = self.state.as_str(), "Checkout event ignored");
            } else {
                debug!(from = self.state.as_str(), to = state.as_str(), "Checkout transition");
            }
            self.state = state;

            for effect in effects {
                if let Some(event) = self.run_effect(effect).await {
                    next = Some(event);
                }
            }
        }

        &self.state
    }

    async fn run_effect(&mut self, effect: Effect) -> Option<CheckoutEvent> {
        match effect {
            Effect::Validate => Some(match validate(&self.cart, &self.form) {
                Ok(()) => CheckoutEvent::ValidationPassed(self.form.payment_method),
                Err(e) => {
                    info!("Checkout validation failed: {}", e);
                    CheckoutEvent::ValidationFailed(e)
                }
            }),

            Effect::SetLoading(value) => {
                self.loading.set(value);
                None
            }

            Effect::InitiatePayment => {
                let request = PaymentInitiationRequest::from_checkout(&self.cart, &self.form);
                let _loading = self.loading.hold();

                debug!(
                    provider = self.ctx.gateway.provider_name(),
                    items = request.items.len(),
                    "Initiating payment"
                );

                Some(match self.ctx.gateway.initiate(&request).await {
                    Ok(response) => {
                        info!(
                            sale_id = %response.sale_id,
                            transaction_id = %response.transaction_id,
                            "Payment initiated"
                        );
                        self.receipt = Some(CheckoutReceipt::from_response(&response));
                        CheckoutEvent::PaymentInitiated(response)
                    }
                    Err(e) => {
                        error!("Payment initiation failed: {}", e);
                        CheckoutEvent::PaymentFailed(e)
                    }
                })
            }

            Effect::Notify { message, kind } => {
                self.ctx.notifier.notify(&message, kind);
                None
            }

            Effect::ClearCart => {
                self.ctx.cart_store.clear();
                self.cart.clear();
                None
            }

            Effect::Redirect(path) => {
                self.ctx.navigator.redirect(&path);
                None
            }
        }
    }
}
