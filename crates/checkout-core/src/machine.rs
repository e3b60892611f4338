//! # Checkout State Machine
//!
//! Pure transition function for one checkout submission. The function never
//! performs I/O: it returns the next state plus the effects the caller must
//! run, so every path can be tested without a page or a network.
//!
//! ```text
//!   Idle ──submit──► Validating ──invalid──────────────► Failed
//!                       │                                  │
//!                       ├──ok, cash/card─────────────────► Failed
//!                       │                                  │
//!                       └──ok, mpesa──► Submitting ──err─► Failed
//!                                          │               │
//!                                          └──ok──► Succeeded
//!   Failed ──submit──► Validating
//! ```

use crate::cart::Identifier;
use crate::error::CheckoutError;
use crate::form::PaymentMethod;
use crate::payment::PaymentInitiationResponse;
use crate::store::{pending_order_path, NotificationKind};

/// Toast shown once the STK push has been sent
pub const MPESA_PROMPT_SENT: &str = "M-Pesa prompt sent. Check your phone and enter PIN.";

/// Lifecycle of a checkout submission
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutState {
    /// Waiting for the customer to submit
    Idle,
    /// Running the validation rules
    Validating,
    /// Payment request in flight
    Submitting,
    /// Payment initiated; the session ends by navigating to the order page
    Succeeded { sale_id: Identifier },
    /// Last attempt failed; the customer may resubmit
    Failed { reason: CheckoutError },
}

impl CheckoutState {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::Validating => "validating",
            CheckoutState::Submitting => "submitting",
            CheckoutState::Succeeded { .. } => "succeeded",
            CheckoutState::Failed { .. } => "failed",
        }
    }

    /// Whether a submit event would be accepted
    pub fn accepts_submit(&self) -> bool {
        matches!(self, CheckoutState::Idle | CheckoutState::Failed { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, CheckoutState::Succeeded { .. })
    }

    /// Failure reason, if the last attempt failed
    pub fn failure(&self) -> Option<&CheckoutError> {
        match self {
            CheckoutState::Failed { reason } => Some(reason),
            _ => None,
        }
    }
}

impl Default for CheckoutState {
    fn default() -> Self {
        CheckoutState::Idle
    }
}

/// Inputs to the state machine
#[derive(Debug, Clone, PartialEq)]
pub enum CheckoutEvent {
    /// Customer pressed the pay button
    Submit,
    /// Validation rejected the cart or form
    ValidationFailed(CheckoutError),
    /// Validation passed for the selected method
    ValidationPassed(PaymentMethod),
    /// Gateway accepted the payment
    PaymentInitiated(PaymentInitiationResponse),
    /// Gateway call failed
    PaymentFailed(CheckoutError),
}

/// Work requested by a transition
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Evaluate the validation rules and feed the result back
    Validate,
    /// Raise or clear the loading indicator
    SetLoading(bool),
    /// Call the payment gateway and feed the result back
    InitiatePayment,
    Notify {
        message: String,
        kind: NotificationKind,
    },
    ClearCart,
    Redirect(String),
}

impl Effect {
    fn error(reason: &CheckoutError) -> Self {
        Effect::Notify {
            message: reason.user_message(),
            kind: NotificationKind::Error,
        }
    }
}

/// Result of applying one event
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: CheckoutState,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn to(state: CheckoutState, effects: Vec<Effect>) -> Self {
        Self { state, effects }
    }

    fn fail(reason: CheckoutError) -> Self {
        let effects = vec![Effect::SetLoading(false), Effect::error(&reason)];
        Self::to(CheckoutState::Failed { reason }, effects)
    }

    /// Event not valid in this state: nothing changes
    fn ignored(state: &CheckoutState) -> Self {
        Self::to(state.clone(), Vec::new())
    }

    /// Returns true if the event was dropped
    pub fn is_noop(&self) -> bool {
        self.effects.is_empty()
    }
}

/// Apply `event` to `state`
pub fn transition(state: &CheckoutState, event: CheckoutEvent) -> Transition {
    match (state, event) {
        (CheckoutState::Idle | CheckoutState::Failed { .. }, CheckoutEvent::Submit) => {
            Transition::to(CheckoutState::Validating, vec![Effect::Validate])
        }

        (CheckoutState::Validating, CheckoutEvent::ValidationFailed(reason)) => {
            Transition::fail(reason)
        }

        (CheckoutState::Validating, CheckoutEvent::ValidationPassed(method)) => match method {
            PaymentMethod::Mpesa => Transition::to(
                CheckoutState::Submitting,
                vec![Effect::SetLoading(true), Effect::InitiatePayment],
            ),
            PaymentMethod::Cash | PaymentMethod::Card => {
                Transition::fail(CheckoutError::UnsupportedMethod(method))
            }
        },

        (CheckoutState::Submitting, CheckoutEvent::PaymentInitiated(response)) => {
            let redirect = pending_order_path(&response.sale_id);
            Transition::to(
                CheckoutState::Succeeded {
                    sale_id: response.sale_id,
                },
                vec![
                    Effect::SetLoading(false),
                    Effect::Notify {
                        message: MPESA_PROMPT_SENT.to_string(),
                        kind: NotificationKind::Success,
                    },
                    Effect::ClearCart,
                    Effect::Redirect(redirect),
                ],
            )
        }

        (CheckoutState::Submitting, CheckoutEvent::PaymentFailed(reason)) => {
            Transition::fail(reason)
        }

        (state, _) => Transition::ignored(state),
    }
}
