//! # M-Pesa Gateway
//!
//! Binds the request client to the backend's M-Pesa endpoints.
//! `initiate` creates the sale and sends the STK push in a single call.

use crate::client::{RequestClient, RequestOptions};
use crate::config::ApiConfig;
use crate::token::EnvTokenStore;
use async_trait::async_trait;
use checkout_core::{
    CheckoutResult, Identifier, Payment, PaymentGateway, PaymentInitiationRequest,
    PaymentInitiationResponse,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Creates the sale and initiates the M-Pesa payment
pub const CREATE_PAYMENT_ENDPOINT: &str = "/payments/create-payment/";

/// Payment list endpoint
pub const PAYMENTS_ENDPOINT: &str = "/payments/";

pub fn payment_status_endpoint(checkout_request_id: &str) -> String {
    format!("/payments/status/{}/", checkout_request_id)
}

pub fn sale_payment_endpoint(sale_id: &Identifier) -> String {
    format!("/payments/sale/{}/", sale_id)
}

/// M-Pesa payment gateway
#[derive(Clone)]
pub struct MpesaGateway {
    client: RequestClient,
}

impl MpesaGateway {
    pub fn new(client: RequestClient) -> Self {
        Self { client }
    }

    /// Create from environment variables, reading the token from the environment
    pub fn from_env() -> CheckoutResult<Self> {
        let config = ApiConfig::from_env()?;
        let client = RequestClient::new(config, Arc::new(EnvTokenStore))?;
        Ok(Self::new(client))
    }

    /// Look up a payment by the STK push `checkout_request_id`
    #[instrument(skip(self))]
    pub async fn payment_status(&self, checkout_request_id: &str) -> CheckoutResult<Payment> {
        self.client
            .request(&payment_status_endpoint(checkout_request_id), RequestOptions::get())
            .await
    }

    /// Look up the payment attached to a sale
    #[instrument(skip(self, sale_id), fields(sale_id = %sale_id))]
    pub async fn payment_for_sale(&self, sale_id: &Identifier) -> CheckoutResult<Payment> {
        self.client
            .request(&sale_payment_endpoint(sale_id), RequestOptions::get())
            .await
    }

    /// List the customer's payments
    #[instrument(skip(self))]
    pub async fn payments(&self) -> CheckoutResult<Vec<Payment>> {
        self.client
            .request(PAYMENTS_ENDPOINT, RequestOptions::get())
            .await
    }
}

#[async_trait]
impl PaymentGateway for MpesaGateway {
    #[instrument(skip(self, request), fields(items = request.items.len()))]
    async fn initiate(
        &self,
        request: &PaymentInitiationRequest,
    ) -> CheckoutResult<PaymentInitiationResponse> {
        let response: PaymentInitiationResponse = self
            .client
            .request(CREATE_PAYMENT_ENDPOINT, RequestOptions::post_json(request)?)
            .await?;

        info!(
            "M-Pesa payment initiated: sale_id={}, transaction_id={}, status={}",
            response.sale_id, response.transaction_id, response.status
        );

        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "mpesa"
    }
}
