//! # Payment Types
//!
//! Request/response contract for the payment-initiation endpoint, plus the
//! payment record returned by the read-only lookup endpoints.

use crate::cart::{CartItem, Identifier};
use crate::form::CheckoutForm;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One cart line as sent to the backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentItem {
    pub product: Identifier,
    pub quantity: u32,
    pub price_at_sale: f64,
}

impl From<&CartItem> for PaymentItem {
    fn from(item: &CartItem) -> Self {
        Self {
            product: item.product_id.clone(),
            quantity: item.quantity,
            price_at_sale: item.unit_price,
        }
    }
}

/// Body of `POST /payments/create-payment/`.
///
/// Creates the sale and sends the M-Pesa STK push in one backend call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInitiationRequest {
    pub phone_number: String,
    pub shipping_address: String,
    pub items: Vec<PaymentItem>,
    /// Attach the payment to an existing sale instead of creating one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sale_id: Option<Identifier>,
}

impl PaymentInitiationRequest {
    /// Project the cart snapshot and form into a request.
    /// Items map 1:1 and keep cart order.
    pub fn from_checkout(cart: &[CartItem], form: &CheckoutForm) -> Self {
        Self {
            phone_number: form.customer_phone.clone(),
            shipping_address: form.delivery_address.clone(),
            items: cart.iter().map(PaymentItem::from).collect(),
            sale_id: None,
        }
    }

    /// Builder: target an existing sale
    pub fn with_sale_id(mut self, sale_id: impl Into<Identifier>) -> Self {
        self.sale_id = Some(sale_id.into());
        self
    }
}

/// Response of `POST /payments/create-payment/`.
///
/// `sale_id` and `transaction_id` are both required: a body missing either
/// fails to parse, so a sale is never observed without its payment attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentInitiationResponse {
    pub message: String,
    pub sale_id: Identifier,
    pub transaction_id: String,
    pub status: String,
}

/// Payment status as reported by the backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Success,
    Failed,
}

impl PaymentStatus {
    /// Returns true once the backend has a final answer
    pub fn is_final(&self) -> bool {
        !matches!(self, PaymentStatus::Pending)
    }
}

/// Payment record returned by the lookup endpoints
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    pub id: Identifier,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub merchant_request_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checkout_request_id: Option<String>,

    pub amount: f64,

    pub status: PaymentStatus,

    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_projection_preserves_order() {
        let cart = vec![
            CartItem::new("p1", "Maize Flour", 2, 100.0),
            CartItem::new(9, "Milk", 1, 60.0),
            CartItem::new("p3", "Bread", 4, 55.0),
        ];
        let form = CheckoutForm::new()
            .with_phone("0712345678")
            .with_address("Kisumu");

        let request = PaymentInitiationRequest::from_checkout(&cart, &form);

        assert_eq!(request.items.len(), cart.len());
        for (item, line) in request.items.iter().zip(&cart) {
            assert_eq!(item.product, line.product_id);
            assert_eq!(item.quantity, line.quantity);
            assert_eq!(item.price_at_sale, line.unit_price);
        }
        assert_eq!(request.phone_number, "0712345678");
        assert_eq!(request.shipping_address, "Kisumu");
    }

    #[test]
    fn test_sale_id_omitted_when_absent() {
        let request = PaymentInitiationRequest::from_checkout(
            &[CartItem::new("p1", "Maize Flour", 2, 100.0)],
            &CheckoutForm::new().with_phone("0712345678").with_address("Nakuru"),
        );
        let value = serde_json::to_value(&request).unwrap();
        assert!(value.get("sale_id").is_none());

        let value = serde_json::to_value(request.with_sale_id(12)).unwrap();
        assert_eq!(value["sale_id"], json!(12));
    }

    #[test]
    fn test_response_requires_both_ids() {
        let ok: PaymentInitiationResponse = serde_json::from_value(json!({
            "message": "ok",
            "sale_id": 55,
            "transaction_id": "tx1",
            "status": "pending"
        }))
        .unwrap();
        assert_eq!(ok.sale_id, Identifier::Number(55));

        let missing_tx = serde_json::from_value::<PaymentInitiationResponse>(json!({
            "message": "ok",
            "sale_id": 55,
            "status": "pending"
        }));
        assert!(missing_tx.is_err());
    }

    #[test]
    fn test_payment_record() {
        let payment: Payment = serde_json::from_value(json!({
            "id": 3,
            "checkout_request_id": "ws_CO_123",
            "amount": 200.0,
            "status": "success",
            "created_at": "2025-01-05T10:00:00Z"
        }))
        .unwrap();

        assert_eq!(payment.status, PaymentStatus::Success);
        assert!(payment.status.is_final());
        assert!(payment.transaction_id.is_none());
        assert!(!PaymentStatus::Pending.is_final());
    }
}
