//! # Commands
//!
//! One function per subcommand. Each returns whether the command succeeded
//! so `main` can pick the exit code.

use crate::cart_file::TomlCartStore;
use crate::console::{ConsoleNavigator, ConsoleNotifier};
use crate::state::AppState;
use checkout_core::{
    format_kes, CheckoutContext, CheckoutOrchestrator, CheckoutState, Identifier, OrderSummary,
    Payment, PaymentMethod,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};

/// Customer input for `checkout pay`
#[derive(Debug, Clone)]
pub struct PayArgs {
    pub cart: PathBuf,
    pub name: String,
    pub phone: String,
    pub address: String,
    pub email: Option<String>,
    pub notes: Option<String>,
    pub method: PaymentMethod,
}

/// Run one checkout session against the backend
#[instrument(skip(state, args), fields(cart = %args.cart.display(), method = %args.method))]
pub async fn pay(state: &AppState, args: PayArgs) -> anyhow::Result<bool> {
    let cart_store = TomlCartStore::new(&args.cart);
    cart_store.load()?;

    let navigator = Arc::new(ConsoleNavigator::default());

    let mut checkout = CheckoutOrchestrator::mount(CheckoutContext {
        cart_store: Arc::new(cart_store),
        gateway: Arc::new(state.gateway.clone()),
        navigator: navigator.clone(),
        notifier: Arc::new(ConsoleNotifier),
    });

    // Mount already sent the customer back to the cart
    if checkout.cart().is_empty() {
        return Ok(false);
    }

    print_summary(&checkout.summary());

    checkout.set_field("customer_name", &args.name)?;
    checkout.set_field("customer_phone", &args.phone)?;
    checkout.set_field("delivery_address", &args.address)?;
    checkout.set_field("customer_email", args.email.as_deref().unwrap_or_default())?;
    checkout.set_field("notes", args.notes.as_deref().unwrap_or_default())?;
    checkout.set_field("payment_method", args.method.as_str())?;

    if !checkout.can_submit() {
        info!("{} is not available yet; submitting anyway", args.method.display_name());
    }
    println!("{}", checkout.phone_prompt());
    println!("{}", checkout.submit_label());

    let succeeded = matches!(checkout.submit().await, CheckoutState::Succeeded { .. });

    if let Some(receipt) = checkout.receipt() {
        println!("Sale:        {}", receipt.sale_id);
        println!("Transaction: {}", receipt.transaction_id);
        println!("Status:      {}", receipt.status);
    }
    if let Some(path) = navigator.last_redirect() {
        info!("Session ended at {}", path);
    }

    Ok(succeeded)
}

/// Print the total of a cart file
pub fn total(cart: PathBuf) -> anyhow::Result<bool> {
    let items = TomlCartStore::new(cart).load()?;
    print_summary(&OrderSummary::from_items(&items));
    Ok(!items.is_empty())
}

/// Look up a payment by checkout request id
pub async fn status(state: &AppState, checkout_request_id: &str) -> anyhow::Result<bool> {
    let payment = state.gateway.payment_status(checkout_request_id).await?;
    print_payment(&payment);
    Ok(true)
}

/// Look up the payment for a sale
pub async fn sale(state: &AppState, sale_id: &str) -> anyhow::Result<bool> {
    let payment = state.gateway.payment_for_sale(&parse_identifier(sale_id)).await?;
    print_payment(&payment);
    Ok(true)
}

/// List payments
pub async fn payments(state: &AppState) -> anyhow::Result<bool> {
    let payments = state.gateway.payments().await?;
    if payments.is_empty() {
        println!("No payments");
    }
    for payment in &payments {
        print_payment(payment);
    }
    Ok(true)
}

/// Numeric ids go out as numbers, anything else as text
pub fn parse_identifier(raw: &str) -> Identifier {
    raw.parse::<u64>()
        .map(Identifier::Number)
        .unwrap_or_else(|_| Identifier::Text(raw.to_string()))
}

fn print_summary(summary: &OrderSummary) {
    println!("Order Summary");
    for line in &summary.lines {
        println!(
            "  {} × {}  {}",
            line.product_name,
            line.quantity,
            format_kes(line.line_total)
        );
    }
    println!("Total: {}", format_kes(summary.total));
}

fn print_payment(payment: &Payment) {
    println!(
        "#{}  {:?}  {}  tx={}  checkout_request={}  at {}",
        payment.id,
        payment.status,
        format_kes(payment.amount),
        payment.transaction_id.as_deref().unwrap_or("-"),
        payment.checkout_request_id.as_deref().unwrap_or("-"),
        payment.created_at.to_rfc3339()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use checkout_mpesa::ApiConfig;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn state_for(server: &MockServer) -> AppState {
        AppState::with_config(AppConfig {
            api: ApiConfig::new(server.uri()),
            token_file: None,
        })
        .unwrap()
    }

    fn write_cart(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!("{}-{}.toml", name, std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cart_file(name: &str) -> PathBuf {
        write_cart(
            name,
            "[[items]]\nproduct_id = \"p1\"\nproduct_name = \"Maize Flour\"\nquantity = 2\nunit_price = 100.0\n",
        )
    }

    fn args(cart: PathBuf, method: PaymentMethod) -> PayArgs {
        PayArgs {
            cart,
            name: "Njeri Mwangi".into(),
            phone: "0712345678".into(),
            address: "Thika Rd, Nairobi".into(),
            email: None,
            notes: Some("Call at the gate".into()),
            method,
        }
    }

    #[test]
    fn test_parse_identifier() {
        assert_eq!(parse_identifier("55"), Identifier::Number(55));
        assert_eq!(parse_identifier("S-55"), Identifier::Text("S-55".into()));
    }

    #[tokio::test]
    async fn test_pay_success_clears_cart_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/payments/create-payment/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "ok",
                "sale_id": 55,
                "transaction_id": "tx1",
                "status": "pending"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cart = cart_file("cli-pay-ok");
        let ok = pay(&state_for(&server), args(cart.clone(), PaymentMethod::Mpesa))
            .await
            .unwrap();

        assert!(ok);
        assert!(TomlCartStore::new(&cart).load().unwrap().is_empty());
        std::fs::remove_file(cart).unwrap();
    }

    #[tokio::test]
    async fn test_pay_with_card_makes_no_request() {
        let server = MockServer::start().await;

        let cart = cart_file("cli-pay-card");
        let ok = pay(&state_for(&server), args(cart.clone(), PaymentMethod::Card))
            .await
            .unwrap();

        assert!(!ok);
        assert!(server.received_requests().await.unwrap().is_empty());
        assert_eq!(TomlCartStore::new(&cart).load().unwrap().len(), 1);
        std::fs::remove_file(cart).unwrap();
    }

    #[tokio::test]
    async fn test_pay_with_malformed_cart_file_errors() {
        let server = MockServer::start().await;

        let cart = write_cart(
            "cli-pay-malformed",
            "[[items]]\nproduct_id = \"p1\"\nproduct_name = \"Tea\"\nquantity = \"two\"\nunit_price = 80.0\n",
        );
        let err = pay(&state_for(&server), args(cart.clone(), PaymentMethod::Mpesa))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse"));
        assert!(server.received_requests().await.unwrap().is_empty());
        std::fs::remove_file(cart).unwrap();
    }

    #[tokio::test]
    async fn test_pay_with_empty_cart_stops_at_redirect() {
        let server = MockServer::start().await;

        let cart = write_cart("cli-pay-empty", "items = []\n");
        let ok = pay(&state_for(&server), args(cart.clone(), PaymentMethod::Mpesa))
            .await
            .unwrap();

        assert!(!ok);
        assert!(server.received_requests().await.unwrap().is_empty());
        std::fs::remove_file(cart).unwrap();
    }
}
