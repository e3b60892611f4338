//! # Checkout CLI
//!
//! Drive the storefront checkout from a terminal.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export CHECKOUT_API_BASE_URL=https://shop.example.co.ke/api
//! export CHECKOUT_ACCESS_TOKEN=eyJhbGciOi...
//!
//! # Pay for the cart with M-Pesa
//! checkout pay --cart cart.toml --name "Wanjiku Kamau" \
//!     --phone 0712345678 --address "Kenyatta Ave, Nairobi"
//!
//! # Check on the STK push afterwards
//! checkout sale 55
//! ```

use checkout_cli::commands::{self, PayArgs};
use checkout_cli::state::AppState;
use checkout_core::PaymentMethod;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

#[derive(Parser)]
#[command(name = "checkout")]
#[command(author, version, about = "Storefront checkout with M-Pesa")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit the cart for payment
    Pay {
        /// Cart file (TOML, `[[items]]` tables)
        #[arg(short, long)]
        cart: PathBuf,

        /// Customer full name
        #[arg(short, long)]
        name: String,

        /// M-Pesa phone number (0712345678)
        #[arg(short, long)]
        phone: String,

        /// Delivery address
        #[arg(short, long)]
        address: String,

        /// Email (optional)
        #[arg(short, long)]
        email: Option<String>,

        /// Delivery notes (optional)
        #[arg(long)]
        notes: Option<String>,

        /// Payment method (`mpesa`, `cash`, `card`)
        #[arg(short, long, default_value = "mpesa", value_parser = parse_method)]
        method: PaymentMethod,
    },
    /// Print the order summary for a cart file
    Total {
        #[arg(short, long)]
        cart: PathBuf,
    },
    /// Look up a payment by M-Pesa checkout request id
    Status { checkout_request_id: String },
    /// Look up the payment for a sale
    Sale { sale_id: String },
    /// List payments
    Payments,
}

fn parse_method(raw: &str) -> Result<PaymentMethod, String> {
    raw.parse().map_err(|e: checkout_core::CheckoutError| e.to_string())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so command output stays clean)
    let fmt_layer = if cli.json_logs {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer().with_writer(std::io::stderr).boxed()
    };
    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let ok = run(cli.command).await?;
    if !ok {
        std::process::exit(1);
    }

    Ok(())
}

async fn run(command: Commands) -> anyhow::Result<bool> {
    if let Commands::Total { cart } = command {
        return commands::total(cart);
    }

    let state = AppState::new()?;
    tracing::debug!("Backend: {}", state.config.api.base_url);

    match command {
        Commands::Pay {
            cart,
            name,
            phone,
            address,
            email,
            notes,
            method,
        } => {
            commands::pay(
                &state,
                PayArgs {
                    cart,
                    name,
                    phone,
                    address,
                    email,
                    notes,
                    method,
                },
            )
            .await
        }
        Commands::Status {
            checkout_request_id,
        } => commands::status(&state, &checkout_request_id).await,
        Commands::Sale { sale_id } => commands::sale(&state, &sale_id).await,
        Commands::Payments => commands::payments(&state).await,
        Commands::Total { cart } => commands::total(cart),
    }
}
