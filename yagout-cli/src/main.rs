//! YagoutPay checkout signing CLI.
//!
//! # Usage
//!
//! ```bash
//! # Print the signed form fields for an order
//! MERCHANT_ID=... MERCHANT_KEY=... yagout request --order-no ORDER_1 --amount 149
//!
//! # Write a self-submitting checkout page
//! yagout form --input order.json > checkout.html
//!
//! # Inspect a merchant_request value
//! yagout decrypt "URB89MD3aR749XscFzWgIx..."
//!
//! # Configure logging level
//! RUST_LOG=debug yagout hash --order-no ORDER_1 --amount 149
//! ```
//!
//! # Environment Variables
//!
//! - `MERCHANT_ID` - Merchant id issued by the gateway
//! - `MERCHANT_KEY` - Base64-encoded 32-byte merchant key
//! - `YAGOUT_CONFIG` - Path to TOML configuration file (default: `yagout.toml`)
//! - `YAGOUT_UAT_URL` - Override the gateway checkout URL
//! - `BASE_URL` - Base URL for default return URLs (default: `http://localhost:3000`)
//! - `RUST_LOG` - Log level filter (default: `info`)
//!
//! Variables may also be placed in a `.env` file in the working directory.

use std::io::Write;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use yagout_cli::args::Cli;

fn main() {
    dotenvy::dotenv().ok();

    // Logs go to stderr so stdout stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output = match yagout_cli::run(cli) {
        Ok(output) => output,
        Err(e) => {
            tracing::error!("yagout failed: {e}");
            std::process::exit(1);
        }
    };

    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{output}") {
        tracing::error!("Failed to write output: {e}");
        std::process::exit(1);
    }
}
