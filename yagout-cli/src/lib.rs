//! Command-line front end for YagoutPay request signing.
//!
//! Turns order data into the hidden form fields the gateway expects, either as
//! JSON or as a self-submitting HTML page, using merchant credentials from the
//! command line, the environment or a configuration file.
//!
//! # Modules
//!
//! - [`args`] - Command-line definition and order data resolution
//! - [`config`] - Configuration file with environment variable expansion
//! - [`error`] - CLI error types

pub mod args;
pub mod config;
pub mod error;

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use yagout::{CheckoutForm, EncryptedHash, EncryptedRequest, HashRequest, MerchantCredentials};

use crate::args::{Cli, Command};
use crate::config::CliConfig;
use crate::error::CliError;

/// Output of `yagout request --verbose`.
#[derive(Debug, Serialize)]
struct VerboseOutput<'a> {
    form: &'a CheckoutForm,
    request: &'a EncryptedRequest,
    hash: &'a EncryptedHash,
}

/// Runs a parsed command line and returns what should be printed to stdout.
///
/// # Errors
///
/// Returns an error if configuration or input cannot be loaded, credentials
/// are missing or invalid, or decryption fails.
pub fn run(cli: Cli) -> Result<String, CliError> {
    let config = CliConfig::load_from(&cli.config)?;
    tracing::debug!(
        path = %cli.config.display(),
        gateway_url = %config.gateway_url,
        "Loaded configuration"
    );

    let (file_id, file_key) = config.credentials();
    let args = cli.credentials.or(file_id, file_key);
    let (Some(merchant_id), Some(merchant_key)) = (args.merchant_id, args.merchant_key) else {
        return Err(CliError::MissingCredentials);
    };
    let credentials = MerchantCredentials::new(merchant_id, &merchant_key)?;

    let now_millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis())
        .unwrap_or_default();

    match cli.command {
        Command::Request { order, verbose } => {
            let details = order.resolve(&config.base_url, now_millis)?;
            let request = credentials.build_request(&details);
            let hash = credentials.build_hash(&HashRequest::from_transaction(&details.txn));
            let form = CheckoutForm::from_parts(config.gateway_url, &request, &hash);
            tracing::info!(
                me_id = %form.me_id,
                order_no = ?details.txn.order_no,
                "Signed checkout request"
            );

            let output = if verbose {
                serde_json::to_string_pretty(&VerboseOutput {
                    form: &form,
                    request: &request,
                    hash: &hash,
                })
            } else {
                serde_json::to_string_pretty(&form)
            };
            output.map_err(CliError::Output)
        }
        Command::Form { order } => {
            let details = order.resolve(&config.base_url, now_millis)?;
            let form = CheckoutForm::build(&credentials, &details, config.gateway_url);
            Ok(form.to_html())
        }
        Command::Hash { order } => {
            let details = order.resolve(&config.base_url, now_millis)?;
            let hash = credentials.build_hash(&HashRequest::from_transaction(&details.txn));
            serde_json::to_string_pretty(&hash).map_err(CliError::Output)
        }
        Command::Decrypt { ciphertext } => Ok(credentials.decrypt(&ciphertext)?),
    }
}
