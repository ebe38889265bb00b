//! Command-line arguments.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use url::Url;
use yagout::{CredentialArgs, RequestDetails, TxnDetails};

use crate::error::CliError;

/// Builds signed YagoutPay checkout forms.
#[derive(Debug, Parser)]
#[command(name = "yagout", version, about)]
pub struct Cli {
    /// Path to the TOML configuration file.
    #[arg(long, global = true, env = "YAGOUT_CONFIG", default_value = "yagout.toml")]
    pub config: PathBuf,

    /// Merchant credentials; override the configuration file.
    #[command(flatten)]
    pub credentials: CredentialArgs,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Build the merchant request and hash, print the form fields as JSON.
    Request {
        /// Order data.
        #[command(flatten)]
        order: OrderArgs,

        /// Also print the plaintext message, hash input and digest.
        #[arg(long)]
        verbose: bool,
    },

    /// Print an HTML page that posts the checkout form to the gateway.
    Form {
        /// Order data.
        #[command(flatten)]
        order: OrderArgs,
    },

    /// Build only the integrity hash.
    Hash {
        /// Order data.
        #[command(flatten)]
        order: OrderArgs,
    },

    /// Decrypt a `merchant_request` or `hash` value with the merchant key.
    Decrypt {
        /// Base64 ciphertext.
        ciphertext: String,
    },
}

/// Order data shared by the signing commands.
///
/// Values are applied in order: the `--input` file, then the shortcut flags,
/// then every `--set`, so later sources win.
#[derive(Debug, Clone, Default, Args)]
pub struct OrderArgs {
    /// JSON file with request details (`{"txn": {...}, "cust": {...}, ...}`).
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Order number. Generated as `ORDER_<unix millis>` when missing.
    #[arg(long)]
    pub order_no: Option<String>,

    /// Amount, sent verbatim.
    #[arg(long)]
    pub amount: Option<String>,

    /// Customer email address.
    #[arg(long)]
    pub email: Option<String>,

    /// Customer mobile number.
    #[arg(long)]
    pub mobile: Option<String>,

    /// Set any field by path, e.g. `--set ship.ship_city=Adama`. Repeatable.
    #[arg(long = "set", value_name = "SECTION.FIELD=VALUE", value_parser = parse_assignment)]
    pub assignments: Vec<(String, String)>,
}

fn parse_assignment(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(path, value)| (path.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| format!("expected SECTION.FIELD=VALUE, got `{s}`"))
}

impl OrderArgs {
    /// Resolves the arguments into request details.
    ///
    /// `base_url` is used for default success and failure URLs; `now_millis`
    /// for a generated order number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input file cannot be read or parsed, if a
    /// `--set` path names an unknown section or field, or if `base_url` is
    /// not a valid URL and a return URL has to be generated.
    pub fn resolve(&self, base_url: &str, now_millis: u128) -> Result<RequestDetails, CliError> {
        let mut details = match &self.input {
            Some(path) => {
                let content = std::fs::read_to_string(path).map_err(|source| CliError::Io {
                    path: path.clone(),
                    source,
                })?;
                serde_json::from_str(&content).map_err(CliError::InvalidInput)?
            }
            None => RequestDetails::default(),
        };

        apply(&mut details.txn.order_no, self.order_no.as_deref());
        apply(&mut details.txn.amount, self.amount.as_deref());
        apply(&mut details.cust.email_id, self.email.as_deref());
        apply(&mut details.cust.mobile_no, self.mobile.as_deref());

        for (path, value) in &self.assignments {
            details.set(path, value.as_str())?;
        }

        fill_order_defaults(&mut details.txn, base_url, now_millis)?;
        Ok(details)
    }
}

fn apply(field: &mut Option<String>, value: Option<&str>) {
    if let Some(value) = value {
        *field = Some(value.to_owned());
    }
}

/// Fills what the merchant site would normally provide: an order number and
/// return URLs pointing back at `base_url`. Query values are form-encoded.
fn fill_order_defaults(
    txn: &mut TxnDetails,
    base_url: &str,
    now_millis: u128,
) -> Result<(), CliError> {
    let order_no = txn
        .order_no
        .get_or_insert_with(|| format!("ORDER_{now_millis}"))
        .clone();
    let amount = txn.amount.clone().unwrap_or_default();

    if txn.success_url.is_none() {
        let url = return_url(
            base_url,
            "success",
            &[("order_no", order_no.as_str()), ("amount", amount.as_str())],
        )?;
        txn.success_url = Some(url.into());
    }
    if txn.failure_url.is_none() {
        let url = return_url(
            base_url,
            "failure",
            &[("order_no", order_no.as_str()), ("reason", "payment_failed")],
        )?;
        txn.failure_url = Some(url.into());
    }
    Ok(())
}

fn return_url(base_url: &str, path: &str, query: &[(&str, &str)]) -> Result<Url, CliError> {
    let raw = format!("{}/{path}", base_url.trim_end_matches('/'));
    let mut url = Url::parse(&raw).map_err(|source| CliError::InvalidBaseUrl {
        url: base_url.to_owned(),
        source,
    })?;
    url.query_pairs_mut().extend_pairs(query);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_request_command() {
        let cli = Cli::try_parse_from([
            "yagout",
            "request",
            "--order-no",
            "ORDER_1",
            "--amount",
            "149",
            "--set",
            "other.udf_1=pro1",
            "--verbose",
        ])
        .unwrap();
        let Command::Request { order, verbose } = cli.command else {
            panic!("expected request command");
        };
        assert!(verbose);
        assert_eq!(order.order_no.as_deref(), Some("ORDER_1"));
        assert_eq!(
            order.assignments,
            vec![("other.udf_1".to_owned(), "pro1".to_owned())]
        );
    }

    #[test]
    fn test_parse_rejects_bad_assignment() {
        let result = Cli::try_parse_from(["yagout", "form", "--set", "txn.amount"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_resolve_fills_order_defaults() {
        let order = OrderArgs {
            amount: Some("149".into()),
            ..Default::default()
        };
        let details = order.resolve("http://localhost:3000/", 1_700_000_000_000).unwrap();
        assert_eq!(details.txn.order_no.as_deref(), Some("ORDER_1700000000000"));
        assert_eq!(
            details.txn.success_url.as_deref(),
            Some("http://localhost:3000/success?order_no=ORDER_1700000000000&amount=149")
        );
        assert_eq!(
            details.txn.failure_url.as_deref(),
            Some("http://localhost:3000/failure?order_no=ORDER_1700000000000&reason=payment_failed")
        );
    }

    #[test]
    fn test_resolve_keeps_explicit_values() {
        let order = OrderArgs {
            order_no: Some("ORDER_1".into()),
            email: Some("buyer@example.et".into()),
            assignments: vec![
                ("txn.success_url".into(), "https://shop/ok".into()),
                ("txn.order_no".into(), "ORDER_2".into()),
            ],
            ..Default::default()
        };
        let details = order.resolve("http://localhost:3000", 0).unwrap();
        assert_eq!(details.txn.order_no.as_deref(), Some("ORDER_2"));
        assert_eq!(details.txn.success_url.as_deref(), Some("https://shop/ok"));
        assert_eq!(details.cust.email_id.as_deref(), Some("buyer@example.et"));
    }

    #[test]
    fn test_resolve_rejects_unknown_field() {
        let order = OrderArgs {
            assignments: vec![("cust.shoe_size".into(), "44".into())],
            ..Default::default()
        };
        let err = order.resolve("http://localhost:3000", 0).unwrap_err();
        assert!(matches!(
            err,
            CliError::Signing(yagout::Error::UnknownField { section: "cust", .. })
        ));
    }

    #[test]
    fn test_resolve_missing_input_file() {
        let order = OrderArgs {
            input: Some(PathBuf::from("/definitely/not/here.json")),
            ..Default::default()
        };
        let err = order.resolve("http://localhost:3000", 0).unwrap_err();
        assert!(matches!(err, CliError::Io { .. }));
    }

    #[test]
    fn test_resolve_encodes_return_url_query() {
        let order = OrderArgs {
            order_no: Some("A&B #1".into()),
            amount: Some("1 000".into()),
            ..Default::default()
        };
        let details = order.resolve("http://localhost:3000", 0).unwrap();
        assert_eq!(
            details.txn.success_url.as_deref(),
            Some("http://localhost:3000/success?order_no=A%26B+%231&amount=1+000")
        );
        assert_eq!(
            details.txn.failure_url.as_deref(),
            Some("http://localhost:3000/failure?order_no=A%26B+%231&reason=payment_failed")
        );

        let success = Url::parse(details.txn.success_url.as_deref().unwrap()).unwrap();
        let pairs: Vec<(String, String)> = success.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            [
                ("order_no".to_owned(), "A&B #1".to_owned()),
                ("amount".to_owned(), "1 000".to_owned()),
            ]
        );
        assert_eq!(success.fragment(), None);
    }

    #[test]
    fn test_resolve_rejects_bad_base_url() {
        let order = OrderArgs {
            order_no: Some("ORDER_1".into()),
            ..Default::default()
        };
        let err = order.resolve("not a url", 0).unwrap_err();
        assert!(matches!(err, CliError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_resolve_skips_base_url_when_urls_given() {
        let order = OrderArgs {
            assignments: vec![
                ("txn.success_url".into(), "https://shop/ok".into()),
                ("txn.failure_url".into(), "https://shop/fail".into()),
            ],
            ..Default::default()
        };
        let details = order.resolve("not a url", 0).unwrap();
        assert_eq!(details.txn.failure_url.as_deref(), Some("https://shop/fail"));
    }
}
