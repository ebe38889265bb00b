//! CLI configuration.
//!
//! Loads configuration from a TOML file with support for environment variable
//! expansion in string values. Variables use `$VAR` or `${VAR}` syntax.
//!
//! # Example Configuration
//!
//! ```toml
//! merchant_id = "$MERCHANT_ID"
//! merchant_key = "${MERCHANT_KEY}"
//! gateway_url = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/paymentRedirection/checksumGatewayPage"
//! base_url = "https://shop.example.com"
//! ```
//!
//! # Environment Variables
//!
//! - `YAGOUT_CONFIG` - Path to configuration file (default: `yagout.toml`)
//! - `YAGOUT_UAT_URL` - Override the gateway checkout URL
//! - `BASE_URL` - Override the base URL used for success/failure return URLs
//! - `MERCHANT_ID` / `MERCHANT_KEY` - Read by the command line itself and take
//!   precedence over the file

use std::path::Path;

use serde::{Deserialize, Serialize};
use yagout::UAT_CHECKOUT_URL;

use crate::error::CliError;

/// Top-level CLI configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Merchant id issued by the gateway.
    #[serde(default)]
    pub merchant_id: Option<String>,

    /// Base64-encoded merchant key.
    #[serde(default)]
    pub merchant_key: Option<String>,

    /// Gateway checkout endpoint the form posts to.
    #[serde(default = "default_gateway_url")]
    pub gateway_url: String,

    /// Base URL of the merchant site, used for default return URLs.
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_gateway_url() -> String {
    UAT_CHECKOUT_URL.to_owned()
}

fn default_base_url() -> String {
    "http://localhost:3000".to_owned()
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            merchant_id: None,
            merchant_key: None,
            gateway_url: default_gateway_url(),
            base_url: default_base_url(),
        }
    }
}

impl std::fmt::Debug for CliConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CliConfig")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &self.merchant_key.as_ref().map(|_| "<redacted>"))
            .field("gateway_url", &self.gateway_url)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl CliConfig {
    /// Loads configuration from a specific file path.
    ///
    /// A missing file is not an error: defaults are used and credentials must
    /// come from the command line or environment. `YAGOUT_UAT_URL` and
    /// `BASE_URL` override the file values.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, CliError> {
        let content = if path.exists() {
            std::fs::read_to_string(path).map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?
        } else {
            String::new()
        };

        let mut config = Self::from_toml_str(&content)?;

        if let Ok(url) = std::env::var("YAGOUT_UAT_URL") {
            config.gateway_url = url;
        }
        if let Ok(url) = std::env::var("BASE_URL") {
            config.base_url = url;
        }

        Ok(config)
    }

    /// Parses configuration from TOML text after expanding `$VAR` references.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML for this schema.
    pub fn from_toml_str(content: &str) -> Result<Self, CliError> {
        let expanded = expand_env_vars(content);
        Ok(toml::from_str(&expanded)?)
    }

    /// Returns the configured merchant id and key.
    ///
    /// Empty values and `$VAR` references that did not resolve count as unset.
    #[must_use]
    pub fn credentials(&self) -> (Option<String>, Option<String>) {
        (
            resolved(self.merchant_id.as_deref()),
            resolved(self.merchant_key.as_deref()),
        )
    }
}

fn resolved(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty() && !v.starts_with('$'))
        .map(str::to_owned)
}

/// Expands `$VAR` and `${VAR}` patterns in a string from environment variables.
///
/// Unresolved variables, empty names and unterminated `${` are copied through
/// unchanged.
fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '$' {
            result.push(ch);
            continue;
        }

        let braced = chars.next_if_eq(&'{').is_some();
        let mut var_name = String::new();
        let mut terminated = !braced;
        while let Some(&c) = chars.peek() {
            if braced {
                chars.next();
                if c == '}' {
                    terminated = true;
                    break;
                }
            } else if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            } else {
                chars.next();
            }
            var_name.push(c);
        }

        let value = if terminated && !var_name.is_empty() {
            std::env::var(&var_name).ok()
        } else {
            None
        };
        match value {
            Some(val) => result.push_str(&val),
            None if braced => {
                result.push_str("${");
                result.push_str(&var_name);
                if terminated {
                    result.push('}');
                }
            }
            None => {
                result.push('$');
                result.push_str(&var_name);
            }
        }
    }

    result
}
