//! Checkout redirect form.
//!
//! The gateway is reached by a browser POST of three hidden fields (`me_id`,
//! `merchant_request`, `hash`) to its redirection endpoint. [`CheckoutForm`]
//! holds those fields and renders the self-submitting HTML page that performs
//! the POST.

use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::credentials::MerchantCredentials;
use crate::hash::{EncryptedHash, HashRequest};
use crate::request::{EncryptedRequest, RequestDetails};

/// Checkout redirection endpoint of the gateway's UAT environment.
pub const UAT_CHECKOUT_URL: &str = "https://uatcheckout.yagoutpay.com/ms-transaction-core-1-0/paymentRedirection/checksumGatewayPage";

/// The hidden form fields posted to the gateway, plus the form action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutForm {
    /// Gateway endpoint the form posts to.
    pub action: String,
    /// Plaintext merchant id.
    pub me_id: String,
    /// Encrypted merchant request.
    pub merchant_request: String,
    /// Encrypted integrity hash.
    pub hash: String,
}

impl CheckoutForm {
    /// Builds the request and its hash and collects the form fields.
    ///
    /// The hash covers the order number, amount, country and currency of the
    /// transaction section, see [`HashRequest::from_transaction`].
    #[must_use]
    #[cfg_attr(
        feature = "telemetry",
        instrument(
            name = "yagout.checkout_form",
            skip_all,
            fields(me_id = %credentials.merchant_id(), order_no = ?details.txn.order_no)
        )
    )]
    pub fn build(
        credentials: &MerchantCredentials,
        details: &RequestDetails,
        action: impl Into<String>,
    ) -> Self {
        let request = credentials.build_request(details);
        let hash = credentials.build_hash(&HashRequest::from_transaction(&details.txn));

        #[cfg(feature = "telemetry")]
        tracing::info!("Built checkout form");

        Self::from_parts(action, &request, &hash)
    }

    /// Assembles the form from separately built request and hash.
    #[must_use]
    pub fn from_parts(
        action: impl Into<String>,
        request: &EncryptedRequest,
        hash: &EncryptedHash,
    ) -> Self {
        Self {
            action: action.into(),
            me_id: request.me_id.clone(),
            merchant_request: request.merchant_request.clone(),
            hash: hash.hash.clone(),
        }
    }

    /// Returns the hidden fields as `(name, value)` pairs in form order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("me_id", self.me_id.as_str()),
            ("merchant_request", self.merchant_request.as_str()),
            ("hash", self.hash.as_str()),
        ]
    }

    /// Renders an HTML page that posts the form as soon as it loads.
    ///
    /// Browsers without scripting get a "Continue" button instead.
    #[must_use]
    pub fn to_html(&self) -> String {
        let inputs: String = self
            .fields()
            .iter()
            .map(|(name, value)| {
                format!(
                    "      <input type=\"hidden\" name=\"{name}\" value=\"{}\" />\n",
                    escape_html(value)
                )
            })
            .collect();
        format!(
            r#"<!doctype html>
<html>
  <body>
    <form id="gatewayForm" method="POST" action="{action}">
{inputs}      <noscript><button type="submit">Continue</button></noscript>
    </form>
    <script>document.getElementById('gatewayForm').submit();</script>
  </body>
</html>
"#,
            action = escape_html(&self.action),
        )
    }
}

/// Escapes a value for use inside a double-quoted HTML attribute.
fn escape_html(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
