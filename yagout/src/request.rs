//! Merchant request builder.
//!
//! Collects the nine sections of a checkout request, serializes each one in its
//! fixed field order, joins them with `~` and encrypts the result under the
//! merchant key. The ciphertext is posted to the gateway as `merchant_request`.

use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::cipher::MerchantKey;
use crate::error::{Error, Result};
use crate::section::{
    BillingDetails, CardDetails, CustomerDetails, FieldLookup, ItemDetails, OtherDetails,
    PgDetails, SECTION_DELIMITER, Section, ShippingDetails, TxnDetails, UpiDetails,
    serialize_section,
};

/// Caller-supplied data for every section of a merchant request.
///
/// Every field of every section is optional; absent fields take the section
/// defaults when the message is built. The record is only read, never
/// modified, by the builder.
///
/// # Example
///
/// ```rust
/// use yagout::request::RequestDetails;
/// use yagout::section::TxnDetails;
///
/// let details = RequestDetails::new(TxnDetails {
///     order_no: Some("ORDER_1".into()),
///     amount: Some("149".into()),
///     ..Default::default()
/// });
///
/// let message = details.full_message("TESTID");
/// assert!(message.starts_with("yagout|TESTID|ORDER_1|149|ETH|ETB|SALE|||WEB~"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDetails {
    /// Transaction section.
    pub txn: TxnDetails,
    /// Payment-gateway section.
    pub pg: PgDetails,
    /// Card section.
    pub card: CardDetails,
    /// Customer section.
    pub cust: CustomerDetails,
    /// Billing section.
    pub bill: BillingDetails,
    /// Shipping section.
    pub ship: ShippingDetails,
    /// Item section.
    pub item: ItemDetails,
    /// UPI section, always sent empty.
    pub upi: UpiDetails,
    /// User-defined fields.
    pub other: OtherDetails,
}

/// The encrypted merchant request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedRequest {
    /// Merchant id, sent in plaintext next to the ciphertext.
    pub me_id: String,
    /// Base64 AES-256-CBC ciphertext of [`full_message`](Self::full_message).
    pub merchant_request: String,
    /// The plaintext message. Kept for diagnostics; never sent to the gateway.
    pub full_message: String,
}

/// Transaction section as seen by the builder: `me_id` falls back to the
/// merchant id of the call instead of an empty string.
struct MerchantTxn<'a> {
    txn: &'a TxnDetails,
    merchant_id: &'a str,
}

impl FieldLookup for MerchantTxn<'_> {
    fn lookup(&self, name: &str) -> Option<&str> {
        match name {
            "me_id" => Some(self.txn.me_id.as_deref().unwrap_or(self.merchant_id)),
            _ => self.txn.lookup(name),
        }
    }
}

impl RequestDetails {
    /// Creates request details with only the transaction section filled in.
    #[must_use]
    pub fn new(txn: TxnDetails) -> Self {
        Self {
            txn,
            ..Self::default()
        }
    }

    /// Sets the customer section.
    #[must_use]
    pub fn with_customer(mut self, cust: CustomerDetails) -> Self {
        self.cust = cust;
        self
    }

    /// Sets the user-defined fields.
    #[must_use]
    pub fn with_other(mut self, other: OtherDetails) -> Self {
        self.other = other;
        self
    }

    /// Assigns a field by dotted path, e.g. `txn.order_no` or `cust.email_id`.
    ///
    /// Section prefixes are `txn`, `pg`, `card`, `cust`, `bill`, `ship`, `item`,
    /// `upi` and `other`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownSection`] for a path without a known section
    /// prefix and [`Error::UnknownField`] for a field the section does not have.
    pub fn set(&mut self, path: &str, value: impl Into<String>) -> Result<()> {
        let (section, field) = path
            .split_once('.')
            .ok_or_else(|| Error::UnknownSection(path.to_owned()))?;
        let value = value.into();
        match section {
            "txn" => self.txn.set(field, value),
            "pg" => self.pg.set(field, value),
            "card" => self.card.set(field, value),
            "cust" => self.cust.set(field, value),
            "bill" => self.bill.set(field, value),
            "ship" => self.ship.set(field, value),
            "item" => self.item.set(field, value),
            "upi" => self.upi.set(field, value),
            "other" => self.other.set(field, value),
            _ => Err(Error::UnknownSection(section.to_owned())),
        }
    }

    /// Builds the plaintext message: the nine sections, merged over their
    /// defaults, joined with `~` in wire order.
    #[must_use]
    pub fn full_message(&self, merchant_id: &str) -> String {
        let txn = MerchantTxn {
            txn: &self.txn,
            merchant_id,
        };
        [
            serialize_section(&txn, TxnDetails::FIELDS),
            self.pg.to_wire(),
            self.card.to_wire(),
            self.cust.to_wire(),
            self.bill.to_wire(),
            self.ship.to_wire(),
            self.item.to_wire(),
            self.upi.to_wire(),
            self.other.to_wire(),
        ]
        .join(SECTION_DELIMITER)
    }

    /// Builds and encrypts the message under an already decoded key.
    #[must_use]
    pub fn encrypt(&self, merchant_id: &str, key: &MerchantKey) -> EncryptedRequest {
        let full_message = self.full_message(merchant_id);
        let merchant_request = key.encrypt(&full_message);

        #[cfg(feature = "telemetry")]
        tracing::debug!(
            message_len = full_message.len(),
            ciphertext_len = merchant_request.len(),
            "Encrypted merchant request"
        );

        EncryptedRequest {
            me_id: merchant_id.to_owned(),
            merchant_request,
            full_message,
        }
    }
}

/// Builds the encrypted merchant request.
///
/// # Errors
///
/// Fails only when `merchant_key` is not a base64-encoded 32-byte key
/// ([`Error::InvalidKeyLength`] or [`Error::InvalidKeyEncoding`]). Business
/// fields are never validated.
#[cfg_attr(
    feature = "telemetry",
    instrument(
        name = "yagout.build_request",
        skip_all,
        fields(me_id = %merchant_id, order_no = ?details.txn.order_no)
    )
)]
pub fn build_encrypted_request(
    merchant_id: &str,
    merchant_key: &str,
    details: &RequestDetails,
) -> Result<EncryptedRequest> {
    let key = MerchantKey::from_base64(merchant_key)?;
    Ok(details.encrypt(merchant_id, &key))
}
