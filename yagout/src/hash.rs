//! Integrity hash builder.
//!
//! The gateway checks each request against an encrypted SHA-256 of
//! `me_id~order_no~amount~currency_from~currency_to`. The hex digest is
//! encrypted with the same cipher and key as the merchant request.

use serde::{Deserialize, Serialize};

#[cfg(feature = "telemetry")]
use tracing::instrument;

use crate::cipher::{MerchantKey, sha256_hex};
use crate::error::Result;
use crate::section::{FieldLookup, SECTION_DELIMITER, TxnDetails};

/// Default source currency code of the hash input.
pub const DEFAULT_CURRENCY_FROM: &str = "ETH";

/// Default target currency code of the hash input.
pub const DEFAULT_CURRENCY_TO: &str = "ETB";

/// Transaction values covered by the integrity hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashRequest {
    /// Merchant order number.
    pub order_no: String,
    /// Amount, exactly as sent in the transaction section.
    pub amount: String,
    /// Source currency code (default `ETH`).
    #[serde(default = "default_currency_from")]
    pub currency_from: String,
    /// Target currency code (default `ETB`).
    #[serde(default = "default_currency_to")]
    pub currency_to: String,
}

fn default_currency_from() -> String {
    DEFAULT_CURRENCY_FROM.to_owned()
}

fn default_currency_to() -> String {
    DEFAULT_CURRENCY_TO.to_owned()
}

impl HashRequest {
    /// Creates a hash request with the default currencies.
    #[must_use]
    pub fn new(order_no: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            order_no: order_no.into(),
            amount: amount.into(),
            currency_from: default_currency_from(),
            currency_to: default_currency_to(),
        }
    }

    /// Overrides both currency codes.
    #[must_use]
    pub fn with_currencies(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.currency_from = from.into();
        self.currency_to = to.into();
        self
    }

    /// Derives the hash request from a transaction section.
    ///
    /// Order number and amount are copied, and the currencies come from the
    /// section's `country` and `currency` fields (merged over their `ETH` /
    /// `ETB` defaults), so the hash always agrees with the request it covers.
    #[must_use]
    pub fn from_transaction(txn: &TxnDetails) -> Self {
        let field = |name: &str| txn.lookup(name).unwrap_or_default().to_owned();
        Self {
            order_no: field("order_no"),
            amount: field("amount"),
            currency_from: field("country"),
            currency_to: field("currency"),
        }
    }

    /// Returns the plaintext hash input for `merchant_id`.
    #[must_use]
    pub fn hash_input(&self, merchant_id: &str) -> String {
        [
            merchant_id,
            self.order_no.as_str(),
            self.amount.as_str(),
            self.currency_from.as_str(),
            self.currency_to.as_str(),
        ]
        .join(SECTION_DELIMITER)
    }

    /// Hashes and encrypts under an already decoded key.
    #[must_use]
    pub fn encrypt(&self, merchant_id: &str, key: &MerchantKey) -> EncryptedHash {
        let hash_input = self.hash_input(merchant_id);
        let sha256 = sha256_hex(&hash_input);
        let hash = key.encrypt(&sha256);
        EncryptedHash {
            hash,
            hash_input,
            sha256,
        }
    }
}

/// The encrypted integrity hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedHash {
    /// Base64 ciphertext of [`sha256`](Self::sha256). The only value sent.
    pub hash: String,
    /// The tilde-joined plaintext that was hashed.
    pub hash_input: String,
    /// Lowercase hex SHA-256 of [`hash_input`](Self::hash_input).
    pub sha256: String,
}

/// Builds the encrypted integrity hash.
///
/// # Errors
///
/// Fails only when `merchant_key` is not a base64-encoded 32-byte key.
#[cfg_attr(
    feature = "telemetry",
    instrument(
        name = "yagout.build_hash",
        skip_all,
        fields(me_id = %merchant_id, order_no = %request.order_no)
    )
)]
pub fn build_encrypted_hash(
    merchant_id: &str,
    merchant_key: &str,
    request: &HashRequest,
) -> Result<EncryptedHash> {
    let key = MerchantKey::from_base64(merchant_key)?;
    Ok(request.encrypt(merchant_id, &key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::cipher::{decrypt, encrypt};

    const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn test_hash_known_answer() {
        let hash = build_encrypted_hash("M1", KEY, &HashRequest::new("O1", "100")).unwrap();
        assert_eq!(hash.hash_input, "M1~O1~100~ETH~ETB");
        assert_eq!(
            hash.sha256,
            "5564f92fe2ef80d721f978cc50b25ae027e8ceec04e5191014db3afb422e2c09"
        );
        assert_eq!(hash.hash, encrypt(&hash.sha256, KEY).unwrap());
        assert_eq!(
            hash.hash,
            "E8OVpO0QERsRlWkPdWJp7U50QMl/w0YyhcnruswZefSYPWMkNcH4E51d+7uZJK2l2dATSyxg7H9WWmSeg8GQyUIAEWvHYWevK9DyTsNaSJI="
        );
    }

    #[test]
    fn test_hash_order_1_reproducible() {
        let request = HashRequest::new("ORDER_1", "149");
        let first = build_encrypted_hash("TESTID", KEY, &request).unwrap();
        let second = build_encrypted_hash("TESTID", KEY, &request).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            first.hash,
            "IajhY9+TPrk23Izn5s2d5qBgaU/Tl+wb1gyzzPRLpmenkJCshwNRb+Xn2pe/L389McZRwysnkR6qs6etfx74Akg4fgRchBkYBqpdXDPCfGY="
        );
        assert_eq!(decrypt(&first.hash, KEY).unwrap(), first.sha256);
    }

    #[test]
    fn test_custom_currencies() {
        let request = HashRequest::new("O1", "5").with_currencies("USA", "USD");
        assert_eq!(request.hash_input("M1"), "M1~O1~5~USA~USD");
    }

    #[test]
    fn test_from_transaction_uses_defaults() {
        let txn = TxnDetails {
            order_no: Some("O7".into()),
            amount: Some("12.50".into()),
            ..Default::default()
        };
        let request = HashRequest::from_transaction(&txn);
        assert_eq!(request, HashRequest::new("O7", "12.50"));
    }

    #[test]
    fn test_from_transaction_follows_overrides() {
        let txn = TxnDetails {
            order_no: Some("O7".into()),
            country: Some("KEN".into()),
            currency: Some("KES".into()),
            ..Default::default()
        };
        assert_eq!(
            HashRequest::from_transaction(&txn).hash_input("M1"),
            "M1~O7~~KEN~KES"
        );
    }

    #[test]
    fn test_deserialize_defaults_currencies() {
        let request: HashRequest =
            serde_json::from_str(r#"{"order_no":"O1","amount":"100"}"#).unwrap();
        assert_eq!(request.currency_from, "ETH");
        assert_eq!(request.currency_to, "ETB");
    }

    #[test]
    fn test_bad_key_propagates() {
        let err = build_encrypted_hash("M1", "", &HashRequest::new("O1", "1")).unwrap_err();
        assert!(matches!(err, Error::InvalidKeyLength { actual: 0 }));
    }
}
