//! Merchant credentials.
//!
//! [`MerchantCredentials`] pairs the merchant id with a decoded
//! [`MerchantKey`]. Decoding happens once, on construction, so a bad key is
//! reported before any request is built and the builders below cannot fail.

use crate::cipher::MerchantKey;
use crate::error::Result;
use crate::hash::{EncryptedHash, HashRequest};
use crate::request::{EncryptedRequest, RequestDetails};

/// Merchant id and key issued by the gateway.
///
/// The same key encrypts both the merchant request and the integrity hash.
/// `Debug` output never contains the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MerchantCredentials {
    merchant_id: String,
    key: MerchantKey,
}

impl MerchantCredentials {
    /// Creates credentials from a merchant id and a base64 merchant key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyLength`](crate::Error::InvalidKeyLength) or
    /// [`Error::InvalidKeyEncoding`](crate::Error::InvalidKeyEncoding) if the
    /// key is not a base64-encoded 32-byte value.
    pub fn new(merchant_id: impl Into<String>, merchant_key: &str) -> Result<Self> {
        Ok(Self {
            merchant_id: merchant_id.into(),
            key: MerchantKey::from_base64(merchant_key)?,
        })
    }

    /// Returns the merchant id.
    #[must_use]
    pub fn merchant_id(&self) -> &str {
        &self.merchant_id
    }

    /// Returns the decoded merchant key.
    #[must_use]
    pub const fn key(&self) -> &MerchantKey {
        &self.key
    }

    /// Builds the encrypted merchant request.
    #[must_use]
    pub fn build_request(&self, details: &RequestDetails) -> EncryptedRequest {
        details.encrypt(&self.merchant_id, &self.key)
    }

    /// Builds the encrypted integrity hash.
    #[must_use]
    pub fn build_hash(&self, request: &HashRequest) -> EncryptedHash {
        request.encrypt(&self.merchant_id, &self.key)
    }

    /// Decrypts a value produced with these credentials.
    ///
    /// # Errors
    ///
    /// See [`MerchantKey::decrypt`].
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        self.key.decrypt(ciphertext)
    }
}

/// Command-line arguments for merchant credentials.
///
/// Both values can also come from the `MERCHANT_ID` and `MERCHANT_KEY`
/// environment variables.
#[cfg(feature = "cli")]
#[derive(Clone, Default, clap::Args)]
pub struct CredentialArgs {
    /// Merchant id issued by YagoutPay.
    #[arg(long, env = "MERCHANT_ID")]
    pub merchant_id: Option<String>,

    /// Base64-encoded 256-bit merchant key.
    #[arg(long, env = "MERCHANT_KEY", hide_env_values = true)]
    pub merchant_key: Option<String>,
}

#[cfg(feature = "cli")]
impl CredentialArgs {
    /// Fills values that were not given on the command line or in the
    /// environment, typically from a configuration file.
    #[must_use]
    pub fn or(self, merchant_id: Option<String>, merchant_key: Option<String>) -> Self {
        Self {
            merchant_id: self.merchant_id.or(merchant_id),
            merchant_key: self.merchant_key.or(merchant_key),
        }
    }
}

#[cfg(feature = "cli")]
impl std::fmt::Debug for CredentialArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialArgs")
            .field("merchant_id", &self.merchant_id)
            .field("merchant_key", &self.merchant_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use crate::section::TxnDetails;

    const KEY: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

    #[test]
    fn test_new_rejects_bad_key() {
        let err = MerchantCredentials::new("TESTID", "c2hvcnQ=").unwrap_err();
        assert!(matches!(err, Error::InvalidKeyLength { actual: 5 }));
    }

    #[test]
    fn test_build_matches_free_functions() {
        let credentials = MerchantCredentials::new("TESTID", KEY).unwrap();
        let details = RequestDetails::new(TxnDetails {
            order_no: Some("ORDER_1".into()),
            amount: Some("149".into()),
            ..Default::default()
        });
        assert_eq!(
            credentials.build_request(&details),
            crate::request::build_encrypted_request("TESTID", KEY, &details).unwrap()
        );

        let hash_request = HashRequest::new("ORDER_1", "149");
        assert_eq!(
            credentials.build_hash(&hash_request),
            crate::hash::build_encrypted_hash("TESTID", KEY, &hash_request).unwrap()
        );
    }

    #[test]
    fn test_decrypt_own_request() {
        let credentials = MerchantCredentials::new("TESTID", KEY).unwrap();
        let request = credentials.build_request(&RequestDetails::default());
        assert_eq!(
            credentials.decrypt(&request.merchant_request).unwrap(),
            request.full_message
        );
    }

    #[test]
    fn test_debug_hides_key() {
        let credentials = MerchantCredentials::new("TESTID", KEY).unwrap();
        let debug = format!("{credentials:?}");
        assert!(debug.contains("TESTID"));
        assert!(!debug.contains(KEY));
        assert!(debug.contains("<redacted>"));
    }

    #[cfg(feature = "cli")]
    #[test]
    fn test_credential_args_fallback() {
        let args = CredentialArgs {
            merchant_id: Some("FROM_FLAG".into()),
            merchant_key: None,
        }
        .or(Some("FROM_FILE".into()), Some(KEY.into()));
        assert_eq!(args.merchant_id.as_deref(), Some("FROM_FLAG"));
        assert_eq!(args.merchant_key.as_deref(), Some(KEY));
        assert!(!format!("{args:?}").contains(KEY));
    }
}
