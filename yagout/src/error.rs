//! Error types for YagoutPay request signing.
//!
//! Building a request or a hash only fails on a bad merchant key. Every other
//! input is permissive: absent or malformed business fields are serialized as
//! empty strings, as the gateway's field-based protocol expects.

/// Result alias used throughout this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the cipher primitive and the request/hash builders.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The base64-decoded merchant key is not exactly 32 bytes.
    #[error("Invalid key length: expected 32 bytes after base64 decode, got {actual}")]
    InvalidKeyLength {
        /// Length of the decoded key in bytes.
        actual: usize,
    },

    /// The merchant key is not valid base64.
    #[error("Invalid key encoding: {0}")]
    InvalidKeyEncoding(#[source] base64::DecodeError),

    /// The ciphertext handed to [`decrypt`](crate::cipher::decrypt) is not valid base64.
    #[error("Invalid ciphertext encoding: {0}")]
    InvalidCiphertext(#[source] base64::DecodeError),

    /// CBC decryption produced invalid PKCS#7 padding (wrong key or corrupted data).
    #[error("Decryption failed: invalid padding")]
    Decryption,

    /// Decrypted bytes are not valid UTF-8.
    #[error("Decrypted message is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    /// A section name in a dotted field path is not one of the nine request sections.
    #[error("Unknown section '{0}'")]
    UnknownSection(String),

    /// A field name is not part of the section's schema.
    #[error("Unknown field '{field}' in section '{section}'")]
    UnknownField {
        /// Section the field was looked up in.
        section: &'static str,
        /// The rejected field name.
        field: String,
    },
}

impl Error {
    /// Returns `true` if the error was caused by the merchant key itself.
    ///
    /// Key errors are fatal for every request made with that key and must
    /// not be retried.
    #[must_use]
    pub const fn is_key_error(&self) -> bool {
        matches!(self, Self::InvalidKeyLength { .. } | Self::InvalidKeyEncoding(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_length_message() {
        let err = Error::InvalidKeyLength { actual: 16 };
        assert_eq!(
            err.to_string(),
            "Invalid key length: expected 32 bytes after base64 decode, got 16"
        );
        assert!(err.is_key_error());
    }

    #[test]
    fn test_unknown_field_message() {
        let err = Error::UnknownField {
            section: "txn",
            field: "colour".into(),
        };
        assert_eq!(err.to_string(), "Unknown field 'colour' in section 'txn'");
        assert!(!err.is_key_error());
    }
}
