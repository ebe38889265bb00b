//! Symmetric cipher and digest primitives shared by the request and hash builders.
//!
//! The gateway protocol fixes the cipher to AES-256-CBC with PKCS#7 padding and a
//! constant initialization vector ([`IV`]). The ciphertext is exchanged as plain
//! base64 with no IV prefix, since both sides know the IV.
//!
//! A constant IV makes encryption deterministic: the same plaintext under the same
//! key always produces the same ciphertext. The gateway decrypts with the same IV,
//! so this must be reproduced exactly.

use std::fmt;
use std::str::FromStr;

use aes::Aes256;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as b64;
use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

type Aes256CbcEnc = cbc::Encryptor<Aes256>;
type Aes256CbcDec = cbc::Decryptor<Aes256>;

/// Initialization vector mandated by the gateway for every message.
pub const IV: &[u8; 16] = b"0123456789abcdef";

/// Length in bytes of a decoded merchant key.
pub const KEY_LENGTH: usize = 32;

/// A decoded 256-bit merchant key.
///
/// Parsing validates the key once; [`encrypt`](Self::encrypt) is then infallible.
/// The key material never appears in `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct MerchantKey([u8; KEY_LENGTH]);

impl MerchantKey {
    /// Decodes a base64 merchant key.
    ///
    /// Surrounding whitespace is ignored, so values read from `.env` files or
    /// terminals with a trailing newline still parse.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidKeyEncoding`] if the input is not base64 and
    /// [`Error::InvalidKeyLength`] if it does not decode to exactly 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = b64
            .decode(encoded.trim())
            .map_err(Error::InvalidKeyEncoding)?;
        let key: [u8; KEY_LENGTH] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| Error::InvalidKeyLength {
                actual: bytes.len(),
            })?;
        Ok(Self(key))
    }

    /// Encrypts a UTF-8 string and returns the base64 ciphertext.
    #[must_use]
    pub fn encrypt(&self, plaintext: &str) -> String {
        let encryptor = Aes256CbcEnc::new(&self.0.into(), &(*IV).into());
        let ciphertext = encryptor.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());
        b64.encode(ciphertext)
    }

    /// Decrypts a base64 ciphertext produced by [`encrypt`](Self::encrypt).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidCiphertext`] if the input is not base64,
    /// [`Error::Decryption`] if the padding does not check out (wrong key or
    /// corrupted data) and [`Error::InvalidUtf8`] if the plaintext is not UTF-8.
    pub fn decrypt(&self, ciphertext: &str) -> Result<String> {
        let bytes = b64
            .decode(ciphertext.trim())
            .map_err(Error::InvalidCiphertext)?;
        let decryptor = Aes256CbcDec::new(&self.0.into(), &(*IV).into());
        let plaintext = decryptor
            .decrypt_padded_vec_mut::<Pkcs7>(&bytes)
            .map_err(|_| Error::Decryption)?;
        Ok(String::from_utf8(plaintext)?)
    }
}

impl FromStr for MerchantKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_base64(s)
    }
}

impl fmt::Debug for MerchantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MerchantKey(<redacted>)")
    }
}

/// Encrypts `plaintext` under a base64-encoded 256-bit key.
///
/// # Errors
///
/// Fails with [`Error::InvalidKeyLength`] when the decoded key is not 32 bytes,
/// or [`Error::InvalidKeyEncoding`] when the key is not base64.
pub fn encrypt(plaintext: &str, key: &str) -> Result<String> {
    Ok(MerchantKey::from_base64(key)?.encrypt(plaintext))
}

/// Decrypts a base64 ciphertext under a base64-encoded 256-bit key.
///
/// This is the inverse of [`encrypt`]; it is used for diagnostics only and is
/// never part of the outgoing request.
///
/// # Errors
///
/// Key errors as for [`encrypt`], plus the errors of [`MerchantKey::decrypt`].
pub fn decrypt(ciphertext: &str, key: &str) -> Result<String> {
    MerchantKey::from_base64(key)?.decrypt(ciphertext)
}

/// Returns the lowercase hex SHA-256 digest of a UTF-8 string.
#[must_use]
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}
