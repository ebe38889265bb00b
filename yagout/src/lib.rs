#![cfg_attr(docsrs, feature(doc_auto_cfg))]

//! Request signing for the YagoutPay checkout redirect.
//!
//! A checkout with YagoutPay starts with the merchant's site posting three
//! hidden form fields to the gateway: the merchant id in plaintext, an
//! encrypted merchant request describing the order, and an encrypted
//! integrity hash. This crate builds the last two from plain transaction
//! data. It performs no network I/O and keeps no state between calls.
//!
//! # Overview
//!
//! The merchant request is nine `|`-delimited sections (transaction, payment
//! gateway, card, customer, billing, shipping, item, UPI, user-defined fields)
//! joined with `~` and encrypted with AES-256-CBC under the merchant key. The
//! hash is the SHA-256 of `me_id~order_no~amount~currency_from~currency_to`,
//! encrypted the same way.
//!
//! ```rust
//! use yagout::{HashRequest, MerchantCredentials, RequestDetails, TxnDetails};
//!
//! let credentials =
//!     MerchantCredentials::new("TESTID", "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=")?;
//!
//! let details = RequestDetails::new(TxnDetails {
//!     order_no: Some("ORDER_1".into()),
//!     amount: Some("149".into()),
//!     ..Default::default()
//! });
//!
//! let request = credentials.build_request(&details);
//! let hash = credentials.build_hash(&HashRequest::new("ORDER_1", "149"));
//!
//! assert_eq!(hash.hash_input, "TESTID~ORDER_1~149~ETH~ETB");
//! assert_eq!(credentials.decrypt(&request.merchant_request)?, request.full_message);
//! # Ok::<(), yagout::Error>(())
//! ```
//!
//! # Modules
//!
//! - [`cipher`] - AES-256-CBC with the gateway's fixed IV, and SHA-256 hex digests
//! - [`section`] - Section records, defaults and the ordered field serializer
//! - [`request`] - Merchant request builder
//! - [`hash`] - Integrity hash builder
//! - [`credentials`] - Merchant id and decoded key
//! - [`checkout`] - Hidden form fields and the self-submitting redirect page
//!
//! # Feature Flags
//!
//! - `telemetry` - Enables tracing spans and events (keys and messages are never logged)
//! - `cli` - Enables `clap` argument types for merchant credentials

pub mod checkout;
pub mod cipher;
pub mod credentials;
pub mod error;
pub mod hash;
pub mod request;
pub mod section;

pub use checkout::{CheckoutForm, UAT_CHECKOUT_URL};
pub use cipher::{MerchantKey, decrypt, encrypt, sha256_hex};
pub use credentials::MerchantCredentials;
pub use error::{Error, Result};
pub use hash::{EncryptedHash, HashRequest, build_encrypted_hash};
pub use request::{EncryptedRequest, RequestDetails, build_encrypted_request};
pub use section::{
    BillingDetails, CardDetails, CustomerDetails, ItemDetails, OtherDetails, PgDetails, Section,
    ShippingDetails, TxnDetails, UpiDetails,
};

#[cfg(feature = "cli")]
pub use credentials::CredentialArgs;
