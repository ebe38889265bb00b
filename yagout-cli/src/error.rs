//! Error types for the command-line tool.

use std::path::PathBuf;

/// Errors that can occur while running a CLI command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    /// Signing or decryption failed (bad key, bad ciphertext, unknown field).
    #[error("{0}")]
    Signing(#[from] yagout::Error),

    /// No merchant id or key was found on the command line, in the
    /// environment or in the configuration file.
    #[error("missing merchant credentials: set MERCHANT_ID and MERCHANT_KEY or add them to the config file")]
    MissingCredentials,

    /// A file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Io {
        /// The file that failed.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The request details file is not valid JSON for a request.
    #[error("invalid request details: {0}")]
    InvalidInput(#[source] serde_json::Error),

    /// The base URL used for default return URLs is not a valid URL.
    #[error("invalid base URL {url}: {source}")]
    InvalidBaseUrl {
        /// The configured base URL.
        url: String,
        /// The parse error.
        #[source]
        source: url::ParseError,
    },

    /// The configuration file could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Command output could not be serialized.
    #[error("failed to write output: {0}")]
    Output(#[source] serde_json::Error),
}
