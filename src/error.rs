//! Error types for wpscout.
//!
//! Network failures are deliberately absent: a fetch that cannot complete
//! is reported as an empty [`FetchResult`](crate::model::FetchResult) and
//! treated as "no evidence". Only configuration and contract errors reach
//! the caller.

use thiserror::Error;

/// Result type alias using the wpscout [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    // === Configuration Errors ===
    #[error("Probe wordlist is empty, nothing to fingerprint with")]
    EmptyWordlist,

    #[error("Wordlist not found: {name}")]
    WordlistNotFound { name: String },

    #[error("Invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    // === Contract Errors ===
    #[error("Contract violation: {0}")]
    ContractViolation(String),

    // === Collaborator Errors ===
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("Config serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

impl Error {
    /// True for errors caused by how the scan was set up rather than by the target.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::EmptyWordlist | Error::WordlistNotFound { .. } | Error::InvalidUrl { .. }
        )
    }
}
