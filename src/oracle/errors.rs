//! Error kinds surfaced by the fetch, cache and scan layers.
//!
//! The normalizer and scorer have no error type: they always produce a
//! result, using zero or infinite sentinels for degenerate input.

use thiserror::Error;

/// Failures from the upstream pair source.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream has no live pair for the mint
    #[error("no live pair found for {0}")]
    NotFound(String),

    /// Upstream unreachable, non-success status or unreadable body
    #[error("transport failure: {0}")]
    Transport(String),
}

/// Failures from the two-tier pair cache. Callers treat both as a miss.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("malformed cache record for {key}: {source}")]
    Malformed {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("cache storage failure: {0}")]
    Storage(#[from] anyhow::Error),
}

/// Failures reported to the user by a scan.
#[derive(Error, Debug)]
pub enum ScanError {
    #[error("invalid mint: {0:?}")]
    InvalidMint(String),

    #[error("no live pair found for {0}")]
    NotFound(String),

    #[error("upstream unavailable: {0}")]
    Transport(String),
}

impl ScanError {
    /// Message suitable for an end user.
    pub fn user_message(&self) -> &'static str {
        match self {
            ScanError::InvalidMint(_) => "Enter a valid Solana mint (32-44 base58 chars).",
            ScanError::NotFound(_) => "No live pair found on Dexscreener for this mint.",
            ScanError::Transport(_) => "Couldn't reach Dexscreener. Try again.",
        }
    }

    /// Whether retrying by user action may help.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ScanError::Transport(_))
    }
}

impl From<FetchError> for ScanError {
    fn from(err: FetchError) -> Self {
        match err {
            FetchError::NotFound(mint) => ScanError::NotFound(mint),
            FetchError::Transport(reason) => ScanError::Transport(reason),
        }
    }
}
