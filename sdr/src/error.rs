//! # Selective Disclosure Errors
//!
//! Errors surfaced by the request builder, the credential gatherer, and token
//! decoding. Claim matching and presentation validation never fail.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Selective Disclosure Request error codes.
#[derive(Error, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
#[serde(tag = "error", content = "error_description")]
pub enum Error {
    /// The requester's DID could not be resolved to an identity holding a key
    /// usable with the signer's algorithm.
    #[error(r#"{{"error": "signing_key_unavailable", "error_description": "{0}"}}"#)]
    SigningKeyUnavailable(String),

    /// The external signer failed to produce a signature.
    #[error(r#"{{"error": "signing_failed", "error_description": "{0}"}}"#)]
    SigningFailed(String),

    /// The credential store returned an error while executing a claim query.
    #[error(r#"{{"error": "store_query_failed", "error_description": "{0}"}}"#)]
    StoreQueryFailed(String),

    /// A received request token is malformed, is not an SDR, or its signature
    /// could not be verified.
    #[error(r#"{{"error": "invalid_token", "error_description": "{0}"}}"#)]
    InvalidToken(String),
}

impl Error {
    /// Wrap an `anyhow` error chain using the specified error variant,
    /// flattening the chain into the error description.
    pub(crate) fn chain(variant: fn(String) -> Self, err: &anyhow::Error) -> Self {
        let stack = err.chain().fold(String::new(), |cause, e| format!("{cause} -> {e}"));
        variant(stack.trim_start_matches(" -> ").to_string())
    }
}

/// Construct an `Error::InvalidToken` error from a string or existing error
/// value.
macro_rules! invalid {
    ($fmt:expr, $($arg:tt)*) => {
        $crate::Error::InvalidToken(format!($fmt, $($arg)*))
    };
    ($err:expr $(,)?) => {
        $crate::Error::InvalidToken(format!($err))
    };
}
pub(crate) use invalid;
