//! An API for requesting, gathering, and validating the selective disclosure
//! of Verifiable Credential claims.
//!
//! A Verifier builds a Selective Disclosure Request (SDR) describing the
//! claims it wants, signs it, and sends it to a Holder. The Holder gathers
//! credentials from its store that satisfy each claim request and returns them
//! in a Presentation. The Verifier then validates the Presentation against the
//! original request.
//!
//! Gathering and validation share a single matching predicate
//! ([`ClaimRequest::is_match`]) so credentials selected by a Holder are judged
//! by the Verifier using the same rules.
//!
//! # Feature Flags
//!
//! Both features are enabled by default.
//!
//! * `verifier` - Enables building request tokens and validating
//!   presentations.
//! * `holder` - Enables decoding request tokens and gathering credentials.

pub mod matching;
pub mod provider;
pub mod request;
pub mod store;
pub mod types;

#[cfg(feature = "holder")]
pub mod gather;
#[cfg(feature = "verifier")]
pub mod validate;

mod error;

pub use {credibil_binding as binding, credibil_ecc as ecc, credibil_jose as jose};

pub use self::error::Error;
#[cfg(feature = "holder")]
pub use self::gather::{Gatherer, gather};
#[cfg(feature = "verifier")]
pub use self::request::build;
#[cfg(feature = "holder")]
pub use self::request::decode;
pub use self::types::*;
#[cfg(feature = "verifier")]
pub use self::validate::validate;

/// Result type for Selective Disclosure Requests.
pub type Result<T, E = Error> = anyhow::Result<T, E>;
