//! # Providers
//!
//! Traits implemented by library users to supply signing, identity
//! resolution, and credential storage.

use std::future::Future;

use anyhow::Result;
pub use credibil_binding::{Resolver, Signature, VerifyBy};
pub use credibil_ecc::{Algorithm, Signer};

use crate::store::ClaimFilter;
use crate::types::Credential;

/// Verifier Provider trait.
pub trait Provider: Signer + Signature + Resolver + Clone {}

/// A blanket implementation for `Provider` trait so that any type implementing
/// the required super traits is considered a `Provider`.
impl<T> Provider for T where T: Signer + Signature + Resolver + Clone {}

/// `CredentialStore` is used by Holders to query stored credentials.
pub trait CredentialStore: Send + Sync {
    /// Return the credentials with at least one claim matching the filter.
    /// An empty result is not an error.
    fn query(&self, filter: &ClaimFilter) -> impl Future<Output = Result<Vec<Credential>>> + Send;
}
