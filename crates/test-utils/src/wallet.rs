//! # Mock Wallet
//!
//! An in-memory credential store indexing each credential as claim records.

use anyhow::{Result, bail};
use credibil_sdr::provider::{CredentialStore, Resolver};
use credibil_sdr::store::{ClaimFilter, ClaimRecord};
use credibil_sdr::{Credential, CredentialsForClaim, Presentation};
use serde_json::Value;

use crate::identity;

#[derive(Clone, Debug, Default)]
pub struct Wallet {
    credentials: Vec<Credential>,
    // claim records with the index of the credential they belong to
    records: Vec<(ClaimRecord, usize)>,
}

impl Wallet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a credential to the store.
    pub fn add(&mut self, credential: Credential) {
        let index = self.credentials.len();
        for record in ClaimRecord::from_credential(&credential) {
            self.records.push((record, index));
        }
        self.credentials.push(credential);
    }

    /// Add a credential from its JSON representation.
    ///
    /// # Panics
    ///
    /// Panics if the value is not a credential.
    pub fn add_json(&mut self, value: Value) {
        self.add(serde_json::from_value(value).expect("should be a credential"));
    }

    #[must_use]
    pub fn fetch(&self) -> &[Credential] {
        &self.credentials
    }

    /// Present the credentials gathered for each claim, once each.
    #[must_use]
    pub fn present(&self, gathered: &[CredentialsForClaim]) -> Presentation {
        let mut credentials: Vec<Credential> = vec![];
        for vc in gathered.iter().flat_map(|c| &c.credentials) {
            if !credentials.contains(vc) {
                credentials.push(vc.clone());
            }
        }
        Presentation {
            verifiable_credential: credentials,
            ..Presentation::default()
        }
    }
}

impl CredentialStore for Wallet {
    async fn query(&self, filter: &ClaimFilter) -> Result<Vec<Credential>> {
        // return each matching credential once, in insertion order
        let mut indexes = self
            .records
            .iter()
            .filter(|(record, _)| filter.is_match(record))
            .map(|(_, index)| *index)
            .collect::<Vec<_>>();
        indexes.sort_unstable();
        indexes.dedup();

        Ok(indexes.into_iter().map(|i| self.credentials[i].clone()).collect())
    }
}

impl Resolver for Wallet {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        identity::resolve(url)
    }
}

/// A credential store that is always unavailable.
#[derive(Clone, Debug, Default)]
pub struct UnavailableStore;

impl CredentialStore for UnavailableStore {
    async fn query(&self, _: &ClaimFilter) -> Result<Vec<Credential>> {
        bail!("store unavailable")
    }
}
