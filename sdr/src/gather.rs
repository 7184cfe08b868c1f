//! # Credential Gathering
//!
//! Used by a Holder to find stored credentials satisfying each claim in a
//! received (and verified) Selective Disclosure Request.
//!
//! Each claim request is translated into a [`ClaimFilter`] and executed
//! against the Holder's [`CredentialStore`]. Queries run concurrently but
//! results are always returned in manifest order, one entry per claim request.

use anyhow::Context;
use futures::future::try_join_all;
use tracing::instrument;

use crate::provider::CredentialStore;
use crate::store::ClaimFilter;
use crate::types::{ClaimRequest, CredentialsForClaim, SdrManifest};
use crate::{Error, Result};

/// Gather stored credentials for each claim in the manifest.
///
/// When provided, `subject` takes precedence over the manifest's `subject`.
///
/// # Errors
///
/// Returns `Error::StoreQueryFailed` if any store query fails. No partial
/// results are returned.
pub async fn gather(
    manifest: &SdrManifest, subject: Option<&str>, store: &impl CredentialStore,
) -> Result<Vec<CredentialsForClaim>> {
    let mut gatherer = Gatherer::new(manifest);
    if let Some(subject) = subject {
        gatherer = gatherer.subject(subject);
    }
    gatherer.execute(store).await
}

/// Builds and executes credential queries for a manifest.
#[derive(Clone, Debug)]
pub struct Gatherer<'a> {
    manifest: &'a SdrManifest,
    subject: Option<&'a str>,
    post_filter: bool,
}

impl<'a> Gatherer<'a> {
    /// Create a new `Gatherer` for the manifest.
    #[must_use]
    pub const fn new(manifest: &'a SdrManifest) -> Self {
        Self {
            manifest,
            subject: None,
            post_filter: false,
        }
    }

    /// Restrict matches to credentials about the specified subject,
    /// overriding the manifest's `subject`.
    #[must_use]
    pub const fn subject(mut self, subject: &'a str) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Re-check each credential returned by the store using
    /// [`ClaimRequest::is_match`], dropping any the Verifier would reject.
    ///
    /// Stores match `credentialType` and `credentialContext` as substrings of
    /// their serialized columns, so without post-filtering a store may return
    /// credentials that fail validation.
    #[must_use]
    pub const fn post_filter(mut self, enabled: bool) -> Self {
        self.post_filter = enabled;
        self
    }

    /// Execute a query per claim request.
    ///
    /// # Errors
    ///
    /// Returns `Error::StoreQueryFailed` if any store query fails.
    #[instrument(level = "debug", skip_all, fields(claims = self.manifest.claims.len()))]
    pub async fn execute(&self, store: &impl CredentialStore) -> Result<Vec<CredentialsForClaim>> {
        let subject = self.subject.or(self.manifest.subject.as_deref());
        let queries = self.manifest.claims.iter().map(|claim| self.query(claim, subject, store));
        try_join_all(queries).await
    }

    async fn query(
        &self, claim: &ClaimRequest, subject: Option<&str>, store: &impl CredentialStore,
    ) -> Result<CredentialsForClaim> {
        let filter = ClaimFilter::new(claim, subject);
        let mut credentials = store
            .query(&filter)
            .await
            .with_context(|| format!("issue querying claim {:?}", claim.claim_type))
            .map_err(|e| Error::chain(Error::StoreQueryFailed, &e))?;

        if self.post_filter {
            credentials.retain(|vc| claim.is_match(vc));
        }
        tracing::debug!(claim_type = ?claim.claim_type, matched = credentials.len(), "claim queried");

        Ok(CredentialsForClaim {
            claim: claim.clone(),
            credentials,
        })
    }
}
