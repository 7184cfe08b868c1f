//! # Presentation Validation
//!
//! Used by a Verifier to check a Holder's Presentation against the
//! Selective Disclosure Request it answers.
//!
//! Every credential in the Presentation is matched against every claim
//! request using [`ClaimRequest::is_match`](crate::ClaimRequest::is_match).
//! The Presentation is valid when each essential claim is satisfied by at
//! least one credential. Non-essential claims never affect validity.

use tracing::instrument;

use crate::types::{CredentialsForClaim, Presentation, SdrManifest, ValidationResult};

/// Validate a Presentation against the manifest it responds to.
///
/// Validation never fails: credentials missing the fields a claim request
/// constrains simply do not match it. Results are reported for every claim,
/// in manifest order, even once the Presentation is known to be invalid.
#[must_use]
#[instrument(level = "debug", skip_all, fields(claims = manifest.claims.len()))]
pub fn validate(manifest: &SdrManifest, presentation: &Presentation) -> ValidationResult {
    let mut valid = true;
    let mut claims = Vec::with_capacity(manifest.claims.len());

    for claim in &manifest.claims {
        let credentials = presentation
            .verifiable_credential
            .iter()
            .filter(|vc| claim.is_match(vc))
            .cloned()
            .collect::<Vec<_>>();

        if claim.essential && credentials.is_empty() {
            tracing::debug!(claim_type = ?claim.claim_type, "essential claim not satisfied");
            valid = false;
        }

        claims.push(CredentialsForClaim {
            claim: claim.clone(),
            credentials,
        });
    }

    ValidationResult { valid, claims }
}
