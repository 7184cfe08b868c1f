//! # Matched Credentials

use serde::{Deserialize, Serialize};

use crate::types::{ClaimRequest, Credential};

/// The credentials matched against a single claim request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct CredentialsForClaim {
    /// The claim request the credentials were matched against.
    #[serde(flatten)]
    pub claim: ClaimRequest,

    /// Matching credentials, in the order they were found.
    pub credentials: Vec<Credential>,
}

/// The outcome of validating a Presentation against a Selective Disclosure
/// Request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ValidationResult {
    /// `true` when every essential claim is satisfied by at least one
    /// credential.
    pub valid: bool,

    /// Matches for every requested claim, in request order.
    pub claims: Vec<CredentialsForClaim>,
}

impl ValidationResult {
    /// Essential claims left without a matching credential.
    pub fn unsatisfied(&self) -> impl Iterator<Item = &ClaimRequest> {
        self.claims
            .iter()
            .filter(|c| c.claim.essential && c.credentials.is_empty())
            .map(|c| &c.claim)
    }
}
