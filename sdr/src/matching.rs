//! # Claim Matching
//!
//! The predicate deciding whether a decoded credential satisfies a claim
//! request. Used by the Verifier when validating a Presentation and, on
//! request, by the Holder to post-filter store results.
//!
//! Checks are applied in order and the first failure rejects the credential:
//!
//! 1. `claimType` with `claimValue`: the subject claim must equal the value
//!    exactly (a JSON string with identical content).
//! 2. `claimType` alone: the subject claim must be present, whatever its
//!    value (`""`, `0`, `false`, and `null` all count as present).
//! 3. `issuers`: the credential's issuer must be one of the listed DIDs.
//! 4. `credentialContext`: `@context` must contain the value as an element.
//! 5. `credentialType`: `type` must contain the value as an element.
//!
//! A claim request with no constraints matches every credential.

use serde_json::Value;

use crate::types::{ClaimRequest, Credential};

impl ClaimRequest {
    /// Determine whether the specified credential satisfies the claim
    /// request.
    #[must_use]
    pub fn is_match(&self, credential: &Credential) -> bool {
        if let Some(claim_type) = &self.claim_type {
            let Some(value) = credential.subject_claim(claim_type) else {
                return false;
            };
            if let Some(claim_value) = &self.claim_value
                && value.as_str() != Some(claim_value.as_str())
            {
                return false;
            }
        }

        if let Some(issuers) = &self.issuers {
            let Some(issuer_id) = credential.issuer_id() else {
                return false;
            };
            if !issuers.iter().any(|i| i.did == issuer_id) {
                return false;
            }
        }

        if let Some(context) = &self.credential_context
            && !credential.contexts().any(|c| c == context)
        {
            return false;
        }

        if let Some(credential_type) = &self.credential_type
            && !credential.types().any(|t| t == credential_type)
        {
            return false;
        }

        true
    }
}

/// Returns the subject claim's value rendered the way a credential store
/// indexes it: strings verbatim, other JSON values serialized.
pub(crate) fn claim_value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn alice() -> Credential {
        Credential::from(json!({
            "@context": ["https://www.w3.org/2018/credentials/v1", "https://example.com/ctx/v1"],
            "type": ["VerifiableCredential", "ProfileCredential"],
            "issuer": {"id": "did:example:issuer"},
            "credentialSubject": {
                "id": "did:example:alice",
                "name": "Alice",
                "empty": "",
                "zero": 0,
                "flag": false,
                "nothing": null,
                "age": 42
            }
        }))
    }

    #[test]
    fn unconstrained() {
        let claim = ClaimRequest::default();
        assert!(claim.is_match(&alice()));
        assert!(claim.is_match(&Credential::default()));
    }

    #[test]
    fn type_and_value() {
        assert!(ClaimRequest::new("name").value("Alice").is_match(&alice()));
        assert!(!ClaimRequest::new("name").value("alice").is_match(&alice()));
        assert!(!ClaimRequest::new("name").value("Alice ").is_match(&alice()));
        assert!(!ClaimRequest::new("missing").value("Alice").is_match(&alice()));
    }

    // Claim values are compared without coercion.
    #[test]
    fn value_type_sensitive() {
        assert!(!ClaimRequest::new("age").value("42").is_match(&alice()));
        assert!(!ClaimRequest::new("zero").value("0").is_match(&alice()));
        assert!(!ClaimRequest::new("flag").value("false").is_match(&alice()));
        assert!(!ClaimRequest::new("nothing").value("null").is_match(&alice()));
        assert!(ClaimRequest::new("empty").value("").is_match(&alice()));
    }

    // Any defined value counts as present.
    #[test]
    fn type_presence() {
        for claim_type in ["name", "empty", "zero", "flag", "nothing"] {
            assert!(ClaimRequest::new(claim_type).is_match(&alice()), "{claim_type} should match");
        }
        assert!(!ClaimRequest::new("email").is_match(&alice()));
    }

    // A value without a type imposes no constraint.
    #[test]
    fn value_without_type() {
        let claim = ClaimRequest {
            claim_value: Some("Bob".to_string()),
            ..ClaimRequest::default()
        };
        assert!(claim.is_match(&alice()));
    }

    #[test]
    fn issuers() {
        assert!(ClaimRequest::new("name").issuer("did:example:issuer").is_match(&alice()));
        assert!(
            ClaimRequest::new("name")
                .issuer("did:example:other")
                .issuer("did:example:issuer")
                .is_match(&alice())
        );
        assert!(!ClaimRequest::new("name").issuer("did:example:other").is_match(&alice()));

        // string-form issuer
        let vc = Credential::from(json!({"issuer": "did:example:issuer", "credentialSubject": {}}));
        assert!(ClaimRequest::default().issuer("did:example:issuer").is_match(&vc));

        // no issuer at all
        assert!(!ClaimRequest::default().issuer("did:example:issuer").is_match(&Credential::default()));

        // an empty allow-list admits nobody
        let claim = ClaimRequest {
            issuers: Some(vec![]),
            ..ClaimRequest::default()
        };
        assert!(!claim.is_match(&alice()));
    }

    // Context and type are exact element matches, not substrings.
    #[test]
    fn context_and_type() {
        let claim = ClaimRequest::default().credential_context("https://example.com/ctx/v1");
        assert!(claim.is_match(&alice()));
        let claim = ClaimRequest::default().credential_context("https://example.com/ctx");
        assert!(!claim.is_match(&alice()));

        assert!(ClaimRequest::default().credential_type("ProfileCredential").is_match(&alice()));
        assert!(!ClaimRequest::default().credential_type("Profile").is_match(&alice()));
        assert!(!ClaimRequest::default().credential_type("ProfileCredential").is_match(&Credential::default()));
    }

    // Each constraint is independent: one failing check rejects the credential.
    #[test]
    fn conjunction() {
        let claim = ClaimRequest::new("name")
            .value("Alice")
            .issuer("did:example:issuer")
            .credential_context("https://example.com/ctx/v1")
            .credential_type("ProfileCredential");
        assert!(claim.is_match(&alice()));

        let claim = claim.credential_type("DriverLicense");
        assert!(!claim.is_match(&alice()));
    }

    #[test]
    fn value_strings() {
        assert_eq!(claim_value_string(&json!("Alice")), "Alice");
        assert_eq!(claim_value_string(&json!(42)), "42");
        assert_eq!(claim_value_string(&json!(false)), "false");
    }
}
