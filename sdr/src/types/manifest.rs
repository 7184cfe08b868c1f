//! # SDR Manifest
//!
//! The claim manifest a Verifier sends to a Holder, and the payload it is
//! signed as.

use chrono::serde::ts_seconds;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A Selective Disclosure Request manifest describing the claims a Verifier
/// is requesting.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SdrManifest {
    /// The DID of the requester. Not part of the signed request body: it
    /// becomes the token's `iss` claim.
    pub issuer: String,

    /// The DID of the subject the requested claims concern.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// The requested claims, in order. The same claim type may be requested
    /// more than once.
    pub claims: Vec<ClaimRequest>,

    /// Where the Holder should send the Presentation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_url: Option<String>,

    /// An opaque value echoed back by the Holder to correlate the response
    /// with this request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// URLs of credentials the requester is able to issue itself, offered to
    /// Holders unable to satisfy the request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<String>>,

    /// Additional fields carried through to the signed request unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A single claim requested in an SDR.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRequest {
    /// The claim type (the `credentialSubject` property name). When unset,
    /// any claim type is acceptable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_type: Option<String>,

    /// The exact value the claim must have.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_value: Option<String>,

    /// Issuers whose credentials are acceptable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuers: Option<Vec<Issuer>>,

    /// A type the credential must declare.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_type: Option<String>,

    /// A JSON-LD context the credential must declare.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential_context: Option<String>,

    /// Why the claim is being requested, for display to the Holder.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// When set, the Presentation is invalid unless this claim is satisfied.
    #[serde(default, skip_serializing_if = "is_false")]
    pub essential: bool,
}

impl ClaimRequest {
    /// Create a claim request for the specified claim type.
    #[must_use]
    pub fn new(claim_type: impl Into<String>) -> Self {
        Self {
            claim_type: Some(claim_type.into()),
            ..Self::default()
        }
    }

    /// Require the claim to have the specified value.
    #[must_use]
    pub fn value(mut self, claim_value: impl Into<String>) -> Self {
        self.claim_value = Some(claim_value.into());
        self
    }

    /// Add an acceptable issuer.
    #[must_use]
    pub fn issuer(mut self, did: impl Into<String>) -> Self {
        self.issuers.get_or_insert_with(Vec::new).push(Issuer {
            did: did.into(),
            url: None,
        });
        self
    }

    /// Require the credential to declare the specified type.
    #[must_use]
    pub fn credential_type(mut self, credential_type: impl Into<String>) -> Self {
        self.credential_type = Some(credential_type.into());
        self
    }

    /// Require the credential to declare the specified context.
    #[must_use]
    pub fn credential_context(mut self, context: impl Into<String>) -> Self {
        self.credential_context = Some(context.into());
        self
    }

    /// Mark the claim as essential.
    #[must_use]
    pub const fn essential(mut self) -> Self {
        self.essential = true;
        self
    }
}

/// An issuer acceptable to the requester.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct Issuer {
    /// The issuer's DID.
    pub did: String,

    /// Where a credential from this issuer may be obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// The `type` claim of a signed request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub enum SdrType {
    /// Selective Disclosure Request.
    #[default]
    #[serde(rename = "sdr")]
    Sdr,
}

/// The payload of a signed Selective Disclosure Request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SdrClaims {
    /// Always `sdr`.
    #[serde(rename = "type")]
    pub type_: SdrType,

    /// The requester's DID.
    pub iss: String,

    /// The time the request was signed, encoded as a UNIX timestamp.
    #[serde(with = "ts_seconds")]
    pub iat: DateTime<Utc>,

    /// See [`SdrManifest::subject`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// See [`SdrManifest::claims`].
    pub claims: Vec<ClaimRequest>,

    /// See [`SdrManifest::reply_url`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_url: Option<String>,

    /// See [`SdrManifest::tag`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,

    /// See [`SdrManifest::credentials`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Vec<String>>,

    /// See [`SdrManifest::extra`].
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SdrClaims {
    /// Create the request payload from a manifest, dropping the manifest's
    /// `issuer` in favour of `iss`.
    #[must_use]
    pub fn new(manifest: SdrManifest, iss: impl Into<String>, iat: DateTime<Utc>) -> Self {
        Self {
            type_: SdrType::Sdr,
            iss: iss.into(),
            iat,
            subject: manifest.subject,
            claims: manifest.claims,
            reply_url: manifest.reply_url,
            tag: manifest.tag,
            credentials: manifest.credentials,
            extra: manifest.extra,
        }
    }
}

impl From<SdrClaims> for SdrManifest {
    fn from(claims: SdrClaims) -> Self {
        Self {
            issuer: claims.iss,
            subject: claims.subject,
            claims: claims.claims,
            reply_url: claims.reply_url,
            tag: claims.tag,
            credentials: claims.credentials,
            extra: claims.extra,
        }
    }
}

#[allow(clippy::trivially_copy_pass_by_ref)]
const fn is_false(value: &bool) -> bool {
    !*value
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn claim_request_json() {
        let claim = ClaimRequest::new("name").issuer("did:example:issuer").essential();
        let json = serde_json::to_value(&claim).unwrap();

        assert_eq!(
            json,
            json!({
                "claimType": "name",
                "issuers": [{"did": "did:example:issuer"}],
                "essential": true
            })
        );
    }

    // Non-essential claims omit `essential` and a missing `essential`
    // deserializes as false.
    #[test]
    fn essential_default() {
        let claim = ClaimRequest::new("email");
        assert_eq!(serde_json::to_value(&claim).unwrap(), json!({"claimType": "email"}));

        let claim: ClaimRequest = serde_json::from_value(json!({"claimType": "email"})).unwrap();
        assert!(!claim.essential);
    }

    #[test]
    fn payload_omits_issuer() {
        let manifest: SdrManifest = serde_json::from_value(json!({
            "issuer": "did:example:verifier",
            "subject": "did:example:holder",
            "claims": [{"claimType": "name"}],
            "replyUrl": "https://verifier.example.com/reply",
            "purpose": "onboarding"
        }))
        .unwrap();
        assert_eq!(manifest.extra.get("purpose"), Some(&json!("onboarding")));

        let iat = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        let claims = SdrClaims::new(manifest, "did:example:verifier", iat);
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            json,
            json!({
                "type": "sdr",
                "iss": "did:example:verifier",
                "iat": 1_700_000_000,
                "subject": "did:example:holder",
                "claims": [{"claimType": "name"}],
                "replyUrl": "https://verifier.example.com/reply",
                "purpose": "onboarding"
            })
        );
        assert!(json.get("issuer").is_none());
    }

    #[test]
    fn wrong_type() {
        let result = serde_json::from_value::<SdrClaims>(json!({
            "type": "sdr-response",
            "iss": "did:example:verifier",
            "iat": 1_700_000_000,
            "claims": []
        }));
        assert!(result.is_err());
    }
}
