//! # Credentials and Presentations
//!
//! Decoded W3C Verifiable Credentials are held exactly as presented. The
//! properties used for claim matching are read from the underlying JSON on
//! demand, so malformed or unexpected values never prevent a credential from
//! being decoded or change what is returned.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// A decoded Verifiable Credential.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct Credential(Value);

impl From<Value> for Credential {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl Credential {
    /// The credential as presented.
    #[must_use]
    pub const fn as_value(&self) -> &Value {
        &self.0
    }

    /// Claims about the subject, keyed by claim type. `None` when
    /// `credentialSubject` is missing or not an object.
    #[must_use]
    pub fn credential_subject(&self) -> Option<&Map<String, Value>> {
        self.0.get("credentialSubject")?.as_object()
    }

    /// The value of a subject claim, if present (including `null`).
    #[must_use]
    pub fn subject_claim(&self, claim_type: &str) -> Option<&Value> {
        self.credential_subject()?.get(claim_type)
    }

    /// The subject's identifier (`credentialSubject.id`), if present.
    #[must_use]
    pub fn subject_id(&self) -> Option<&str> {
        self.subject_claim("id")?.as_str()
    }

    /// The issuer's identifier: `issuer` itself when a string, or `issuer.id`
    /// when an object.
    #[must_use]
    pub fn issuer_id(&self) -> Option<&str> {
        match self.0.get("issuer")? {
            Value::String(id) => Some(id),
            Value::Object(issuer) => issuer.get("id")?.as_str(),
            _ => None,
        }
    }

    /// The JSON-LD contexts the credential declares by URL. Object entries
    /// (inline contexts) are skipped.
    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        strings(self.0.get("@context"))
    }

    /// The credential's types.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        strings(self.0.get("type"))
    }
}

// An array yields its string elements, a single string yields itself, and
// anything else yields nothing.
fn strings(value: Option<&Value>) -> impl Iterator<Item = &str> {
    let items = match value {
        Some(Value::Array(items)) => items.as_slice(),
        Some(value @ Value::String(_)) => std::slice::from_ref(value),
        _ => &[],
    };
    items.iter().filter_map(Value::as_str)
}

/// A Holder's response to a Selective Disclosure Request.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Presentation {
    /// The credentials offered by the Holder. A missing or non-array value
    /// holds no credentials.
    #[serde(default, deserialize_with = "credentials")]
    pub verifiable_credential: Vec<Credential>,

    /// Remaining presentation properties (`holder`, `proof`, etc.).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn credentials<'de, D>(deserializer: D) -> Result<Vec<Credential>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) => Ok(items.into_iter().map(Credential).collect()),
        _ => Ok(vec![]),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn issuer_forms() {
        let vc = Credential::from(json!({"issuer": "did:example:a"}));
        assert_eq!(vc.issuer_id(), Some("did:example:a"));

        let vc = Credential::from(json!({"issuer": {"id": "did:example:b", "name": "B"}}));
        assert_eq!(vc.issuer_id(), Some("did:example:b"));

        assert_eq!(Credential::from(json!({})).issuer_id(), None);
        assert_eq!(Credential::from(json!({"issuer": 42})).issuer_id(), None);
        assert_eq!(Credential::from(json!({"issuer": {"name": "B"}})).issuer_id(), None);
    }

    #[test]
    fn string_views() {
        let vc = Credential::from(json!({
            "@context": ["https://www.w3.org/2018/credentials/v1", {"ex": "https://example.com/#"}, 7],
            "type": "VerifiableCredential"
        }));
        assert_eq!(vc.contexts().collect::<Vec<_>>(), vec!["https://www.w3.org/2018/credentials/v1"]);
        assert_eq!(vc.types().collect::<Vec<_>>(), vec!["VerifiableCredential"]);

        let vc = Credential::from(json!({"@context": {"@vocab": "https://example.com"}, "type": null}));
        assert_eq!(vc.contexts().count(), 0);
        assert_eq!(vc.types().count(), 0);
    }

    #[test]
    fn malformed_subject() {
        let vc = Credential::from(json!({"credentialSubject": [{"name": "Bob"}]}));
        assert!(vc.credential_subject().is_none());
        assert!(vc.subject_claim("name").is_none());

        let vc = Credential::from(json!({"credentialSubject": {"name": null}}));
        assert_eq!(vc.subject_claim("name"), Some(&Value::Null));
    }

    // Credentials should serialize exactly as they were presented.
    #[test]
    fn unchanged() {
        let json = json!({
            "@context": ["https://www.w3.org/2018/credentials/v1", {"ex": "https://example.com/#"}],
            "type": "VerifiableCredential",
            "issuer": {"id": "did:example:issuer"},
            "credentialSubject": {"id": "did:example:holder", "name": "Alice"},
            "issuanceDate": "2024-01-01T00:00:00Z",
            "proof": {"type": "JwtProof2020", "jwt": "eyJ..."}
        });
        let vc: Credential = serde_json::from_value(json.clone()).unwrap();

        assert_eq!(vc.subject_id(), Some("did:example:holder"));
        assert_eq!(serde_json::to_value(&vc).unwrap(), json);
    }

    // One malformed credential should not prevent the rest from decoding.
    #[test]
    fn mixed_presentation() {
        let presentation: Presentation = serde_json::from_value(json!({
            "verifiableCredential": [
                {"credentialSubject": {"name": "Alice"}},
                {"credentialSubject": [{"name": "Bob"}]},
                {"credentialSubject": null, "issuer": 42},
                "not-a-credential"
            ]
        }))
        .unwrap();
        assert_eq!(presentation.verifiable_credential.len(), 4);

        let presentation: Presentation =
            serde_json::from_value(json!({"verifiableCredential": {"type": "VerifiableCredential"}}))
                .unwrap();
        assert!(presentation.verifiable_credential.is_empty());
    }
}
