//! # Claim Store Queries
//!
//! Credential stores index each credential as a set of [`ClaimRecord`]s, one
//! per subject claim, with the credential's metadata serialized alongside.
//! A [`ClaimFilter`] describes the records a claim request is interested in
//! and is handed to the store's query engine.
//!
//! A [`ClaimFilter`] is composed of [`Matcher`]s which are 'AND-ed' together.
//! An empty filter matches every record.
//!
//! Type and context constraints are evaluated as substring matches against
//! the serialized columns. This differs from [`crate::matching`], which checks
//! element membership in decoded credentials.

use serde::{Deserialize, Serialize};

use crate::matching::claim_value_string;
use crate::types::{ClaimRequest, Credential};

/// Separator used to serialize list-valued columns.
pub const LIST_SEPARATOR: &str = ",";

/// A conjunctive query over stored claims.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ClaimFilter {
    /// The set of matchers.
    pub matchers: Vec<Matcher>,
}

impl ClaimFilter {
    /// Build the store filter for a claim request.
    ///
    /// `subject` restricts matches to claims about the specified subject.
    #[must_use]
    pub fn new(claim: &ClaimRequest, subject: Option<&str>) -> Self {
        let mut matchers = vec![];

        if let Some(claim_type) = &claim.claim_type {
            matchers.push(Matcher::new(Field::ClaimType, MatchOn::Equal(claim_type.clone())));
        }
        if let Some(claim_value) = &claim.claim_value {
            matchers.push(Matcher::new(Field::ClaimValue, MatchOn::Equal(claim_value.clone())));
        }
        if let Some(issuers) = &claim.issuers {
            let dids = issuers.iter().map(|i| i.did.clone()).collect();
            matchers.push(Matcher::new(Field::Issuer, MatchOn::OneOf(dids)));
        }
        if let Some(credential_type) = &claim.credential_type {
            matchers
                .push(Matcher::new(Field::CredentialType, MatchOn::Contains(credential_type.clone())));
        }
        if let Some(context) = &claim.credential_context {
            matchers.push(Matcher::new(Field::CredentialContext, MatchOn::Contains(context.clone())));
        }
        if let Some(subject) = subject {
            matchers.push(Matcher::new(Field::Subject, MatchOn::Equal(subject.to_string())));
        }

        Self { matchers }
    }

    /// Check whether the record satisfies every matcher in the filter.
    #[must_use]
    pub fn is_match(&self, record: &ClaimRecord) -> bool {
        self.matchers.iter().all(|m| m.is_match(record.field(m.field)))
    }
}

/// A `Matcher` is used to match a record's `field` to the filter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matcher {
    /// The record field this matcher applies to.
    pub field: Field,

    /// The value and strategy to use for a successful match.
    pub value: MatchOn,
}

impl Matcher {
    /// Create a new matcher.
    #[must_use]
    pub const fn new(field: Field, value: MatchOn) -> Self {
        Self { field, value }
    }

    /// Check if the field value matches the filter value. A missing field
    /// never matches.
    #[must_use]
    pub fn is_match(&self, value: Option<&str>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match &self.value {
            MatchOn::Equal(filter_val) => value == filter_val,
            MatchOn::OneOf(values) => values.iter().any(|v| v == value),
            MatchOn::Contains(filter_val) => value.contains(filter_val.as_str()),
        }
    }
}

/// The stored claim field a [`Matcher`] applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    /// The claim type.
    ClaimType,

    /// The claim value.
    ClaimValue,

    /// The credential issuer's DID.
    Issuer,

    /// The credential subject's DID.
    Subject,

    /// The credential's serialized types.
    CredentialType,

    /// The credential's serialized JSON-LD contexts.
    CredentialContext,
}

/// The [`MatchOn`] enum is used to specify the matching strategy to be
/// employed by the `Matcher`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOn {
    /// The match must be equal.
    Equal(String),

    /// The match must be with at least one of the items specified.
    OneOf(Vec<String>),

    /// The field must contain the specified value.
    Contains(String),
}

/// A single subject claim as indexed by a credential store.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ClaimRecord {
    /// The claim type.
    pub claim_type: String,

    /// The claim value, as a string.
    pub claim_value: String,

    /// The credential issuer's DID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,

    /// The credential subject's DID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// The credential's types, joined by [`LIST_SEPARATOR`].
    pub credential_type: String,

    /// The credential's contexts, joined by [`LIST_SEPARATOR`].
    pub context: String,
}

impl ClaimRecord {
    /// Index a credential as one record per subject claim. The subject's `id`
    /// is recorded as the subject rather than as a claim.
    #[must_use]
    pub fn from_credential(credential: &Credential) -> Vec<Self> {
        let issuer = credential.issuer_id().map(ToString::to_string);
        let subject = credential.subject_id().map(ToString::to_string);
        let credential_type = credential.types().collect::<Vec<_>>().join(LIST_SEPARATOR);
        let context = credential.contexts().collect::<Vec<_>>().join(LIST_SEPARATOR);
        let Some(claims) = credential.credential_subject() else {
            return vec![];
        };

        claims
            .iter()
            .filter(|(claim_type, _)| claim_type.as_str() != "id")
            .map(|(claim_type, value)| Self {
                claim_type: claim_type.clone(),
                claim_value: claim_value_string(value),
                issuer: issuer.clone(),
                subject: subject.clone(),
                credential_type: credential_type.clone(),
                context: context.clone(),
            })
            .collect()
    }

    /// Returns the value of the specified field.
    #[must_use]
    pub fn field(&self, field: Field) -> Option<&str> {
        match field {
            Field::ClaimType => Some(&self.claim_type),
            Field::ClaimValue => Some(&self.claim_value),
            Field::Issuer => self.issuer.as_deref(),
            Field::Subject => self.subject.as_deref(),
            Field::CredentialType => Some(&self.credential_type),
            Field::CredentialContext => Some(&self.context),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record() -> ClaimRecord {
        let vc = Credential::from(json!({
            "@context": ["https://www.w3.org/2018/credentials/v1"],
            "type": ["VerifiableCredential", "EmployeeIDCredential"],
            "issuer": "did:example:employer",
            "credentialSubject": {"id": "did:example:alice", "employeeId": "1234"}
        }));
        let mut records = ClaimRecord::from_credential(&vc);
        assert_eq!(records.len(), 1);
        records.remove(0)
    }

    #[test]
    fn index_credential() {
        let record = record();
        assert_eq!(record.claim_type, "employeeId");
        assert_eq!(record.claim_value, "1234");
        assert_eq!(record.issuer.as_deref(), Some("did:example:employer"));
        assert_eq!(record.subject.as_deref(), Some("did:example:alice"));
        assert_eq!(record.credential_type, "VerifiableCredential,EmployeeIDCredential");
    }

    #[test]
    fn filter_from_claim() {
        let claim = ClaimRequest::new("employeeId")
            .value("1234")
            .issuer("did:example:employer")
            .credential_type("EmployeeID")
            .credential_context("credentials/v1");
        let filter = ClaimFilter::new(&claim, Some("did:example:alice"));

        assert_eq!(filter.matchers.len(), 6);
        assert!(filter.is_match(&record()));
    }

    // Type and context are matched as substrings of the serialized column.
    #[test]
    fn substring_columns() {
        let filter = ClaimFilter::new(&ClaimRequest::default().credential_type("IDCred"), None);
        assert!(filter.is_match(&record()));

        let filter = ClaimFilter::new(&ClaimRequest::default().credential_type("Passport"), None);
        assert!(!filter.is_match(&record()));
    }

    #[test]
    fn open_filter() {
        let filter = ClaimFilter::new(&ClaimRequest::default(), None);
        assert!(filter.matchers.is_empty());
        assert!(filter.is_match(&record()));
    }

    // A credential without an object subject has no claims to index.
    #[test]
    fn malformed_subject() {
        let vc = Credential::from(json!({"type": "VerifiableCredential", "credentialSubject": [1, 2]}));
        assert!(ClaimRecord::from_credential(&vc).is_empty());
    }

    #[test]
    fn subject_mismatch() {
        let filter = ClaimFilter::new(&ClaimRequest::new("employeeId"), Some("did:example:bob"));
        assert!(!filter.is_match(&record()));

        let mut anonymous = record();
        anonymous.subject = None;
        assert!(!filter.is_match(&anonymous));
    }
}
