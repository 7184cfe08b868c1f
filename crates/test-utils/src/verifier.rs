//! # Mock Verifier
//!
//! Signs requests using a secp256k1 key published in the Verifier's did:web
//! document.

use anyhow::{Result, anyhow, bail};
use credibil_ecc::{Algorithm, Curve, PublicKey};
use credibil_sdr::provider::{Resolver, Signature, Signer, VerifyBy};

use crate::identity::{self, DidIdentity};

#[derive(Clone)]
pub struct Verifier {
    identity: DidIdentity,
    locked: bool,
    mismatched: bool,
}

impl Verifier {
    /// A Verifier with a published DID.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key or DID document cannot be created.
    pub async fn new(owner: &str) -> Result<Self> {
        Ok(Self {
            identity: DidIdentity::new(owner, Curve::Es256K).await?,
            locked: false,
            mismatched: false,
        })
    }

    /// A Verifier whose DID has not been published.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key cannot be created.
    pub async fn unpublished(owner: &str) -> Result<Self> {
        Ok(Self {
            identity: DidIdentity::unpublished(owner, Curve::Es256K).await?,
            locked: false,
            mismatched: false,
        })
    }

    /// A Verifier whose signing key refuses to sign.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key or DID document cannot be created.
    pub async fn locked(owner: &str) -> Result<Self> {
        Ok(Self {
            locked: true,
            ..Self::new(owner).await?
        })
    }

    /// A Verifier publishing an Ed25519 key while signing with ES256K.
    ///
    /// # Errors
    ///
    /// Returns an error if the signing key or DID document cannot be created.
    pub async fn mismatched(owner: &str) -> Result<Self> {
        Ok(Self {
            identity: DidIdentity::new(owner, Curve::Ed25519).await?,
            locked: false,
            mismatched: true,
        })
    }

    /// The Verifier's DID, or its owner URL when no DID has been published.
    #[must_use]
    pub fn did(&self) -> String {
        self.identity.did().unwrap_or_else(|| self.identity.owner.clone())
    }

    /// The key identifier of the Verifier's signing key.
    ///
    /// # Panics
    ///
    /// Panics if the Verifier's DID has not been published.
    #[must_use]
    pub fn kid(&self) -> String {
        let Ok(VerifyBy::KeyId(kid)) = self.identity.verification_method() else {
            panic!("should have a key id");
        };
        kid
    }
}

impl Signer for Verifier {
    async fn try_sign(&self, msg: &[u8]) -> Result<Vec<u8>> {
        if self.locked {
            bail!("signing key is locked");
        }
        self.identity.signer.try_sign(msg).await
    }

    async fn verifying_key(&self) -> Result<PublicKey> {
        self.identity.signer.verifying_key().await
    }

    async fn algorithm(&self) -> Result<Algorithm> {
        if self.mismatched {
            return Ok(Algorithm::Es256K);
        }
        self.identity.signer.algorithm().await
    }
}

impl Signature for Verifier {
    async fn verification_method(&self) -> Result<VerifyBy> {
        self.identity.verification_method().map_err(|e| anyhow!("issue finding key: {e}"))
    }
}

impl Resolver for Verifier {
    async fn resolve(&self, url: &str) -> Result<Vec<u8>> {
        identity::resolve(url)
    }
}
