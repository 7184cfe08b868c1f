//! # Selective Disclosure Request Token
//!
//! A Verifier signs an [`SdrManifest`] as a compact JWS before sending it to a
//! Holder. The manifest's `issuer` is not included in the request body: it
//! becomes the token's `iss` claim. A Holder decodes and verifies the token
//! to recover the manifest.

#[cfg(feature = "verifier")]
use anyhow::Context;
#[cfg(feature = "verifier")]
use chrono::Utc;
use credibil_binding::resolve_jwk;
#[cfg(feature = "verifier")]
use credibil_ecc::{Algorithm, Curve};
#[cfg(feature = "verifier")]
use credibil_jose::JwsBuilder;
use credibil_jose::KeyBinding;
#[cfg(feature = "holder")]
use credibil_jose::{Jwt, decode_jws};
use tracing::instrument;

#[cfg(feature = "holder")]
use crate::error::invalid;
#[cfg(feature = "verifier")]
use crate::provider::Provider;
#[cfg(feature = "holder")]
use crate::provider::Resolver;
use crate::types::{SdrClaims, SdrManifest};
use crate::{Error, Result};

/// JWS `typ` header for request tokens.
#[cfg(feature = "verifier")]
pub const JWT_TYPE: &str = "JWT";

/// Build a signed Selective Disclosure Request token.
///
/// The provider's verification method must be a key controlled by
/// `signer_did` and usable with the provider's signing algorithm. Its key
/// identifier is set as the token's `kid` and the signer's DID as its `iss`.
///
/// # Errors
///
/// Returns `Error::SigningKeyUnavailable` if the signer's DID cannot be
/// resolved to a usable key, or `Error::SigningFailed` if the signer fails.
#[cfg(feature = "verifier")]
#[instrument(level = "debug", skip(manifest, provider), fields(claims = manifest.claims.len()))]
pub async fn build(
    manifest: SdrManifest, signer_did: &str, provider: &impl Provider,
) -> Result<String> {
    let key_binding = signing_key(signer_did, provider)
        .await
        .map_err(|e| Error::chain(Error::SigningKeyUnavailable, &e))?;

    if manifest.issuer != signer_did {
        tracing::debug!(issuer = %manifest.issuer, "manifest issuer replaced by signer");
    }
    let claims = SdrClaims::new(manifest, signer_did, Utc::now());

    let jws = JwsBuilder::new()
        .typ(JWT_TYPE)
        .payload(claims)
        .key_binding(&key_binding)
        .add_signer(provider)
        .build()
        .await
        .context("issue building jwt")
        .map_err(|e| Error::chain(Error::SigningFailed, &e))?;

    jws.encode()
        .context("issue encoding jwt")
        .map_err(|e| Error::chain(Error::SigningFailed, &e))
}

// Find the signer's key, checking it is controlled by the signer's DID and
// is on the curve the signing algorithm requires.
#[cfg(feature = "verifier")]
async fn signing_key(signer_did: &str, provider: &impl Provider) -> anyhow::Result<KeyBinding> {
    let key_binding = provider
        .verification_method()
        .await
        .context("issue getting verification method")?
        .try_into()
        .context("issue converting key_binding")?;
    let KeyBinding::Kid(kid) = &key_binding else {
        anyhow::bail!("verification method is not a key identifier");
    };
    if did_of(kid) != Some(signer_did) {
        anyhow::bail!("{kid} is not a key of {signer_did}");
    }

    let jwk = resolve_jwk(kid, provider).await.with_context(|| format!("issue resolving {kid}"))?;
    let alg = provider.algorithm().await.context("issue getting signing algorithm")?;
    let usable = matches!(
        (&alg, &jwk.crv),
        (Algorithm::Es256K, Curve::Es256K) | (Algorithm::EdDSA, Curve::Ed25519)
    );
    if !usable {
        anyhow::bail!("{kid} cannot be used with {alg:?}");
    }

    Ok(key_binding)
}

/// Decode and verify a Selective Disclosure Request token, returning the
/// requester's manifest.
///
/// The signature is verified using the key named in the `kid` header, which
/// must belong to the token's `iss`.
///
/// # Errors
///
/// Returns `Error::InvalidToken` if the token is malformed, is not a
/// Selective Disclosure Request, or fails signature verification.
#[cfg(feature = "holder")]
#[instrument(level = "debug", skip_all)]
pub async fn decode(token: &str, resolver: &impl Resolver) -> Result<SdrManifest> {
    let jwk = async |kid: String| resolve_jwk(&kid, resolver).await;
    let jwt: Jwt<SdrClaims> =
        decode_jws(token, jwk).await.map_err(|e| Error::chain(Error::InvalidToken, &e))?;

    let KeyBinding::Kid(kid) = &jwt.header.key else {
        return Err(invalid!("token is not signed with a DID key"));
    };
    if did_of(kid) != Some(jwt.claims.iss.as_str()) {
        return Err(invalid!("key {kid} does not belong to issuer {}", jwt.claims.iss));
    }
    tracing::debug!(iss = %jwt.claims.iss, claims = jwt.claims.claims.len(), "request verified");

    Ok(jwt.claims.into())
}

// The DID portion of a DID URL key identifier.
fn did_of(kid: &str) -> Option<&str> {
    kid.split_once('#').map(|(did, _)| did)
}
