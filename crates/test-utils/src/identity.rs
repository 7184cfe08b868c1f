use std::collections::HashMap;
use std::sync::{LazyLock, Mutex};

use anyhow::{Result, anyhow};
use credibil_binding::did::{Document, DocumentBuilder, KeyId, VerificationMethod};
use credibil_binding::jose::PublicKeyJwk;
use credibil_binding::{Binding, VerifyBy};
use credibil_ecc::{Curve, Entry, Keyring, Signer, Vault};

// keys by `owner/partition/key`
static KEYS: LazyLock<Mutex<HashMap<String, Vec<u8>>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

// DID documents by DID, and the DID published by each owner
static DOCUMENTS: LazyLock<Mutex<HashMap<String, Document>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));
static OWNERS: LazyLock<Mutex<HashMap<String, String>>> =
    LazyLock::new(|| Mutex::new(HashMap::new()));

#[derive(Clone)]
pub struct DidIdentity {
    pub owner: String,
    pub signer: Entry,
}

impl DidIdentity {
    // Fetch (or generate) the owner's signing key and publish a did:web
    // document for it.
    pub async fn new(owner: &str, curve: Curve) -> Result<Self> {
        let identity = Self::unpublished(owner, curve).await?;

        let verifying_key = identity.signer.verifying_key().await?;
        let jwk = PublicKeyJwk::from_bytes(&verifying_key.to_bytes())?;
        let vm = VerificationMethod::build().key(jwk).key_id(KeyId::Index("key-0".to_string()));
        let builder = DocumentBuilder::new().verification_method(vm);
        credibil_binding::create(owner, builder, &DidStore).await?;

        Ok(identity)
    }

    // An identity with a signing key but no DID document.
    pub async fn unpublished(owner: &str, curve: Curve) -> Result<Self> {
        let signer = match Keyring::entry(&KeyVault, owner, "signing").await {
            Ok(entry) => entry,
            Err(_) => Keyring::generate(&KeyVault, owner, "signing", curve).await?,
        };
        Ok(Self {
            owner: owner.to_string(),
            signer,
        })
    }

    // The DID published for the owner.
    pub fn did(&self) -> Option<String> {
        OWNERS.lock().ok()?.get(&self.owner).cloned()
    }

    pub fn verification_method(&self) -> Result<VerifyBy> {
        let did = self.did().ok_or_else(|| anyhow!("no DID published for {}", self.owner))?;
        let document = document(&did)?;
        let Some(vm) = document.verification_method.as_ref().and_then(|v| v.first()) else {
            return Err(anyhow!("no verification method found"));
        };
        Ok(VerifyBy::KeyId(vm.id.clone()))
    }
}

// Resolve a did:web URL (or DID) to its serialized DID document.
pub fn resolve(url: &str) -> Result<Vec<u8>> {
    let document = document(&to_did(url))?;
    Ok(serde_json::to_vec(&document)?)
}

fn document(did: &str) -> Result<Document> {
    let documents = DOCUMENTS.lock().map_err(|e| anyhow!("{e}"))?;
    documents.get(did).cloned().ok_or_else(|| anyhow!("DID document not found: {did}"))
}

// Convert a did:web document URL back to its DID.
fn to_did(url: &str) -> String {
    if url.starts_with("did:") {
        return url.split('#').next().unwrap_or(url).to_string();
    }

    let url = url.trim_start_matches("https://").trim_start_matches("http://");
    let url = url.trim_end_matches("/did.json").trim_end_matches("/.well-known");
    let (host, path) = url.split_once('/').unwrap_or((url, ""));

    let mut did = format!("did:web:{}", host.replace(':', "%3A"));
    for segment in path.split('/').filter(|s| !s.is_empty()) {
        did.push(':');
        did.push_str(segment);
    }
    did
}

#[derive(Clone, Debug)]
pub struct KeyVault;

impl Vault for KeyVault {
    async fn put(&self, owner: &str, partition: &str, key: &str, data: &[u8]) -> Result<()> {
        let mut keys = KEYS.lock().map_err(|e| anyhow!("{e}"))?;
        keys.insert(format!("{owner}/{partition}/{key}"), data.to_vec());
        Ok(())
    }

    async fn get(&self, owner: &str, partition: &str, key: &str) -> Result<Option<Vec<u8>>> {
        let keys = KEYS.lock().map_err(|e| anyhow!("{e}"))?;
        Ok(keys.get(&format!("{owner}/{partition}/{key}")).cloned())
    }

    async fn delete(&self, owner: &str, partition: &str, key: &str) -> Result<()> {
        let mut keys = KEYS.lock().map_err(|e| anyhow!("{e}"))?;
        keys.remove(&format!("{owner}/{partition}/{key}"));
        Ok(())
    }

    async fn get_all(&self, owner: &str, partition: &str) -> Result<Vec<(String, Vec<u8>)>> {
        let prefix = format!("{owner}/{partition}/");
        let keys = KEYS.lock().map_err(|e| anyhow!("{e}"))?;
        Ok(keys
            .iter()
            .filter_map(|(k, v)| Some((k.strip_prefix(&prefix)?.to_string(), v.clone())))
            .collect())
    }
}

#[derive(Clone, Debug)]
pub struct DidStore;

impl Binding for DidStore {
    async fn put(&self, owner: &str, document: &Document) -> Result<()> {
        OWNERS
            .lock()
            .map_err(|e| anyhow!("{e}"))?
            .insert(owner.to_string(), document.id.clone());
        DOCUMENTS.lock().map_err(|e| anyhow!("{e}"))?.insert(document.id.clone(), document.clone());
        Ok(())
    }

    async fn get(&self, _owner: &str, key: &str) -> Result<Option<Document>> {
        Ok(DOCUMENTS.lock().map_err(|e| anyhow!("{e}"))?.get(key).cloned())
    }

    async fn delete(&self, _owner: &str, key: &str) -> Result<()> {
        DOCUMENTS.lock().map_err(|e| anyhow!("{e}"))?.remove(key);
        Ok(())
    }

    async fn get_all(&self, owner: &str) -> Result<Vec<(String, Document)>> {
        let owners = OWNERS.lock().map_err(|e| anyhow!("{e}"))?;
        let documents = DOCUMENTS.lock().map_err(|e| anyhow!("{e}"))?;
        Ok(owners
            .get(owner)
            .and_then(|did| documents.get(did))
            .map(|doc| vec![(doc.id.clone(), doc.clone())])
            .unwrap_or_default())
    }
}
