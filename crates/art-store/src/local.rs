//! Filesystem-backed bucket.
//!
//! Objects live as plain files under `{root}/{bucket}/`. Creation times and
//! content types are kept in a JSON manifest next to them, rewritten
//! atomically after every upload, so listing order survives restarts and
//! does not depend on filesystem timestamp support.

use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::signing::UrlSigner;
use crate::traits::ObjectStoreClient;
use crate::types::{validate_object_path, ListOptions, StoredObjectInfo, UploadOptions};

const MANIFEST_FILE: &str = ".manifest.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
struct ManifestEntry {
    created_at: DateTime<Utc>,
    size: u64,
    #[serde(default)]
    content_type: Option<String>,
}

type Manifest = BTreeMap<String, ManifestEntry>;

/// A bucket stored in a local directory.
pub struct LocalObjectStore {
    dir: PathBuf,
    signer: UrlSigner,
    manifest: Mutex<Manifest>,
}

impl LocalObjectStore {
    /// Open (or create) the bucket directory `{root}/{bucket}`.
    pub fn open(root: impl AsRef<Path>, signer: UrlSigner) -> StoreResult<Self> {
        let dir = root.as_ref().join(signer.bucket());
        std::fs::create_dir_all(&dir)?;

        let manifest_path = dir.join(MANIFEST_FILE);
        let manifest = if manifest_path.exists() {
            let raw = std::fs::read(&manifest_path)?;
            serde_json::from_slice(&raw).map_err(|e| StoreError::Serialization(e.to_string()))?
        } else {
            Manifest::new()
        };
        debug!(dir = %dir.display(), objects = manifest.len(), "opened local bucket");

        Ok(Self {
            dir,
            signer,
            manifest: Mutex::new(manifest),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Filesystem location of an object.
    pub fn object_path(&self, path: &str) -> StoreResult<PathBuf> {
        validate_local_path(path)?;
        Ok(self.dir.join(path))
    }

    /// Read an object's bytes.
    pub async fn read(&self, path: &str) -> StoreResult<Bytes> {
        if !self.contains(path) {
            return Err(StoreError::NotFound(path.to_string()));
        }
        let data = tokio::fs::read(self.object_path(path)?).await?;
        Ok(Bytes::from(data))
    }

    pub fn contains(&self, path: &str) -> bool {
        self.lock().contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Manifest> {
        self.manifest.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn persist_manifest(&self, manifest: &Manifest) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(manifest)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.dir.join(MANIFEST_FILE))
            .map_err(|e| StoreError::Io(e.error))?;
        Ok(())
    }
}

fn validate_local_path(path: &str) -> StoreResult<()> {
    validate_object_path(path)?;
    if path == MANIFEST_FILE {
        return Err(StoreError::InvalidPath {
            path: path.to_string(),
            reason: "reserved name".into(),
        });
    }
    Ok(())
}

#[async_trait]
impl ObjectStoreClient for LocalObjectStore {
    async fn upload(&self, path: &str, bytes: Bytes, options: UploadOptions) -> StoreResult<()> {
        let target = self.object_path(path)?;
        let existing_created = self.lock().get(path).map(|e| e.created_at);
        if existing_created.is_some() && !options.overwrite {
            return Err(StoreError::AlreadyExists(path.to_string()));
        }

        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&target, &bytes).await?;

        let mut manifest = self.lock();
        let created_at = existing_created.unwrap_or_else(Utc::now);
        let mut next = manifest.clone();
        next.insert(
            path.to_string(),
            ManifestEntry {
                created_at,
                size: bytes.len() as u64,
                content_type: options.content_type,
            },
        );
        self.persist_manifest(&next)?;
        *manifest = next;
        debug!(path, size = bytes.len(), "stored object");
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expiry_secs: u64) -> StoreResult<String> {
        if !self.contains(path) {
            return Err(StoreError::NotFound(path.to_string()));
        }
        self.signer.sign_for(path, Utc::now().timestamp(), expiry_secs)
    }

    fn get_public_url(&self, path: &str) -> String {
        self.signer.public_url(path)
    }

    async fn list(&self, prefix: &str, options: ListOptions) -> StoreResult<Vec<StoredObjectInfo>> {
        let mut entries: Vec<StoredObjectInfo> = self
            .lock()
            .iter()
            .filter(|(name, _)| name.starts_with(prefix))
            .map(|(name, e)| StoredObjectInfo {
                name: name.clone(),
                created_at: e.created_at,
                size: e.size,
            })
            .collect();
        options.apply(&mut entries);
        Ok(entries)
    }
}

impl std::fmt::Debug for LocalObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalObjectStore")
            .field("dir", &self.dir)
            .field("object_count", &self.len())
            .finish()
    }
}
