use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};

use crate::error::{StoreError, StoreResult};
use crate::signing::UrlSigner;
use crate::traits::ObjectStoreClient;
use crate::types::{validate_object_path, ListOptions, StoredObjectInfo, UploadOptions};

#[derive(Clone, Debug)]
struct StoredEntry {
    data: Bytes,
    content_type: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Default)]
struct Faults {
    upload: Option<String>,
    list: Option<String>,
    signed_url: HashMap<String, String>,
    signed_url_delay: HashMap<String, Duration>,
}

/// In-memory object store.
///
/// Intended for tests and embedding. Besides the [`ObjectStoreClient`]
/// behaviour it counts calls per operation and can be told to fail or
/// stall specific requests, so callers can assert exactly which store
/// round-trips happened.
pub struct InMemoryObjectStore {
    objects: RwLock<BTreeMap<String, StoredEntry>>,
    signer: UrlSigner,
    faults: Mutex<Faults>,
    upload_calls: AtomicUsize,
    signed_url_calls: AtomicUsize,
    list_calls: AtomicUsize,
}

impl InMemoryObjectStore {
    /// Create an empty store for the `targetsimages` bucket.
    pub fn new() -> Self {
        Self::with_signer(UrlSigner::ephemeral("memory://store", "targetsimages"))
    }

    pub fn with_signer(signer: UrlSigner) -> Self {
        Self {
            objects: RwLock::new(BTreeMap::new()),
            signer,
            faults: Mutex::new(Faults::default()),
            upload_calls: AtomicUsize::new(0),
            signed_url_calls: AtomicUsize::new(0),
            list_calls: AtomicUsize::new(0),
        }
    }

    pub fn signer(&self) -> &UrlSigner {
        &self.signer
    }

    /// Seed an object with an explicit creation time, bypassing counters.
    pub fn insert_object(&self, path: &str, data: impl Into<Bytes>, created_at: DateTime<Utc>) {
        let mut map = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        map.insert(
            path.to_string(),
            StoredEntry {
                data: data.into(),
                content_type: None,
                created_at,
            },
        );
    }

    /// Number of objects currently stored.
    pub fn len(&self) -> usize {
        self.objects.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, path: &str) -> Option<Bytes> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        map.get(path).map(|e| e.data.clone())
    }

    pub fn content_type(&self, path: &str) -> Option<String> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        map.get(path).and_then(|e| e.content_type.clone())
    }

    /// All object paths, sorted by name.
    pub fn paths(&self) -> Vec<String> {
        let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
        map.keys().cloned().collect()
    }

    pub fn upload_calls(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }

    pub fn signed_url_calls(&self) -> usize {
        self.signed_url_calls.load(Ordering::SeqCst)
    }

    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Make every following upload fail with `message`.
    pub fn fail_uploads(&self, message: impl Into<String>) {
        self.faults().upload = Some(message.into());
    }

    /// Make every following listing fail with `message`.
    pub fn fail_listing(&self, message: impl Into<String>) {
        self.faults().list = Some(message.into());
    }

    /// Make signed URL generation for `path` fail with `message`.
    pub fn fail_signed_url(&self, path: impl Into<String>, message: impl Into<String>) {
        self.faults().signed_url.insert(path.into(), message.into());
    }

    /// Hold signed URL generation for `path` for `delay` before answering.
    pub fn delay_signed_url(&self, path: impl Into<String>, delay: Duration) {
        self.faults().signed_url_delay.insert(path.into(), delay);
    }

    pub fn clear_faults(&self) {
        *self.faults() = Faults::default();
    }

    fn faults(&self) -> std::sync::MutexGuard<'_, Faults> {
        self.faults.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryObjectStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ObjectStoreClient for InMemoryObjectStore {
    async fn upload(&self, path: &str, bytes: Bytes, options: UploadOptions) -> StoreResult<()> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.faults().upload.clone() {
            return Err(StoreError::Backend(message));
        }
        validate_object_path(path)?;

        let mut map = self.objects.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = map.get_mut(path) {
            if !options.overwrite {
                return Err(StoreError::AlreadyExists(path.to_string()));
            }
            existing.data = bytes;
            existing.content_type = options.content_type;
            return Ok(());
        }

        // Creation times stay strictly increasing so listing order matches
        // upload order even within one clock tick.
        let latest = map.values().map(|e| e.created_at).max();
        let now = Utc::now();
        let created_at = match latest {
            Some(l) if l >= now => l + chrono::Duration::milliseconds(1),
            _ => now,
        };
        map.insert(
            path.to_string(),
            StoredEntry {
                data: bytes,
                content_type: options.content_type,
                created_at,
            },
        );
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expiry_secs: u64) -> StoreResult<String> {
        self.signed_url_calls.fetch_add(1, Ordering::SeqCst);
        let (failure, delay) = {
            let faults = self.faults();
            (
                faults.signed_url.get(path).cloned(),
                faults.signed_url_delay.get(path).copied(),
            )
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(message) = failure {
            return Err(StoreError::Backend(message));
        }

        let exists = {
            let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
            map.contains_key(path)
        };
        if !exists {
            return Err(StoreError::NotFound(path.to_string()));
        }
        self.signer.sign_for(path, Utc::now().timestamp(), expiry_secs)
    }

    fn get_public_url(&self, path: &str) -> String {
        self.signer.public_url(path)
    }

    async fn list(&self, prefix: &str, options: ListOptions) -> StoreResult<Vec<StoredObjectInfo>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(message) = self.faults().list.clone() {
            return Err(StoreError::Backend(message));
        }
        let mut entries: Vec<StoredObjectInfo> = {
            let map = self.objects.read().unwrap_or_else(PoisonError::into_inner);
            map.iter()
                .filter(|(name, _)| name.starts_with(prefix))
                .map(|(name, e)| StoredObjectInfo {
                    name: name.clone(),
                    created_at: e.created_at,
                    size: e.data.len() as u64,
                })
                .collect()
        };
        options.apply(&mut entries);
        Ok(entries)
    }
}

impl std::fmt::Debug for InMemoryObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryObjectStore")
            .field("bucket", &self.signer.bucket())
            .field("object_count", &self.len())
            .finish()
    }
}
