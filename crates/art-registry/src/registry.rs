use std::sync::{Arc, Mutex, PoisonError};

use art_types::ArTarget;
use tracing::{debug, warn};

use crate::error::{RegistryError, RegistryResult};
use crate::kv::KeyValueStore;
use crate::traits::{TargetRepository, UpsertOutcome};

/// Key the AR surface reads the registry blob from.
pub const DEFAULT_REGISTRY_KEY: &str = "arTargets";

/// [`TargetRepository`] persisted as a JSON array under one key.
///
/// Writers within this process are serialized so an upsert's
/// read-modify-write is not interleaved with another write through the same
/// registry. Other processes sharing the store are not coordinated with:
/// the last write wins.
pub struct KvTargetRegistry {
    store: Arc<dyn KeyValueStore>,
    key: String,
    write_lock: Mutex<()>,
}

impl KvTargetRegistry {
    pub fn new(store: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Registry under [`DEFAULT_REGISTRY_KEY`].
    pub fn with_default_key(store: Arc<dyn KeyValueStore>) -> Self {
        Self::new(store, DEFAULT_REGISTRY_KEY)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    fn persist(&self, targets: &[ArTarget]) -> RegistryResult<()> {
        let json =
            serde_json::to_string(targets).map_err(|e| RegistryError::Serialization(e.to_string()))?;
        self.store.set(&self.key, &json)
    }

    /// Current contents. Store failures are returned; an absent or
    /// unparseable blob reads as empty.
    fn read(&self) -> RegistryResult<Vec<ArTarget>> {
        let Some(raw) = self.store.get(&self.key)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str(&raw) {
            Ok(targets) => Ok(targets),
            Err(e) => {
                warn!(key = %self.key, error = %e, "registry blob unparseable, treating as empty");
                Ok(Vec::new())
            }
        }
    }
}

impl TargetRepository for KvTargetRegistry {
    fn load(&self) -> Vec<ArTarget> {
        self.read().unwrap_or_else(|e| {
            warn!(key = %self.key, error = %e, "registry unreadable, treating as empty");
            Vec::new()
        })
    }

    fn replace_all(&self, targets: &[ArTarget]) -> RegistryResult<()> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.persist(targets)?;
        debug!(key = %self.key, count = targets.len(), "registry replaced");
        Ok(())
    }

    fn upsert(&self, target: ArTarget) -> RegistryResult<UpsertOutcome> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut targets = self.read()?;
        let key = target.key();

        let outcome = match targets.iter().position(|t| t.key() == key) {
            Some(index) => {
                targets[index] = target;
                UpsertOutcome::Replaced { index }
            }
            None => {
                targets.push(target);
                UpsertOutcome::Inserted {
                    index: targets.len() - 1,
                }
            }
        };
        self.persist(&targets)?;
        debug!(key = %self.key, target = %key, ?outcome, "registry upsert");
        Ok(outcome)
    }
}

impl std::fmt::Debug for KvTargetRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KvTargetRegistry").field("key", &self.key).finish()
    }
}
