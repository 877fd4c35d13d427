//! Durable string key-value persistence.
//!
//! [`KeyValueStore`] is the narrow, synchronous `get`/`set` surface the
//! registry persists through. [`FileKeyValueStore`] keeps one file per key
//! and replaces it atomically; [`InMemoryKeyValueStore`] is for tests.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};

use crate::error::{RegistryError, RegistryResult};

/// Synchronous string key-value storage.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`. `Ok(None)` if absent.
    fn get(&self, key: &str) -> RegistryResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> RegistryResult<()>;
}

/// An in-memory implementation of [`KeyValueStore`].
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    values: RwLock<HashMap<String, String>>,
}

impl InMemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        let values = self.values.read().unwrap_or_else(PoisonError::into_inner);
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let mut values = self.values.write().unwrap_or_else(PoisonError::into_inner);
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Stores each key as `{dir}/{key}.json`.
///
/// Writes go to a temporary file in the same directory which is then
/// renamed over the target, so readers never observe a torn value.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    dir: PathBuf,
}

impl FileKeyValueStore {
    /// Open (or create) the data directory.
    pub fn open(dir: impl AsRef<Path>) -> RegistryResult<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> RegistryResult<PathBuf> {
        validate_key(key)?;
        Ok(self.dir.join(format!("{key}.json")))
    }
}

fn validate_key(key: &str) -> RegistryResult<()> {
    let reason = if key.is_empty() {
        "key must not be empty"
    } else if key.starts_with('.') {
        "key must not start with '.'"
    } else if !key
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
    {
        "key may only contain ASCII letters, digits, '-', '_' and '.'"
    } else {
        return Ok(());
    };
    Err(RegistryError::InvalidKey {
        key: key.to_string(),
        reason: reason.into(),
    })
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> RegistryResult<Option<String>> {
        let path = self.path_for(key)?;
        match std::fs::read_to_string(&path) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> RegistryResult<()> {
        let path = self.path_for(key)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(value.as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| RegistryError::Io(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_get_set() {
        let kv = InMemoryKeyValueStore::new();
        assert_eq!(kv.get("arTargets").unwrap(), None);
        kv.set("arTargets", "[]").unwrap();
        assert_eq!(kv.get("arTargets").unwrap().as_deref(), Some("[]"));
        kv.set("arTargets", "[1]").unwrap();
        assert_eq!(kv.get("arTargets").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn file_get_set_and_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::open(tmp.path()).unwrap();
        assert_eq!(kv.get("arTargets").unwrap(), None);
        kv.set("arTargets", "[]").unwrap();
        assert!(tmp.path().join("arTargets.json").exists());

        let again = FileKeyValueStore::open(tmp.path()).unwrap();
        assert_eq!(again.get("arTargets").unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn file_overwrite_leaves_no_temp_files() {
        let tmp = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::open(tmp.path()).unwrap();
        kv.set("k", "one").unwrap();
        kv.set("k", "two").unwrap();
        let names: Vec<_> = std::fs::read_dir(tmp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(names, ["k.json"]);
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn file_rejects_bad_keys() {
        let tmp = tempfile::tempdir().unwrap();
        let kv = FileKeyValueStore::open(tmp.path()).unwrap();
        for bad in ["", "../escape", ".hidden", "a/b", "sp ace"] {
            assert!(
                matches!(kv.set(bad, "x"), Err(RegistryError::InvalidKey { .. })),
                "{bad:?} should be rejected"
            );
        }
    }
}
