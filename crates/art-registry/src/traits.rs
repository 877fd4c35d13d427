//! The [`TargetRepository`] trait defining registry access.

use art_types::{ArTarget, TargetKey};

use crate::error::RegistryResult;

/// Where an upserted target landed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// No entry had the key; the target was appended at `index`.
    Inserted { index: usize },
    /// The entry at `index` had the key and was replaced in place.
    Replaced { index: usize },
}

impl UpsertOutcome {
    pub fn index(&self) -> usize {
        match self {
            Self::Inserted { index } | Self::Replaced { index } => *index,
        }
    }
}

/// Persisted registry of marker bindings.
///
/// Implementations must be thread-safe (`Send + Sync`). Consumers depend on
/// this trait so tests can swap real durable storage for an in-memory fake.
pub trait TargetRepository: Send + Sync {
    /// Read the persisted registry.
    ///
    /// Returns an empty list if nothing is stored or the stored blob cannot
    /// be read or parsed.
    fn load(&self) -> Vec<ArTarget>;

    /// Persist `targets` as the whole registry, discarding prior contents.
    fn replace_all(&self, targets: &[ArTarget]) -> RegistryResult<()>;

    /// Insert `target`, or replace the entry with the same key at its
    /// current position.
    fn upsert(&self, target: ArTarget) -> RegistryResult<UpsertOutcome>;

    /// The target bound to `key`, if any.
    fn find(&self, key: TargetKey) -> Option<ArTarget> {
        self.load().into_iter().find(|t| t.key() == key)
    }
}
