//! Marker-to-content registry for ARTarget.
//!
//! The registry is an ordered list of [`ArTarget`](art_types::ArTarget)s
//! serialized as one JSON blob under a single well-known key of a
//! [`KeyValueStore`]. The AR surface reads that blob; this crate owns every
//! write to it.
//!
//! # Backends
//!
//! - [`InMemoryKeyValueStore`] -- `HashMap`-based store for tests
//! - [`FileKeyValueStore`] -- one JSON file per key in a data directory
//!
//! # Invariants
//!
//! - [`TargetRepository::upsert`] never leaves two entries with the same
//!   [`TargetKey`](art_types::TargetKey); a matching entry is replaced in
//!   place.
//! - [`TargetRepository::replace_all`] writes exactly what it is given.
//! - [`TargetRepository::load`] never fails: a missing or unreadable blob
//!   reads as an empty registry.

pub mod error;
pub mod kv;
pub mod registry;
pub mod traits;

pub use error::{RegistryError, RegistryResult};
pub use kv::{FileKeyValueStore, InMemoryKeyValueStore, KeyValueStore};
pub use registry::{KvTargetRegistry, DEFAULT_REGISTRY_KEY};
pub use traits::{TargetRepository, UpsertOutcome};
