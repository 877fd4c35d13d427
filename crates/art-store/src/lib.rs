//! Object storage for ARTarget marker images.
//!
//! The app never talks to a storage provider directly; it goes through the
//! [`ObjectStoreClient`] trait so orchestrators can be exercised without a
//! network.
//!
//! # Backends
//!
//! - [`InMemoryObjectStore`] -- `BTreeMap`-based store with call counters and
//!   fault injection, for tests and embedding
//! - [`LocalObjectStore`] -- a bucket directory on disk with a JSON manifest
//!
//! Both backends hand out signed URLs produced by [`UrlSigner`], a BLAKE3
//! keyed hash over bucket, path and expiry.
//!
//! # Design Rules
//!
//! 1. Object names are flat paths inside one bucket; `..` and absolute paths
//!    are rejected.
//! 2. Listings are ordered by creation time, ties broken by name.
//! 3. Public URL resolution never fails; signed URL generation may.
//! 4. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod local;
pub mod memory;
pub mod signing;
pub mod traits;
pub mod types;

pub use error::{StoreError, StoreResult};
pub use local::LocalObjectStore;
pub use memory::InMemoryObjectStore;
pub use signing::{UrlSigner, MAX_SIGNED_URL_EXPIRY_SECS};
pub use traits::ObjectStoreClient;
pub use types::{
    validate_object_path, ListOptions, SortBy, SortField, SortOrder, StoredObjectInfo,
    UploadOptions,
};
