use async_trait::async_trait;
use bytes::Bytes;

use crate::error::StoreResult;
use crate::types::{ListOptions, StoredObjectInfo, UploadOptions};

/// Client for the bucket holding marker images.
///
/// Implementations are bound to a single bucket. All implementations must
/// satisfy these invariants:
/// - `upload` with `overwrite = false` fails with `AlreadyExists` rather than
///   replacing an object.
/// - `create_signed_url` fails for objects that do not exist.
/// - `list` honours [`ListOptions`] ordering and limit.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Store `bytes` at `path`.
    async fn upload(&self, path: &str, bytes: Bytes, options: UploadOptions) -> StoreResult<()>;

    /// Create a URL granting read access to `path` for `expiry_secs` seconds.
    async fn create_signed_url(&self, path: &str, expiry_secs: u64) -> StoreResult<String>;

    /// Long-lived public URL for `path`. Does not check existence.
    fn get_public_url(&self, path: &str) -> String;

    /// List objects whose name starts with `prefix`.
    ///
    /// Pass `""` to list the whole bucket.
    async fn list(&self, prefix: &str, options: ListOptions) -> StoreResult<Vec<StoredObjectInfo>>;
}
