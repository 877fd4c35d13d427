use std::sync::Arc;

use art_store::{ObjectStoreClient, UploadOptions};
use art_types::{ArContent, ArTarget, ImageUploadResult, UploadFile};
use chrono::Utc;
use tracing::{debug, info};

use crate::error::{UploadError, UploadResult};
use crate::path::generate_storage_path;
use crate::validation::UploadLimits;

pub const DEFAULT_SIGNED_URL_EXPIRY_SECS: u64 = 3600;

/// Validates marker images and pushes them to the object store.
pub struct UploadOrchestrator {
    store: Arc<dyn ObjectStoreClient>,
    limits: UploadLimits,
    signed_url_expiry_secs: u64,
}

impl UploadOrchestrator {
    pub fn new(store: Arc<dyn ObjectStoreClient>, limits: UploadLimits, signed_url_expiry_secs: u64) -> Self {
        Self {
            store,
            limits,
            signed_url_expiry_secs,
        }
    }

    /// Orchestrator with default limits and a one hour signed URL expiry.
    pub fn with_defaults(store: Arc<dyn ObjectStoreClient>) -> Self {
        Self::new(store, UploadLimits::default(), DEFAULT_SIGNED_URL_EXPIRY_SECS)
    }

    pub fn limits(&self) -> &UploadLimits {
        &self.limits
    }

    /// Validate and upload `file` as the image for `marker_code`.
    ///
    /// Nothing is sent to the store when validation fails.
    pub async fn upload(&self, file: &UploadFile, marker_code: u32) -> UploadResult<ImageUploadResult> {
        self.upload_at(file, marker_code, Utc::now().timestamp_millis()).await
    }

    /// [`upload`](Self::upload) with an explicit timestamp for the storage name.
    pub async fn upload_at(
        &self,
        file: &UploadFile,
        marker_code: u32,
        timestamp_ms: i64,
    ) -> UploadResult<ImageUploadResult> {
        self.limits.validate(file)?;

        let path = generate_storage_path(marker_code, timestamp_ms, &file.original_name);
        debug!(%path, size = file.size_bytes(), mime = %file.mime_type, "uploading marker image");

        self.store
            .upload(&path, file.bytes.clone(), UploadOptions::overwrite(file.mime_type.clone()))
            .await
            .map_err(|source| UploadError::Store {
                path: path.clone(),
                source,
            })?;

        let signed_url = self
            .store
            .create_signed_url(&path, self.signed_url_expiry_secs)
            .await
            .map_err(|source| UploadError::SignedUrl {
                path: path.clone(),
                source,
            })?;
        let public_url = self.store.get_public_url(&path);

        info!(%path, marker_code, "marker image uploaded");
        Ok(ImageUploadResult {
            public_url,
            signed_url,
            path,
        })
    }
}

impl std::fmt::Debug for UploadOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UploadOrchestrator")
            .field("limits", &self.limits)
            .field("signed_url_expiry_secs", &self.signed_url_expiry_secs)
            .finish()
    }
}

/// Registry entry binding barcode `marker_code` to an uploaded image.
pub fn target_for_upload(marker_code: u32, result: &ImageUploadResult) -> ArTarget {
    ArTarget::barcode(marker_code, ArContent::image(result.signed_url.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use art_store::InMemoryObjectStore;
    use art_types::{ContentType, MarkerType};

    const MB: usize = 1024 * 1024;

    fn setup() -> (Arc<InMemoryObjectStore>, UploadOrchestrator) {
        let store = Arc::new(InMemoryObjectStore::new());
        let orch = UploadOrchestrator::with_defaults(store.clone());
        (store, orch)
    }

    #[tokio::test]
    async fn upload_stores_and_signs() {
        let (store, orch) = setup();
        let file = UploadFile::new(vec![7u8; 2 * MB], "image/png", "marker.PNG");
        let result = orch.upload_at(&file, 5, 1_700_000_000_000).await.unwrap();

        assert_eq!(result.path, "marker-5-1700000000000.png");
        assert_eq!(store.get(&result.path).unwrap().len(), 2 * MB);
        assert_eq!(store.content_type(&result.path).as_deref(), Some("image/png"));
        assert_eq!(result.public_url, store.get_public_url(&result.path));
        assert!(result.signed_url.starts_with(&result.public_url));
        assert!(result.signed_url.contains("token="));
        assert_eq!(store.upload_calls(), 1);
        assert_eq!(store.signed_url_calls(), 1);
    }

    #[tokio::test]
    async fn generated_path_uses_current_time() {
        let (_, orch) = setup();
        let before = Utc::now().timestamp_millis();
        let file = UploadFile::new(vec![1u8; 10], "image/jpeg", "noext");
        let result = orch.upload(&file, 12).await.unwrap();
        let after = Utc::now().timestamp_millis();

        let millis: i64 = result
            .path
            .strip_prefix("marker-12-")
            .and_then(|s| s.strip_suffix(".jpg"))
            .unwrap()
            .parse()
            .unwrap();
        assert!(millis >= before && millis <= after);
    }

    #[tokio::test]
    async fn oversized_file_never_reaches_store() {
        let (store, orch) = setup();
        let file = UploadFile::new(vec![0u8; 6 * MB], "image/jpeg", "big.jpg");
        let err = orch.upload(&file, 1).await.unwrap_err();
        match err {
            UploadError::Validation(v) => assert_eq!(v.reason(), "size"),
            other => panic!("expected validation error, got {other:?}"),
        }
        assert_eq!(store.upload_calls(), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn gif_never_reaches_store() {
        let (store, orch) = setup();
        let file = UploadFile::new(vec![0u8; 100], "image/gif", "anim.gif");
        let err = orch.upload(&file, 1).await.unwrap_err();
        assert!(matches!(err, UploadError::Validation(ref v) if v.reason() == "type"));
        assert_eq!(store.upload_calls(), 0);
    }

    #[tokio::test]
    async fn store_failure_is_upload_error() {
        let (store, orch) = setup();
        store.fail_uploads("Bucket not found");
        let file = UploadFile::new(vec![0u8; 100], "image/png", "a.png");
        let err = orch.upload(&file, 1).await.unwrap_err();
        assert!(matches!(err, UploadError::Store { .. }));
        assert_eq!(err.to_string(), "image upload failed: Bucket not found");
        assert_eq!(store.signed_url_calls(), 0);
    }

    #[tokio::test]
    async fn signed_url_failure_is_upload_error() {
        let (store, orch) = setup();
        store.fail_signed_url("marker-3-42.png", "signing key revoked");
        let file = UploadFile::new(vec![0u8; 100], "image/png", "a.png");
        let err = orch.upload_at(&file, 3, 42).await.unwrap_err();
        assert!(matches!(err, UploadError::SignedUrl { ref path, .. } if path == "marker-3-42.png"));
        assert_eq!(err.to_string(), "failed to generate signed URL: signing key revoked");
    }

    #[tokio::test]
    async fn same_path_overwrites() {
        let (store, orch) = setup();
        let a = UploadFile::new(vec![1u8; 10], "image/png", "a.png");
        let b = UploadFile::new(vec![2u8; 20], "image/png", "b.png");
        orch.upload_at(&a, 4, 99).await.unwrap();
        orch.upload_at(&b, 4, 99).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("marker-4-99.png").unwrap().len(), 20);
    }

    #[test]
    fn target_for_upload_uses_signed_url() {
        let result = ImageUploadResult {
            public_url: "pub".into(),
            signed_url: "signed".into(),
            path: "marker-5-1.png".into(),
        };
        let t = target_for_upload(5, &result);
        assert_eq!(t.marker_type, MarkerType::Barcode);
        assert_eq!(t.value, Some(5));
        assert_eq!(t.content.content_type(), ContentType::Image);
        assert_eq!(t.content.src(), Some("signed"));
    }
}
