use art_store::StoreError;
use thiserror::Error;

/// A user-correctable problem with the chosen file.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("file size exceeds {limit_mb}MB limit")]
    FileTooLarge { size_bytes: u64, limit_mb: u64 },

    #[error("invalid file type. Allowed: {}", allowed.join(", "))]
    UnsupportedType { mime_type: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Short machine-readable reason: `"size"` or `"type"`.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::FileTooLarge { .. } => "size",
            Self::UnsupportedType { .. } => "type",
        }
    }
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("image upload failed: {source}")]
    Store { path: String, source: StoreError },

    #[error("failed to generate signed URL: {source}")]
    SignedUrl { path: String, source: StoreError },
}

pub type UploadResult<T> = Result<T, UploadError>;
