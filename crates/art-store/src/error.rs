/// Errors from object store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested object was not found.
    #[error("object not found: {0}")]
    NotFound(String),

    /// An object already exists at the path and overwrite was not allowed.
    #[error("object already exists: {0}")]
    AlreadyExists(String),

    /// The object path is empty or escapes the bucket.
    #[error("invalid object path {path:?}: {reason}")]
    InvalidPath { path: String, reason: String },

    /// A signed URL failed verification.
    #[error("invalid signed URL: {0}")]
    InvalidSignature(String),

    /// The requested signed URL lifetime is zero or too long.
    #[error("invalid signed URL expiry: {0}s")]
    InvalidExpiry(u64),

    /// A signed URL is past its expiry.
    #[error("signed URL expired at {0}")]
    Expired(i64),

    /// The provider rejected or failed the request.
    #[error("{0}")]
    Backend(String),

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
