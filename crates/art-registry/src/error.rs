//! Error types for registry persistence.

use thiserror::Error;

/// Errors that can occur while persisting the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The storage key cannot be used by the backend.
    #[error("invalid storage key {key:?}: {reason}")]
    InvalidKey { key: String, reason: String },

    /// Serialization or deserialization failure.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during file-based persistence.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
