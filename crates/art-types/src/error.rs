use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("unknown marker type: {0}")]
    UnknownMarkerType(String),

    #[error("unknown content type: {0}")]
    UnknownContentType(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}
