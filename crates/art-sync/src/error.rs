use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("listing remote objects failed: {0}")]
    List(#[source] art_store::StoreError),

    #[error("signed URL for {name} failed: {source}")]
    SignedUrl {
        name: String,
        source: art_store::StoreError,
    },

    #[error("registry error: {0}")]
    Registry(#[from] art_registry::RegistryError),

    #[error("sync did not finish within {0:?}")]
    TimedOut(Duration),

    #[error("signed URL task failed: {0}")]
    Task(String),
}

pub type SyncResult<T> = Result<T, SyncError>;
