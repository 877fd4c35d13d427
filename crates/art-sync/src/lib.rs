//! Registry synchronization for ARTarget.
//!
//! On start the app rebuilds its local registry from the bucket listing:
//! every stored image becomes a barcode target whose value is its position
//! in the creation-ordered listing.

pub mod error;
pub mod orchestrator;

pub use error::{SyncError, SyncResult};
pub use orchestrator::{SyncOptions, SyncOrchestrator, SyncOutcome};
