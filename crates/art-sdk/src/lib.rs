//! High-level SDK for ARTarget.
//!
//! Wires the object store, registry, and session provider into one
//! [`ArApp`]. This is the main entry point for front ends embedding
//! ARTarget.

pub mod app;
pub mod config;
pub mod error;
pub mod launch;

pub use app::{ArApp, Registration, StartupReport, StartupSync};
pub use config::AppConfig;
pub use error::{AppError, AppResult, ConfigurationError};
pub use launch::{ArLaunch, DEFAULT_LAUNCH_PAGE};

// Re-export key types
pub use art_auth::{AuthMode, Credentials, SessionProvider, User};
pub use art_registry::{TargetRepository, UpsertOutcome};
pub use art_store::ObjectStoreClient;
pub use art_sync::SyncOutcome;
pub use art_types::{ArContent, ArTarget, ContentType, ImageUploadResult, MarkerType, UploadFile};
