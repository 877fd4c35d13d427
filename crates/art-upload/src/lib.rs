//! Marker image upload for ARTarget.
//!
//! An upload is validated locally first ([`validation`]), then stored under
//! a generated `marker-{code}-{millis}.{ext}` name ([`path`]), and finally
//! resolved to a signed and a public URL ([`orchestrator`]). Registering
//! the result is a separate step: [`target_for_upload`] builds the registry
//! entry, and the caller persists it.

pub mod error;
pub mod orchestrator;
pub mod path;
pub mod validation;

pub use error::{UploadError, UploadResult, ValidationError};
pub use orchestrator::{target_for_upload, UploadOrchestrator, DEFAULT_SIGNED_URL_EXPIRY_SECS};
pub use path::{file_extension, generate_storage_path, DEFAULT_EXTENSION};
pub use validation::{
    validate_file_size, validate_mime_type, UploadLimits, DEFAULT_ALLOWED_MIME_TYPES,
    DEFAULT_MAX_FILE_SIZE_MB,
};
