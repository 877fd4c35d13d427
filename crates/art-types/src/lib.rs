//! Foundation types for ARTarget.
//!
//! This crate provides the marker and content model shared by every other
//! ARTarget crate: what a marker is, what gets rendered on top of it, and
//! what an image upload hands back.
//!
//! # Key Types
//!
//! - [`ArTarget`] -- A marker bound to renderable content
//! - [`MarkerType`] -- Hiro, Kanji, or numeric barcode marker
//! - [`ArContent`] -- Tagged union over image and 3D primitive content
//! - [`TargetKey`] -- Identity of a target inside the registry
//! - [`ImageUploadResult`] -- URLs and storage path returned by an upload
//! - [`UploadFile`] -- A user-supplied image awaiting validation

pub mod content;
pub mod error;
pub mod marker;
pub mod target;
pub mod upload;

pub use content::{ArContent, ContentType, Extra, ImageContent, PrimitiveContent};
pub use error::TypeError;
pub use marker::{MarkerType, MAX_BARCODE_VALUE};
pub use target::{ArTarget, TargetKey};
pub use upload::{ImageUploadResult, UploadFile};
