//! Local checks run before any bytes leave the device.
//!
//! Both checks are pure functions of their arguments.

use art_types::UploadFile;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const DEFAULT_MAX_FILE_SIZE_MB: u64 = 5;

pub const DEFAULT_ALLOWED_MIME_TYPES: [&str; 4] =
    ["image/jpeg", "image/png", "image/jpg", "image/webp"];

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Accept files of at most `max_mb` mebibytes; exactly at the limit passes.
pub fn validate_file_size(size_bytes: u64, max_mb: u64) -> Result<(), ValidationError> {
    if size_bytes > max_mb.saturating_mul(BYTES_PER_MB) {
        return Err(ValidationError::FileTooLarge {
            size_bytes,
            limit_mb: max_mb,
        });
    }
    Ok(())
}

/// Accept only MIME types in `allowed`, compared as exact strings.
pub fn validate_mime_type<S: AsRef<str>>(mime_type: &str, allowed: &[S]) -> Result<(), ValidationError> {
    if allowed.iter().any(|a| a.as_ref() == mime_type) {
        return Ok(());
    }
    Err(ValidationError::UnsupportedType {
        mime_type: mime_type.to_string(),
        allowed: allowed.iter().map(|a| a.as_ref().to_string()).collect(),
    })
}

/// Size and type limits for uploads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadLimits {
    pub max_file_size_mb: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_size_mb: DEFAULT_MAX_FILE_SIZE_MB,
            allowed_mime_types: DEFAULT_ALLOWED_MIME_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl UploadLimits {
    /// Size first, then type.
    pub fn validate(&self, file: &UploadFile) -> Result<(), ValidationError> {
        validate_file_size(file.size_bytes(), self.max_file_size_mb)?;
        validate_mime_type(&file.mime_type, self.allowed_mime_types.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const LIMIT: u64 = DEFAULT_MAX_FILE_SIZE_MB * BYTES_PER_MB;

    #[test]
    fn size_boundary() {
        assert!(validate_file_size(0, 5).is_ok());
        assert!(validate_file_size(LIMIT, 5).is_ok());
        let err = validate_file_size(LIMIT + 1, 5).unwrap_err();
        assert_eq!(err.reason(), "size");
    }

    #[test]
    fn default_types_accepted() {
        for t in DEFAULT_ALLOWED_MIME_TYPES {
            assert!(validate_mime_type(t, &DEFAULT_ALLOWED_MIME_TYPES).is_ok());
        }
    }

    #[test]
    fn type_match_is_case_sensitive() {
        let err = validate_mime_type("IMAGE/JPEG", &DEFAULT_ALLOWED_MIME_TYPES).unwrap_err();
        assert_eq!(err.reason(), "type");
        assert!(validate_mime_type("image/gif", &DEFAULT_ALLOWED_MIME_TYPES).is_err());
        assert!(validate_mime_type(" image/png", &DEFAULT_ALLOWED_MIME_TYPES).is_err());
    }

    #[test]
    fn limits_check_size_before_type() {
        let limits = UploadLimits::default();
        let big_gif = UploadFile::new(vec![0u8; (LIMIT + 1) as usize], "image/gif", "a.gif");
        assert_eq!(limits.validate(&big_gif).unwrap_err().reason(), "size");
        let small_gif = UploadFile::new(vec![0u8; 10], "image/gif", "a.gif");
        assert_eq!(limits.validate(&small_gif).unwrap_err().reason(), "type");
        let ok = UploadFile::new(vec![0u8; 10], "image/webp", "a.webp");
        assert!(limits.validate(&ok).is_ok());
    }

    #[test]
    fn custom_limits() {
        let limits = UploadLimits {
            max_file_size_mb: 1,
            allowed_mime_types: vec!["image/png".into()],
        };
        let f = UploadFile::new(vec![0u8; 2 * BYTES_PER_MB as usize], "image/png", "a.png");
        assert!(limits.validate(&f).is_err());
        let f = UploadFile::new(vec![0u8; 10], "image/jpeg", "a.jpg");
        assert!(limits.validate(&f).is_err());
    }

    proptest! {
        #[test]
        fn size_limit_holds(size in 0u64..(4 * LIMIT)) {
            let result = validate_file_size(size, DEFAULT_MAX_FILE_SIZE_MB);
            prop_assert_eq!(result.is_ok(), size <= LIMIT);
        }

        #[test]
        fn unlisted_types_rejected(mime in "[a-zA-Z]{1,8}/[a-zA-Z0-9.+-]{1,12}") {
            let listed = DEFAULT_ALLOWED_MIME_TYPES.contains(&mime.as_str());
            prop_assert_eq!(validate_mime_type(&mime, &DEFAULT_ALLOWED_MIME_TYPES).is_ok(), listed);
        }
    }
}
