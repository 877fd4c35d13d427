use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// A user-supplied image awaiting validation and upload.
#[derive(Clone, Debug)]
pub struct UploadFile {
    pub bytes: Bytes,
    /// MIME type as reported by the picker, matched verbatim.
    pub mime_type: String,
    /// File name as chosen by the user; only its extension is kept.
    pub original_name: String,
}

impl UploadFile {
    pub fn new(
        bytes: impl Into<Bytes>,
        mime_type: impl Into<String>,
        original_name: impl Into<String>,
    ) -> Self {
        Self {
            bytes: bytes.into(),
            mime_type: mime_type.into(),
            original_name: original_name.into(),
        }
    }

    pub fn size_bytes(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// Where an uploaded image ended up.
///
/// Only `signed_url` is embedded into a registry entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResult {
    pub public_url: String,
    pub signed_url: String,
    pub path: String,
}
