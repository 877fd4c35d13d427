use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{StoreError, StoreResult};

/// One entry of a bucket listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredObjectInfo {
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub size: u64,
}

/// Options for [`ObjectStoreClient::upload`](crate::ObjectStoreClient::upload).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadOptions {
    /// Replace an existing object at the same path instead of failing.
    pub overwrite: bool,
    pub content_type: Option<String>,
}

impl Default for UploadOptions {
    fn default() -> Self {
        Self {
            overwrite: true,
            content_type: None,
        }
    }
}

impl UploadOptions {
    pub fn overwrite(content_type: impl Into<String>) -> Self {
        Self {
            overwrite: true,
            content_type: Some(content_type.into()),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    Name,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortBy {
    pub field: SortField,
    pub order: SortOrder,
}

/// Options for [`ObjectStoreClient::list`](crate::ObjectStoreClient::list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListOptions {
    pub limit: usize,
    pub sort_by: SortBy,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            limit: 100,
            sort_by: SortBy::default(),
        }
    }
}

impl ListOptions {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit,
            ..Default::default()
        }
    }

    /// Sort, then truncate, a listing in place.
    pub fn apply(&self, entries: &mut Vec<StoredObjectInfo>) {
        match self.sort_by.field {
            SortField::CreatedAt => entries.sort_by(|a, b| {
                a.created_at.cmp(&b.created_at).then_with(|| a.name.cmp(&b.name))
            }),
            SortField::Name => entries.sort_by(|a, b| a.name.cmp(&b.name)),
        }
        if self.sort_by.order == SortOrder::Desc {
            entries.reverse();
        }
        entries.truncate(self.limit);
    }
}

/// Reject object paths that are empty or could escape the bucket.
pub fn validate_object_path(path: &str) -> StoreResult<()> {
    let reason = if path.is_empty() {
        "path must not be empty"
    } else if path.starts_with('/') {
        "path must be relative"
    } else if path.contains('\\') {
        "path must not contain backslashes"
    } else if path.split('/').any(|c| c.is_empty() || c == "." || c == "..") {
        "path must not contain empty, '.' or '..' components"
    } else if path.chars().any(|c| c.is_control() || c == '?' || c == '#') {
        "path contains a forbidden character"
    } else {
        return Ok(());
    };
    Err(StoreError::InvalidPath {
        path: path.to_string(),
        reason: reason.into(),
    })
}
