use std::fmt;

use serde::{Deserialize, Serialize};

use crate::content::ArContent;
use crate::marker::MarkerType;

/// Identity of a target inside the registry: `(marker_type, value)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetKey {
    pub marker_type: MarkerType,
    pub value: Option<u32>,
}

impl TargetKey {
    pub fn barcode(value: u32) -> Self {
        Self {
            marker_type: MarkerType::Barcode,
            value: Some(value),
        }
    }

    pub fn preset(marker_type: MarkerType) -> Self {
        Self {
            marker_type,
            value: None,
        }
    }
}

impl fmt::Display for TargetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(v) => write!(f, "{}:{v}", self.marker_type),
            None => write!(f, "{}", self.marker_type),
        }
    }
}

/// A marker bound to the content rendered when it is recognized.
///
/// `value` is present for barcode markers and absent for the preset ones.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArTarget {
    pub marker_type: MarkerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<u32>,
    pub content: ArContent,
}

impl ArTarget {
    pub fn barcode(value: u32, content: ArContent) -> Self {
        Self {
            marker_type: MarkerType::Barcode,
            value: Some(value),
            content,
        }
    }

    pub fn hiro(content: ArContent) -> Self {
        Self {
            marker_type: MarkerType::Hiro,
            value: None,
            content,
        }
    }

    pub fn kanji(content: ArContent) -> Self {
        Self {
            marker_type: MarkerType::Kanji,
            value: None,
            content,
        }
    }

    pub fn key(&self) -> TargetKey {
        TargetKey {
            marker_type: self.marker_type,
            value: self.value,
        }
    }
}
