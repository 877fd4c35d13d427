use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;

/// Highest barcode value in the 3x3 matrix code set the renderer ships with.
///
/// Not enforced: values above it are stored as-is and simply never match a
/// physical marker.
pub const MAX_BARCODE_VALUE: u32 = 63;

/// Kind of visual pattern the AR engine recognizes.
///
/// `Hiro` and `Kanji` are preset patterns and carry no value. `Barcode`
/// markers are told apart by their numeric value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerType {
    Hiro,
    Kanji,
    Barcode,
}

impl MarkerType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hiro => "hiro",
            Self::Kanji => "kanji",
            Self::Barcode => "barcode",
        }
    }

    /// Returns `true` for preset patterns that are bound at most once.
    pub fn is_preset(&self) -> bool {
        !matches!(self, Self::Barcode)
    }
}

impl fmt::Display for MarkerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MarkerType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hiro" => Ok(Self::Hiro),
            "kanji" => Ok(Self::Kanji),
            "barcode" => Ok(Self::Barcode),
            other => Err(TypeError::UnknownMarkerType(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_parse_agree() {
        for m in [MarkerType::Hiro, MarkerType::Kanji, MarkerType::Barcode] {
            assert_eq!(m.to_string().parse::<MarkerType>().unwrap(), m);
        }
    }

    #[test]
    fn parse_rejects_unknown() {
        assert_eq!(
            "matrix".parse::<MarkerType>(),
            Err(TypeError::UnknownMarkerType("matrix".into()))
        );
    }

    #[test]
    fn serde_uses_lowercase() {
        let json = serde_json::to_string(&MarkerType::Barcode).unwrap();
        assert_eq!(json, "\"barcode\"");
        let back: MarkerType = serde_json::from_str("\"kanji\"").unwrap();
        assert_eq!(back, MarkerType::Kanji);
    }

    #[test]
    fn presets() {
        assert!(MarkerType::Hiro.is_preset());
        assert!(MarkerType::Kanji.is_preset());
        assert!(!MarkerType::Barcode.is_preset());
    }
}
