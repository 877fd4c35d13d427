use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::TypeError;

/// Extra renderer properties carried through untouched.
///
/// Anything the renderer understands but this crate does not model lands
/// here on read and is written back verbatim.
pub type Extra = BTreeMap<String, Value>;

/// What kind of content is rendered on a marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Image,
    Box,
    Sphere,
    Cylinder,
    Torus,
}

impl ContentType {
    pub const ALL: [ContentType; 5] = [
        Self::Image,
        Self::Box,
        Self::Sphere,
        Self::Cylinder,
        Self::Torus,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Box => "box",
            Self::Sphere => "sphere",
            Self::Cylinder => "cylinder",
            Self::Torus => "torus",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentType {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| TypeError::UnknownContentType(s.to_string()))
    }
}

/// A flat image anchored to the marker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageContent {
    /// URL the renderer loads the texture from.
    pub src: String,
    #[serde(flatten)]
    pub extra: Extra,
}

/// Styling shared by all geometric primitives.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animation: Option<String>,
    #[serde(flatten)]
    pub extra: Extra,
}

impl PrimitiveContent {
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    pub fn with_animation(mut self, animation: impl Into<String>) -> Self {
        self.animation = Some(animation.into());
        self
    }
}

/// Renderable content bound to a marker.
///
/// Serialized with an inline `type` discriminator, e.g.
/// `{"type":"image","src":"https://..."}` or
/// `{"type":"box","color":"#4CC3D9","opacity":0.8}`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ArContent {
    Image(ImageContent),
    Box(PrimitiveContent),
    Sphere(PrimitiveContent),
    Cylinder(PrimitiveContent),
    Torus(PrimitiveContent),
}

impl ArContent {
    /// Image content with no extra properties.
    pub fn image(src: impl Into<String>) -> Self {
        Self::Image(ImageContent {
            src: src.into(),
            extra: Extra::new(),
        })
    }

    /// A geometric primitive of the given type.
    ///
    /// Returns `None` for [`ContentType::Image`], which needs a source URL.
    pub fn primitive(kind: ContentType, style: PrimitiveContent) -> Option<Self> {
        match kind {
            ContentType::Image => None,
            ContentType::Box => Some(Self::Box(style)),
            ContentType::Sphere => Some(Self::Sphere(style)),
            ContentType::Cylinder => Some(Self::Cylinder(style)),
            ContentType::Torus => Some(Self::Torus(style)),
        }
    }

    pub fn content_type(&self) -> ContentType {
        match self {
            Self::Image(_) => ContentType::Image,
            Self::Box(_) => ContentType::Box,
            Self::Sphere(_) => ContentType::Sphere,
            Self::Cylinder(_) => ContentType::Cylinder,
            Self::Torus(_) => ContentType::Torus,
        }
    }

    /// Image source URL, if this is image content.
    pub fn src(&self) -> Option<&str> {
        match self {
            Self::Image(img) => Some(&img.src),
            _ => None,
        }
    }

    pub fn extra(&self) -> &Extra {
        match self {
            Self::Image(img) => &img.extra,
            Self::Box(p) | Self::Sphere(p) | Self::Cylinder(p) | Self::Torus(p) => &p.extra,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn content_type_parse_roundtrip() {
        for t in ContentType::ALL {
            assert_eq!(t.as_str().parse::<ContentType>().unwrap(), t);
        }
        assert!("cone".parse::<ContentType>().is_err());
    }

    #[test]
    fn image_serializes_with_inline_tag() {
        let c = ArContent::image("https://cdn/x.png");
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v, json!({"type": "image", "src": "https://cdn/x.png"}));
    }

    #[test]
    fn primitive_omits_unset_fields() {
        let c = ArContent::Sphere(PrimitiveContent::default().with_color("red").with_radius(0.5));
        let v = serde_json::to_value(&c).unwrap();
        assert_eq!(v, json!({"type": "sphere", "color": "red", "radius": 0.5}));
    }

    #[test]
    fn unknown_fields_pass_through() {
        let raw = json!({
            "type": "box",
            "color": "#4CC3D9",
            "position": "0 0.5 0",
            "rotation": {"x": 0, "y": 45}
        });
        let c: ArContent = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(c.content_type(), ContentType::Box);
        assert_eq!(c.extra().get("position"), Some(&json!("0 0.5 0")));
        assert_eq!(serde_json::to_value(&c).unwrap(), raw);
    }

    #[test]
    fn image_requires_src() {
        let raw = json!({"type": "image"});
        assert!(serde_json::from_value::<ArContent>(raw).is_err());
    }

    #[test]
    fn unknown_content_type_is_rejected() {
        let raw = json!({"type": "cone", "color": "blue"});
        assert!(serde_json::from_value::<ArContent>(raw).is_err());
    }

    #[test]
    fn primitive_constructor() {
        assert!(ArContent::primitive(ContentType::Image, PrimitiveContent::default()).is_none());
        let torus = ArContent::primitive(ContentType::Torus, PrimitiveContent::default()).unwrap();
        assert_eq!(torus.content_type(), ContentType::Torus);
        assert!(torus.src().is_none());
    }
}
