use std::fmt;

use art_types::ContentType;
use tracing::debug;

/// Page hosting the embedded AR scene.
pub const DEFAULT_LAUNCH_PAGE: &str = "./assets/aframe-ar.html";

/// What the embedded AR view is opened with.
///
/// The view only takes a content-type hint; it reads marker bindings from
/// the persisted registry on its own.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ArLaunch {
    page: String,
    content_type: ContentType,
}

impl ArLaunch {
    pub fn new(page: impl Into<String>, content_type: ContentType) -> Self {
        Self {
            page: page.into(),
            content_type,
        }
    }

    /// Launch from a free-form hint; unknown hints fall back to `box`.
    pub fn from_hint(page: impl Into<String>, hint: &str) -> Self {
        let content_type = hint.trim().parse().unwrap_or_else(|_| {
            debug!(hint, "unknown AR content hint, using box");
            ContentType::Box
        });
        Self::new(page, content_type)
    }

    pub fn content_type(&self) -> ContentType {
        self.content_type
    }

    /// URL the embedding surface loads.
    pub fn url(&self) -> String {
        format!("{}?type={}", self.page, self.content_type)
    }
}

impl fmt::Display for ArLaunch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.url())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_carries_type() {
        let l = ArLaunch::new(DEFAULT_LAUNCH_PAGE, ContentType::Sphere);
        assert_eq!(l.url(), "./assets/aframe-ar.html?type=sphere");
        assert_eq!(l.to_string(), l.url());
    }

    #[test]
    fn hint_parsing() {
        assert_eq!(ArLaunch::from_hint("p", "torus").content_type(), ContentType::Torus);
        assert_eq!(ArLaunch::from_hint("p", " image ").content_type(), ContentType::Image);
        assert_eq!(ArLaunch::from_hint("p", "pyramid").content_type(), ContentType::Box);
        assert_eq!(ArLaunch::from_hint("p", "").url(), "p?type=box");
    }
}
