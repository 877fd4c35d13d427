/// Extension used when the original name has none.
pub const DEFAULT_EXTENSION: &str = "jpg";

/// Lower-cased suffix of `name` after its last `.`, or [`DEFAULT_EXTENSION`].
///
/// ```
/// use art_upload::file_extension;
///
/// assert_eq!(file_extension("Marker.PNG"), "png");
/// assert_eq!(file_extension("archive.tar.gz"), "gz");
/// assert_eq!(file_extension("noext"), "jpg");
/// ```
pub fn file_extension(name: &str) -> String {
    match name.rsplit_once('.') {
        Some((_, ext)) if !ext.is_empty() => ext.to_lowercase(),
        _ => DEFAULT_EXTENSION.to_string(),
    }
}

/// Storage name for an upload: `marker-{code}-{millis}.{ext}`.
pub fn generate_storage_path(marker_code: u32, timestamp_ms: i64, original_name: &str) -> String {
    format!(
        "marker-{marker_code}-{timestamp_ms}.{}",
        file_extension(original_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_rules() {
        assert_eq!(file_extension("photo.JPEG"), "jpeg");
        assert_eq!(file_extension("photo.webp"), "webp");
        assert_eq!(file_extension("trailing."), "jpg");
        assert_eq!(file_extension(""), "jpg");
        assert_eq!(file_extension(".hidden"), "hidden");
    }

    #[test]
    fn path_format() {
        assert_eq!(
            generate_storage_path(5, 1_700_000_000_123, "Scan.PNG"),
            "marker-5-1700000000123.png"
        );
        assert_eq!(generate_storage_path(0, 1, "blob"), "marker-0-1.jpg");
    }
}
