//! MIME type detection module
//!
//! Resolves a Content-Type from a file path in three steps: a small override
//! table, then the general `mime_guess` database, then `text/plain`.

use std::path::Path;

/// Fallback when nothing else matches
pub const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// Extensions whose type is pinned regardless of the general lookup
const OVERRIDES: [(&str, &str); 3] = [
    ("css", "text/css"),
    ("js", "application/javascript"),
    ("csv", "text/csv"),
];

/// Get MIME Content-Type for a file path
///
/// # Examples
/// ```ignore
/// assert_eq!(content_type_for(Path::new("styles.css")), "text/css");
/// assert_eq!(content_type_for(Path::new("logo.png")), "image/png");
/// assert_eq!(content_type_for(Path::new("NOTES")), "text/plain");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path.extension().and_then(|e| e.to_str());

    extension
        .and_then(override_for)
        .or_else(|| mime_guess::from_path(path).first_raw())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

fn override_for(extension: &str) -> Option<&'static str> {
    OVERRIDES
        .iter()
        .find(|(ext, _)| ext.eq_ignore_ascii_case(extension))
        .map(|(_, ct)| *ct)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ct(path: &str) -> &'static str {
        content_type_for(Path::new(path))
    }

    #[test]
    fn test_overrides() {
        assert_eq!(ct("styles.css"), "text/css");
        assert_eq!(ct("script.js"), "application/javascript");
        assert_eq!(ct("feed-times.csv"), "text/csv");
        assert_eq!(ct("OLD.JS"), "application/javascript");
    }

    #[test]
    fn test_general_lookup() {
        assert_eq!(ct("index.html"), "text/html");
        assert_eq!(ct("Branding/logo.png"), "image/png");
        assert_eq!(ct("manifest.json"), "application/json");
        assert_eq!(ct("photo.jpeg"), "image/jpeg");
    }

    #[test]
    fn test_default() {
        assert_eq!(ct("LICENSE"), DEFAULT_CONTENT_TYPE);
        assert_eq!(ct("data.unknownext"), DEFAULT_CONTENT_TYPE);
    }
}
