use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::path::Path;

const DEFAULT_CONTENT_TYPE: &str = "text/plain";

/// File extension (lowercase) to MIME type
static CONTENT_TYPES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("html", "text/html"),
        ("htm", "text/html"),
        ("css", "text/css"),
        ("js", "application/javascript"),
        ("json", "application/json"),
        ("md", "text/markdown"),
        ("txt", "text/plain"),
        ("png", "image/png"),
        ("jpg", "image/jpeg"),
        ("jpeg", "image/jpeg"),
        ("svg", "image/svg+xml"),
    ])
});

/// MIME type for a file name, `text/plain` when the extension is unknown or absent.
pub fn content_type_for(file_name: &str) -> &'static str {
    Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(|ext| CONTENT_TYPES.get(ext.to_ascii_lowercase().as_str()).copied())
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_extensions() {
        assert_eq!(content_type_for("index.html"), "text/html");
        assert_eq!(content_type_for("styles.css"), "text/css");
        assert_eq!(content_type_for("src/app.js"), "application/javascript");
        assert_eq!(content_type_for("package.json"), "application/json");
        assert_eq!(content_type_for("README.md"), "text/markdown");
        assert_eq!(content_type_for("logo.PNG"), "image/png");
        assert_eq!(content_type_for("photo.jpg"), "image/jpeg");
        assert_eq!(content_type_for("icon.svg"), "image/svg+xml");
    }

    #[test]
    fn unknown_or_missing_extension_is_plain_text() {
        assert_eq!(content_type_for("main.rs"), "text/plain");
        assert_eq!(content_type_for("Makefile"), "text/plain");
        assert_eq!(content_type_for("notes.txt"), "text/plain");
    }
}
