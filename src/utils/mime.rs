//! MIME type detection for uploaded objects.
//!
//! Font formats are mapped explicitly because most default tables either
//! omit them or disagree on the type CDNs should serve them with.

use std::path::Path;

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const CSS: &str = "text/css; charset=utf-8";
    pub const JAVASCRIPT: &str = "application/javascript; charset=utf-8";
    pub const JSON: &str = "application/json";
    pub const XML: &str = "application/xml";

    // Binary
    pub const OCTET_STREAM: &str = "application/octet-stream";
    pub const WASM: &str = "application/wasm";
    pub const PDF: &str = "application/pdf";

    // Images
    pub const PNG: &str = "image/png";
    pub const JPEG: &str = "image/jpeg";
    pub const GIF: &str = "image/gif";
    pub const WEBP: &str = "image/webp";
    pub const AVIF: &str = "image/avif";
    pub const SVG: &str = "image/svg+xml";
    pub const ICO: &str = "image/x-icon";
    pub const BMP: &str = "image/bmp";

    // Audio / video
    pub const MP3: &str = "audio/mpeg";
    pub const MP4: &str = "video/mp4";
    pub const WEBM: &str = "video/webm";

    // Fonts
    pub const OPENTYPE: &str = "font/opentype";
    pub const WOFF: &str = "font/woff";
    pub const WOFF2: &str = "font/woff2";
}

/// Guess MIME type from a file path or storage key.
pub fn from_path(path: impl AsRef<Path>) -> &'static str {
    let ext = path
        .as_ref()
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    from_extension(ext.as_deref())
}

/// Guess MIME type from a lowercase extension (without the dot).
pub fn from_extension(ext: Option<&str>) -> &'static str {
    match ext {
        Some("html" | "htm") => types::HTML,
        Some("css") => types::CSS,
        Some("js" | "mjs" | "cjs") => types::JAVASCRIPT,
        Some("json" | "map") => types::JSON,
        Some("xml") => types::XML,
        Some("txt") => types::PLAIN,

        Some("svg") => types::SVG,
        Some("png") => types::PNG,
        Some("jpg" | "jpeg") => types::JPEG,
        Some("gif") => types::GIF,
        Some("webp") => types::WEBP,
        Some("avif") => types::AVIF,
        Some("ico") => types::ICO,
        Some("bmp") => types::BMP,

        Some("mp3") => types::MP3,
        Some("mp4" | "m4v") => types::MP4,
        Some("webm") => types::WEBM,

        // Served as opentype regardless of container
        Some("otf" | "eot" | "ttf") => types::OPENTYPE,
        Some("woff") => types::WOFF,
        Some("woff2") => types::WOFF2,

        Some("pdf") => types::PDF,
        Some("wasm") => types::WASM,

        _ => types::OCTET_STREAM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_from_path() {
        assert_eq!(from_path(PathBuf::from("style.css")), types::CSS);
        assert_eq!(from_path(PathBuf::from("app.js")), types::JAVASCRIPT);
        assert_eq!(from_path(PathBuf::from("app.js.map")), types::JSON);
        assert_eq!(from_path(PathBuf::from("logo.PNG")), types::PNG);
        assert_eq!(from_path("js/abc.js"), types::JAVASCRIPT);
        assert_eq!(from_path(PathBuf::from("unknown.xyz")), types::OCTET_STREAM);
        assert_eq!(from_path(PathBuf::from("Makefile")), types::OCTET_STREAM);
    }

    #[test]
    fn test_font_overrides() {
        assert_eq!(from_path("fonts/a.otf"), types::OPENTYPE);
        assert_eq!(from_path("fonts/a.eot"), types::OPENTYPE);
        assert_eq!(from_path("fonts/a.ttf"), types::OPENTYPE);
        assert_eq!(from_path("fonts/a.woff"), types::WOFF);
        assert_eq!(from_path("fonts/a.woff2"), types::WOFF2);
        assert_eq!(from_path("images/icon.svg"), "image/svg+xml");
    }
}
