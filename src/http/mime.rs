//! MIME type detection
//!
//! Maps file extensions to Content-Type values for the asset kinds a
//! front-end project directory typically contains.

/// Get the Content-Type for a file extension
pub fn content_type_for(extension: Option<&str>) -> &'static str {
    match extension {
        // Markup and styles
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css",
        Some("xml") => "application/xml",

        // Scripts and data
        Some("js" | "mjs") => "application/javascript",
        Some("json" | "map") => "application/json",
        Some("wasm") => "application/wasm",
        Some("txt" | "md") => "text/plain; charset=utf-8",

        // Images
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("ico") => "image/x-icon",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        // Media
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        Some("webm") => "video/webm",

        Some("pdf") => "application/pdf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_asset_types() {
        assert_eq!(content_type_for(Some("html")), "text/html; charset=utf-8");
        assert_eq!(content_type_for(Some("css")), "text/css");
        assert_eq!(content_type_for(Some("js")), "application/javascript");
        assert_eq!(content_type_for(Some("map")), "application/json");
        assert_eq!(content_type_for(Some("svg")), "image/svg+xml");
        assert_eq!(content_type_for(Some("woff2")), "font/woff2");
    }

    #[test]
    fn test_unknown_extension_falls_back() {
        assert_eq!(content_type_for(Some("dat")), "application/octet-stream");
        assert_eq!(content_type_for(None), "application/octet-stream");
    }
}
