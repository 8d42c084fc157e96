//! MIME type detection module
//!
//! Maps a served file's extension to its `Content-Type`.

use std::path::Path;

/// `Content-Type` of the pre-compressed WebAssembly binary
pub const WASM_CONTENT_TYPE: &str = "application/wasm";

/// Get MIME Content-Type for a file path
///
/// # Examples
/// ```
/// use std::path::Path;
/// use wasm_cache_server::http::mime::content_type_for;
/// assert_eq!(content_type_for(Path::new("bin/index.html")), "text/html; charset=utf-8");
/// assert_eq!(content_type_for(Path::new("bin/main.wasm")), "application/wasm");
/// assert_eq!(content_type_for(Path::new("bin/LICENSE")), "application/octet-stream");
/// ```
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        // Documents and styles
        Some("html" | "htm") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",

        // Scripts and application code
        Some("js" | "mjs") => "text/javascript; charset=utf-8",
        Some("json" | "map") => "application/json",
        Some("webmanifest") => "application/manifest+json",
        Some("wasm") => WASM_CONTENT_TYPE,

        // Images
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("webp") => "image/webp",

        // Fonts
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("otf") => "font/otf",

        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_types() {
        assert_eq!(
            content_type_for(Path::new("index.html")),
            "text/html; charset=utf-8"
        );
        assert_eq!(
            content_type_for(Path::new("wasm_exec.js")),
            "text/javascript; charset=utf-8"
        );
        assert_eq!(content_type_for(Path::new("main.wasm")), "application/wasm");
        assert_eq!(content_type_for(Path::new("icon.PNG")), "image/png");
    }

    #[test]
    fn test_unknown_extension() {
        // A bare .br file carries no type of its own
        assert_eq!(
            content_type_for(Path::new("main.wasm.br")),
            "application/octet-stream"
        );
        assert_eq!(
            content_type_for(Path::new("Makefile")),
            "application/octet-stream"
        );
    }
}
