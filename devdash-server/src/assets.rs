//! Passthrough static responder
//!
//! Files the router does not compile are served raw, with the content type
//! chosen by extension convention. Dotfiles are allowed; this is a local
//! tool and the developer owns the tree.

use crate::error::ServeError;
use crate::http::Response;
use std::path::Path;

/// Content type by extension convention.
pub fn mime_for(extension: &str) -> &'static str {
    match extension {
        "css" => "text/css",
        "json" | "map" => "application/json",
        "txt" | "log" => "text/plain",
        "md" => "text/markdown",
        "xml" => "application/xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "wasm" => "application/wasm",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Serve the raw bytes of `path`.
pub fn serve(path: &Path) -> Result<Response, ServeError> {
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ServeError::NotFound
        } else {
            ServeError::Io(e)
        }
    })?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    Ok(Response::raw(mime_for(extension), bytes))
}
