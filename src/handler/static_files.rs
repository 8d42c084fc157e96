//! Static file serving module
//!
//! Resolves request paths under the bundle directory and answers with the
//! file bytes, honouring single byte ranges and `HEAD`.

use crate::handler::router::RequestContext;
use crate::http::{self, mime, ByteRange, RangeOutcome};
use crate::logger;
use chrono::{DateTime, Utc};
use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{CONTENT_ENCODING, CONTENT_TYPE, LAST_MODIFIED, VARY};
use hyper::http::response::Builder;
use hyper::Response;
use std::io::{self, SeekFrom};
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;
use tokio::fs::{self, File};
use tokio::io::{AsyncReadExt, AsyncSeekExt};

/// Headers describing a file stored already encoded on disk
///
/// Applied only when the file is actually served; error responses keep their
/// plain-text body and headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreEncoded {
    pub content_encoding: &'static str,
    pub content_type: &'static str,
}

/// The Brotli-compressed WebAssembly binary
pub const BROTLI_WASM: PreEncoded = PreEncoded {
    content_encoding: "br",
    content_type: mime::WASM_CONTENT_TYPE,
};

/// Serve a file from `static_dir`
///
/// `builder` already carries the shared response headers.
pub async fn serve(
    ctx: &RequestContext<'_>,
    static_dir: &str,
    index_files: &[String],
    pre_encoded: Option<PreEncoded>,
    builder: Builder,
) -> Response<Full<Bytes>> {
    let Some(file_path) = resolve_path(static_dir, ctx.path, index_files).await else {
        return http::build_404_response(builder, ctx.is_head);
    };

    match open_file(&file_path).await {
        Ok((file, size, modified)) => {
            let content_type =
                pre_encoded.map_or_else(|| mime::content_type_for(&file_path), |p| p.content_type);
            let mut builder = builder.header(CONTENT_TYPE, content_type);
            if let Some(modified) = modified {
                builder = builder.header(LAST_MODIFIED, http_date(modified));
            }
            if let Some(p) = pre_encoded {
                builder = builder
                    .header(VARY, "Accept-Encoding")
                    .header(CONTENT_ENCODING, p.content_encoding);
            }
            respond_with_file(ctx, file, size, builder).await
        }
        Err(e) => {
            if e.kind() != io::ErrorKind::NotFound {
                logger::log_error(&format!(
                    "Failed to open file '{}': {e}",
                    file_path.display()
                ));
            }
            http::build_404_response(builder, ctx.is_head)
        }
    }
}

/// Read the requested span and build the 200/206/416 response
async fn respond_with_file(
    ctx: &RequestContext<'_>,
    mut file: File,
    size: u64,
    builder: Builder,
) -> Response<Full<Bytes>> {
    let (span, partial) = match http::evaluate_range(ctx.range_header, size) {
        RangeOutcome::Partial(range) => (Some(range), Some(range.content_range(size))),
        RangeOutcome::NotSatisfiable => return http::build_416_response(builder, size),
        RangeOutcome::Full => (None, None),
    };
    let content_length = span.map_or(size, ByteRange::len);

    if ctx.is_head {
        return http::build_file_response(builder, Bytes::new(), content_length, partial);
    }

    match read_span(&mut file, span, size).await {
        Ok(data) => http::build_file_response(builder, Bytes::from(data), content_length, partial),
        Err(e) => {
            logger::log_error(&format!("Failed to read file for '{}': {e}", ctx.path));
            http::build_404_response(builder, false)
        }
    }
}

async fn open_file(path: &Path) -> io::Result<(File, u64, Option<SystemTime>)> {
    let file = File::open(path).await?;
    let metadata = file.metadata().await?;
    if !metadata.is_file() {
        return Err(io::Error::new(io::ErrorKind::NotFound, "not a regular file"));
    }
    Ok((file, metadata.len(), metadata.modified().ok()))
}

async fn read_span(file: &mut File, span: Option<ByteRange>, size: u64) -> io::Result<Vec<u8>> {
    match span {
        Some(range) => {
            let len = usize::try_from(range.len())
                .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
            let mut buf = vec![0; len];
            file.seek(SeekFrom::Start(range.start)).await?;
            file.read_exact(&mut buf).await?;
            Ok(buf)
        }
        None => {
            let mut buf = Vec::with_capacity(usize::try_from(size).unwrap_or(0));
            file.read_to_end(&mut buf).await?;
            Ok(buf)
        }
    }
}

/// Map a request path to a file under `static_dir`
///
/// Returns `None` for undecodable paths, parent-directory segments, missing
/// files, directories without an index file, and anything whose canonical
/// location escapes `static_dir`.
pub async fn resolve_path(static_dir: &str, path: &str, index_files: &[String]) -> Option<PathBuf> {
    let decoded = urlencoding::decode(path).ok()?;
    if decoded.contains('\0') {
        return None;
    }

    let relative = Path::new(decoded.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let root = Path::new(static_dir);
    let mut file_path = root.join(relative);

    let is_dir = fs::metadata(&file_path).await.is_ok_and(|m| m.is_dir());
    if is_dir || decoded.ends_with('/') {
        file_path = find_index_file(&file_path, index_files).await?;
    }

    let root_canonical = match fs::canonicalize(root).await {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Static directory not found or inaccessible '{static_dir}': {e}"
            ));
            return None;
        }
    };

    // File not found is common (404), no need to log at warning level
    let file_canonical = fs::canonicalize(&file_path).await.ok()?;
    if !file_canonical.starts_with(&root_canonical) {
        logger::log_warning(&format!(
            "Path traversal attempt blocked: {} -> {}",
            path,
            file_canonical.display()
        ));
        return None;
    }

    Some(file_path)
}

async fn find_index_file(dir: &Path, index_files: &[String]) -> Option<PathBuf> {
    for index_file in index_files {
        let candidate = dir.join(index_file);
        if fs::metadata(&candidate).await.is_ok_and(|m| m.is_file()) {
            return Some(candidate);
        }
    }
    None
}

/// Format a timestamp as an IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn http_date(time: SystemTime) -> String {
    DateTime::<Utc>::from(time)
        .format("%a, %d %b %Y %H:%M:%S GMT")
        .to_string()
}
