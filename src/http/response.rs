//! HTTP response building module
//!
//! Every builder takes a `Builder` that already carries the headers shared by
//! all responses (CORS, `ETag`, `Cache-Control`) and adds status-specific ones.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::header::{
    HeaderValue, ACCEPT_RANGES, ALLOW, CONTENT_LENGTH, CONTENT_RANGE, CONTENT_TYPE,
};
use hyper::http::response::Builder;
use hyper::{Response, StatusCode};

const ALLOWED_METHODS: &str = "GET, HEAD, OPTIONS";

/// Build 304 Not Modified response
pub fn build_304_response(builder: Builder) -> Response<Full<Bytes>> {
    finish(builder.status(StatusCode::NOT_MODIFIED), Bytes::new(), "304")
}

/// Build 404 Not Found response
pub fn build_404_response(builder: Builder, is_head: bool) -> Response<Full<Bytes>> {
    text_response(builder.status(StatusCode::NOT_FOUND), "404 Not Found", is_head)
}

/// Build 405 Method Not Allowed response
pub fn build_405_response(builder: Builder) -> Response<Full<Bytes>> {
    text_response(
        builder
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header(ALLOW, ALLOWED_METHODS),
        "405 Method Not Allowed",
        false,
    )
}

/// Build OPTIONS response (preflight request)
pub fn build_options_response(builder: Builder) -> Response<Full<Bytes>> {
    finish(
        builder
            .status(StatusCode::NO_CONTENT)
            .header(ALLOW, ALLOWED_METHODS),
        Bytes::new(),
        "OPTIONS",
    )
}

/// Build 416 Range Not Satisfiable response
pub fn build_416_response(builder: Builder, file_size: u64) -> Response<Full<Bytes>> {
    text_response(
        builder
            .status(StatusCode::RANGE_NOT_SATISFIABLE)
            .header(CONTENT_RANGE, format!("bytes */{file_size}")),
        "416 Range Not Satisfiable",
        false,
    )
}

/// Build 200/206 response around file bytes already read from disk
///
/// `content_length` is the length of the full representation being
/// described, so `HEAD` can report it without reading the file.
pub fn build_file_response(
    builder: Builder,
    data: Bytes,
    content_length: u64,
    partial: Option<String>,
) -> Response<Full<Bytes>> {
    let builder = builder
        .header(CONTENT_LENGTH, content_length)
        .header(ACCEPT_RANGES, "bytes");

    match partial {
        Some(content_range) => finish(
            builder
                .status(StatusCode::PARTIAL_CONTENT)
                .header(CONTENT_RANGE, content_range),
            data,
            "206",
        ),
        None => finish(builder.status(StatusCode::OK), data, "200"),
    }
}

/// Plain-text error body; error pages never inherit a content encoding
fn text_response(builder: Builder, message: &'static str, is_head: bool) -> Response<Full<Bytes>> {
    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from_static(message.as_bytes())
    };

    finish(
        builder
            .header(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"))
            .header(CONTENT_LENGTH, message.len()),
        body,
        message,
    )
}

fn finish(builder: Builder, body: Bytes, label: &str) -> Response<Full<Bytes>> {
    builder.body(Full::new(body)).unwrap_or_else(|e| {
        log_build_error(label, &e);
        let mut resp = Response::new(Full::new(Bytes::new()));
        *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        resp
    })
}

/// Log response build error
fn log_build_error(status: &str, error: &hyper::http::Error) {
    crate::logger::log_error(&format!("Failed to build {status} response: {error}"));
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_of(resp: Response<Full<Bytes>>) -> Bytes {
        resp.into_body().collect().await.unwrap().to_bytes()
    }

    #[tokio::test]
    async fn test_304_has_no_body() {
        let resp = build_304_response(Response::builder().header("ETag", "v1"));
        assert_eq!(resp.status(), StatusCode::NOT_MODIFIED);
        assert_eq!(resp.headers()["etag"], "v1");
        assert!(body_of(resp).await.is_empty());
    }

    #[tokio::test]
    async fn test_404_head_has_no_body() {
        let resp = build_404_response(Response::builder(), true);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(resp.headers()[CONTENT_LENGTH], "13");
        assert!(body_of(resp).await.is_empty());
    }

    #[test]
    fn test_unbuildable_response_is_500() {
        let builder = Response::builder().header("access-control-allow-origin", "bad\nvalue");
        let resp = build_304_response(builder);
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_416_reports_size() {
        let resp = build_416_response(Response::builder(), 42);
        assert_eq!(resp.status(), StatusCode::RANGE_NOT_SATISFIABLE);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes */42");
    }

    #[tokio::test]
    async fn test_partial_file_response() {
        let resp = build_file_response(
            Response::builder(),
            Bytes::from_static(b"llo"),
            3,
            Some("bytes 2-4/5".to_string()),
        );
        assert_eq!(resp.status(), StatusCode::PARTIAL_CONTENT);
        assert_eq!(resp.headers()[CONTENT_RANGE], "bytes 2-4/5");
        assert_eq!(resp.headers()[CONTENT_LENGTH], "3");
        assert_eq!(body_of(resp).await, Bytes::from_static(b"llo"));
    }
}
