//! Request dispatch module
//!
//! The single catch-all handler: shared headers, version revalidation, then
//! delegation to the static file server.

use crate::config::AppState;
use crate::handler::static_files::{self, BROTLI_WASM};
use crate::http::{self, CacheOutcome};
use crate::logger::{self, AccessLogEntry};
use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    CACHE_CONTROL, ETAG, IF_NONE_MATCH, RANGE, REFERER, USER_AGENT,
};
use hyper::http::request::Parts;
use hyper::http::response::Builder;
use hyper::{Method, Request, Response};
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

/// Request context encapsulating information needed for request processing
pub struct RequestContext<'a> {
    /// Raw (still percent-encoded) request path
    pub path: &'a str,
    pub is_head: bool,
    /// Raw `If-None-Match` bytes, empty when absent
    pub if_none_match: &'a [u8],
    pub range_header: Option<&'a str>,
}

/// Main entry point for HTTP request handling
///
/// The request body is never read, so any body type is accepted.
pub async fn handle_request<B>(
    req: Request<B>,
    state: Arc<AppState>,
    remote_addr: SocketAddr,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let started = Instant::now();
    let (parts, _) = req.into_parts();

    let ctx = RequestContext {
        path: parts.uri.path(),
        is_head: parts.method == Method::HEAD,
        if_none_match: parts
            .headers
            .get(IF_NONE_MATCH)
            .map_or(&[][..], HeaderValue::as_bytes),
        range_header: header_str(&parts, &RANGE),
    };

    let builder = shared_headers(&state);

    let (response, outcome) = match parts.method {
        Method::GET | Method::HEAD => {
            let outcome = http::revalidate(ctx.if_none_match, state.version.as_str());
            logger::log_cache_outcome(
                outcome,
                ctx.path,
                &http::token_diff(ctx.if_none_match, state.version.as_str()),
            );
            let response = match outcome {
                // No filesystem access on this branch
                CacheOutcome::Cached => http::build_304_response(builder),
                CacheOutcome::Served => serve_bundle(&ctx, &state, builder).await,
            };
            (response, Some(outcome))
        }
        Method::OPTIONS => (http::build_options_response(builder), None),
        ref method => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            (http::build_405_response(builder), None)
        }
    };

    if state.config.logging.access_log {
        log_access(&parts, &ctx, &state, &response, outcome, remote_addr, started);
    }

    Ok(response)
}

/// Headers every response carries, whatever its status
fn shared_headers(state: &AppState) -> Builder {
    Response::builder()
        .header(ACCESS_CONTROL_ALLOW_ORIGIN, state.config.cors.allow_origin.as_str())
        .header(ACCESS_CONTROL_ALLOW_METHODS, state.config.cors.allow_methods.as_str())
        .header(ETAG, state.version.as_str())
        .header(CACHE_CONTROL, http::CACHE_CONTROL)
}

/// Serve a stale or first-time request from the bundle directory
async fn serve_bundle(
    ctx: &RequestContext<'_>,
    state: &AppState,
    builder: Builder,
) -> Response<Full<Bytes>> {
    let assets = &state.config.assets;
    let pre_encoded = (ctx.path == assets.compressed_wasm_path).then_some(BROTLI_WASM);

    static_files::serve(ctx, &assets.static_dir, &assets.index_files, pre_encoded, builder).await
}

fn header_str<'a>(parts: &'a Parts, name: &HeaderName) -> Option<&'a str> {
    parts.headers.get(name).and_then(|v| v.to_str().ok())
}

fn log_access(
    parts: &Parts,
    ctx: &RequestContext<'_>,
    state: &AppState,
    response: &Response<Full<Bytes>>,
    outcome: Option<CacheOutcome>,
    remote_addr: SocketAddr,
    started: Instant,
) {
    let mut entry = AccessLogEntry::new(
        remote_addr.ip().to_string(),
        parts.method.to_string(),
        ctx.path.to_string(),
    );
    entry.query = parts.uri.query().map(ToString::to_string);
    entry.http_version = logger::http_version_label(parts.version).to_string();
    entry.status = response.status().as_u16();
    entry.body_bytes = response.body().size_hint().exact().unwrap_or(0);
    entry.referer = header_str(parts, &REFERER).map(ToString::to_string);
    entry.user_agent = header_str(parts, &USER_AGENT).map(ToString::to_string);
    entry.request_time_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX);
    entry.cache_status = outcome;
    entry.etag_diff = outcome.map(|_| http::token_diff(ctx.if_none_match, state.version.as_str()));

    logger::log_access(&entry, &state.config.logging.access_log_format);
}
