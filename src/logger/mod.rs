//! Logger module
//!
//! Provides logging utilities for the HTTP server including:
//! - Server lifecycle logging
//! - Per-request cache outcome lines (`CACHED` / `SERVED`)
//! - Access logging with multiple formats
//! - Error and warning logging to stderr or a file

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::AppState;
use crate::http::CacheOutcome;
use hyper::Version;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(state: &AppState) -> std::io::Result<()> {
    writer::init(
        state.config.logging.access_log_file.as_deref(),
        state.config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

pub fn log_server_start(addr: &SocketAddr, state: &AppState) {
    let config = &state.config;
    write_info("======================================");
    write_info(&format!("Serving WASM app on: http://{addr}"));
    write_info(&format!("Version: {}", state.version));
    write_info(&format!("Static directory: {}", config.assets.static_dir));
    write_info(&format!(
        "Compressed binary: {}",
        config.assets.compressed_wasm_path
    ));
    if let Some(workers) = config.server.workers {
        write_info(&format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        write_info(&format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        write_info(&format!("Error log: {path}"));
    }
    write_info("======================================\n");
}

/// One line per revalidated request: `[CACHED] /path old -> current`
pub fn log_cache_outcome(outcome: CacheOutcome, path: &str, diff: &str) {
    write_info(&format_cache_outcome(outcome, path, diff));
}

fn format_cache_outcome(outcome: CacheOutcome, path: &str, diff: &str) -> String {
    format!("[{outcome}] {path} {diff}")
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    write_error(&format!("[ERROR] Failed to serve connection: {err:?}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

pub fn log_info(message: &str) {
    write_info(&format!("[INFO] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

/// Version label used in access log request lines
pub fn http_version_label(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}
