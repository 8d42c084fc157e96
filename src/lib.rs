//! Cache-aware static server for a compiled WebAssembly bundle.
//!
//! Every response carries the deployed version token as its `ETag`. Clients
//! presenting that token in `If-None-Match` get `304 Not Modified` without
//! any disk access; everyone else gets the file, with Brotli headers on the
//! designated pre-compressed binary.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
