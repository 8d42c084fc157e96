//! Request handler module
//!
//! One catch-all handler deciding between "not modified" and serving the
//! bundle file.

pub mod router;
pub mod static_files;

// Re-export main entry point
pub use router::handle_request;
