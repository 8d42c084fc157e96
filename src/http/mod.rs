//! HTTP protocol layer module
//!
//! Revalidation, range, MIME and response-building primitives, kept apart
//! from request dispatch so each can be tested on its own.

pub mod cache;
pub mod mime;
pub mod range;
pub mod response;

// Re-export commonly used types
pub use cache::{revalidate, token_diff, CacheOutcome, CACHE_CONTROL};
pub use range::{evaluate_range, ByteRange, RangeOutcome};
pub use response::{
    build_304_response, build_404_response, build_405_response, build_416_response,
    build_file_response, build_options_response,
};
