//! Startup configuration errors
//!
//! Any of these aborts the process before a listener is bound.

use thiserror::Error;

use super::version::VERSION_ENV_VAR;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// The deployed version token is absent or empty
    #[error("You must set the env var: {var}")]
    MissingVersion { var: &'static str },

    /// The version token contains bytes not allowed in an `ETag` header
    #[error("Invalid {} value: {0:?}", VERSION_ENV_VAR)]
    InvalidVersion(String),

    /// Configuration file or environment overrides failed to load
    #[error("Configuration error: {0}")]
    Load(#[from] config::ConfigError),

    /// A configured value that is sent as a response header is not a legal
    /// header value
    #[error("Invalid {key} value: {value:?}")]
    InvalidHeader { key: &'static str, value: String },

    /// `server.host`/`server.port` do not form a socket address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}
