// Deployed build version module
// Holds the token clients revalidate their cached bundle against

use hyper::header::HeaderValue;
use std::fmt;

use super::error::ConfigError;

/// Environment variable carrying the deployed build version
pub const VERSION_ENV_VAR: &str = "WASM_BINARY_VERSION";

/// Opaque identifier of the currently deployed build
///
/// Sent verbatim as the `ETag` of every response. Never empty, so an absent
/// `If-None-Match` header can never match it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionToken(String);

impl VersionToken {
    /// Validate a raw token, rejecting empty values and values that cannot
    /// travel in a header
    pub fn new(raw: impl Into<String>) -> Result<Self, ConfigError> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(ConfigError::MissingVersion {
                var: VERSION_ENV_VAR,
            });
        }
        if HeaderValue::from_str(&raw).is_err() {
            return Err(ConfigError::InvalidVersion(raw));
        }
        Ok(Self(raw))
    }

    /// Read the token through `lookup`, which maps a variable name to its value
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        Self::new(lookup(VERSION_ENV_VAR).unwrap_or_default())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_token_rejected() {
        let err = VersionToken::new("").unwrap_err();
        assert!(err.to_string().contains(VERSION_ENV_VAR));
    }

    #[test]
    fn test_non_header_token_rejected() {
        let result = VersionToken::new("v1\nInjected: yes");
        assert!(matches!(result, Err(ConfigError::InvalidVersion(_))));
    }

    #[test]
    fn test_lookup_missing_variable() {
        let result = VersionToken::from_lookup(|_| None);
        assert!(matches!(result, Err(ConfigError::MissingVersion { .. })));
    }

    #[test]
    fn test_lookup_reads_named_variable() {
        let token = VersionToken::from_lookup(|key| {
            (key == VERSION_ENV_VAR).then(|| "v123".to_string())
        })
        .unwrap();
        assert_eq!(token.as_str(), "v123");
        assert_eq!(token.to_string(), "v123");
    }
}
