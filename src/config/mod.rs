// Configuration module entry point
// Loads the immutable server configuration and the deployed version token

mod error;
mod state;
mod types;
mod version;

use hyper::header::HeaderValue;
use std::net::SocketAddr;

// Re-export public types
pub use error::ConfigError;
pub use state::AppState;
pub use types::{AssetsConfig, Config, CorsConfig, LoggingConfig, PerformanceConfig, ServerConfig};
pub use version::{VersionToken, VERSION_ENV_VAR};

/// Default config file name (without extension)
pub const DEFAULT_CONFIG_PATH: &str = "config";

impl Config {
    /// Load configuration from specified file path (without extension)
    ///
    /// The file is optional; `SERVER_`-prefixed environment variables override
    /// it, with `__` separating section and key (`SERVER_SERVER__PORT=8080`).
    pub fn load_from(config_path: &str) -> Result<Self, ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("SERVER")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 5173)?
            .set_default("server.backlog", 1024)?
            .set_default("assets.static_dir", "bin")?
            .set_default("assets.compressed_wasm_path", "/main.wasm.br")?
            .set_default("assets.index_files", vec!["index.html"])?
            .set_default("cors.allow_origin", "*")?
            .set_default("cors.allow_methods", "GET")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("performance.keep_alive", true)?
            .set_default("performance.connection_timeout", 30)?
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| ConfigError::InvalidAddress(format!("{e}")))
    }

    /// Reject values that would make every response fail to build
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_header_value("cors.allow_origin", &self.cors.allow_origin)?;
        check_header_value("cors.allow_methods", &self.cors.allow_methods)?;
        self.get_socket_addr().map(|_| ())
    }
}

fn check_header_value(key: &'static str, value: &str) -> Result<(), ConfigError> {
    HeaderValue::from_str(value)
        .map(|_| ())
        .map_err(|_| ConfigError::InvalidHeader {
            key,
            value: value.to_string(),
        })
}

impl AppState {
    /// Build the full startup state
    ///
    /// The version token is checked first so a missing token is reported even
    /// when the config file is also broken.
    pub fn load(config_path: &str) -> Result<Self, ConfigError> {
        Self::load_with(config_path, |key| std::env::var(key).ok())
    }

    /// Same as [`AppState::load`], reading the version through `lookup`
    pub fn load_with<F>(config_path: &str, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let version = VersionToken::from_lookup(lookup)?;
        let config = Config::load_from(config_path)?;
        config.validate()?;
        Ok(Self::new(config, version))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_defaults_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing");
        let cfg = Config::load_from(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.server.port, 5173);
        assert_eq!(cfg.assets.static_dir, "bin");
        assert_eq!(cfg.assets.compressed_wasm_path, "/main.wasm.br");
        assert_eq!(cfg.assets.index_files, vec!["index.html".to_string()]);
        assert_eq!(cfg.cors.allow_origin, "*");
        assert_eq!(cfg.cors.allow_methods, "GET");
        assert!(cfg.logging.access_log);
        assert_eq!(cfg.performance.connection_timeout, 30);
        assert!(cfg.performance.max_connections.is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        fs::write(
            &path,
            "[server]\nport = 9000\n\n\
             [assets]\nstatic_dir = \"dist\"\ncompressed_wasm_path = \"/app.wasm.br\"\n",
        )
        .unwrap();

        let cfg = Config::load_from(dir.path().join("server").to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.assets.static_dir, "dist");
        assert_eq!(cfg.assets.compressed_wasm_path, "/app.wasm.br");
        // Untouched keys keep their defaults
        assert_eq!(cfg.server.host, "127.0.0.1");
    }

    #[test]
    fn test_missing_version_checked_before_config() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.toml"), "[server\nport = ").unwrap();
        let path = dir.path().join("broken");

        let result = AppState::load_with(path.to_str().unwrap(), |_| None);
        assert!(matches!(
            result,
            Err(ConfigError::MissingVersion { var: VERSION_ENV_VAR })
        ));
    }

    #[test]
    fn test_load_with_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent");

        let state = AppState::load_with(path.to_str().unwrap(), |key| {
            (key == VERSION_ENV_VAR).then(|| "build-42".to_string())
        })
        .unwrap();
        assert_eq!(state.version.as_str(), "build-42");
        assert_eq!(state.config.server.port, 5173);
    }

    #[test]
    fn test_invalid_cors_value_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("cors.toml"),
            "[cors]\nallow_origin = \"bad\\nvalue\"\n",
        )
        .unwrap();
        let path = dir.path().join("cors");

        let result = AppState::load_with(path.to_str().unwrap(), |_| Some("v1".to_string()));
        assert!(matches!(
            result,
            Err(ConfigError::InvalidHeader {
                key: "cors.allow_origin",
                ..
            })
        ));
    }

    #[test]
    fn test_invalid_address() {
        let dir = tempfile::tempdir().unwrap();
        let mut cfg = Config::load_from(dir.path().join("none").to_str().unwrap()).unwrap();
        cfg.server.host = "not an address".to_string();
        assert!(matches!(
            cfg.get_socket_addr(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }
}
