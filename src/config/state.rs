// Application state module
// Immutable state shared by every connection task

use super::types::Config;
use super::version::VersionToken;

/// Application state
///
/// Built once before the listener binds and never mutated afterwards, so
/// connection tasks share it through an `Arc` without locking.
#[derive(Debug)]
pub struct AppState {
    pub config: Config,
    pub version: VersionToken,
}

impl AppState {
    pub const fn new(config: Config, version: VersionToken) -> Self {
        Self { config, version }
    }
}
