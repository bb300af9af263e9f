//! Configuration for the registry client

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Per-request timeout applied when the caller does not choose one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Registry endpoint configuration.
///
/// Validation happens at client construction, not here: a `Config` is plain
/// data handed to [`RegistryClientBuilder`](crate::RegistryClientBuilder),
/// which rejects malformed base URLs with a
/// [`ConfigError`](crate::ConfigError).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Registry root endpoint, e.g. `https://registry.terraform.io` or
    /// `https://example.com/registry`. A non-root path is kept as a prefix
    /// for all resolved API paths.
    pub base_url: String,
    /// Per-request timeout applied to the underlying HTTP client.
    pub timeout: Duration,
}

impl Config {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
