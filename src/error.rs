//! Error types for registry client operations

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Errors surfaced by the registry client.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Malformed base URL, raised only at client construction time.
    #[error("invalid registry configuration: {0}")]
    Config(#[from] ConfigError),
    /// URL composition failure during path resolution.
    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),
    /// Transport-level failure from the underlying HTTP client.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Rejection of a malformed [`Config`](crate::Config) base URL.
///
/// Only the client constructor produces these; path resolution and request
/// sending never do. Callers branch on the variant, not the message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Base URL has no scheme (`registry.terraform.io`) or no host
    /// (`https:///v2`).
    #[error("scheme and host are required")]
    MissingSchemeOrHost,
    /// Base URL carries a scheme the registry client does not speak.
    #[error("scheme must be http or https")]
    UnsupportedScheme,
    /// Base URL rejected by the URL parser for any other reason.
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(url::ParseError),
}
