//! Registry client construction and API path resolution
//!
//! The client validates its base URL once at construction, captures proxy
//! settings from the environment into the transport, and composes API paths
//! against the base URL while preserving any path prefix the registry is
//! mounted under (e.g. `https://example.com/registry`).

use reqwest::{Client, StatusCode};
use url::{Position, Url};

use crate::config::Config;
use crate::error::{ConfigError, Result};
use crate::proxy::ProxySelector;

pub struct RegistryClientBuilder {
    config: Config,
    http_client: Option<Client>,
}

impl RegistryClientBuilder {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            http_client: None,
        }
    }

    /// Inject a pre-built transport instead of the default one. The default
    /// transport applies the configured timeout and environment proxy
    /// settings; an injected client is used as-is.
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    pub fn build(self) -> Result<RegistryClient> {
        let base_url = validate_base_url(&self.config.base_url)?;

        let http_client = match self.http_client {
            Some(http_client) => http_client,
            None => {
                let selector = ProxySelector::from_env();
                Client::builder()
                    .timeout(self.config.timeout)
                    .proxy(reqwest::Proxy::custom(move |url| selector.proxy_for(url)))
                    .build()?
            }
        };

        tracing::debug!(base_url = %base_url, "registry client ready");

        Ok(RegistryClient {
            http_client,
            base_url,
        })
    }
}

/// Construction-time validation of the configured base URL. Every rejection
/// here is a [`ConfigError`]; nothing past construction produces one.
fn validate_base_url(raw: &str) -> std::result::Result<Url, ConfigError> {
    // WHATWG parsing swallows extra slashes after a special scheme, so a
    // host-less "https:///v2" would come back with host "v2". Catch the
    // empty authority on the raw string before the parser rewrites it.
    if let Some((_, rest)) = raw.split_once("://") {
        if rest.is_empty() || rest.starts_with('/') {
            return Err(ConfigError::MissingSchemeOrHost);
        }
    }

    let url = match Url::parse(raw) {
        Ok(url) => url,
        // An absolute-URL-less string ("registry.terraform.io") and a
        // host-less one ("https:///v2") are the same configuration mistake.
        Err(url::ParseError::RelativeUrlWithoutBase | url::ParseError::EmptyHost) => {
            return Err(ConfigError::MissingSchemeOrHost);
        }
        Err(err) => return Err(ConfigError::InvalidBaseUrl(err)),
    };

    if url.scheme().is_empty() || url.host_str().is_none_or(str::is_empty) {
        return Err(ConfigError::MissingSchemeOrHost);
    }
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::UnsupportedScheme);
    }

    Ok(url)
}

/// HTTP client for a provider registry, safe for concurrent use.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http_client: Client,
    base_url: Url,
}

impl RegistryClient {
    /// Construct a client with the default transport.
    pub fn new(config: Config) -> Result<Self> {
        Self::builder(config).build()
    }

    pub fn builder(config: Config) -> RegistryClientBuilder {
        RegistryClientBuilder::new(config)
    }

    /// The validated base URL, including any path prefix.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path (absolute within the registry's URL-path space,
    /// e.g. `/v2/providers/hashicorp/aws?include=...`) against the base
    /// URL. The base URL's path prefix is preserved and the query string
    /// passes through verbatim.
    ///
    /// An input that is itself an absolute URL contributes only its path
    /// and query; its scheme and host are discarded in favor of the
    /// configured base URL.
    pub fn resolve(&self, path: &str) -> Result<String> {
        let tail = match Url::parse(path) {
            Ok(full) => match full.query() {
                Some(query) => format!("{}?{}", full.path(), query),
                None => full.path().to_string(),
            },
            Err(_) => path.to_string(),
        };

        // scheme://host[:port] without the base path
        let root = &self.base_url[..Position::BeforePath];
        let prefix = self.base_url.path().trim_end_matches('/');
        let resolved = if tail.starts_with('/') {
            format!("{root}{prefix}{tail}")
        } else {
            format!("{root}{prefix}/{tail}")
        };

        // Composition must still be a valid URL before it goes on the wire.
        Url::parse(&resolved)?;
        Ok(resolved)
    }

    /// Issue a GET against a registry API path. No retries, no payload
    /// decoding; the caller owns the response.
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        let url = self.resolve(path)?;
        tracing::trace!(%url, "GET");
        let response = self.http_client.get(&url).send().await?;
        Ok(response)
    }

    /// Probe the registry's v2 API root and report the raw status code.
    pub async fn ping(&self) -> Result<StatusCode> {
        let response = self.get("/v2/").await?;
        Ok(response.status())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use std::time::Duration;

    fn client(base_url: &str) -> RegistryClient {
        RegistryClient::new(Config::new(base_url).with_timeout(Duration::from_secs(5)))
            .expect("client should build")
    }

    fn config_error(base_url: &str) -> ConfigError {
        let err = RegistryClient::new(Config::new(base_url)).expect_err("expected error");
        match err {
            RegistryError::Config(cfg) => cfg,
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn test_base_url_without_scheme_rejected() {
        let err = config_error("registry.terraform.io");
        assert_eq!(err, ConfigError::MissingSchemeOrHost);
        assert!(err.to_string().contains("scheme and host are required"));
    }

    #[test]
    fn test_base_url_without_host_rejected() {
        for base_url in ["https:///v2", "https://", "https:////v2"] {
            let err = config_error(base_url);
            assert_eq!(err, ConfigError::MissingSchemeOrHost, "base url {base_url:?}");
            assert!(err.to_string().contains("scheme and host are required"));
        }
    }

    #[test]
    fn test_base_url_with_unsupported_scheme_rejected() {
        let err = config_error("ftp://registry.terraform.io");
        assert_eq!(err, ConfigError::UnsupportedScheme);
        assert!(err.to_string().contains("scheme must be http or https"));
    }

    #[test]
    fn test_resolve_preserves_base_path_prefix() {
        let client = client("https://example.com/registry");
        let got = client
            .resolve("/v2/providers/hashicorp/aws?include=provider-versions")
            .unwrap();
        assert_eq!(
            got,
            "https://example.com/registry/v2/providers/hashicorp/aws?include=provider-versions"
        );
    }

    #[test]
    fn test_resolve_with_root_base_path() {
        let client = client("https://registry.terraform.io");
        let got = client.resolve("/v2/providers/hashicorp/aws").unwrap();
        assert_eq!(got, "https://registry.terraform.io/v2/providers/hashicorp/aws");
    }

    #[test]
    fn test_resolve_with_trailing_slash_on_base() {
        let client = client("https://example.com/registry/");
        let got = client.resolve("/v2/providers/hashicorp/aws").unwrap();
        assert_eq!(got, "https://example.com/registry/v2/providers/hashicorp/aws");
    }

    #[test]
    fn test_resolve_keeps_non_default_port() {
        let client = client("http://localhost:5000/registry");
        let got = client.resolve("/v2/providers/hashicorp/aws").unwrap();
        assert_eq!(got, "http://localhost:5000/registry/v2/providers/hashicorp/aws");
    }

    #[test]
    fn test_resolve_discards_foreign_scheme_and_host() {
        let client = client("https://example.com/registry");
        let got = client
            .resolve("https://evil.example.net/v2/providers/hashicorp/aws?include=x")
            .unwrap();
        assert_eq!(
            got,
            "https://example.com/registry/v2/providers/hashicorp/aws?include=x"
        );
    }

    #[test]
    fn test_resolve_normalizes_missing_leading_slash() {
        let client = client("https://registry.terraform.io");
        let got = client.resolve("v2/providers/hashicorp/aws").unwrap();
        assert_eq!(got, "https://registry.terraform.io/v2/providers/hashicorp/aws");
    }

    #[test]
    fn test_base_url_accessor_keeps_prefix() {
        let client = client("https://example.com/registry");
        assert_eq!(client.base_url().path(), "/registry");
    }
}
