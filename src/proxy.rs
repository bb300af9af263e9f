//! Environment-derived proxy selection
//!
//! Reads `HTTP_PROXY`, `HTTPS_PROXY`, and `NO_PROXY` (upper- and lowercase)
//! once at client build time and caches the result. Per-request resolution
//! checks the cached `NO_PROXY` list against the request host, then picks
//! the cached proxy URL for the request scheme.

use url::Url;

/// Cached proxy configuration, captured from the environment at client
/// build time and handed to `reqwest::Proxy::custom`.
#[derive(Debug, Clone, Default)]
pub struct ProxySelector {
    http_proxy: Option<String>,
    https_proxy: Option<String>,
    no_proxy: Vec<NoProxyPattern>,
}

/// A single pattern from the `NO_PROXY` environment variable.
#[derive(Debug, Clone)]
enum NoProxyPattern {
    /// `*`, bypass the proxy for every host.
    Wildcard,
    /// Exact hostname match, case-insensitive.
    Exact(String),
    /// Domain match covering the domain and its subdomains
    /// (`example.com` matches `example.com` and `foo.example.com`).
    /// Stored without any leading dot, lowercased.
    DomainSuffix(String),
}

impl NoProxyPattern {
    fn matches(&self, host: &str) -> bool {
        match self {
            NoProxyPattern::Wildcard => true,
            NoProxyPattern::Exact(exact) => host.eq_ignore_ascii_case(exact),
            NoProxyPattern::DomainSuffix(suffix) => {
                let host = host.to_ascii_lowercase();
                host == *suffix || host.ends_with(&format!(".{suffix}"))
            }
        }
    }
}

/// Uppercase takes precedence over lowercase; blank values count as unset.
fn read_env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .or_else(|| {
            std::env::var(name.to_ascii_lowercase())
                .ok()
                .filter(|value| !value.trim().is_empty())
        })
}

/// Parse a comma-separated `NO_PROXY` value, skipping empty entries.
fn parse_no_proxy(raw: &str) -> Vec<NoProxyPattern> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            if entry == "*" {
                NoProxyPattern::Wildcard
            } else if let Some(suffix) = entry.strip_prefix('.') {
                NoProxyPattern::DomainSuffix(suffix.to_ascii_lowercase())
            } else if entry.contains('.') {
                // "example.com" bypasses example.com and its subdomains
                NoProxyPattern::DomainSuffix(entry.to_ascii_lowercase())
            } else {
                // "localhost", "myhost": exact match only
                NoProxyPattern::Exact(entry.to_ascii_lowercase())
            }
        })
        .collect()
}

/// A proxy URL must itself parse; anything else is treated as unset rather
/// than poisoning every request.
fn read_proxy_var(name: &str) -> Option<String> {
    read_env_var(name).filter(|value| Url::parse(value).is_ok())
}

impl ProxySelector {
    /// Capture proxy settings from the environment. Changes to the
    /// environment after this call are not reflected.
    pub fn from_env() -> Self {
        let http_proxy = read_proxy_var("HTTP_PROXY");
        let https_proxy = read_proxy_var("HTTPS_PROXY");
        let no_proxy = read_env_var("NO_PROXY")
            .map(|raw| parse_no_proxy(&raw))
            .unwrap_or_default();

        tracing::debug!(
            http_proxy = http_proxy.as_deref().unwrap_or("<none>"),
            https_proxy = https_proxy.as_deref().unwrap_or("<none>"),
            no_proxy_patterns = no_proxy.len(),
            "proxy configuration captured from environment"
        );

        Self {
            http_proxy,
            https_proxy,
            no_proxy,
        }
    }

    /// Resolve the proxy for an outgoing request, keyed on the request
    /// URL's scheme. Returns `None` when no proxy applies (unset variable,
    /// `NO_PROXY` match, or non-HTTP scheme).
    pub fn proxy_for(&self, target: &Url) -> Option<String> {
        if let Some(host) = target.host_str() {
            if self.no_proxy.iter().any(|pattern| pattern.matches(host)) {
                tracing::trace!(host, "NO_PROXY match, connecting directly");
                return None;
            }
        }
        match target.scheme() {
            "http" => self.http_proxy.clone(),
            "https" => self.https_proxy.clone(),
            _ => None,
        }
    }
}
