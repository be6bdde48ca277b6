//! Client configuration.

use std::collections::HashMap;
use std::time::Duration;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api";

/// Environment variable overriding the base URL.
pub const BASE_URL_ENV: &str = "JARVIS_API_BASE_URL";

/// Transport configuration for [`ChatClient`](crate::client::ChatClient).
///
/// # Example
/// ```rust
/// use jarvis_chat::options::ClientOptions;
/// use std::time::Duration;
///
/// let options = ClientOptions::new("https://chat.example.com/api")
///     .with_timeout(Duration::from_secs(300))
///     .with_header("X-Request-Source".to_string(), "cli".to_string());
///
/// assert_eq!(options.base_url, "https://chat.example.com/api");
/// ```
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the chat API, e.g. `http://localhost:8000/api`
    pub base_url: String,

    /// Whole-request timeout. Applies to streamed bodies too, so leave it
    /// unset unless long replies are not expected.
    pub timeout: Option<Duration>,

    /// HTTP proxy URL
    pub proxy: Option<String>,

    /// Additional HTTP headers to include in requests
    pub extra_headers: Option<HashMap<String, String>>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientOptions {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: None,
            proxy: None,
            extra_headers: None,
        }
    }

    /// Read the base URL from `JARVIS_API_BASE_URL`, falling back to
    /// [`DEFAULT_BASE_URL`].
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::new(url.trim()),
            _ => Self::default(),
        }
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set the proxy URL.
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }

    /// Set extra headers.
    pub fn with_extra_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.extra_headers = Some(headers);
        self
    }

    /// Add a single extra header.
    pub fn with_header(mut self, key: String, value: String) -> Self {
        self.extra_headers
            .get_or_insert_with(HashMap::new)
            .insert(key, value);
        self
    }

    /// Join `path` onto the base URL.
    pub(crate) fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// URL of the health endpoint, which lives next to the API root rather
    /// than under it.
    pub(crate) fn health_url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        match base.strip_suffix("/api") {
            Some(root) => format!("{}/health", root),
            None if base.contains("/api") => base.replacen("/api", "/health", 1),
            None => format!("{}/health", base),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert_eq!(options.base_url, DEFAULT_BASE_URL);
        assert!(options.timeout.is_none());
        assert!(options.proxy.is_none());
    }

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let options = ClientOptions::new("http://host/api/");
        assert_eq!(options.endpoint("/chats"), "http://host/api/chats");
    }

    #[test]
    fn test_health_url() {
        assert_eq!(
            ClientOptions::default().health_url(),
            "http://localhost:8000/health"
        );
        assert_eq!(
            ClientOptions::new("http://host/api/v1").health_url(),
            "http://host/health/v1"
        );
        assert_eq!(
            ClientOptions::new("http://host").health_url(),
            "http://host/health"
        );
    }

    #[test]
    fn test_with_header_accumulates() {
        let options = ClientOptions::default()
            .with_header("a".to_string(), "1".to_string())
            .with_header("b".to_string(), "2".to_string());
        assert_eq!(options.extra_headers.unwrap().len(), 2);
    }
}
