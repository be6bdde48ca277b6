//! HTTP plumbing shared by every endpoint.
//!
//! Client construction, per-request headers and the mapping of non-2xx
//! responses onto [`ClientError::Request`].

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::client::ClientError;
use crate::options::ClientOptions;

/// Build a configured HTTP client from client options.
///
/// This applies timeout and proxy settings.
///
/// # Example
/// ```ignore
/// let client = build_http_client(&options)?;
/// ```
pub fn build_http_client(options: &ClientOptions) -> Result<Client, ClientError> {
    let mut builder = Client::builder();

    if let Some(timeout) = options.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy_url) = &options.proxy {
        let proxy = reqwest::Proxy::all(proxy_url)
            .map_err(|e| ClientError::Config(format!("invalid proxy '{}': {}", proxy_url, e)))?;
        builder = builder.proxy(proxy);
    }

    Ok(builder.build()?)
}

/// Add extra headers to a request if specified in client options.
///
/// # Example
/// ```ignore
/// let mut req = client.post(url);
/// req = add_extra_headers(req, &options.extra_headers);
/// ```
pub fn add_extra_headers(
    mut request: RequestBuilder,
    extra_headers: &Option<HashMap<String, String>>,
) -> RequestBuilder {
    if let Some(headers) = extra_headers {
        for (key, value) in headers {
            request = request.header(key, value);
        }
    }
    request
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Value,
}

/// Derive a human readable failure message from an error response body.
///
/// Uses the `detail` field of a JSON body when there is one, otherwise
/// falls back to `HTTP <code>`.
pub fn error_message(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ErrorBody>(body)
        .map(|body| body.detail)
        .unwrap_or(Value::Null);

    match detail {
        Value::String(message) if !message.is_empty() => message,
        Value::Null | Value::String(_) => format!("HTTP {}", status.as_u16()),
        // e.g. validation errors come as a list of objects
        other => other.to_string(),
    }
}

/// Pass successful responses through, turn anything else into
/// [`ClientError::Request`].
pub async fn ensure_success(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(status, &body);
    tracing::debug!(status = status.as_u16(), %message, "request rejected");

    Err(ClientError::Request { status, message })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_build_http_client() {
        let options = ClientOptions::default().with_timeout(Duration::from_secs(30));
        assert!(build_http_client(&options).is_ok());
    }

    #[test]
    fn test_build_http_client_with_proxy() {
        let options =
            ClientOptions::default().with_proxy("http://proxy.example.com:8080".to_string());
        assert!(build_http_client(&options).is_ok());
    }

    #[test]
    fn test_error_message_uses_detail() {
        let message = error_message(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"detail": "overloaded"}"#,
        );
        assert_eq!(message, "overloaded");
    }

    #[test]
    fn test_error_message_falls_back_to_status() {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        assert_eq!(error_message(status, "<html>oops</html>"), "HTTP 500");
        assert_eq!(error_message(status, ""), "HTTP 500");
        assert_eq!(error_message(status, r#"{"error": "x"}"#), "HTTP 500");
        assert_eq!(error_message(status, r#"{"detail": ""}"#), "HTTP 500");
    }

    #[test]
    fn test_error_message_structured_detail() {
        let message = error_message(
            StatusCode::UNPROCESSABLE_ENTITY,
            r#"{"detail": [{"msg": "field required"}]}"#,
        );
        assert_eq!(message, r#"[{"msg":"field required"}]"#);
    }
}
