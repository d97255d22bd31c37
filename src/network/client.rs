//! HTTP client for querying endpoints under test

use std::error::Error as StdError;
use std::time::Duration;

use http_body_util::{BodyExt, Empty, LengthLimitError, Limited};
use hyper::body::Bytes;
use hyper::header::ACCEPT;
use hyper::{Method, Request, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use super::{POOL_IDLE_TIMEOUT_MS, POOL_MAX_IDLE_PER_HOST};
use crate::config::LimitsConfig;
use crate::{Result, SmokeError};

/// HTTP client issuing GET requests with a hard deadline
pub struct HttpClient {
    client: Client<HttpConnector, Empty<Bytes>>,
    timeout_ms: u64,
    max_body_bytes: usize,
}

impl HttpClient {
    /// Create a new HTTP client
    #[must_use]
    pub fn new(limits: &LimitsConfig) -> Self {
        let timeout = Duration::from_millis(limits.timeout_ms);

        let mut connector = HttpConnector::new();
        connector.set_connect_timeout(Some(timeout));

        let client = Client::builder(TokioExecutor::new())
            .pool_idle_timeout(Duration::from_millis(POOL_IDLE_TIMEOUT_MS))
            .pool_max_idle_per_host(POOL_MAX_IDLE_PER_HOST)
            .build(connector);

        Self {
            client,
            timeout_ms: limits.timeout_ms,
            max_body_bytes: limits.max_body_bytes,
        }
    }

    /// Send a GET request and read the whole body
    ///
    /// The deadline covers connecting, response headers and the body.
    ///
    /// # Errors
    ///
    /// Returns error on connection failure, timeout, invalid headers or an
    /// oversized body
    pub async fn get(&self, uri: Uri, headers: &[(String, String)]) -> Result<HttpResponse> {
        let deadline = Duration::from_millis(self.timeout_ms);

        tokio::time::timeout(deadline, self.send(uri, headers))
            .await
            .map_err(|_| SmokeError::Timeout {
                timeout_ms: self.timeout_ms,
            })?
    }

    async fn send(&self, uri: Uri, headers: &[(String, String)]) -> Result<HttpResponse> {
        debug!("GET {}", uri);

        let mut request_builder = Request::builder()
            .method(Method::GET)
            .uri(uri)
            .header(ACCEPT, "application/json");

        for (name, value) in headers {
            request_builder = request_builder.header(name.as_str(), value.as_str());
        }

        let request = request_builder
            .body(Empty::new())
            .map_err(|e| SmokeError::InvalidHeader(e.to_string()))?;

        let response = self.client.request(request).await.map_err(|e| {
            let reason = error_chain(&e);
            warn!("Request failed: {reason}");
            SmokeError::Request(reason)
        })?;

        let status = response.status().as_u16();
        debug!("Response status {status}");

        let body = Limited::new(response.into_body(), self.max_body_bytes)
            .collect()
            .await
            .map_err(|e| {
                if e.is::<LengthLimitError>() {
                    SmokeError::DataTooLarge {
                        limit: self.max_body_bytes,
                    }
                } else {
                    SmokeError::Request(format!("Failed to read response body: {e}"))
                }
            })?
            .to_bytes();

        Ok(HttpResponse { status, body })
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new(&LimitsConfig::default())
    }
}

/// Status and body of a completed request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body
    pub body: Bytes,
}

/// Build a URI from a base URL, a path and query parameters
///
/// # Errors
///
/// Returns error if the assembled string is not a valid URI
pub fn build_uri(base_url: &str, path: &str, query: &[(String, String)]) -> Result<Uri> {
    let mut uri = format!("{}{path}", base_url.trim().trim_end_matches('/'));

    if !query.is_empty() {
        uri.push('?');
        for (i, (key, value)) in query.iter().enumerate() {
            if i > 0 {
                uri.push('&');
            }
            uri.push_str(&urlencoding::encode(key));
            uri.push('=');
            uri.push_str(&urlencoding::encode(value));
        }
    }

    uri.parse::<Uri>().map_err(|e| SmokeError::InvalidUri {
        uri: uri.clone(),
        reason: e.to_string(),
    })
}

// hyper-util's top-level error hides the cause ("client error (Connect)")
fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_uri_simple() {
        let uri = build_uri("http://example.com:80", "/api/test", &[]).unwrap();
        assert_eq!(uri.to_string(), "http://example.com:80/api/test");
    }

    #[test]
    fn test_build_uri_trailing_slash() {
        let uri = build_uri("http://localhost:4000/", "/api/recordings", &[]).unwrap();
        assert_eq!(uri.to_string(), "http://localhost:4000/api/recordings");
    }

    #[test]
    fn test_build_uri_with_query() {
        let query = vec![
            ("org_id".to_string(), "cfbaf78a-3caa-4cb2-a367-d3b3eb161ba1".to_string()),
            ("limit".to_string(), "2".to_string()),
        ];
        let uri = build_uri("http://localhost:4000", "/api/sms/messages", &query).unwrap();
        assert_eq!(
            uri.to_string(),
            "http://localhost:4000/api/sms/messages?org_id=cfbaf78a-3caa-4cb2-a367-d3b3eb161ba1&limit=2"
        );
    }

    #[test]
    fn test_build_uri_with_encoding() {
        let query = vec![("key".to_string(), "value with spaces&more".to_string())];
        let uri = build_uri("http://example.com", "/api/test", &query).unwrap();
        assert_eq!(
            uri.to_string(),
            "http://example.com/api/test?key=value%20with%20spaces%26more"
        );
    }

    #[test]
    fn test_build_uri_invalid() {
        let result = build_uri("http://exa mple.com", "/api/test", &[]);
        assert!(matches!(result, Err(SmokeError::InvalidUri { .. })));
    }

    #[test]
    fn test_error_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let outer = SmokeError::Io(inner);
        let message = error_chain(&outer);
        assert!(message.starts_with("I/O error: refused"));
        assert!(message.ends_with(": refused"));

        let plain = SmokeError::Request("reset".to_string());
        assert_eq!(error_chain(&plain), "Request failed: reset");
    }
}
