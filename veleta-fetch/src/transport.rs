//! HTTP transport abstraction.
//!
//! The retry client and paginator are exercised in tests with a scripted
//! transport; production code goes through [`ReqwestTransport`].

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::error::FetchError;
use crate::request::ApiRequest;

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Raw Response
// ============================================================================

/// A raw HTTP response: status, headers and body text.
///
/// Classification (success, gone, rate-limited, transient) happens in the
/// client, not here.
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers, names lowercased.
    pub headers: Vec<(String, String)>,
    /// Response body.
    pub body: String,
}

impl RawResponse {
    /// Creates a response with the given status and body and no headers.
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    /// Adds a header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into().to_lowercase(), value.into()));
        self
    }

    /// Returns the first header with the given name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
    }
}

// ============================================================================
// Transport Trait
// ============================================================================

/// Transport for issuing GET requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issues a single GET request. One call, no retries; the client owns
    /// the retry loop.
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, FetchError>;
}

// ============================================================================
// Reqwest Transport
// ============================================================================

/// Production transport backed by `reqwest`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    /// Creates a transport with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("veleta/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { inner: client })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get(&self, request: &ApiRequest) -> Result<RawResponse, FetchError> {
        let mut builder = self.inner.get(&request.url).query(&request.query);
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_lowercase(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        let body = response.text().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

// ============================================================================
// Scripted Transport (test support)
// ============================================================================

/// A transport that replays a scripted sequence of responses.
///
/// Available outside `cfg(test)` so downstream crates can exercise their
/// jobs without a live HTTP server.
pub mod scripted {
    use super::{ApiRequest, FetchError, HttpTransport, RawResponse, async_trait};
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Replays queued responses in order and records every request URL.
    #[derive(Debug, Default)]
    pub struct ScriptedTransport {
        script: Mutex<VecDeque<Result<RawResponse, FetchError>>>,
        requests: Mutex<Vec<ApiRequest>>,
    }

    impl ScriptedTransport {
        /// Creates an empty transport; queue responses with [`Self::push`].
        pub fn new() -> Self {
            Self::default()
        }

        /// Queues a response.
        pub fn push(&self, response: RawResponse) {
            self.script.lock().unwrap().push_back(Ok(response));
        }

        /// Queues a connection failure.
        pub fn push_connection_error(&self, reason: impl Into<String>) {
            self.script
                .lock()
                .unwrap()
                .push_back(Err(FetchError::Connection(reason.into())));
        }

        /// Returns all requests issued so far.
        pub fn requests(&self) -> Vec<ApiRequest> {
            self.requests.lock().unwrap().clone()
        }

        /// Returns the number of requests issued so far.
        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl HttpTransport for ScriptedTransport {
        async fn get(&self, request: &ApiRequest) -> Result<RawResponse, FetchError> {
            self.requests.lock().unwrap().push(request.clone());
            self.script
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Connection("script exhausted".to_string())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_lookup_is_case_insensitive() {
        let response = RawResponse::new(429, "").with_header("X-RateLimit-Reset", "5");
        assert_eq!(response.header("x-ratelimit-reset"), Some("5"));
    }

    #[test]
    fn test_missing_header_is_none() {
        let response = RawResponse::new(200, "{}");
        assert_eq!(response.header("x-ratelimit-reset"), None);
    }
}
