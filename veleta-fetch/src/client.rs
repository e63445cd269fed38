//! Fetch-and-retry client.
//!
//! One GET with response classification: return on success or a retired
//! endpoint, wait out rate limits using the server's stated reset time,
//! back off exponentially on everything else, and give up after the
//! attempt budget. Exhaustion surfaces as "no data", never as an error the
//! caller has to catch.

use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;
use crate::request::ApiRequest;
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, RawResponse, ReqwestTransport};

/// Header carrying the rate-limit reset time in seconds.
const RATE_LIMIT_RESET_HEADER: &str = "x-ratelimit-reset";

// ============================================================================
// Fetch Outcome
// ============================================================================

/// Terminal outcome of a fetch, consumed immediately by the caller.
#[derive(Debug)]
pub enum FetchOutcome {
    /// HTTP 200 with a parsed JSON body.
    Success(Value),
    /// HTTP 410: the API version has been retired. Retrying cannot help.
    Gone,
    /// The attempt budget ran out without a success. Callers treat this as
    /// "no data for this unit", not as a fatal failure.
    ExhaustedRetries,
}

impl FetchOutcome {
    /// Returns true if the fetch succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }

    /// Consumes the outcome, returning the payload on success.
    pub fn into_value(self) -> Option<Value> {
        match self {
            FetchOutcome::Success(value) => Some(value),
            _ => None,
        }
    }
}

// ============================================================================
// Attempt Classification
// ============================================================================

/// Per-attempt classification. Only `Success` and `Gone` are terminal; the
/// other variants consume an attempt and keep the loop going.
#[derive(Debug)]
enum Attempt {
    Success(Value),
    Gone,
    RateLimited { reset_secs: Option<u64> },
    Transient { reason: String },
}

fn classify(response: &RawResponse) -> Attempt {
    match response.status {
        200 => match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => Attempt::Success(value),
            // A 200 with an unparseable body is treated like any other
            // transient server fault.
            Err(e) => Attempt::Transient {
                reason: format!("unparseable 200 body: {e}"),
            },
        },
        410 => Attempt::Gone,
        429 => Attempt::RateLimited {
            // Untrusted input: default applied downstream when the header
            // is absent or not a number.
            reset_secs: response
                .header(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.trim().parse::<u64>().ok()),
        },
        status => Attempt::Transient {
            reason: format!("HTTP {status}"),
        },
    }
}

// ============================================================================
// Api Client
// ============================================================================

/// HTTP GET client with retry, shared by every ingestion job.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn HttpTransport>,
    policy: RetryPolicy,
}

impl ApiClient {
    /// Creates a client over the production reqwest transport.
    pub fn new(policy: RetryPolicy) -> Result<Self, FetchError> {
        Ok(Self::with_transport(
            Arc::new(ReqwestTransport::new()?),
            policy,
        ))
    }

    /// Creates a client over a custom transport.
    pub fn with_transport(transport: Arc<dyn HttpTransport>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Returns the retry policy in effect.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Issues a GET, classifying each response and retrying per policy.
    ///
    /// Behavior per attempt, in precedence order:
    /// 1. HTTP 200 returns [`FetchOutcome::Success`] immediately.
    /// 2. HTTP 410 returns [`FetchOutcome::Gone`] immediately.
    /// 3. HTTP 429 sleeps for the server-stated reset plus one second,
    ///    consuming an attempt. The exponential schedule does not apply.
    /// 4. Any other status or connection failure sleeps
    ///    `initial_delay * 2^attempt` and consumes an attempt.
    ///
    /// After `max_retries` consumed attempts: [`FetchOutcome::ExhaustedRetries`].
    #[instrument(skip(self, request), fields(url = %request.url))]
    pub async fn fetch(&self, request: &ApiRequest) -> FetchOutcome {
        for attempt in 0..self.policy.max_retries {
            let attempt_number = attempt + 1;

            let classified = match self.transport.get(request).await {
                Ok(response) => classify(&response),
                Err(e) => Attempt::Transient {
                    reason: format!("connection error: {e}"),
                },
            };

            match classified {
                Attempt::Success(value) => {
                    debug!(attempt = attempt_number, "fetch succeeded");
                    return FetchOutcome::Success(value);
                }
                Attempt::Gone => {
                    warn!("HTTP 410 Gone: API version retired, not retrying");
                    return FetchOutcome::Gone;
                }
                Attempt::RateLimited { reset_secs } => {
                    let wait = RetryPolicy::rate_limit_delay(reset_secs);
                    warn!(
                        attempt = attempt_number,
                        max = self.policy.max_retries,
                        wait_secs = wait.as_secs(),
                        "HTTP 429, waiting for rate-limit reset"
                    );
                    tokio::time::sleep(wait).await;
                }
                Attempt::Transient { reason } => {
                    let delay = self.policy.backoff_delay(attempt);
                    warn!(
                        attempt = attempt_number,
                        max = self.policy.max_retries,
                        delay_secs = delay.as_secs(),
                        %reason,
                        "fetch attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }

        warn!(
            max = self.policy.max_retries,
            "retries exhausted, treating unit as having no data"
        );
        FetchOutcome::ExhaustedRetries
    }
}

// ============================================================================
// Tests
// ============================================================================
