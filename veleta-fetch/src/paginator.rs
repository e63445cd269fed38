//! Pagination over paged list APIs.
//!
//! OpenAQ-style endpoints return `{"meta": {"found": ..., "limit": ...},
//! "results": [...]}` pages. The paginator drives the retry client page by
//! page until the server reports exhaustion, accumulating rows. Any
//! non-success outcome ends pagination early and the rows gathered so far
//! are returned, not discarded.

use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::client::{ApiClient, FetchOutcome};
use crate::request::ApiRequest;

/// Default pause between successive page requests.
///
/// Keeps sequential paging under external rate limits; deliberately much
/// smaller than any 429 backoff.
pub const DEFAULT_PAGE_DELAY: Duration = Duration::from_millis(100);

// ============================================================================
// Total Count
// ============================================================================

/// Server-reported total item count.
///
/// The OpenAQ v3 backend reports an open-ended `">1000"` marker instead of
/// a number once the count overflows its counting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalFound {
    /// An exact count.
    Exact(u64),
    /// The "more than N" overflow sentinel.
    Overflow,
}

impl TotalFound {
    /// Parses `meta.found` defensively. Missing or malformed values become
    /// `Exact(0)`, which stops pagination after the current page instead of
    /// crashing the loop.
    pub fn parse(meta: Option<&Value>) -> Self {
        let Some(found) = meta.and_then(|m| m.get("found")) else {
            return TotalFound::Exact(0);
        };

        if let Some(n) = found.as_u64() {
            return TotalFound::Exact(n);
        }

        match found.as_str() {
            Some(s) if s.trim_start().starts_with('>') => TotalFound::Overflow,
            Some(s) => s.trim().parse::<u64>().map_or(TotalFound::Exact(0), TotalFound::Exact),
            None => TotalFound::Exact(0),
        }
    }
}

// ============================================================================
// Page Cursor
// ============================================================================

/// Pagination state: one-based page counter, estimated page total and the
/// effective page size. Mutated once per page, discarded when the loop
/// ends.
#[derive(Debug, Clone)]
pub struct PageCursor {
    /// Page currently being requested (one-based).
    pub current_page: u64,
    /// Estimated total pages. Starts at 1 (unknown-but-assume-single-page)
    /// and is revised after every successful page.
    pub total_pages: u64,
    /// Effective page size, revised when the server corrects it.
    pub page_size: u64,
}

impl PageCursor {
    /// Creates a cursor positioned on page 1.
    pub fn new(page_size: u64) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size: page_size.max(1),
        }
    }

    /// Revises the page-total estimate from one page's metadata.
    ///
    /// An exact count recomputes `total_pages = ceil(found / page_size)`
    /// using the server-corrected page size. The overflow sentinel instead
    /// bumps the estimate by one, probing a page at a time until an exact
    /// count appears or a page comes back empty.
    pub fn observe(&mut self, found: TotalFound, server_limit: Option<u64>) {
        if let Some(limit) = server_limit {
            if limit > 0 {
                self.page_size = limit;
            }
        }

        match found {
            TotalFound::Overflow => self.total_pages += 1,
            TotalFound::Exact(n) => self.total_pages = n.div_ceil(self.page_size),
        }
    }

    /// Advances to the next page.
    pub fn advance(&mut self) {
        self.current_page += 1;
    }

    /// Returns true once the current page is past the estimated total.
    pub fn exhausted(&self) -> bool {
        self.current_page > self.total_pages
    }
}

// ============================================================================
// Paginator
// ============================================================================

/// Drives the retry client across successive pages until exhaustion.
pub struct Paginator<'a> {
    client: &'a ApiClient,
    page_delay: Duration,
}

impl<'a> Paginator<'a> {
    /// Creates a paginator with the default inter-page delay.
    pub fn new(client: &'a ApiClient) -> Self {
        Self {
            client,
            page_delay: DEFAULT_PAGE_DELAY,
        }
    }

    /// Overrides the inter-page delay.
    pub fn with_page_delay(mut self, delay: Duration) -> Self {
        self.page_delay = delay;
        self
    }

    /// Fetches every page of a paged endpoint, accumulating result rows.
    ///
    /// `template` carries the endpoint, fixed parameters and headers;
    /// `limit` and `page` parameters are appended per page. Pages are
    /// requested strictly in increasing order and a page's rows are
    /// appended in full or not at all. Any non-success outcome ends
    /// pagination and whatever accumulated so far (possibly nothing) is
    /// returned.
    pub async fn fetch_all(&self, template: &ApiRequest, page_size: u64) -> Vec<Value> {
        let mut cursor = PageCursor::new(page_size);
        let mut rows: Vec<Value> = Vec::new();

        while !cursor.exhausted() {
            let request = template
                .clone()
                .with_param("limit", page_size.to_string())
                .with_param("page", cursor.current_page.to_string());

            let FetchOutcome::Success(body) = self.client.fetch(&request).await else {
                warn!(
                    page = cursor.current_page,
                    accumulated = rows.len(),
                    "page fetch failed, returning partial results"
                );
                break;
            };

            let Some(page_rows) = body.get("results").and_then(Value::as_array) else {
                warn!(
                    page = cursor.current_page,
                    "page carried no results array, stopping pagination"
                );
                break;
            };

            rows.extend(page_rows.iter().cloned());

            let meta = body.get("meta");
            let found = TotalFound::parse(meta);

            // The overflow sentinel is probed one page at a time; a
            // sentinel page with no rows means the listing is exhausted
            // even though the server never produced an exact count.
            if found == TotalFound::Overflow && page_rows.is_empty() {
                debug!(
                    page = cursor.current_page,
                    accumulated = rows.len(),
                    "empty page under the overflow sentinel, stopping pagination"
                );
                break;
            }

            let server_limit = meta.and_then(|m| m.get("limit")).and_then(Value::as_u64);
            cursor.observe(found, server_limit);

            debug!(
                page = cursor.current_page,
                total_pages = cursor.total_pages,
                accumulated = rows.len(),
                ?found,
                "page appended"
            );

            cursor.advance();
            tokio::time::sleep(self.page_delay).await;
        }

        rows
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retry::RetryPolicy;
    use crate::transport::RawResponse;
    use crate::transport::scripted::ScriptedTransport;
    use serde_json::json;
    use std::sync::Arc;
    use std::time::Duration;

    fn page_body(found: Value, limit: u64, row_count: usize) -> String {
        let rows: Vec<Value> = (0..row_count).map(|i| json!({"value": i})).collect();
        json!({"meta": {"found": found, "limit": limit}, "results": rows}).to_string()
    }

    fn client(transport: Arc<ScriptedTransport>) -> ApiClient {
        ApiClient::with_transport(transport, RetryPolicy::new(1, Duration::from_secs(1)))
    }

    fn template() -> ApiRequest {
        ApiRequest::new("https://api.openaq.org/v3/locations").with_param("iso", "ES")
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_pages_accumulate_in_order() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, page_body(json!(1200), 1000, 1000)));
        transport.push(RawResponse::new(200, page_body(json!(1200), 1000, 200)));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert_eq!(rows.len(), 1200);
        assert_eq!(transport.request_count(), 2);

        let pages: Vec<String> = transport
            .requests()
            .iter()
            .map(|r| {
                r.query
                    .iter()
                    .find(|(k, _)| k == "page")
                    .map(|(_, v)| v.clone())
                    .unwrap()
            })
            .collect();
        assert_eq!(pages, vec!["1", "2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_page_returns_partial_results() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, page_body(json!(2500), 1000, 1000)));
        transport.push(RawResponse::new(500, "internal error"));
        // Page 3 must never be requested.
        transport.push(RawResponse::new(200, page_body(json!(2500), 1000, 500)));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert_eq!(rows.len(), 1000);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_overflow_sentinel_probes_one_page_at_a_time() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, page_body(json!(">1000"), 1000, 1000)));
        transport.push(RawResponse::new(200, page_body(json!(1800), 1000, 800)));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        // Sentinel on page 1 bumps the estimate to 2; page 2's exact count
        // settles it at 2 and the loop ends.
        assert_eq!(rows.len(), 1800);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_page_under_sentinel_ends_probing() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, page_body(json!(">1000"), 1000, 1000)));
        transport.push(RawResponse::new(200, page_body(json!(">1000"), 1000, 0)));
        // A backend that keeps reporting the sentinel on empty pages must
        // not be probed forever; page 3 must never be requested.
        transport.push(RawResponse::new(200, page_body(json!(">1000"), 1000, 0)));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert_eq!(rows.len(), 1000);
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_meta_stops_after_current_page() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(
            200,
            json!({"results": [{"value": 1}]}).to_string(),
        ));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert_eq!(rows.len(), 1);
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_results_array_returns_nothing() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(RawResponse::new(200, json!({"detail": "oops"}).to_string()));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert!(rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_corrected_limit_revises_page_total() {
        let transport = Arc::new(ScriptedTransport::new());
        // Requested 1000 rows per page, server caps at 500.
        transport.push(RawResponse::new(200, page_body(json!(1000), 500, 500)));
        transport.push(RawResponse::new(200, page_body(json!(1000), 500, 500)));

        let api = client(transport.clone());
        let rows = Paginator::new(&api).fetch_all(&template(), 1000).await;

        assert_eq!(rows.len(), 1000);
        assert_eq!(transport.request_count(), 2);
    }

    #[test]
    fn test_total_found_parsing() {
        assert_eq!(
            TotalFound::parse(Some(&json!({"found": 42}))),
            TotalFound::Exact(42)
        );
        assert_eq!(
            TotalFound::parse(Some(&json!({"found": ">1000"}))),
            TotalFound::Overflow
        );
        assert_eq!(
            TotalFound::parse(Some(&json!({"found": "123"}))),
            TotalFound::Exact(123)
        );
        assert_eq!(
            TotalFound::parse(Some(&json!({"found": null}))),
            TotalFound::Exact(0)
        );
        assert_eq!(TotalFound::parse(None), TotalFound::Exact(0));
    }

    #[test]
    fn test_cursor_exhaustion() {
        let mut cursor = PageCursor::new(1000);
        assert!(!cursor.exhausted());

        cursor.observe(TotalFound::Exact(1200), Some(1000));
        assert_eq!(cursor.total_pages, 2);

        cursor.advance();
        assert!(!cursor.exhausted());
        cursor.advance();
        assert!(cursor.exhausted());
    }
}
