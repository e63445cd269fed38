//! Request descriptors.

// ============================================================================
// Api Request
// ============================================================================

/// Descriptor of one GET request: endpoint, ordered query parameters and
/// headers. Immutable per call; the retry loop re-issues the same
/// descriptor on every attempt.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// Endpoint URL without query string.
    pub url: String,
    /// Ordered query parameters.
    pub query: Vec<(String, String)>,
    /// Header set. API keys obtained from the secret store land here.
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    /// Creates a request for the given endpoint with JSON accept headers.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            query: Vec::new(),
            headers: vec![
                ("accept".to_string(), "application/json".to_string()),
                ("content-type".to_string(), "application/json".to_string()),
            ],
        }
    }

    /// Adds a query parameter.
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Adds a header.
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((key.into(), value.into()));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_headers_are_json() {
        let request = ApiRequest::new("https://api.example.org/v3/parameters");
        assert!(request
            .headers
            .iter()
            .any(|(k, v)| k == "accept" && v == "application/json"));
    }

    #[test]
    fn test_param_order_preserved() {
        let request = ApiRequest::new("https://api.example.org")
            .with_param("limit", "1000")
            .with_param("page", "1");
        assert_eq!(request.query[0].0, "limit");
        assert_eq!(request.query[1].0, "page");
    }
}
