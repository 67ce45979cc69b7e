//! Client configuration and per-request options.
//!
//! [`ClientConfig`] is merged from defaults and caller overrides when the
//! facade is constructed and is immutable afterwards. [`RequestOptions`] is
//! the per-call escape hatch: extra headers, extra query pairs, and a
//! one-off timeout, merged into a single dispatch.

use std::time::Duration;

/// Default request timeout when the caller supplies none: 50 seconds.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(50_000);

/// Configuration for an [`HttpFacade`](crate::facade::HttpFacade).
///
/// Built once at construction; a given facade instance never changes its
/// configuration afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL prepended to relative request paths.
    pub base_url: String,
    /// Timeout applied to every request unless overridden per call.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Create a configuration for `base_url` with the default timeout.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Override the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

/// Per-call extras merged into a single dispatched request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Extra headers applied after any defaults, so they win on conflict.
    pub headers: Vec<(String, String)>,
    /// Extra query pairs appended to whatever the verb method supplies.
    pub query: Vec<(String, String)>,
    /// One-off timeout overriding the client-wide value for this call.
    pub timeout: Option<Duration>,
}

impl RequestOptions {
    /// Add a header to this call.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Append a query pair to this call.
    #[must_use]
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Override the timeout for this call only.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_merge_under_overrides() {
        let config = ClientConfig::new("http://localhost:8080");
        assert_eq!(config.base_url, "http://localhost:8080");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);

        let config = config.with_timeout(Duration::from_secs(5));
        assert_eq!(config.timeout, Duration::from_secs(5));
    }

    #[test]
    fn options_accumulate() {
        let options = RequestOptions::default()
            .header("x-trace", "abc")
            .query("page", "2")
            .timeout(Duration::from_secs(1));

        assert_eq!(options.headers, vec![("x-trace".into(), "abc".into())]);
        assert_eq!(options.query, vec![("page".into(), "2".into())]);
        assert_eq!(options.timeout, Some(Duration::from_secs(1)));
    }
}
