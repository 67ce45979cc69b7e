//! In-flight request de-duplication.
//!
//! Tracks pending requests keyed by `method&url`. When a new request with
//! the same key is about to go out, the previous one is cancelled first, so
//! at most one request per key is ever in flight (latest wins).
//!
//! ## Lifecycle
//!
//! Registry entries are created at send time and removed only when a newer
//! identical-key request supersedes them or when [`Deduplicator::cancel_all`]
//! runs at a shutdown/navigation boundary. Completed requests leave their
//! entry behind; the cancelled token is inert once its request has finished.

use std::collections::HashMap;
use std::sync::Mutex;

use reqwest::Method;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A request identified by method and URL, carried as separate fields so the
/// exempt-method check never has to re-parse a concatenated key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDescriptor {
    /// HTTP method of the request.
    pub method: Method,
    /// URL exactly as supplied by the caller, no normalization.
    pub url: String,
}

impl RequestDescriptor {
    /// Create a descriptor for `method` and `url`.
    #[must_use]
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
        }
    }

    /// Derive the registry key: method and URL joined with `&`.
    #[must_use]
    pub fn key(&self) -> String {
        format!("{}&{}", self.method, self.url)
    }
}

/// Registry of in-flight requests with latest-wins cancellation.
///
/// Invariant: at most one entry per key at any time. All methods take `&self`
/// behind an internal mutex; the lock is never held across an await point.
#[derive(Debug, Default)]
pub struct Deduplicator {
    pending: Mutex<HashMap<String, CancellationToken>>,
    exempt: Vec<Method>,
}

impl Deduplicator {
    /// Create a deduplicator with an empty exempt list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deduplicator whose `exempt` methods are never auto-cancelled
    /// by [`cancel_and_remove`](Self::cancel_and_remove).
    #[must_use]
    pub fn with_exempt(exempt: Vec<Method>) -> Self {
        Self {
            pending: Mutex::new(HashMap::new()),
            exempt,
        }
    }

    /// Store `token` under the descriptor's key only if the key is absent.
    ///
    /// No-op when an entry already exists; the caller's token is then simply
    /// not tracked, which leaves the older request in charge of the key.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned. This should only happen if
    /// a thread panicked while holding the lock.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    pub fn register_if_absent(&self, descriptor: &RequestDescriptor, token: CancellationToken) {
        let key = descriptor.key();
        let mut pending = self.pending.lock().unwrap();
        if !pending.contains_key(&key) {
            debug!(%key, "tracking in-flight request");
            pending.insert(key, token);
        }
    }

    /// Cancel and drop the entry for the descriptor's key, if present and the
    /// method is not exempt; otherwise a no-op.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned. This should only happen if
    /// a thread panicked while holding the lock.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    pub fn cancel_and_remove(&self, descriptor: &RequestDescriptor) {
        if self.exempt.contains(&descriptor.method) {
            return;
        }

        let key = descriptor.key();
        let mut pending = self.pending.lock().unwrap();
        if let Some(token) = pending.remove(&key) {
            debug!(%key, "superseding in-flight request");
            token.cancel();
        }
    }

    /// Cancel every tracked request and clear the registry.
    ///
    /// Intended for shutdown or navigation boundaries where nothing in
    /// flight is worth keeping.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned. This should only happen if
    /// a thread panicked while holding the lock.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    pub fn cancel_all(&self) {
        let mut pending = self.pending.lock().unwrap();
        debug!(count = pending.len(), "cancelling all in-flight requests");
        for token in pending.values() {
            token.cancel();
        }
        pending.clear();
    }

    /// Number of tracked entries.
    ///
    /// # Panics
    ///
    /// Panics if the registry mutex is poisoned. This should only happen if
    /// a thread panicked while holding the lock.
    #[allow(clippy::unwrap_used)] // Mutex poison is unrecoverable
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.lock().unwrap().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor(method: Method, url: impl Into<String>) -> RequestDescriptor {
        RequestDescriptor::new(method, url)
    }

    #[test]
    fn key_joins_method_and_url() {
        let desc = descriptor(Method::GET, "/api/todos?page=1");
        assert_eq!(desc.key(), "GET&/api/todos?page=1");
    }

    #[test]
    fn register_is_insert_if_absent() {
        let dedup = Deduplicator::new();
        let desc = descriptor(Method::GET, "/a");

        let first = CancellationToken::new();
        let second = CancellationToken::new();
        dedup.register_if_absent(&desc, first.clone());
        dedup.register_if_absent(&desc, second.clone());
        assert_eq!(dedup.pending_count(), 1);

        // The first token still owns the key: cancelling the entry must
        // fire the first token, not the second.
        dedup.cancel_and_remove(&desc);
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());
    }

    #[test]
    fn supersession_cancels_predecessor_exactly_once() {
        let dedup = Deduplicator::new();
        let desc = descriptor(Method::GET, "/a");

        let first = CancellationToken::new();
        dedup.cancel_and_remove(&desc);
        dedup.register_if_absent(&desc, first.clone());
        assert!(!first.is_cancelled());

        // Second identical-key request: predecessor cancelled before the
        // new token is registered.
        let second = CancellationToken::new();
        dedup.cancel_and_remove(&desc);
        assert!(first.is_cancelled());
        dedup.register_if_absent(&desc, second.clone());
        assert!(!second.is_cancelled());
        assert_eq!(dedup.pending_count(), 1);
    }

    #[test]
    fn distinct_keys_never_interfere() {
        let dedup = Deduplicator::new();
        let get_a = descriptor(Method::GET, "/a");
        let post_a = descriptor(Method::POST, "/a");
        let get_b = descriptor(Method::GET, "/b");

        let token_a = CancellationToken::new();
        dedup.register_if_absent(&get_a, token_a.clone());

        dedup.cancel_and_remove(&post_a);
        dedup.cancel_and_remove(&get_b);
        assert!(!token_a.is_cancelled());
        assert_eq!(dedup.pending_count(), 1);
    }

    #[test]
    fn exempt_methods_are_never_auto_cancelled() {
        let dedup = Deduplicator::with_exempt(vec![Method::GET]);
        let desc = descriptor(Method::GET, "/a");

        let token = CancellationToken::new();
        dedup.register_if_absent(&desc, token.clone());
        dedup.cancel_and_remove(&desc);
        assert!(!token.is_cancelled());
        assert_eq!(dedup.pending_count(), 1);

        // cancel_all ignores the exemption.
        dedup.cancel_all();
        assert!(token.is_cancelled());
        assert_eq!(dedup.pending_count(), 0);
    }

    #[test]
    fn cancel_all_fires_every_token_and_clears() {
        let dedup = Deduplicator::new();
        let tokens: Vec<CancellationToken> = (0..3)
            .map(|i| {
                let token = CancellationToken::new();
                let desc = descriptor(Method::GET, format!("/item/{i}"));
                dedup.register_if_absent(&desc, token.clone());
                token
            })
            .collect();

        dedup.cancel_all();
        assert!(tokens.iter().all(CancellationToken::is_cancelled));
        assert_eq!(dedup.pending_count(), 0);
    }
}
