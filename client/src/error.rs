//! Error types for the facade.

use thiserror::Error;

/// Errors produced by [`HttpFacade`](crate::facade::HttpFacade) calls.
///
/// Every variant except [`Cancelled`](Self::Cancelled) has already triggered
/// exactly one notification by the time the caller sees it; rejection is for
/// flow control, the notification is the unconditional side effect.
#[derive(Debug, Error)]
pub enum FacadeError {
    /// The request was superseded by a newer request with the same
    /// method and URL before it completed.
    #[error("request superseded: {key}")]
    Cancelled {
        /// The `method&url` key of the cancelled request.
        key: String,
    },

    /// The request never completed: connect failure, timeout, TLS error,
    /// or transport-level abort.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server responded with a transport status other than 200.
    #[error("HTTP {status}: {body}")]
    Status {
        /// Transport status code.
        status: u16,
        /// Raw response body text.
        body: String,
    },

    /// The server responded 200 but the envelope's `code` field was not 200
    /// (or was missing entirely).
    #[error("api error: code {code:?}, msg {msg:?}")]
    Business {
        /// Business-level code from the envelope, if it was numeric.
        code: Option<i64>,
        /// Business-level message from the envelope, if present.
        msg: Option<String>,
        /// The full parsed body the call rejected with.
        body: serde_json::Value,
    },

    /// The underlying client could not be constructed.
    #[error("client construction failed: {0}")]
    Build(String),
}
