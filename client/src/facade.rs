//! The HTTP facade: verb methods over one shared [`reqwest::Client`], with
//! latest-wins de-duplication on the way out and success/failure
//! classification on the way back.
//!
//! ## Control flow
//!
//! A verb method builds the request, supersedes any in-flight request with
//! the same method+URL key, registers its own cancellation token, then races
//! the token against the transport send. The response is classified on two
//! levels: the transport status must be exactly 200, and the body envelope's
//! `code` field must be 200. Every failure path fires exactly one
//! notification before the call rejects.

use std::sync::Arc;

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::{ClientConfig, RequestOptions};
use crate::dedup::{Deduplicator, RequestDescriptor};
use crate::error::FacadeError;
use crate::notify::{self, ErrorRule, Notify, Severity};

/// A successful response: transport 200 with envelope `code == 200`.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    /// Transport status code (always 200 in the success path).
    pub status: u16,
    /// The full parsed body, envelope included.
    pub body: Value,
}

impl ApiResponse {
    /// The envelope's business code, if numeric.
    #[must_use]
    pub fn code(&self) -> Option<i64> {
        self.body.get("code").and_then(Value::as_i64)
    }

    /// The envelope's message, if present.
    #[must_use]
    pub fn msg(&self) -> Option<&str> {
        self.body.get("msg").and_then(Value::as_str)
    }

    /// The envelope's payload, if present.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.body.get("data")
    }
}

/// Convenience wrapper over a shared HTTP client.
///
/// Holds one [`Client`] bound to the configured base URL and timeout, a
/// [`Deduplicator`] for latest-wins cancellation, and the error-display
/// rule table. Construction merges caller overrides over defaults; the
/// configuration never changes afterwards.
pub struct HttpFacade {
    client: Client,
    config: ClientConfig,
    dedup: Deduplicator,
    notifier: Arc<dyn Notify>,
    rules: Vec<ErrorRule>,
}

impl HttpFacade {
    /// Create a facade with the stock rule table and no exempt methods.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Build`] if the underlying client cannot be
    /// constructed (e.g. TLS backend initialization failure).
    pub fn new(config: ClientConfig, notifier: Arc<dyn Notify>) -> Result<Self, FacadeError> {
        Self::with_rules(config, notifier, notify::default_rules(), Vec::new())
    }

    /// Create a facade with a custom rule table and a list of methods that
    /// are exempt from auto-cancellation.
    ///
    /// # Errors
    ///
    /// Returns [`FacadeError::Build`] if the underlying client cannot be
    /// constructed.
    pub fn with_rules(
        config: ClientConfig,
        notifier: Arc<dyn Notify>,
        rules: Vec<ErrorRule>,
        exempt_methods: Vec<Method>,
    ) -> Result<Self, FacadeError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| FacadeError::Build(e.to_string()))?;

        Ok(Self {
            client,
            config,
            dedup: Deduplicator::with_exempt(exempt_methods),
            notifier,
            rules,
        })
    }

    /// The configuration this facade was built with.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Cancel every in-flight request, for shutdown or navigation
    /// boundaries.
    pub fn cancel_all(&self) {
        self.dedup.cancel_all();
    }

    /// `GET` a resource. `params` and `options.query` merge into the query
    /// string.
    ///
    /// # Errors
    ///
    /// See [`FacadeError`] for the rejection taxonomy; every failure fires
    /// one notification first.
    pub async fn get(
        &self,
        url: &str,
        params: &[(&str, &str)],
        options: RequestOptions,
    ) -> Result<ApiResponse, FacadeError> {
        let request = self.client.get(self.absolute_url(url)).query(params);
        let request = apply_options(request, &options);
        self.dispatch(RequestDescriptor::new(Method::GET, url), request)
            .await
    }

    /// `DELETE` a resource. `params` and `options.query` merge into the
    /// query string.
    ///
    /// # Errors
    ///
    /// See [`FacadeError`] for the rejection taxonomy; every failure fires
    /// one notification first.
    pub async fn delete(
        &self,
        url: &str,
        params: &[(&str, &str)],
        options: RequestOptions,
    ) -> Result<ApiResponse, FacadeError> {
        let request = self.client.delete(self.absolute_url(url)).query(params);
        let request = apply_options(request, &options);
        self.dispatch(RequestDescriptor::new(Method::DELETE, url), request)
            .await
    }

    /// `POST` a body, form-encoded by default.
    ///
    /// # Errors
    ///
    /// See [`FacadeError`] for the rejection taxonomy; every failure fires
    /// one notification first.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        options: RequestOptions,
    ) -> Result<ApiResponse, FacadeError> {
        let request = self.client.post(self.absolute_url(url)).form(body);
        let request = apply_options(request, &options);
        self.dispatch(RequestDescriptor::new(Method::POST, url), request)
            .await
    }

    /// `PUT` a body, form-encoded by default.
    ///
    /// # Errors
    ///
    /// See [`FacadeError`] for the rejection taxonomy; every failure fires
    /// one notification first.
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        url: &str,
        body: &T,
        options: RequestOptions,
    ) -> Result<ApiResponse, FacadeError> {
        let request = self.client.put(self.absolute_url(url)).form(body);
        let request = apply_options(request, &options);
        self.dispatch(RequestDescriptor::new(Method::PUT, url), request)
            .await
    }

    /// Supersede any in-flight duplicate, register this request, then race
    /// cancellation against the transport send.
    async fn dispatch(
        &self,
        descriptor: RequestDescriptor,
        request: reqwest::RequestBuilder,
    ) -> Result<ApiResponse, FacadeError> {
        self.dedup.cancel_and_remove(&descriptor);
        let token = CancellationToken::new();
        self.dedup.register_if_absent(&descriptor, token.clone());

        let outcome = tokio::select! {
            () = token.cancelled() => {
                let key = descriptor.key();
                debug!(%key, "request superseded before completion");
                // The newer request owns the user's attention; no
                // notification for the loser.
                return Err(FacadeError::Cancelled { key });
            }
            outcome = request.send() => outcome,
        };

        self.classify(outcome).await
    }

    /// Two-level success check: transport status exactly 200, then envelope
    /// `code` exactly 200. Anything else notifies once and rejects.
    async fn classify(
        &self,
        outcome: Result<reqwest::Response, reqwest::Error>,
    ) -> Result<ApiResponse, FacadeError> {
        match outcome {
            Ok(response) => {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();

                if status != StatusCode::OK {
                    warn!(status = status.as_u16(), "non-200 transport status");
                    self.notifier.notify(Severity::Error, notify::NETWORK_ERROR);
                    return Err(FacadeError::Status {
                        status: status.as_u16(),
                        body: text,
                    });
                }

                // A non-JSON body has no code field and classifies as a
                // business failure, same as any envelope whose code is
                // not 200.
                let body: Value = serde_json::from_str(&text).unwrap_or(Value::String(text));
                let code = body.get("code").and_then(Value::as_i64);
                let msg = body
                    .get("msg")
                    .and_then(Value::as_str)
                    .map(ToOwned::to_owned);

                if code == Some(200) {
                    Ok(ApiResponse {
                        status: status.as_u16(),
                        body,
                    })
                } else {
                    debug!(?code, "business-level failure in 200 response");
                    notify::display_error(&self.rules, self.notifier.as_ref(), code, msg.as_deref());
                    Err(FacadeError::Business { code, msg, body })
                }
            }
            Err(err) => {
                warn!(error = %err, "transport failure");
                match err.status() {
                    Some(status) => notify::display_error(
                        &self.rules,
                        self.notifier.as_ref(),
                        Some(i64::from(status.as_u16())),
                        None,
                    ),
                    None => self.notifier.notify(Severity::Error, notify::NETWORK_ERROR),
                }
                Err(FacadeError::Transport(err.to_string()))
            }
        }
    }

    /// Join a relative path onto the base URL; absolute URLs pass through.
    fn absolute_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_owned();
        }
        let base = self.config.base_url.trim_end_matches('/');
        let path = url.trim_start_matches('/');
        format!("{base}/{path}")
    }
}

/// Merge per-call extras into the builder: headers win over defaults, query
/// pairs append, timeout overrides the client-wide value.
fn apply_options(
    mut request: reqwest::RequestBuilder,
    options: &RequestOptions,
) -> reqwest::RequestBuilder {
    for (name, value) in &options.headers {
        request = request.header(name, value);
    }
    if !options.query.is_empty() {
        request = request.query(&options.query);
    }
    if let Some(timeout) = options.timeout {
        request = request.timeout(timeout);
    }
    request
}
