//! # Supersede HTTP Client
//!
//! A thin convenience layer over [`reqwest`] with latest-wins de-duplication
//! of in-flight requests and mapping of HTTP/business error codes to
//! user-facing notifications.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use supersede_client::{ClientConfig, HttpFacade, RequestOptions, TracingNotifier};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let facade = HttpFacade::new(
//!         ClientConfig::new("http://localhost:8080"),
//!         Arc::new(TracingNotifier),
//!     )?;
//!
//!     let response = facade
//!         .get("/api/todos", &[("page", "1")], RequestOptions::default())
//!         .await?;
//!
//!     println!("payload: {:?}", response.data());
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - Verb methods (`get`, `delete`, `post`, `put`) over one shared client
//! - Latest-wins de-duplication: a new request cancels an in-flight request
//!   with the same method and URL before it is dispatched
//! - Business-code classification: a transport-200 response is only a
//!   success when its envelope carries `code == 200`
//! - Error display through an injected [`Notify`] implementation, driven by
//!   an exact-code rule table
//! - Explicit process-wide singleton with first-call-wins construction and
//!   a `reset` hook for test isolation

pub mod config;
pub mod dedup;
pub mod error;
pub mod facade;
pub mod global;
pub mod notify;

// Re-export main types for convenience
pub use config::{ClientConfig, RequestOptions, DEFAULT_TIMEOUT};
pub use dedup::{Deduplicator, RequestDescriptor};
pub use error::FacadeError;
pub use facade::{ApiResponse, HttpFacade};
pub use notify::{default_rules, ErrorRule, Notify, Severity, TracingNotifier};

// Re-export commonly used transport types
pub use reqwest::{Method, StatusCode};
