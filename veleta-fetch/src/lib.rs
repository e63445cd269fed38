// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Veleta Fetch
//!
//! Resilient HTTP fetching for Veleta ingestion jobs.
//!
//! Every job talks to its upstream API through the same small stack:
//!
//! - [`ApiClient`] - one GET with retry, rate-limit waits and backoff
//! - [`Paginator`] - drives the client across a paged API until exhaustion
//! - [`SecretStore`] - credential retrieval (env or file backed)
//!
//! The client classifies each response and either returns, waits, or
//! retries; the paginator accumulates pages and degrades to partial results
//! on failure. Both are deliberately blocking-per-invocation: one job
//! processes one unit of work to completion, and parallelism happens across
//! invocations.

pub mod client;
pub mod error;
pub mod paginator;
pub mod request;
pub mod retry;
pub mod secrets;
pub mod transport;

pub use client::{ApiClient, FetchOutcome};
pub use error::{FetchError, SecretError};
pub use paginator::{PageCursor, Paginator, TotalFound};
pub use request::ApiRequest;
pub use retry::RetryPolicy;
pub use secrets::{EnvSecretStore, FileSecretStore, SecretStore};
pub use transport::{HttpTransport, RawResponse, ReqwestTransport};
