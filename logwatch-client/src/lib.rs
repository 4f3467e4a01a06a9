//! # logwatch-client
//!
//! HTTP client for the log-monitoring backend.
//!
//! The client issues requests, unwraps the `{success, message, data,
//! timestamp}` envelope most endpoints use, and normalizes every failure
//! into an [`ApiError`] whose message is fit for display. It never retries
//! and never caches.
//!
//! Every call takes a [`CancelToken`]. Cancelling the token drops the
//! in-flight transport future and resolves the call with
//! [`ApiError::Cancelled`], which callers are expected to discard silently.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logwatch_client::{ApiClient, CancelToken};
//! use logwatch_types::TrendInterval;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = ApiClient::builder()
//!         .base_url("http://localhost:8081")
//!         .build()?;
//!
//!     let cancel = CancelToken::new();
//!     let trend = client.error_trend(TrendInterval::Hour, &cancel).await?;
//!
//!     println!("{} buckets", trend.trend_points.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Envelope asymmetry
//!
//! The alerts and dashboard-summary endpoints return bare JSON rather than
//! an envelope. Use [`ApiClient::send`] for enveloped endpoints and
//! [`ApiClient::send_raw`] for bare ones; the endpoint methods already pick
//! the right one.

pub mod cancel;
pub mod client;
mod endpoints;
pub mod error;

pub use cancel::CancelToken;
pub use client::{ApiClient, ApiClientBuilder, ApiRequest, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::ApiError;

// Re-export types for convenience
pub use logwatch_types as types;
