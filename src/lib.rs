//! # logwatch
//!
//! A terminal console for a log-analytics backend: a dashboard, log search,
//! error analysis and alerts, each backed by request-scoped queries.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                           App                                │
//! │  ┌────────┐   ┌──────────┐   ┌──────────┐   ┌─────────────┐ │
//! │  │ pages  │──▶│ queries  │──▶│  query   │──▶│   source    │ │
//! │  │(mount) │   │(per view)│   │ (handle) │   │ (LogSource) │ │
//! │  └────────┘   └──────────┘   └──────────┘   └──────┬──────┘ │
//! │                                                    │        │
//! │  ┌────────┐   ┌──────────┐                         ▼        │
//! │  │ theme  │   │  config  │                ┌─────────────┐   │
//! │  └────────┘   └──────────┘                │  ApiClient  │   │
//! │                                           └─────────────┘   │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`app`]**: root state; opens one [`Page`] at a time
//! - **[`pages`]**: the queries each page mounts and what it exports
//! - **[`queries`]**: one [`Query`] per backend read, plus view-model shaping
//! - **[`query`]**: [`QueryHandle`], the cancellable, race-free fetch primitive
//! - **[`source`]**: the [`LogSource`] seam over [`ApiClient`]
//! - **[`theme`]**: dark and light palettes behind a single [`ThemeProvider`]
//! - **[`config`]**: layered [`Settings`]
//!
//! ## Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use logwatch::{App, ApiClient, Page, Settings, ThemeMode};
//!
//! # tokio_test::block_on(async {
//! let client = ApiClient::builder().base_url("http://localhost:8081").build()?;
//! let mut app = App::new(Arc::new(client), Settings::default(), ThemeMode::Dark);
//!
//! app.open(Page::Errors);
//! app.settled().await;
//! println!("{}", serde_json::to_string_pretty(&app.snapshot())?);
//! # Ok::<(), anyhow::Error>(())
//! # });
//! ```

pub mod app;
pub mod config;
pub mod pages;
pub mod queries;
pub mod query;
pub mod source;
pub mod theme;

pub use app::{App, Mounted, Page, PageSnapshot};
pub use config::{Settings, ThemeChoice};
pub use logwatch_client::{ApiClient, ApiError, CancelToken};
pub use query::{FetchState, Paged, PagedHandle, Phase, Query, QueryHandle, Trigger};
pub use source::LogSource;
pub use theme::{Theme, ThemeHandle, ThemeMode, ThemeProvider};
