//! # logwatch-types
//!
//! Wire and domain types shared by the logwatch client and dashboard.
//!
//! Every entity here is owned by the backend. The dashboard only holds
//! short-lived copies of them, so the types are plain values: cheap to
//! clone, compared structurally, and serializable when the `serde`
//! feature is enabled.
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization matching the backend's camelCase wire format
//!
//! ## Example
//!
//! ```rust
//! use logwatch_types::{Paginated, RecentErrorsFilter, LogLevel};
//!
//! let filter = RecentErrorsFilter {
//!     level: Some(LogLevel::Error),
//!     ..Default::default()
//! };
//! assert_eq!(filter.level.map(|l| l.as_str()), Some("ERROR"));
//!
//! let page: Paginated<u32> = Paginated::new(vec![1, 2, 3], 25, 0, 10);
//! assert_eq!(page.page_count(), 3);
//! ```

mod alert;
mod envelope;
mod filter;
mod level;
mod log;
mod page;
mod stats;

pub use alert::*;
pub use envelope::*;
pub use filter::*;
pub use level::*;
pub use log::*;
pub use page::*;
pub use stats::*;
