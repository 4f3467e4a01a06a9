//! Request-scoped fetching.
//!
//! A [`Query`] describes one backend read: which parameters it depends
//! on, when those parameters are complete enough to fetch, and how to turn
//! the response into a view-model. A [`QueryHandle`] owns the lifecycle of
//! one query instance:
//!
//! - every fetch gets a fresh [`CancelToken`]; issuing a new fetch cancels
//!   the previous one first
//! - only the most recently issued fetch may commit, checked under the same
//!   lock that performs the commit
//! - dropping the handle cancels whatever is in flight, and nothing is
//!   committed afterwards
//!
//! ```text
//!   set_params ──▶ ready? ──no──▶ Guarded (no request, no state change)
//!                    │
//!                   yes ──▶ equal to last? ──yes──▶ Unchanged
//!                                 │
//!                                no ──▶ cancel previous, loading=true ──▶ spawn fetch
//!                                                                           │
//!                    commit (if still current) ◀──────────────────────────────┘
//! ```

mod handle;
mod paged;
mod poll;
mod state;

use std::fmt::Debug;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};

pub use handle::{QueryHandle, Trigger};
pub use paged::{Paged, PagedHandle, Pages};
pub use poll::Poller;
pub use state::{FetchState, Phase};

/// One kind of backend read.
#[async_trait]
pub trait Query: Send + Sync + 'static {
    /// The inputs this query depends on. Equal params never refetch.
    type Params: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// The view-model produced from a response.
    type Output: Clone + Debug + Send + Sync + 'static;

    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Whether `params` are complete enough to fetch.
    fn ready(&self, _params: &Self::Params) -> bool {
        true
    }

    /// Fetch and map one response.
    async fn fetch(
        &self,
        params: &Self::Params,
        cancel: &CancelToken,
    ) -> Result<Self::Output, ApiError>;
}
