//! The fetch lifecycle for one query instance.

use std::sync::{Arc, Weak};
use std::time::Duration;

use logwatch_client::{ApiError, CancelToken};
use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::poll::Poller;
use super::{FetchState, Query};

/// What a parameter change did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// A new fetch was issued and any previous one cancelled.
    Issued,
    /// Params equal the last issued ones; nothing happened.
    Unchanged,
    /// Params are incomplete; no request was issued and the in-flight one,
    /// if any, was left alone.
    Guarded,
}

/// Bookkeeping for the current fetch. Guarded by one lock so the
/// "is this still current" check and the commit happen together.
#[derive(Debug)]
struct Ticket<P> {
    generation: u64,
    token: Option<CancelToken>,
    params: Option<P>,
    torn_down: bool,
}

struct Inner<Q: Query> {
    query: Q,
    state: watch::Sender<FetchState<Q::Output>>,
    ticket: Mutex<Ticket<Q::Params>>,
}

impl<Q: Query> Inner<Q> {
    fn issue(self: &Arc<Self>, ticket: &mut Ticket<Q::Params>, params: Q::Params) {
        if let Some(previous) = ticket.token.take() {
            debug!(query = self.query.name(), generation = ticket.generation, "cancelling previous fetch");
            previous.cancel();
        }

        ticket.generation += 1;
        let generation = ticket.generation;
        let token = CancelToken::new();
        ticket.token = Some(token.clone());
        ticket.params = Some(params.clone());

        self.state.send_modify(FetchState::begin);
        debug!(query = self.query.name(), generation, ?params, "issuing fetch");

        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let outcome = tokio::select! {
                biased;
                _ = token.cancelled() => Err(ApiError::Cancelled),
                result = inner.query.fetch(&params, &token) => result,
            };
            inner.commit(generation, &token, outcome);
        });
    }

    /// Re-issue the last params, if any. Returns false once torn down.
    fn reissue(self: &Arc<Self>) -> bool {
        let mut ticket = self.ticket.lock();
        if ticket.torn_down {
            return false;
        }
        if let Some(params) = ticket.params.clone() {
            self.issue(&mut ticket, params);
        }
        true
    }

    fn commit(&self, generation: u64, token: &CancelToken, outcome: Result<Q::Output, ApiError>) {
        let mut ticket = self.ticket.lock();
        if ticket.torn_down || ticket.generation != generation || token.is_cancelled() {
            debug!(query = self.query.name(), generation, "discarding stale result");
            return;
        }

        match outcome {
            Ok(data) => {
                self.state.send_modify(|state| state.succeed(data));
            }
            Err(err) if err.is_cancelled() => {
                debug!(query = self.query.name(), generation, "fetch cancelled");
                return;
            }
            Err(err) => {
                warn!(query = self.query.name(), generation, error = %err, "fetch failed");
                self.state.send_modify(|state| state.fail(err.to_string()));
            }
        }
        ticket.token = None;
    }
}

/// Owner of one query's fetch lifecycle.
///
/// Must be used from within a tokio runtime. Dropping the handle cancels the
/// in-flight fetch and stops polling; subscribers see no further updates.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use logwatch::queries::ErrorTrendQuery;
/// use logwatch::query::QueryHandle;
/// use logwatch_client::ApiClient;
/// use logwatch_types::TrendInterval;
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let source = Arc::new(ApiClient::from_env()?);
/// let trend = QueryHandle::new(ErrorTrendQuery::new(source));
///
/// trend.set_params(TrendInterval::Hour);
/// let state = trend.settled().await;
/// println!("{:?}", state.data);
/// # Ok(())
/// # }
/// ```
pub struct QueryHandle<Q: Query> {
    inner: Arc<Inner<Q>>,
    poller: Option<Poller>,
}

impl<Q: Query> QueryHandle<Q> {
    /// Create an idle handle. Nothing is fetched until params are set.
    pub fn new(query: Q) -> Self {
        let (state, _) = watch::channel(FetchState::default());
        Self {
            inner: Arc::new(Inner {
                query,
                state,
                ticket: Mutex::new(Ticket {
                    generation: 0,
                    token: None,
                    params: None,
                    torn_down: false,
                }),
            }),
            poller: None,
        }
    }

    /// Create a handle and fetch `params` right away.
    pub fn mount(query: Q, params: Q::Params) -> Self {
        let handle = Self::new(query);
        handle.set_params(params);
        handle
    }

    pub fn query(&self) -> &Q {
        &self.inner.query
    }

    /// Change the params, fetching if they are ready and differ from the
    /// last issued ones.
    pub fn set_params(&self, params: Q::Params) -> Trigger {
        if !self.inner.query.ready(&params) {
            debug!(query = self.inner.query.name(), ?params, "params not ready, skipping fetch");
            return Trigger::Guarded;
        }

        let mut ticket = self.inner.ticket.lock();
        if ticket.params.as_ref() == Some(&params) {
            return Trigger::Unchanged;
        }
        self.inner.issue(&mut ticket, params);
        Trigger::Issued
    }

    /// Fetch the current params again.
    ///
    /// Returns [`Trigger::Guarded`] if no params have been issued yet.
    pub fn refresh(&self) -> Trigger {
        let mut ticket = self.inner.ticket.lock();
        match ticket.params.clone() {
            Some(params) => {
                self.inner.issue(&mut ticket, params);
                Trigger::Issued
            }
            None => Trigger::Guarded,
        }
    }

    /// Cancel the in-flight fetch, if any, without issuing another.
    pub fn cancel(&self) {
        let mut ticket = self.inner.ticket.lock();
        if let Some(token) = ticket.token.take() {
            token.cancel();
            self.inner.state.send_modify(|state| state.loading = false);
        }
    }

    /// The params of the most recent fetch.
    pub fn params(&self) -> Option<Q::Params> {
        self.inner.ticket.lock().params.clone()
    }

    /// A snapshot of the current state.
    pub fn state(&self) -> FetchState<Q::Output> {
        self.inner.state.borrow().clone()
    }

    /// Watch the state for changes.
    pub fn subscribe(&self) -> watch::Receiver<FetchState<Q::Output>> {
        self.inner.state.subscribe()
    }

    /// Wait until no fetch is loading, then return the state.
    pub async fn settled(&self) -> FetchState<Q::Output> {
        let mut rx = self.inner.state.subscribe();
        let settled = match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        };
        settled
    }

    /// Re-fetch the current params every `every`, replacing any previous
    /// polling loop. Polling stops when the handle is dropped.
    ///
    /// A zero or unschedulable period stops polling instead and returns false.
    pub fn start_polling(&mut self, every: Duration) -> bool {
        self.stop_polling();

        let weak: Weak<Inner<Q>> = Arc::downgrade(&self.inner);
        let poller = Poller::spawn(every, move || match weak.upgrade() {
            Some(inner) => inner.reissue(),
            None => false,
        });
        match poller {
            Some(poller) => {
                debug!(query = self.inner.query.name(), ?every, "polling started");
                self.poller = Some(poller);
                true
            }
            None => {
                warn!(query = self.inner.query.name(), ?every, "polling period out of range");
                false
            }
        }
    }

    pub fn stop_polling(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.stop();
        }
    }

    pub fn is_polling(&self) -> bool {
        self.poller.is_some()
    }
}

impl<Q: Query> Drop for QueryHandle<Q> {
    fn drop(&mut self) {
        self.stop_polling();

        let mut ticket = self.inner.ticket.lock();
        ticket.torn_down = true;
        if let Some(token) = ticket.token.take() {
            debug!(query = self.inner.query.name(), "torn down with fetch in flight");
            token.cancel();
        }
    }
}

impl<Q: Query> std::fmt::Debug for QueryHandle<Q> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryHandle")
            .field("query", &self.inner.query.name())
            .field("state", &self.inner.state.borrow().phase())
            .field("polling", &self.poller.is_some())
            .finish()
    }
}
