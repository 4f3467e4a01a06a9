//! Free-form log search.

use std::sync::Arc;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{
    Environment, LogEvent, LogLevel, LogSearchRequest, MessageMode, Paginated,
};
use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::query::{Paged, Query};
use crate::source::LogSource;

/// Trace ids are exactly this many characters.
pub const TRACE_ID_LEN: usize = 6;

pub const TRACE_ID_HINT: &str = "Trace ID must be exactly 6 characters";

/// Cut raw input down to at most [`TRACE_ID_LEN`] characters.
pub fn normalize_trace_id(raw: &str) -> String {
    raw.chars().take(TRACE_ID_LEN).collect()
}

/// Inline hint for a partially typed trace id.
pub fn trace_id_hint(trace_id: &str) -> Option<&'static str> {
    match trace_id.chars().count() {
        0 | TRACE_ID_LEN => None,
        _ => Some(TRACE_ID_HINT),
    }
}

/// What the search form holds. `None` means "all".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LogSearchFilter {
    pub service_name: Option<String>,
    pub trace_id: String,
    pub level: Option<LogLevel>,
    pub env: Option<Environment>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub message: String,
}

impl Default for LogSearchFilter {
    fn default() -> Self {
        Self {
            service_name: None,
            trace_id: String::new(),
            level: None,
            env: Some(Environment::Dev),
            from: None,
            to: None,
            message: String::new(),
        }
    }
}

impl LogSearchFilter {
    /// Set the trace id from raw input, truncating it.
    pub fn with_trace_id(mut self, raw: &str) -> Self {
        self.trace_id = normalize_trace_id(raw);
        self
    }

    /// Empty or complete.
    pub fn trace_id_ready(&self) -> bool {
        trace_id_hint(&self.trace_id).is_none()
    }

    /// Build the request body for one page.
    pub fn to_request(&self, page: u32, size: u32) -> LogSearchRequest {
        let message = self.message.trim();
        let has_message = !message.is_empty();
        let complete_trace = self.trace_id.chars().count() == TRACE_ID_LEN;

        LogSearchRequest {
            service_name: self.service_name.clone(),
            trace_id: complete_trace.then(|| self.trace_id.clone()),
            level: self.level,
            env: self.env,
            from: self.from.clone(),
            to: self.to.clone(),
            message: has_message.then(|| message.to_string()),
            message_mode: has_message.then_some(MessageMode::Contains),
            sort_by: None,
            sort_dir: None,
            page,
            size,
        }
    }
}

/// Searches logs. Never fetches while the trace id is partially typed.
///
/// Successful results also prime the query's [`ServiceCatalog`].
#[derive(Debug, Clone)]
pub struct LogSearchQuery {
    source: Arc<dyn LogSource>,
    catalog: Arc<Mutex<ServiceCatalog>>,
}

impl LogSearchQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self {
            source,
            catalog: Arc::default(),
        }
    }

    /// The service names seen so far.
    pub fn catalog(&self) -> ServiceCatalog {
        self.catalog.lock().clone()
    }
}

#[async_trait]
impl Query for LogSearchQuery {
    type Params = Paged<LogSearchFilter>;
    type Output = Paginated<LogEvent>;

    fn name(&self) -> &'static str {
        "log_search"
    }

    fn ready(&self, params: &Paged<LogSearchFilter>) -> bool {
        params.filter.trace_id_ready()
    }

    async fn fetch(
        &self,
        params: &Paged<LogSearchFilter>,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError> {
        let request = params.filter.to_request(params.page, params.size);
        let response = self.source.search_logs(&request, cancel).await?;

        let mut page: Paginated<LogEvent> = response.into();
        let dropped = page.normalize();
        if dropped > 0 {
            warn!(dropped, size = page.size, "trimmed oversized page");
        }
        if !cancel.is_cancelled() {
            self.catalog.lock().observe(&params.filter, &page);
        }
        Ok(page)
    }
}

/// Service names for the search form's dropdown.
///
/// Primed once, from the first page of an unfiltered-by-service search,
/// and kept for the lifetime of the page.
#[derive(Debug, Clone, Default)]
pub struct ServiceCatalog {
    services: Vec<String>,
}

impl ServiceCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_primed(&self) -> bool {
        !self.services.is_empty()
    }

    pub fn services(&self) -> &[String] {
        &self.services
    }

    /// Offer a committed result. Returns true if it primed the catalog.
    pub fn observe(&mut self, filter: &LogSearchFilter, result: &Paginated<LogEvent>) -> bool {
        if self.is_primed()
            || filter.service_name.is_some()
            || result.page != 0
            || result.items.is_empty()
        {
            return false;
        }

        for event in &result.items {
            if !self.services.contains(&event.service_name) {
                self.services.push(event.service_name.clone());
            }
        }
        debug!(services = self.services.len(), "service catalog primed");
        true
    }
}
