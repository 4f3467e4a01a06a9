//! Dashboard cards and the recent-logs feed.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{DashboardSummary, LogEvent};
use serde::Serialize;

use crate::query::Query;
use crate::source::LogSource;

/// How often the dashboard re-fetches while mounted.
pub const DASHBOARD_POLL_INTERVAL: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub summary: DashboardSummary,
    pub recent: Vec<LogEvent>,
    /// Distinct services among `recent`.
    pub services: usize,
}

impl DashboardView {
    pub fn new(summary: DashboardSummary, recent: Vec<LogEvent>) -> Self {
        let services = recent
            .iter()
            .map(|event| event.service_name.as_str())
            .collect::<HashSet<_>>()
            .len();
        Self {
            summary,
            recent,
            services,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardQuery {
    source: Arc<dyn LogSource>,
}

impl DashboardQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for DashboardQuery {
    type Params = ();
    type Output = DashboardView;

    fn name(&self) -> &'static str {
        "dashboard"
    }

    async fn fetch(&self, _: &(), cancel: &CancelToken) -> Result<DashboardView, ApiError> {
        let (summary, recent) = tokio::try_join!(
            self.source.dashboard_summary(cancel),
            self.source.recent_logs(cancel),
        )?;
        Ok(DashboardView::new(summary, recent))
    }
}
