//! Active alerts and the alert trend.

use std::sync::Arc;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{Alert, AlertSeverity, AlertTrendPoint};
use serde::Serialize;

use crate::query::Query;
use crate::source::LogSource;

pub const DEFAULT_ALERT_DAYS: u32 = 14;

#[derive(Debug, Clone)]
pub struct ActiveAlertsQuery {
    source: Arc<dyn LogSource>,
}

impl ActiveAlertsQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for ActiveAlertsQuery {
    type Params = ();
    type Output = Vec<Alert>;

    fn name(&self) -> &'static str {
        "active_alerts"
    }

    async fn fetch(&self, _: &(), cancel: &CancelToken) -> Result<Vec<Alert>, ApiError> {
        self.source.active_alerts(cancel).await
    }
}

/// Everything the alerts page shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertsOverview {
    pub trend: Vec<AlertTrendPoint>,
    pub active: Vec<Alert>,
}

impl AlertsOverview {
    pub fn count_by_severity(&self, severity: AlertSeverity) -> usize {
        self.active.iter().filter(|a| a.severity == severity).count()
    }

    pub fn opened_in_window(&self) -> u64 {
        self.trend.iter().map(|day| day.count).sum()
    }
}

/// The alert trend over `days` and the active alerts, requested together.
/// Either failing fails the whole overview.
#[derive(Debug, Clone)]
pub struct AlertsOverviewQuery {
    source: Arc<dyn LogSource>,
}

impl AlertsOverviewQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for AlertsOverviewQuery {
    type Params = u32;
    type Output = AlertsOverview;

    fn name(&self) -> &'static str {
        "alerts_overview"
    }

    async fn fetch(&self, days: &u32, cancel: &CancelToken) -> Result<AlertsOverview, ApiError> {
        let (trend, active) = tokio::try_join!(
            self.source.alert_trend(*days, cancel),
            self.source.active_alerts(cancel),
        )?;
        Ok(AlertsOverview { trend, active })
    }
}
