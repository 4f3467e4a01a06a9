//! In-memory [`LogSource`] for tests.

use std::time::Duration;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{
    Alert, AlertSeverity, AlertStatus, AlertTrendPoint, DashboardSummary, Environment, LogEvent,
    LogLevel, LogSearchRequest, PageRequest, PageResponse, Paginated, RecentErrorsFilter,
    ServiceCount, SeverityCounts, TimeRange, TrendInterval, TrendResponse,
};
use parking_lot::Mutex;

use super::LogSource;

#[derive(Debug, Default)]
pub(crate) struct FakeSource {
    pub calls: Mutex<Vec<&'static str>>,
    pub delay: Mutex<Duration>,
    pub fail_with: Mutex<Option<ApiError>>,
    pub trend: Mutex<TrendResponse>,
    pub severity: Mutex<SeverityCounts>,
    pub services: Mutex<Vec<ServiceCount>>,
    pub events: Mutex<Vec<LogEvent>>,
    pub alerts: Mutex<Vec<Alert>>,
    pub alert_days: Mutex<Vec<AlertTrendPoint>>,
    pub summary: Mutex<DashboardSummary>,
    pub searches: Mutex<Vec<LogSearchRequest>>,
    pub ranges: Mutex<Vec<TimeRange>>,
}

impl FakeSource {
    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self, endpoint: &str) -> usize {
        self.calls.lock().iter().filter(|c| **c == endpoint).count()
    }

    pub fn fail(&self, err: Option<ApiError>) {
        *self.fail_with.lock() = err;
    }

    async fn enter(&self, endpoint: &'static str, cancel: &CancelToken) -> Result<(), ApiError> {
        self.calls.lock().push(endpoint);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::select! {
                _ = cancel.cancelled() => return Err(ApiError::Cancelled),
                _ = tokio::time::sleep(delay) => {}
            }
        }
        match self.fail_with.lock().clone() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn page_of(&self, page: u32, size: u32) -> Paginated<LogEvent> {
        let events = self.events.lock();
        let items = events
            .iter()
            .skip((page as usize) * (size as usize))
            .take(size as usize)
            .cloned()
            .collect();
        Paginated::new(items, events.len() as u64, page, size)
    }
}

#[async_trait]
impl LogSource for FakeSource {
    fn description(&self) -> String {
        "fake".to_string()
    }

    async fn error_trend(
        &self,
        interval: TrendInterval,
        cancel: &CancelToken,
    ) -> Result<TrendResponse, ApiError> {
        self.enter("error_trend", cancel).await?;
        let mut trend = self.trend.lock().clone();
        trend.interval = interval;
        Ok(trend)
    }

    async fn severity_counts(
        &self,
        range: &TimeRange,
        cancel: &CancelToken,
    ) -> Result<SeverityCounts, ApiError> {
        self.ranges.lock().push(range.clone());
        self.enter("severity_counts", cancel).await?;
        Ok(*self.severity.lock())
    }

    async fn errors_by_service(
        &self,
        range: &TimeRange,
        top: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<ServiceCount>, ApiError> {
        self.ranges.lock().push(range.clone());
        self.enter("errors_by_service", cancel).await?;
        Ok(self.services.lock().iter().take(top as usize).cloned().collect())
    }

    async fn recent_errors(
        &self,
        _filter: &RecentErrorsFilter,
        page: PageRequest,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError> {
        self.enter("recent_errors", cancel).await?;
        Ok(self.page_of(page.page, page.size))
    }

    async fn search_logs(
        &self,
        search: &LogSearchRequest,
        cancel: &CancelToken,
    ) -> Result<PageResponse<LogEvent>, ApiError> {
        self.searches.lock().push(search.clone());
        self.enter("search_logs", cancel).await?;
        let page = self.page_of(search.page, search.size);
        Ok(PageResponse {
            total_pages: page.page_count(),
            first: page.page == 0,
            last: page.is_last_page(),
            content: page.items,
            total_elements: page.total,
            number: page.page,
            size: page.size,
        })
    }

    async fn recent_logs(&self, cancel: &CancelToken) -> Result<Vec<LogEvent>, ApiError> {
        self.enter("recent_logs", cancel).await?;
        Ok(self.events.lock().clone())
    }

    async fn alert_trend(
        &self,
        days: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<AlertTrendPoint>, ApiError> {
        self.enter("alert_trend", cancel).await?;
        Ok(self.alert_days.lock().iter().take(days as usize).cloned().collect())
    }

    async fn active_alerts(&self, cancel: &CancelToken) -> Result<Vec<Alert>, ApiError> {
        self.enter("active_alerts", cancel).await?;
        Ok(self.alerts.lock().clone())
    }

    async fn dashboard_summary(
        &self,
        cancel: &CancelToken,
    ) -> Result<DashboardSummary, ApiError> {
        self.enter("dashboard_summary", cancel).await?;
        Ok(*self.summary.lock())
    }
}

pub(crate) fn event(id: &str, service: &str, level: LogLevel) -> LogEvent {
    LogEvent {
        id: id.to_string(),
        service_name: service.to_string(),
        env: Environment::Dev,
        tenant: "acme".to_string(),
        level,
        message: format!("{} from {}", level, service),
        trace_id: Some("abc123".to_string()),
        latency_ms: None,
        stack: None,
        timestamp: "2025-10-20T08:15:00Z".to_string(),
    }
}

pub(crate) fn alert(id: &str, severity: AlertSeverity) -> Alert {
    Alert {
        id: id.to_string(),
        rule_id: "error.rate.high".to_string(),
        service_name: "billing".to_string(),
        env: Some(Environment::Prod),
        tenant: None,
        severity,
        status: AlertStatus::Open,
        observed: 42.0,
        threshold: 20.0,
        opened_at: "2025-10-20T08:00:00Z".to_string(),
        closed_at: None,
        note: None,
    }
}
