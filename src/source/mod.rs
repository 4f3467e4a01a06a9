//! Data source abstraction for backend reads.
//!
//! Queries depend on [`LogSource`] rather than on the HTTP client directly,
//! so they can be driven by an in-memory source in tests or by anything
//! else that can answer the same questions.

use std::fmt::Debug;

use async_trait::async_trait;
use logwatch_client::{ApiClient, ApiError, CancelToken};
use logwatch_types::{
    Alert, AlertTrendPoint, DashboardSummary, LogEvent, LogSearchRequest, PageRequest,
    PageResponse, Paginated, RecentErrorsFilter, ServiceCount, SeverityCounts, TimeRange,
    TrendInterval, TrendResponse,
};

/// Trait for reading monitoring data.
///
/// Every method takes the [`CancelToken`] of the fetch it serves. A
/// cancelled call should resolve promptly with [`ApiError::Cancelled`].
#[async_trait]
pub trait LogSource: Send + Sync + Debug {
    /// Returns a human-readable description of the source.
    fn description(&self) -> String;

    async fn error_trend(
        &self,
        interval: TrendInterval,
        cancel: &CancelToken,
    ) -> Result<TrendResponse, ApiError>;

    async fn severity_counts(
        &self,
        range: &TimeRange,
        cancel: &CancelToken,
    ) -> Result<SeverityCounts, ApiError>;

    async fn errors_by_service(
        &self,
        range: &TimeRange,
        top: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<ServiceCount>, ApiError>;

    /// One page of recent errors, already trimmed to the requested size.
    async fn recent_errors(
        &self,
        filter: &RecentErrorsFilter,
        page: PageRequest,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError>;

    async fn search_logs(
        &self,
        search: &LogSearchRequest,
        cancel: &CancelToken,
    ) -> Result<PageResponse<LogEvent>, ApiError>;

    async fn recent_logs(&self, cancel: &CancelToken) -> Result<Vec<LogEvent>, ApiError>;

    async fn alert_trend(
        &self,
        days: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<AlertTrendPoint>, ApiError>;

    async fn active_alerts(&self, cancel: &CancelToken) -> Result<Vec<Alert>, ApiError>;

    async fn dashboard_summary(&self, cancel: &CancelToken)
        -> Result<DashboardSummary, ApiError>;
}

#[async_trait]
impl LogSource for ApiClient {
    fn description(&self) -> String {
        self.base_url().to_string()
    }

    async fn error_trend(
        &self,
        interval: TrendInterval,
        cancel: &CancelToken,
    ) -> Result<TrendResponse, ApiError> {
        ApiClient::error_trend(self, interval, cancel).await
    }

    async fn severity_counts(
        &self,
        range: &TimeRange,
        cancel: &CancelToken,
    ) -> Result<SeverityCounts, ApiError> {
        ApiClient::severity_counts(self, range, cancel).await
    }

    async fn errors_by_service(
        &self,
        range: &TimeRange,
        top: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<ServiceCount>, ApiError> {
        ApiClient::errors_by_service(self, range, top, cancel).await
    }

    async fn recent_errors(
        &self,
        filter: &RecentErrorsFilter,
        page: PageRequest,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError> {
        ApiClient::recent_errors(self, filter, page, cancel).await
    }

    async fn search_logs(
        &self,
        search: &LogSearchRequest,
        cancel: &CancelToken,
    ) -> Result<PageResponse<LogEvent>, ApiError> {
        ApiClient::search_logs(self, search, cancel).await
    }

    async fn recent_logs(&self, cancel: &CancelToken) -> Result<Vec<LogEvent>, ApiError> {
        ApiClient::recent_logs(self, cancel).await
    }

    async fn alert_trend(
        &self,
        days: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<AlertTrendPoint>, ApiError> {
        ApiClient::alert_trend(self, days, cancel).await
    }

    async fn active_alerts(&self, cancel: &CancelToken) -> Result<Vec<Alert>, ApiError> {
        ApiClient::active_alerts(self, cancel).await
    }

    async fn dashboard_summary(
        &self,
        cancel: &CancelToken,
    ) -> Result<DashboardSummary, ApiError> {
        ApiClient::dashboard_summary(self, cancel).await
    }
}

#[cfg(test)]
pub(crate) mod fake;
