//! One method per backend endpoint.

use tracing::warn;

use logwatch_types::{
    Alert, AlertTrendPoint, DashboardSummary, LogEvent, LogSearchRequest, PageRequest,
    PageResponse, Paginated, RecentErrorsFilter, ServiceCount, SeverityCounts, TimeRange,
    TrendInterval, TrendResponse,
};

use crate::{ApiClient, ApiError, ApiRequest, CancelToken};

impl ApiClient {
    /// `POST /api/errors/trend?interval=..`
    pub async fn error_trend(
        &self,
        interval: TrendInterval,
        cancel: &CancelToken,
    ) -> Result<TrendResponse, ApiError> {
        let request = ApiRequest::post("/api/errors/trend").query("interval", interval);
        self.send(request, cancel).await
    }

    /// `POST /api/errors/severity`
    pub async fn severity_counts(
        &self,
        range: &TimeRange,
        cancel: &CancelToken,
    ) -> Result<SeverityCounts, ApiError> {
        let request = ApiRequest::post("/api/errors/severity").json(range)?;
        self.send(request, cancel).await
    }

    /// `POST /api/errors/byService?top=N`. Already ranked and truncated
    /// server-side.
    pub async fn errors_by_service(
        &self,
        range: &TimeRange,
        top: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<ServiceCount>, ApiError> {
        let request = ApiRequest::post("/api/errors/byService")
            .query("top", top)
            .json(range)?;
        self.send(request, cancel).await
    }

    /// `POST /api/errors/recent?page=P&size=S`
    pub async fn recent_errors(
        &self,
        filter: &RecentErrorsFilter,
        page: PageRequest,
        cancel: &CancelToken,
    ) -> Result<Paginated<LogEvent>, ApiError> {
        let request = ApiRequest::post("/api/errors/recent")
            .query("page", page.page)
            .query("size", page.size)
            .json(filter)?;
        let mut result: Paginated<LogEvent> = self.send(request, cancel).await?;

        let dropped = result.normalize();
        if dropped > 0 {
            warn!(dropped, size = result.size, "recent errors page exceeded its size");
        }
        Ok(result)
    }

    /// `POST /api/logs/search`
    pub async fn search_logs(
        &self,
        search: &LogSearchRequest,
        cancel: &CancelToken,
    ) -> Result<PageResponse<LogEvent>, ApiError> {
        let request = ApiRequest::post("/api/logs/search").json(search)?;
        self.send(request, cancel).await
    }

    /// `GET /api/logs/recent`
    pub async fn recent_logs(&self, cancel: &CancelToken) -> Result<Vec<LogEvent>, ApiError> {
        self.send(ApiRequest::get("/api/logs/recent"), cancel).await
    }

    /// `GET /api/alerts/trend?days=N` (not enveloped)
    pub async fn alert_trend(
        &self,
        days: u32,
        cancel: &CancelToken,
    ) -> Result<Vec<AlertTrendPoint>, ApiError> {
        let request = ApiRequest::get("/api/alerts/trend").query("days", days);
        self.send_raw(request, cancel).await
    }

    /// `GET /api/alerts/active` (not enveloped)
    pub async fn active_alerts(&self, cancel: &CancelToken) -> Result<Vec<Alert>, ApiError> {
        self.send_raw(ApiRequest::get("/api/alerts/active"), cancel)
            .await
    }

    /// `GET /api/dashboard/summary` (not enveloped)
    pub async fn dashboard_summary(
        &self,
        cancel: &CancelToken,
    ) -> Result<DashboardSummary, ApiError> {
        self.send_raw(ApiRequest::get("/api/dashboard/summary"), cancel)
            .await
    }

    /// `GET /ping`, the backend's uptime check.
    pub async fn ping(&self, cancel: &CancelToken) -> Result<String, ApiError> {
        let reply = self.send_text(ApiRequest::get("/ping"), cancel).await?;
        Ok(reply.trim().to_string())
    }
}
