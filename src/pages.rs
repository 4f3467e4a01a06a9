//! The queries each page mounts, and what each page exports.
//!
//! A page value owns its query handles. Dropping the page drops the
//! handles, which cancels their in-flight fetches and stops polling.

use std::sync::Arc;

use chrono::Utc;
use logwatch_types::{
    Alert, Environment, LogEvent, LogLevel, Paginated, RecentErrorsFilter, TimeRange,
    TrendInterval,
};
use serde::Serialize;

use crate::config::Settings;
use crate::queries::{
    default_range, trace_id_hint, ActiveAlertsQuery, AlertsOverview, AlertsOverviewQuery,
    ByServiceParams, ChartPoint, DashboardQuery, DashboardView, ErrorTrendQuery,
    ErrorsByServiceQuery, LogSearchFilter, LogSearchQuery, RecentErrorsQuery, ServiceBar,
    ServiceCatalog, SeverityQuery, SeveritySlice, DEFAULT_ALERT_DAYS, DEFAULT_TOP,
};
use crate::query::{FetchState, PagedHandle, QueryHandle, Trigger};
use crate::source::LogSource;

/// Summary cards, recent logs, the hourly trend and active alerts.
#[derive(Debug)]
pub struct DashboardPage {
    pub overview: QueryHandle<DashboardQuery>,
    pub trend: QueryHandle<ErrorTrendQuery>,
    pub alerts: QueryHandle<ActiveAlertsQuery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub overview: FetchState<DashboardView>,
    pub trend: FetchState<Vec<ChartPoint>>,
    pub alerts: FetchState<Vec<Alert>>,
}

impl DashboardPage {
    pub fn mount(source: &Arc<dyn LogSource>, settings: &Settings) -> Self {
        let mut overview = QueryHandle::mount(DashboardQuery::new(source.clone()), ());
        overview.start_polling(settings.poll_interval());

        Self {
            overview,
            trend: QueryHandle::mount(ErrorTrendQuery::new(source.clone()), TrendInterval::Hour),
            alerts: QueryHandle::mount(ActiveAlertsQuery::new(source.clone()), ()),
        }
    }

    pub async fn settled(&self) {
        tokio::join!(self.overview.settled(), self.trend.settled(), self.alerts.settled());
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            overview: self.overview.state(),
            trend: self.trend.state(),
            alerts: self.alerts.state(),
        }
    }
}

/// The log search form and its results.
#[derive(Debug)]
pub struct LogsPage {
    pub search: PagedHandle<LogSearchQuery>,
    trace_hint: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LogsSnapshot {
    pub results: FetchState<Paginated<LogEvent>>,
    pub services: Vec<String>,
    pub trace_hint: Option<&'static str>,
}

impl LogsPage {
    pub fn mount(source: &Arc<dyn LogSource>, settings: &Settings) -> Self {
        Self {
            search: PagedHandle::mount(
                LogSearchQuery::new(source.clone()),
                LogSearchFilter::default(),
                settings.page_size,
            ),
            trace_hint: None,
        }
    }

    /// Service names for the dropdown, primed by the first unfiltered page.
    pub fn catalog(&self) -> ServiceCatalog {
        self.search.handle().query().catalog()
    }

    pub fn trace_hint(&self) -> Option<&'static str> {
        self.trace_hint
    }

    /// Apply raw trace id input. Partial ids show a hint and fetch nothing.
    pub fn set_trace_id(&mut self, raw: &str) -> Trigger {
        let filter = self.search.filter().clone().with_trace_id(raw);
        self.trace_hint = trace_id_hint(&filter.trace_id);
        self.search.set_filter(filter)
    }

    pub fn set_service(&mut self, service: Option<String>) -> Trigger {
        self.update(|filter| filter.service_name = service)
    }

    pub fn set_level(&mut self, level: Option<LogLevel>) -> Trigger {
        self.update(|filter| filter.level = level)
    }

    pub fn set_env(&mut self, env: Option<Environment>) -> Trigger {
        self.update(|filter| filter.env = env)
    }

    pub fn set_message(&mut self, message: &str) -> Trigger {
        self.update(|filter| filter.message = message.to_string())
    }

    pub async fn settled(&self) -> FetchState<Paginated<LogEvent>> {
        self.search.settled().await
    }

    pub fn snapshot(&self) -> LogsSnapshot {
        LogsSnapshot {
            results: self.search.state(),
            services: self.catalog().services().to_vec(),
            trace_hint: self.trace_hint,
        }
    }

    fn update(&mut self, edit: impl FnOnce(&mut LogSearchFilter)) -> Trigger {
        let mut filter = self.search.filter().clone();
        edit(&mut filter);
        self.search.set_filter(filter)
    }
}

/// Trend, severity split, top services and recent errors over one range.
#[derive(Debug)]
pub struct ErrorsPage {
    range: TimeRange,
    pub trend: QueryHandle<ErrorTrendQuery>,
    pub severity: QueryHandle<SeverityQuery>,
    pub by_service: QueryHandle<ErrorsByServiceQuery>,
    pub recent: PagedHandle<RecentErrorsQuery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorsSnapshot {
    pub range: TimeRange,
    pub trend: FetchState<Vec<ChartPoint>>,
    pub severity: FetchState<Vec<SeveritySlice>>,
    pub by_service: FetchState<Vec<ServiceBar>>,
    pub recent: FetchState<Paginated<LogEvent>>,
}

impl ErrorsPage {
    /// Mount over the default range: the four days up to the current hour.
    pub fn mount(source: &Arc<dyn LogSource>, settings: &Settings) -> Self {
        Self::mount_with_range(source, settings, default_range(Utc::now()))
    }

    pub fn mount_with_range(
        source: &Arc<dyn LogSource>,
        settings: &Settings,
        range: TimeRange,
    ) -> Self {
        Self {
            trend: QueryHandle::mount(ErrorTrendQuery::new(source.clone()), TrendInterval::Hour),
            severity: QueryHandle::mount(SeverityQuery::new(source.clone()), Some(range.clone())),
            by_service: QueryHandle::mount(
                ErrorsByServiceQuery::new(source.clone()),
                ByServiceParams::new(range.clone()),
            ),
            recent: PagedHandle::mount(
                RecentErrorsQuery::new(source.clone()),
                RecentErrorsFilter::within(&range),
                settings.page_size,
            ),
            range,
        }
    }

    pub fn range(&self) -> &TimeRange {
        &self.range
    }

    /// Point every range-dependent query at `range`.
    pub fn set_range(&mut self, range: TimeRange) {
        self.severity.set_params(Some(range.clone()));
        let top = self.by_service.params().map_or(DEFAULT_TOP, |p| p.top);
        self.by_service.set_params(ByServiceParams::new(range.clone()).top(top));

        let mut filter = self.recent.filter().clone();
        filter.from = Some(range.from.clone());
        filter.to = Some(range.to.clone());
        self.recent.set_filter(filter);

        self.range = range;
    }

    pub async fn settled(&self) {
        tokio::join!(
            self.trend.settled(),
            self.severity.settled(),
            self.by_service.settled(),
            self.recent.settled(),
        );
    }

    pub fn snapshot(&self) -> ErrorsSnapshot {
        ErrorsSnapshot {
            range: self.range.clone(),
            trend: self.trend.state(),
            severity: self.severity.state(),
            by_service: self.by_service.state(),
            recent: self.recent.state(),
        }
    }
}

/// Two weeks of alert counts plus the active alerts.
#[derive(Debug)]
pub struct AlertsPage {
    pub overview: QueryHandle<AlertsOverviewQuery>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertsSnapshot {
    pub overview: FetchState<AlertsOverview>,
}

impl AlertsPage {
    pub fn mount(source: &Arc<dyn LogSource>) -> Self {
        Self {
            overview: QueryHandle::mount(
                AlertsOverviewQuery::new(source.clone()),
                DEFAULT_ALERT_DAYS,
            ),
        }
    }

    pub async fn settled(&self) {
        self.overview.settled().await;
    }

    pub fn snapshot(&self) -> AlertsSnapshot {
        AlertsSnapshot {
            overview: self.overview.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::fake::{event, FakeSource};

    fn source_with_events() -> (Arc<FakeSource>, Arc<dyn LogSource>) {
        let fake = Arc::new(FakeSource::default());
        *fake.events.lock() = vec![
            event("1", "auth", LogLevel::Info),
            event("2", "checkout", LogLevel::Error),
        ];
        let source: Arc<dyn LogSource> = fake.clone();
        (fake, source)
    }

    #[tokio::test]
    async fn test_logs_page_primes_catalog_and_hints_partial_trace() {
        let (fake, source) = source_with_events();
        let mut logs = LogsPage::mount(&source, &Settings::default());
        logs.settled().await;
        assert_eq!(logs.catalog().services(), ["auth", "checkout"]);

        assert_eq!(logs.set_trace_id("abc"), Trigger::Guarded);
        assert_eq!(logs.trace_hint(), Some(crate::queries::TRACE_ID_HINT));
        assert_eq!(fake.call_count("search_logs"), 1);

        assert_eq!(logs.set_trace_id("abc123zzz"), Trigger::Issued);
        assert_eq!(logs.trace_hint(), None);
        assert_eq!(logs.search.filter().trace_id, "abc123");
    }

    #[tokio::test]
    async fn test_logs_snapshot_lists_services_once_results_land() {
        let (_, source) = source_with_events();
        let logs = LogsPage::mount(&source, &Settings::default());

        let mut rx = logs.search.subscribe();
        rx.wait_for(|state| !state.loading && state.data.is_some())
            .await
            .unwrap();

        let snapshot = logs.snapshot();
        assert_eq!(snapshot.results.data.map(|page| page.items.len()), Some(2));
        assert_eq!(snapshot.services, ["auth", "checkout"]);
    }

    #[tokio::test]
    async fn test_errors_page_range_change_refetches_range_queries() {
        let (fake, source) = source_with_events();
        let range = TimeRange::new("2025-10-18T00:00:00Z", "2025-10-22T12:00:00Z");
        let mut errors = ErrorsPage::mount_with_range(&source, &Settings::default(), range);
        errors.settled().await;

        errors.set_range(TimeRange::new("2025-10-20T00:00:00Z", "2025-10-22T12:00:00Z"));
        errors.settled().await;

        assert_eq!(fake.call_count("error_trend"), 1);
        assert_eq!(fake.call_count("severity_counts"), 2);
        assert_eq!(fake.call_count("errors_by_service"), 2);
        assert_eq!(fake.call_count("recent_errors"), 2);
        assert_eq!(errors.recent.filter().from.as_deref(), Some("2025-10-20T00:00:00Z"));
    }

    #[tokio::test]
    async fn test_snapshots_serialize() {
        let (_, source) = source_with_events();
        let alerts = AlertsPage::mount(&source);
        alerts.settled().await;

        let json = serde_json::to_value(alerts.snapshot()).unwrap();
        assert_eq!(json["overview"]["loading"], false);
        assert!(json["overview"]["data"]["active"].is_array());
    }
}
