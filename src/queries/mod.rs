//! Concrete queries and the view-models they produce.
//!
//! Each query reads from a shared [`LogSource`](crate::source::LogSource)
//! and maps the raw payload into the shape a chart or table consumes.

mod alerts;
mod by_service;
mod dashboard;
mod recent;
mod search;
mod severity;
mod trend;

pub use alerts::{ActiveAlertsQuery, AlertsOverview, AlertsOverviewQuery, DEFAULT_ALERT_DAYS};
pub use by_service::{service_bars, ByServiceParams, ErrorsByServiceQuery, ServiceBar, DEFAULT_TOP};
pub use dashboard::{DashboardQuery, DashboardView, DASHBOARD_POLL_INTERVAL};
pub use recent::RecentErrorsQuery;
pub use search::{
    normalize_trace_id, trace_id_hint, LogSearchFilter, LogSearchQuery, ServiceCatalog,
    TRACE_ID_HINT, TRACE_ID_LEN,
};
pub use severity::{default_range, severity_slices, Severity, SeverityQuery, SeveritySlice};
pub use trend::{chart_points, ChartPoint, ErrorTrendQuery};
