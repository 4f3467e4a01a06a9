//! Top services by error count.

use std::sync::Arc;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{ServiceCount, TimeRange};
use serde::Serialize;

use crate::query::Query;
use crate::source::LogSource;

pub const DEFAULT_TOP: u32 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ByServiceParams {
    pub range: TimeRange,
    pub top: u32,
}

impl ByServiceParams {
    pub fn new(range: TimeRange) -> Self {
        Self {
            range,
            top: DEFAULT_TOP,
        }
    }

    pub fn top(mut self, top: u32) -> Self {
        self.top = top;
        self
    }
}

/// One bar of the errors-by-service chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceBar {
    pub service: String,
    pub count: u64,
}

/// Bars in the server's ranking order.
pub fn service_bars(counts: Vec<ServiceCount>) -> Vec<ServiceBar> {
    counts
        .into_iter()
        .map(|c| ServiceBar {
            service: c.service_name,
            count: c.count,
        })
        .collect()
}

/// Fetches only once both ends of the range are set.
#[derive(Debug, Clone)]
pub struct ErrorsByServiceQuery {
    source: Arc<dyn LogSource>,
}

impl ErrorsByServiceQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for ErrorsByServiceQuery {
    type Params = ByServiceParams;
    type Output = Vec<ServiceBar>;

    fn name(&self) -> &'static str {
        "errors_by_service"
    }

    fn ready(&self, params: &ByServiceParams) -> bool {
        params.range.is_complete()
    }

    async fn fetch(
        &self,
        params: &ByServiceParams,
        cancel: &CancelToken,
    ) -> Result<Vec<ServiceBar>, ApiError> {
        let counts = self
            .source
            .errors_by_service(&params.range, params.top, cancel)
            .await?;
        Ok(service_bars(counts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{QueryHandle, Trigger};
    use crate::source::fake::FakeSource;

    fn ranked() -> Vec<ServiceCount> {
        ["checkout", "auth", "billing", "search", "gateway", "mailer"]
            .iter()
            .enumerate()
            .map(|(i, name)| ServiceCount {
                service_name: name.to_string(),
                count: 60 - 10 * i as u64,
            })
            .collect()
    }

    #[tokio::test]
    async fn test_bars_follow_server_ranking() {
        let source = Arc::new(FakeSource::default());
        *source.services.lock() = ranked();

        let params = ByServiceParams::new(TimeRange::new(
            "2025-10-18T00:00:00Z",
            "2025-10-22T12:00:00Z",
        ));
        let handle = QueryHandle::mount(ErrorsByServiceQuery::new(source), params);
        let bars = handle.settled().await.data.unwrap();

        assert_eq!(bars.len(), 5);
        assert_eq!(
            bars[0],
            ServiceBar {
                service: "checkout".to_string(),
                count: 60
            }
        );
        assert!(bars.windows(2).all(|w| w[0].count >= w[1].count));
    }

    #[tokio::test]
    async fn test_incomplete_range_never_fetches() {
        let source = Arc::new(FakeSource::default());
        let handle = QueryHandle::new(ErrorsByServiceQuery::new(source.clone()));

        let params = ByServiceParams::new(TimeRange::new("2025-10-18T00:00:00Z", ""));
        assert_eq!(handle.set_params(params), Trigger::Guarded);
        assert!(source.calls().is_empty());
        assert!(!handle.state().loading);
    }

    #[tokio::test]
    async fn test_top_is_a_dependency() {
        let source = Arc::new(FakeSource::default());
        *source.services.lock() = ranked();
        let range = TimeRange::new("2025-10-18T00:00:00Z", "2025-10-22T12:00:00Z");

        let handle = QueryHandle::mount(
            ErrorsByServiceQuery::new(source.clone()),
            ByServiceParams::new(range.clone()),
        );
        handle.settled().await;

        assert_eq!(
            handle.set_params(ByServiceParams::new(range).top(3)),
            Trigger::Issued
        );
        assert_eq!(handle.settled().await.data.unwrap().len(), 3);
    }
}
