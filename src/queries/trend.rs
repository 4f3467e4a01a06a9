//! Error counts over time.

use std::sync::Arc;

use async_trait::async_trait;
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{TrendInterval, TrendResponse};
use serde::Serialize;

use crate::query::Query;
use crate::source::LogSource;

/// One point on the error trend chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub ts: String,
    pub errors: u64,
}

/// Map trend buckets to chart points, keeping their order.
pub fn chart_points(trend: TrendResponse) -> Vec<ChartPoint> {
    trend
        .trend_points
        .into_iter()
        .map(|point| ChartPoint {
            ts: point.bucket_start,
            errors: point.count,
        })
        .collect()
}

#[derive(Debug, Clone)]
pub struct ErrorTrendQuery {
    source: Arc<dyn LogSource>,
}

impl ErrorTrendQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self { source }
    }
}

#[async_trait]
impl Query for ErrorTrendQuery {
    type Params = TrendInterval;
    type Output = Vec<ChartPoint>;

    fn name(&self) -> &'static str {
        "error_trend"
    }

    async fn fetch(
        &self,
        interval: &TrendInterval,
        cancel: &CancelToken,
    ) -> Result<Vec<ChartPoint>, ApiError> {
        let trend = self.source.error_trend(*interval, cancel).await?;
        Ok(chart_points(trend))
    }
}
