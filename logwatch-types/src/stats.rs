//! Aggregates computed by the backend: error trends, severity counts,
//! per-service rankings and the dashboard summary.

use std::fmt;
use std::str::FromStr;

use crate::level::UnknownVariant;

/// Width of a trend bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TrendInterval {
    Minute,
    #[default]
    Hour,
    Day,
}

impl TrendInterval {
    /// The query-string value for this interval.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrendInterval::Minute => "minute",
            TrendInterval::Hour => "hour",
            TrendInterval::Day => "day",
        }
    }
}

impl fmt::Display for TrendInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TrendInterval {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minute" => Ok(TrendInterval::Minute),
            "hour" => Ok(TrendInterval::Hour),
            "day" => Ok(TrendInterval::Day),
            _ => Err(UnknownVariant::new("trend interval", s)),
        }
    }
}

/// Error count for one time bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrendPoint {
    pub bucket_start: String,
    pub count: u64,
}

/// Trend buckets, ascending by `bucket_start`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct TrendResponse {
    #[cfg_attr(feature = "serde", serde(default))]
    pub trend_points: Vec<TrendPoint>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interval: TrendInterval,
}

/// Log counts per severity within a time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SeverityCounts {
    pub error: u64,
    pub warn: u64,
    pub info: u64,
}

impl SeverityCounts {
    pub fn total(&self) -> u64 {
        self.error + self.warn + self.info
    }
}

/// Error count for one service. Lists of these arrive ranked by `count`
/// descending and already truncated to the requested top-N.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct ServiceCount {
    pub service_name: String,
    pub count: u64,
}

/// Headline numbers for the dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct DashboardSummary {
    pub total_logs_today: u64,
    pub errors_last5m: u64,
    pub active_alerts: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_default_is_hour() {
        assert_eq!(TrendInterval::default(), TrendInterval::Hour);
        assert_eq!("Day".parse::<TrendInterval>(), Ok(TrendInterval::Day));
        assert!("week".parse::<TrendInterval>().is_err());
    }

    #[test]
    fn test_severity_total() {
        let counts = SeverityCounts {
            error: 3,
            warn: 1,
            info: 0,
        };
        assert_eq!(counts.total(), 4);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_trend_response_wire_format() {
        let json = r#"{"trendPoints":[{"bucketStart":"2025-01-01T00:00:00Z","count":5}],"interval":"hour"}"#;
        let trend: TrendResponse = serde_json::from_str(json).unwrap();
        assert_eq!(trend.interval, TrendInterval::Hour);
        assert_eq!(trend.trend_points[0].bucket_start, "2025-01-01T00:00:00Z");
        assert_eq!(trend.trend_points[0].count, 5);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_severity_counts() {
        let counts: SeverityCounts = serde_json::from_str(r#"{"error":7}"#).unwrap();
        assert_eq!(counts.error, 7);
        assert_eq!(counts.warn, 0);
        assert_eq!(counts.info, 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_dashboard_summary_field_names() {
        let json = r#"{"totalLogsToday":120,"errorsLast5m":4,"activeAlerts":2}"#;
        let summary: DashboardSummary = serde_json::from_str(json).unwrap();
        assert_eq!(summary.total_logs_today, 120);
        assert_eq!(summary.errors_last5m, 4);
        assert_eq!(summary.active_alerts, 2);
    }
}
