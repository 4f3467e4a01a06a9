//! Error/warn/info distribution for the severity pie.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use logwatch_client::{ApiError, CancelToken};
use logwatch_types::{SeverityCounts, TimeRange};
use serde::Serialize;

use crate::query::Query;
use crate::source::LogSource;

const DEFAULT_DAYS_BACK: i64 = 4;

/// A slice of the severity distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Severity {
    Error,
    Warn,
    Info,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Error, Severity::Warn, Severity::Info];

    pub fn label(&self) -> &'static str {
        match self {
            Severity::Error => "Error",
            Severity::Warn => "Warn",
            Severity::Info => "Info",
        }
    }

    fn count(&self, counts: &SeverityCounts) -> u64 {
        match self {
            Severity::Error => counts.error,
            Severity::Warn => counts.warn,
            Severity::Info => counts.info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SeveritySlice {
    pub name: Severity,
    pub value: u64,
}

/// Slices in Error, Warn, Info order. Missing counts are zero.
pub fn severity_slices(counts: &SeverityCounts) -> Vec<SeveritySlice> {
    Severity::ALL
        .iter()
        .map(|name| SeveritySlice {
            name: *name,
            value: name.count(counts),
        })
        .collect()
}

/// The four days up to the start of the current hour.
pub fn default_range(now: DateTime<Utc>) -> TimeRange {
    let secs = now.timestamp();
    let to = DateTime::from_timestamp(secs - secs.rem_euclid(3600), 0).unwrap_or(now);
    let from = to - TimeDelta::days(DEFAULT_DAYS_BACK);
    TimeRange::new(
        from.to_rfc3339_opts(SecondsFormat::Millis, true),
        to.to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

/// Severity counts for an explicit range, or for a default range fixed
/// when the query is created.
#[derive(Debug, Clone)]
pub struct SeverityQuery {
    source: Arc<dyn LogSource>,
    fallback: TimeRange,
}

impl SeverityQuery {
    pub fn new(source: Arc<dyn LogSource>) -> Self {
        Self::with_default_range(source, default_range(Utc::now()))
    }

    pub fn with_default_range(source: Arc<dyn LogSource>, fallback: TimeRange) -> Self {
        Self { source, fallback }
    }

    pub fn fallback(&self) -> &TimeRange {
        &self.fallback
    }
}

#[async_trait]
impl Query for SeverityQuery {
    type Params = Option<TimeRange>;
    type Output = Vec<SeveritySlice>;

    fn name(&self) -> &'static str {
        "severity"
    }

    async fn fetch(
        &self,
        range: &Option<TimeRange>,
        cancel: &CancelToken,
    ) -> Result<Vec<SeveritySlice>, ApiError> {
        let range = range.as_ref().unwrap_or(&self.fallback);
        let counts = self.source.severity_counts(range, cancel).await?;
        Ok(severity_slices(&counts))
    }
}
