//! Log events as returned by the search and error endpoints.

use crate::{Environment, LogLevel};

/// A single log event.
///
/// Immutable once fetched; two events are the same event when their `id`s
/// match. `timestamp` is kept in the ISO-8601 form the backend sends.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct LogEvent {
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: String,
    pub service_name: String,
    pub env: Environment,
    #[cfg_attr(feature = "serde", serde(default))]
    pub tenant: String,
    pub level: LogLevel,
    pub message: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub trace_id: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub latency_ms: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub stack: Option<String>,
    pub timestamp: String,
}

impl LogEvent {
    /// Whether this event shares identity with `other`.
    pub fn same_event(&self, other: &LogEvent) -> bool {
        !self.id.is_empty() && self.id == other.id
    }
}
