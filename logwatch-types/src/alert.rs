//! Alerts raised by the backend rule evaluator.

use std::fmt;

use crate::Environment;

/// How urgent an alert is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AlertSeverity {
    Low,
    Medium,
    High,
}

impl AlertSeverity {
    /// The wire name of this severity.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertSeverity::Low => "LOW",
            AlertSeverity::Medium => "MEDIUM",
            AlertSeverity::High => "HIGH",
        }
    }
}

impl fmt::Display for AlertSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of an alert. Transitions happen server-side only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum AlertStatus {
    Open,
    #[cfg_attr(feature = "serde", serde(alias = "CLOSED"))]
    Resolved,
}

impl AlertStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, AlertStatus::Open)
    }
}

/// An alert opened when a rule breached its threshold.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Alert {
    pub id: String,
    pub rule_id: String,
    pub service_name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub env: Option<Environment>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tenant: Option<String>,
    pub severity: AlertSeverity,
    pub status: AlertStatus,
    pub observed: f64,
    pub threshold: f64,
    pub opened_at: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub closed_at: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub note: Option<String>,
}

impl Alert {
    /// How far the observed value overshot the threshold, as a ratio.
    ///
    /// Returns `None` for a zero threshold.
    pub fn breach_ratio(&self) -> Option<f64> {
        (self.threshold != 0.0).then(|| self.observed / self.threshold)
    }
}

/// Number of alerts opened on one day.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertTrendPoint {
    pub day: String,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alert(observed: f64, threshold: f64) -> Alert {
        Alert {
            id: "a-1".to_string(),
            rule_id: "error.rate.high".to_string(),
            service_name: "checkout".to_string(),
            env: None,
            tenant: None,
            severity: AlertSeverity::High,
            status: AlertStatus::Open,
            observed,
            threshold,
            opened_at: "2025-10-20T08:00:00Z".to_string(),
            closed_at: None,
            note: None,
        }
    }

    #[test]
    fn test_breach_ratio() {
        assert_eq!(alert(30.0, 10.0).breach_ratio(), Some(3.0));
        assert_eq!(alert(5.0, 0.0).breach_ratio(), None);
    }

    #[test]
    fn test_severity_ordering() {
        assert!(AlertSeverity::High > AlertSeverity::Medium);
        assert_eq!(AlertSeverity::Low.to_string(), "LOW");
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_closed_is_resolved() {
        let status: AlertStatus = serde_json::from_str("\"CLOSED\"").unwrap();
        assert_eq!(status, AlertStatus::Resolved);
        assert!(!status.is_open());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_active_alert() {
        let json = r#"{
            "id": "a-9",
            "ruleId": "error.rate.high",
            "serviceName": "billing",
            "env": "PROD",
            "tenant": null,
            "severity": "MEDIUM",
            "status": "OPEN",
            "observed": 42.0,
            "threshold": 20.0,
            "openedAt": "2025-10-20T08:00:00Z",
            "closedAt": null
        }"#;
        let alert: Alert = serde_json::from_str(json).unwrap();
        assert_eq!(alert.env, Some(Environment::Prod));
        assert_eq!(alert.severity, AlertSeverity::Medium);
        assert!(alert.status.is_open());
        assert!(alert.note.is_none());
    }
}
