//! Metric records and per-category summaries.

use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Origin category of a recorded metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricCategory {
    /// Route changes and page-level paint/layout signals
    Navigation,
    /// Component mount and update timings
    Component,
    /// Backend call round trips
    Api,
    /// User-initiated interactions
    UserAction,
}

impl MetricCategory {
    /// All categories, in a stable order used by summaries.
    pub const ALL: [MetricCategory; 4] = [
        MetricCategory::Navigation,
        MetricCategory::Component,
        MetricCategory::Api,
        MetricCategory::UserAction,
    ];

    /// Stable string form matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricCategory::Navigation => "navigation",
            MetricCategory::Component => "component",
            MetricCategory::Api => "api",
            MetricCategory::UserAction => "user_action",
        }
    }
}

impl std::fmt::Display for MetricCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single timed or measured event. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metric {
    /// Logical operation name (e.g. "route-dashboard", "api-call")
    pub name: String,
    /// Measured value in milliseconds
    pub value_ms: f64,
    /// When the metric was recorded (Unix timestamp in ms)
    pub timestamp_ms: i64,
    /// Origin category
    pub category: MetricCategory,
}

impl Metric {
    /// Create a metric stamped with the current time.
    pub fn now(name: impl Into<String>, value_ms: f64, category: MetricCategory) -> Self {
        Self {
            name: name.into(),
            value_ms,
            timestamp_ms: Utc::now().timestamp_millis(),
            category,
        }
    }
}

/// Aggregate over all stored metrics of one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategorySummary {
    /// The category being summarized
    pub category: MetricCategory,
    /// Number of metrics in this category
    pub count: usize,
    /// Mean value in milliseconds
    pub average_ms: f64,
    /// Smallest value in milliseconds
    pub min_ms: f64,
    /// Largest value in milliseconds
    pub max_ms: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_serialization_is_snake_case() {
        let json = serde_json::to_string(&MetricCategory::UserAction).unwrap();
        assert_eq!(json, "\"user_action\"");

        let parsed: MetricCategory = serde_json::from_str("\"navigation\"").unwrap();
        assert_eq!(parsed, MetricCategory::Navigation);
    }

    #[test]
    fn test_category_display_matches_serde() {
        for category in MetricCategory::ALL {
            let json = serde_json::to_string(&category).unwrap();
            assert_eq!(json, format!("\"{}\"", category));
        }
    }

    #[test]
    fn test_metric_now_stamps_current_time() {
        let before = Utc::now().timestamp_millis();
        let metric = Metric::now("load", 12.5, MetricCategory::Component);
        let after = Utc::now().timestamp_millis();

        assert_eq!(metric.name, "load");
        assert_eq!(metric.value_ms, 12.5);
        assert!(metric.timestamp_ms >= before && metric.timestamp_ms <= after);
    }

    #[test]
    fn test_metric_serialization_roundtrip() {
        let metric = Metric::now("api-call", 42.0, MetricCategory::Api);
        let json = serde_json::to_string(&metric).unwrap();
        let parsed: Metric = serde_json::from_str(&json).unwrap();

        assert_eq!(metric, parsed);
        assert!(json.contains("valueMs"));
        assert!(json.contains("timestampMs"));
    }
}
