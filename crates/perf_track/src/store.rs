//! Bounded, append-only metric log with batch eviction.

use crate::metric::{CategorySummary, Metric, MetricCategory};

/// Default metric cap before batch eviction.
pub const DEFAULT_STORE_CAPACITY: usize = 100;

/// Ordered sequence of recorded metrics, insertion order preserved.
///
/// When the length exceeds the cap, the oldest half is discarded in one
/// batch rather than sliding out one entry per append; overflow is routine
/// here and the bulk trim keeps amortized append cost low.
#[derive(Debug, Clone)]
pub struct MetricStore {
    metrics: Vec<Metric>,
    capacity: usize,
}

impl Default for MetricStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_CAPACITY)
    }
}

impl MetricStore {
    /// Create a store holding at most `capacity` metrics.
    pub fn new(capacity: usize) -> Self {
        Self {
            metrics: Vec::with_capacity(capacity.max(2)),
            capacity: capacity.max(2),
        }
    }

    /// Append a metric, batch-evicting the oldest half past the cap.
    pub fn append(&mut self, metric: Metric) {
        self.metrics.push(metric);
        if self.metrics.len() > self.capacity {
            let keep = self.capacity / 2;
            self.metrics.drain(..self.metrics.len() - keep);
        }
    }

    /// Number of metrics currently stored.
    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    /// Check if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Maximum length before eviction triggers.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// All stored metrics, oldest first.
    pub fn metrics(&self) -> &[Metric] {
        &self.metrics
    }

    /// The most recently appended metric, if any.
    pub fn latest(&self) -> Option<&Metric> {
        self.metrics.last()
    }

    /// Discard all stored metrics.
    pub fn clear(&mut self) {
        self.metrics.clear();
    }

    /// Group current metrics by category and aggregate each group.
    ///
    /// Only categories actually present in the store appear in the result;
    /// there are no synthetic zero rows.
    pub fn summarize(&self) -> Vec<CategorySummary> {
        let mut summaries = Vec::new();
        for category in MetricCategory::ALL {
            let mut count = 0usize;
            let mut sum = 0.0;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;

            for metric in self.metrics.iter().filter(|m| m.category == category) {
                count += 1;
                sum += metric.value_ms;
                min = min.min(metric.value_ms);
                max = max.max(metric.value_ms);
            }

            if count > 0 {
                summaries.push(CategorySummary {
                    category,
                    count,
                    average_ms: sum / count as f64,
                    min_ms: min,
                    max_ms: max,
                });
            }
        }
        summaries
    }
}
