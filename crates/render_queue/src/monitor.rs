//! Render-duration sampling with running aggregate statistics.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Default number of render samples retained by the monitor.
pub const DEFAULT_SAMPLE_CAPACITY: usize = 20;

/// A single completed render measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderSample {
    /// Wall-clock duration of the render in milliseconds
    pub duration_ms: f64,
    /// When the sample was recorded (Unix timestamp in ms)
    pub timestamp_ms: i64,
}

/// Aggregate statistics over the current sample window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderStats {
    /// Mean render duration in milliseconds
    pub average_ms: f64,
    /// Fastest render in the window
    pub min_ms: f64,
    /// Slowest render in the window
    pub max_ms: f64,
    /// Number of completed renders in the window
    pub samples: usize,
}

/// Fixed-capacity ring buffer of render durations.
///
/// Eviction is strict one-at-a-time FIFO: inserting at capacity drops the
/// oldest sample. This is a tighter, higher-frequency loop than the metric
/// store, so it deliberately avoids the store's batch eviction.
///
/// The `samples` count in [`RenderStats`] counts *completed* renders; it is
/// unrelated to the scheduler's pending-task count.
#[derive(Debug)]
pub struct RenderMonitor {
    samples: VecDeque<RenderSample>,
    capacity: usize,
}

impl Default for RenderMonitor {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_CAPACITY)
    }
}

impl RenderMonitor {
    /// Create a monitor retaining at most `capacity` samples.
    pub fn new(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Record a completed render duration, evicting the oldest sample if full.
    pub fn record_sample(&mut self, duration_ms: f64) {
        if self.samples.len() >= self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(RenderSample {
            duration_ms,
            timestamp_ms: Utc::now().timestamp_millis(),
        });

        tracing::trace!(
            target: "render_queue::monitor",
            duration_ms = duration_ms,
            "render sample recorded"
        );
    }

    /// Compute aggregate statistics in a single pass over the buffer.
    ///
    /// Returns zeroed stats when no samples have been recorded.
    pub fn stats(&self) -> RenderStats {
        if self.samples.is_empty() {
            return RenderStats::default();
        }

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for sample in &self.samples {
            sum += sample.duration_ms;
            min = min.min(sample.duration_ms);
            max = max.max(sample.duration_ms);
        }

        RenderStats {
            average_ms: sum / self.samples.len() as f64,
            min_ms: min,
            max_ms: max,
            samples: self.samples.len(),
        }
    }

    /// Number of samples currently retained.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if no samples have been recorded.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Maximum number of samples retained.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The most recent sample, if any.
    pub fn latest(&self) -> Option<&RenderSample> {
        self.samples.back()
    }

    /// Iterate samples from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &RenderSample> {
        self.samples.iter()
    }

    /// Discard all samples.
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_stats_are_zeroed() {
        let monitor = RenderMonitor::new(20);
        let stats = monitor.stats();

        assert_eq!(stats.samples, 0);
        assert_eq!(stats.average_ms, 0.0);
        assert_eq!(stats.min_ms, 0.0);
        assert_eq!(stats.max_ms, 0.0);
    }

    #[test]
    fn test_stats_single_pass_values() {
        let mut monitor = RenderMonitor::new(20);
        monitor.record_sample(10.0);
        monitor.record_sample(20.0);
        monitor.record_sample(30.0);

        let stats = monitor.stats();
        assert_eq!(stats.samples, 3);
        assert_eq!(stats.average_ms, 20.0);
        assert_eq!(stats.min_ms, 10.0);
        assert_eq!(stats.max_ms, 30.0);
    }

    #[test]
    fn test_fifo_eviction_keeps_last_k_in_order() {
        let capacity = 5;
        let mut monitor = RenderMonitor::new(capacity);

        // Insert K+3 samples; only the last K survive, in insertion order.
        for i in 0..(capacity + 3) {
            monitor.record_sample(i as f64);
        }

        assert_eq!(monitor.stats().samples, capacity);
        let retained: Vec<f64> = monitor.iter().map(|s| s.duration_ms).collect();
        assert_eq!(retained, vec![3.0, 4.0, 5.0, 6.0, 7.0]);
    }

    #[test]
    fn test_eviction_is_one_at_a_time() {
        let mut monitor = RenderMonitor::new(3);
        for i in 0..4 {
            monitor.record_sample(i as f64);
        }
        // A single overflow drops exactly one sample, not a batch.
        assert_eq!(monitor.len(), 3);
        assert_eq!(monitor.iter().next().unwrap().duration_ms, 1.0);
    }

    #[test]
    fn test_latest_and_clear() {
        let mut monitor = RenderMonitor::default();
        assert!(monitor.latest().is_none());

        monitor.record_sample(5.0);
        monitor.record_sample(7.5);
        assert_eq!(monitor.latest().unwrap().duration_ms, 7.5);

        monitor.clear();
        assert!(monitor.is_empty());
        assert_eq!(monitor.stats().samples, 0);
    }

    #[test]
    fn test_zero_capacity_clamped() {
        let mut monitor = RenderMonitor::new(0);
        monitor.record_sample(1.0);
        assert_eq!(monitor.len(), 1);
        assert_eq!(monitor.capacity(), 1);
    }

    #[test]
    fn test_stats_serialization() {
        let mut monitor = RenderMonitor::default();
        monitor.record_sample(12.0);

        let json = serde_json::to_string(&monitor.stats()).unwrap();
        assert!(json.contains("averageMs"));
        assert!(json.contains("\"samples\":1"));
    }
}
