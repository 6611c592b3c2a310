//! Named start/stop span timing over the metric store.

use crate::metric::{Metric, MetricCategory};
use crate::store::MetricStore;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Value above which a recorded metric is flagged as slow (warn level).
pub const SLOW_THRESHOLD_MS: f64 = 1000.0;

/// Value above which a recorded metric is flagged as a moderate delay.
pub const MODERATE_THRESHOLD_MS: f64 = 500.0;

/// Records named time spans and forwards completed durations to the store.
///
/// A span is opened with [`start_timing`](TimingRecorder::start_timing) and
/// closed with [`end_timing`](TimingRecorder::end_timing). Spans that are
/// started twice keep only the most recent start; spans that are ended
/// without a start produce no metric and no error. All methods take `&self`
/// so the recorder can be shared behind an `Arc` and called from timer
/// callbacks.
#[derive(Debug)]
pub struct TimingRecorder {
    store: Arc<Mutex<MetricStore>>,
    pending: Mutex<HashMap<String, Instant>>,
    slow_threshold_ms: f64,
    moderate_threshold_ms: f64,
}

impl TimingRecorder {
    /// Create a recorder writing into the given store.
    pub fn new(store: Arc<Mutex<MetricStore>>) -> Self {
        Self::with_thresholds(store, SLOW_THRESHOLD_MS, MODERATE_THRESHOLD_MS)
    }

    /// Create a recorder with custom diagnostic thresholds.
    pub fn with_thresholds(
        store: Arc<Mutex<MetricStore>>,
        slow_threshold_ms: f64,
        moderate_threshold_ms: f64,
    ) -> Self {
        Self {
            store,
            pending: Mutex::new(HashMap::new()),
            slow_threshold_ms,
            moderate_threshold_ms,
        }
    }

    /// Open a span named `name`, stamping the current time.
    ///
    /// An already-pending span with the same name is silently overwritten;
    /// a later end measures from the most recent start only.
    pub fn start_timing(&self, name: impl Into<String>, _category: MetricCategory) {
        lock(&self.pending).insert(name.into(), Instant::now());
    }

    /// Close the span named `name` and record its elapsed duration.
    ///
    /// Returns `None` when no matching start exists; an unmatched end is not
    /// an error and appends nothing.
    pub fn end_timing(&self, name: &str, category: MetricCategory) -> Option<f64> {
        let start = lock(&self.pending).remove(name)?;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;
        self.record_metric(name, elapsed_ms, category);
        Some(elapsed_ms)
    }

    /// Record a metric whose value is already known, bypassing span pairing.
    pub fn record_metric(&self, name: &str, value_ms: f64, category: MetricCategory) {
        if value_ms > self.slow_threshold_ms {
            tracing::warn!(
                target: "perf_track::recorder",
                name = name,
                value_ms = value_ms,
                category = %category,
                "slow operation detected"
            );
        } else if value_ms > self.moderate_threshold_ms {
            tracing::debug!(
                target: "perf_track::recorder",
                name = name,
                value_ms = value_ms,
                category = %category,
                "moderate delay"
            );
        }

        lock(&self.store).append(Metric::now(name, value_ms, category));
    }

    /// Number of spans started but not yet ended.
    pub fn pending_spans(&self) -> usize {
        lock(&self.pending).len()
    }

    /// Shared handle to the underlying store.
    pub fn store(&self) -> Arc<Mutex<MetricStore>> {
        Arc::clone(&self.store)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread::sleep;
    use std::time::Duration;

    fn recorder() -> TimingRecorder {
        TimingRecorder::new(Arc::new(Mutex::new(MetricStore::default())))
    }

    #[test]
    fn test_span_pairing_measures_elapsed() {
        let recorder = recorder();

        recorder.start_timing("load", MetricCategory::Component);
        sleep(Duration::from_millis(20));
        let elapsed = recorder
            .end_timing("load", MetricCategory::Component)
            .unwrap();

        assert!(elapsed >= 18.0, "expected >= 18ms, got {elapsed}");

        let store = recorder.store();
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.latest().unwrap().name, "load");
    }

    #[test]
    fn test_unmatched_end_is_none_and_appends_nothing() {
        let recorder = recorder();

        let result = recorder.end_timing("never-started", MetricCategory::Api);
        assert!(result.is_none());

        let store = recorder.store();
        assert!(store.lock().unwrap().is_empty());
    }

    #[test]
    fn test_double_start_measures_from_latest() {
        let recorder = recorder();

        recorder.start_timing("op", MetricCategory::Component);
        sleep(Duration::from_millis(30));
        recorder.start_timing("op", MetricCategory::Component);
        let elapsed = recorder.end_timing("op", MetricCategory::Component).unwrap();

        // The first start was overwritten, so elapsed excludes the 30ms gap.
        assert!(elapsed < 25.0, "expected < 25ms, got {elapsed}");
        assert_eq!(recorder.pending_spans(), 0);
    }

    #[test]
    fn test_end_consumes_pending_entry() {
        let recorder = recorder();

        recorder.start_timing("op", MetricCategory::Component);
        assert_eq!(recorder.pending_spans(), 1);

        recorder.end_timing("op", MetricCategory::Component);
        assert_eq!(recorder.pending_spans(), 0);

        // A second end for the same name finds nothing.
        assert!(recorder.end_timing("op", MetricCategory::Component).is_none());
    }

    #[test]
    fn test_record_metric_direct_path() {
        let recorder = recorder();

        recorder.record_metric("api-call", 1200.0, MetricCategory::Api);
        recorder.record_metric("api-call", 300.0, MetricCategory::Api);

        let store = recorder.store();
        let store = store.lock().unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.metrics()[0].value_ms, 1200.0);
    }

    #[test]
    fn test_threshold_diagnostics_never_panic() {
        let recorder = recorder();

        // Both sides of each threshold; diagnostics are log-only.
        recorder.record_metric("fast", 10.0, MetricCategory::UserAction);
        recorder.record_metric("moderate", 600.0, MetricCategory::UserAction);
        recorder.record_metric("slow", 1500.0, MetricCategory::UserAction);

        let store = recorder.store();
        assert_eq!(store.lock().unwrap().len(), 3);
    }

    #[test]
    fn test_abandoned_span_is_harmless() {
        let recorder = recorder();

        recorder.start_timing("abandoned", MetricCategory::Navigation);
        recorder.start_timing("finished", MetricCategory::Navigation);
        recorder.end_timing("finished", MetricCategory::Navigation);

        assert_eq!(recorder.pending_spans(), 1);
        let store = recorder.store();
        assert_eq!(store.lock().unwrap().len(), 1);
    }
}
