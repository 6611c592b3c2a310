//! Render Performance Telemetry
//!
//! This crate provides the performance runtime for the web client: it times
//! and aggregates operation durations into rolling statistics, bridges
//! passive environment timing signals into the same metric stream, and
//! coalesces bursts of repeated update requests into single executions.
//!
//! - Named start/stop timing spans over a bounded metric store
//! - Per-category summaries (count / average / min / max)
//! - A vitals bridge normalizing paint, input-latency, and layout-shift
//!   signals from a host adapter
//! - Debounced render scheduling with per-key latest-wins semantics
//!   (re-exported from [`render_queue`])
//! - A serializable snapshot export with session and environment context
//!
//! Nothing in this crate surfaces errors to its callers during normal
//! recording: overflow is handled by eviction, unmatched span ends are
//! no-ops, and failures are absorbed and logged. Passive observability must
//! not be able to destabilize the host application.
//!
//! # Example
//!
//! ```rust
//! use perf_track::{MetricCategory, PerfClient, TrackerConfig};
//!
//! let client = PerfClient::new(TrackerConfig::new("1.0.0"));
//!
//! client.start_timing("route-dashboard", MetricCategory::Navigation);
//! // ... navigation work ...
//! let elapsed = client.end_timing("route-dashboard", MetricCategory::Navigation);
//! assert!(elapsed.is_some());
//!
//! // Durations known externally go straight in.
//! client.record_metric("api-call", 120.0, MetricCategory::Api);
//!
//! let snapshot = client.export_snapshot();
//! assert_eq!(snapshot.metrics.len(), 2);
//! ```
//!
//! # Modules
//!
//! - [`metric`] - Metric records and per-category summaries
//! - [`store`] - Bounded metric log with batch eviction
//! - [`recorder`] - Named span timing and threshold diagnostics
//! - [`vitals`] - Environment signal bridging
//! - [`snapshot`] - Serializable export surface
//! - [`session`] - Session identity
//! - [`client`] - High-level wiring
//! - [`dashboard`] - Background summary polling
//! - [`error`] - Error types

mod client;
mod dashboard;
mod error;
mod metric;
mod recorder;
mod session;
mod snapshot;
mod store;
mod vitals;

pub use client::{PerfClient, TrackerConfig};
pub use dashboard::{spawn_monitor, QueuePressure, HIGH_QUEUE_THRESHOLD};
pub use error::{TrackerError, TrackerResult};
pub use metric::{CategorySummary, Metric, MetricCategory};
pub use recorder::{TimingRecorder, MODERATE_THRESHOLD_MS, SLOW_THRESHOLD_MS};
pub use session::TrackerSession;
pub use snapshot::{ConnectionInfo, EnvironmentProbe, NullProbe, Snapshot, Viewport};
pub use store::{MetricStore, DEFAULT_STORE_CAPACITY};
pub use vitals::{InputEntry, LayoutShiftEntry, PaintEntry, VitalsBridge, VitalsSource};

// Scheduling surface, re-exported so consumers need a single import.
pub use render_queue::{
    DebounceScheduler, RenderMonitor, RenderSample, RenderStats, TaskState, DEFAULT_DEBOUNCE,
    DEFAULT_SAMPLE_CAPACITY,
};

#[cfg(test)]
mod integration_tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test]
    async fn test_full_tracking_flow() {
        let client = Arc::new(PerfClient::new(TrackerConfig::new("1.0.0")));

        // Manual spans.
        client.start_timing("route-inventory", MetricCategory::Navigation);
        tokio::time::sleep(Duration::from_millis(15)).await;
        let elapsed = client
            .end_timing("route-inventory", MetricCategory::Navigation)
            .unwrap();
        assert!(elapsed >= 10.0);

        // Direct metrics.
        client.record_metric("api-call", 220.0, MetricCategory::Api);

        // Debounced renders feed the sample monitor.
        let renders = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            let counter = Arc::clone(&renders);
            client.schedule("render", Duration::from_millis(30), move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(renders.load(Ordering::SeqCst), 1);
        assert_eq!(client.queue_size(), 0);
        assert_eq!(client.render_stats().samples, 1);

        // The snapshot carries the whole stream plus context.
        let snapshot = client.export_snapshot();
        assert_eq!(snapshot.metrics.len(), 2);
        assert_eq!(snapshot.summary.len(), 2);
        assert_eq!(snapshot.session.app_version, "1.0.0");
    }

    #[tokio::test]
    async fn test_burst_scenario_executes_latest_only() {
        let client = PerfClient::new(TrackerConfig::default());
        let executed: Arc<std::sync::Mutex<Vec<usize>>> =
            Arc::new(std::sync::Mutex::new(Vec::new()));

        // 5 rapid schedules 10ms apart against a 100ms window.
        for i in 1..=5 {
            let log = Arc::clone(&executed);
            client.schedule("render", Duration::from_millis(100), move || {
                log.lock().unwrap().push(i);
            });
            tokio::time::sleep(Duration::from_millis(10)).await;
        }

        assert_eq!(client.queue_size(), 1);
        tokio::time::sleep(Duration::from_millis(300)).await;

        assert_eq!(*executed.lock().unwrap(), vec![5]);
        assert_eq!(client.queue_size(), 0);
    }

    #[test]
    fn test_store_eviction_through_client() {
        let client = PerfClient::new(TrackerConfig::new("1.0.0").with_store_capacity(20));

        for i in 0..25 {
            client.record_metric(&format!("m{i}"), i as f64, MetricCategory::Component);
        }

        let snapshot = client.export_snapshot();
        assert!(snapshot.metrics.len() <= 20);
        assert_eq!(snapshot.metrics.last().unwrap().name, "m24");
    }

    #[tokio::test]
    async fn test_cancel_through_client() {
        let client = PerfClient::new(TrackerConfig::default());
        let ran = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&ran);
        client.schedule("doomed", Duration::from_millis(50), move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        client.cancel("doomed");
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(ran.load(Ordering::SeqCst), 0);
        assert_eq!(client.render_stats().samples, 0);
    }
}
