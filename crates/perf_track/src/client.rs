//! High-level client wiring the tracking runtime together.

use crate::error::TrackerResult;
use crate::metric::{CategorySummary, MetricCategory};
use crate::recorder::{TimingRecorder, MODERATE_THRESHOLD_MS, SLOW_THRESHOLD_MS};
use crate::session::TrackerSession;
use crate::snapshot::{EnvironmentProbe, NullProbe, Snapshot};
use crate::store::{MetricStore, DEFAULT_STORE_CAPACITY};
use crate::vitals::{VitalsBridge, VitalsSource};
use render_queue::{DebounceScheduler, RenderMonitor, RenderStats, DEFAULT_SAMPLE_CAPACITY};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

/// Configuration for the performance tracking runtime.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Application version reported in snapshots
    pub app_version: String,
    /// Metric store cap before batch eviction (default: 100)
    pub store_capacity: usize,
    /// Render sample ring capacity (default: 20)
    pub sample_capacity: usize,
    /// Threshold above which operations are logged as slow (default: 1000ms)
    pub slow_threshold_ms: f64,
    /// Threshold above which operations are logged as moderate (default: 500ms)
    pub moderate_threshold_ms: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self::new("0.0.0")
    }
}

impl TrackerConfig {
    /// Create a config with default capacities and thresholds.
    pub fn new(app_version: impl Into<String>) -> Self {
        Self {
            app_version: app_version.into(),
            store_capacity: DEFAULT_STORE_CAPACITY,
            sample_capacity: DEFAULT_SAMPLE_CAPACITY,
            slow_threshold_ms: SLOW_THRESHOLD_MS,
            moderate_threshold_ms: MODERATE_THRESHOLD_MS,
        }
    }

    /// Builder method to set the metric store capacity.
    pub fn with_store_capacity(mut self, capacity: usize) -> Self {
        self.store_capacity = capacity;
        self
    }

    /// Builder method to set the render sample ring capacity.
    pub fn with_sample_capacity(mut self, capacity: usize) -> Self {
        self.sample_capacity = capacity;
        self
    }

    /// Builder method to set both diagnostic thresholds.
    pub fn with_thresholds(mut self, slow_ms: f64, moderate_ms: f64) -> Self {
        self.slow_threshold_ms = slow_ms;
        self.moderate_threshold_ms = moderate_ms;
        self
    }
}

/// Entry point for the render performance runtime.
///
/// Constructed once at application start and shared by reference (wrap in an
/// `Arc` when handing it to timer callbacks); there is no implicit global
/// instance. All methods take `&self`.
pub struct PerfClient {
    store: Arc<Mutex<MetricStore>>,
    recorder: TimingRecorder,
    bridge: VitalsBridge,
    scheduler: DebounceScheduler,
    session: TrackerSession,
    probe: Box<dyn EnvironmentProbe>,
}

impl std::fmt::Debug for PerfClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerfClient")
            .field("session", &self.session.session_id)
            .field("queue_size", &self.queue_size())
            .finish()
    }
}

impl PerfClient {
    /// Create a client with no environment probe.
    pub fn new(config: TrackerConfig) -> Self {
        Self::with_probe(config, Box::new(NullProbe))
    }

    /// Create a client with a host-supplied environment probe.
    pub fn with_probe(config: TrackerConfig, probe: Box<dyn EnvironmentProbe>) -> Self {
        let store = Arc::new(Mutex::new(MetricStore::new(config.store_capacity)));
        let recorder = TimingRecorder::with_thresholds(
            Arc::clone(&store),
            config.slow_threshold_ms,
            config.moderate_threshold_ms,
        );
        let bridge = VitalsBridge::new(Arc::clone(&store));
        let scheduler = DebounceScheduler::with_monitor(Arc::new(Mutex::new(RenderMonitor::new(
            config.sample_capacity,
        ))));
        let session = TrackerSession::new(&config.app_version);

        tracing::debug!(
            target: "perf_track::client",
            session_id = %session.session_id,
            "performance tracking started"
        );

        Self {
            store,
            recorder,
            bridge,
            scheduler,
            session,
            probe,
        }
    }

    /// Open a named timing span.
    pub fn start_timing(&self, name: impl Into<String>, category: MetricCategory) {
        self.recorder.start_timing(name, category);
    }

    /// Close a named timing span, returning its duration in milliseconds.
    ///
    /// Returns `None` for a span that was never started.
    pub fn end_timing(&self, name: &str, category: MetricCategory) -> Option<f64> {
        self.recorder.end_timing(name, category)
    }

    /// Record an externally measured value.
    pub fn record_metric(&self, name: &str, value_ms: f64, category: MetricCategory) {
        self.recorder.record_metric(name, value_ms, category);
    }

    /// Subscribe the vitals bridge to a host signal source (idempotent).
    pub fn attach_vitals(&self, source: &dyn VitalsSource) {
        self.bridge.attach(source);
    }

    /// Debounce-schedule a task; only the trailing call per key executes.
    pub fn schedule<F>(&self, key: impl Into<String>, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.scheduler.schedule(key, delay, f);
    }

    /// Cancel a pending task without executing it.
    pub fn cancel(&self, key: &str) {
        self.scheduler.cancel(key);
    }

    /// Number of tasks currently pending or executing.
    pub fn queue_size(&self) -> usize {
        self.scheduler.queue_size()
    }

    /// Aggregate statistics over recent completed renders.
    pub fn render_stats(&self) -> RenderStats {
        self.scheduler.render_stats()
    }

    /// Per-category aggregates over the current metric stream.
    pub fn summary(&self) -> Vec<CategorySummary> {
        self.store
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .summarize()
    }

    /// Export the full metric stream, summary, and environment context.
    pub fn export_snapshot(&self) -> Snapshot {
        let (metrics, summary) = {
            let store = self.store.lock().unwrap_or_else(PoisonError::into_inner);
            (store.metrics().to_vec(), store.summarize())
        };
        Snapshot::capture(metrics, summary, self.session.clone(), self.probe.as_ref())
    }

    /// Export the snapshot as a JSON string.
    pub fn export_json(&self) -> TrackerResult<String> {
        Ok(serde_json::to_string(&self.export_snapshot())?)
    }

    /// Identity of the current session.
    pub fn session(&self) -> &TrackerSession {
        &self.session
    }

    /// Shared handle to the underlying scheduler.
    pub fn scheduler(&self) -> &DebounceScheduler {
        &self.scheduler
    }
}
