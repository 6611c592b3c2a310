//! Bridging of passive environment timing signals into the metric store.
//!
//! The host platform (a browser shell, a webview, a test harness) implements
//! [`VitalsSource`] with whatever native instrumentation it has. The bridge
//! consumes the three signal streams independently and normalizes each
//! occurrence into a metric store append; it never depends on how the
//! adapter produces its entries.

use crate::error::TrackerResult;
use crate::metric::{Metric, MetricCategory};
use crate::store::MetricStore;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::mpsc;

/// A paint-timing occurrence (e.g. largest contentful paint).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintEntry {
    /// Paint time relative to navigation start, in milliseconds
    pub start_time_ms: f64,
}

/// An input-latency occurrence (e.g. first input delay).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputEntry {
    /// When the input event was received
    pub start_time_ms: f64,
    /// When the handler started processing, if the platform reports it
    pub processing_start_ms: Option<f64>,
}

/// A layout-instability occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutShiftEntry {
    /// Shift score contributed by this occurrence
    pub value: f64,
    /// Shifts following recent user input do not count toward the total
    pub had_recent_input: bool,
}

/// Host-side source of passive environment timing signals.
///
/// Each method subscribes one stream; returning an error means that signal
/// is unavailable on this platform. The three streams are independent.
pub trait VitalsSource: Send + Sync {
    /// Subscribe to paint-timing occurrences.
    fn paint_timings(&self) -> TrackerResult<mpsc::Receiver<PaintEntry>>;
    /// Subscribe to input-latency occurrences.
    fn input_latencies(&self) -> TrackerResult<mpsc::Receiver<InputEntry>>;
    /// Subscribe to layout-instability occurrences.
    fn layout_shifts(&self) -> TrackerResult<mpsc::Receiver<LayoutShiftEntry>>;
}

/// Bridges [`VitalsSource`] streams into metric store appends.
///
/// Attach is idempotent: a second call is a logged no-op, so observers are
/// never duplicated regardless of how many times setup runs.
#[derive(Debug)]
pub struct VitalsBridge {
    store: Arc<Mutex<MetricStore>>,
    attached: AtomicBool,
}

impl VitalsBridge {
    /// Create a bridge writing into the given store.
    pub fn new(store: Arc<Mutex<MetricStore>>) -> Self {
        Self {
            store,
            attached: AtomicBool::new(false),
        }
    }

    /// Whether observers have been attached.
    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::SeqCst)
    }

    /// Subscribe to all three signal streams and start consuming them.
    ///
    /// A failed subscription is logged and the remaining streams continue
    /// unaffected; nothing here propagates to the caller.
    pub fn attach(&self, source: &dyn VitalsSource) {
        if self.attached.swap(true, Ordering::SeqCst) {
            tracing::debug!(
                target: "perf_track::vitals",
                "vitals bridge already attached, ignoring"
            );
            return;
        }

        match source.paint_timings() {
            Ok(mut rx) => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    while let Some(entry) = rx.recv().await {
                        append(
                            &store,
                            Metric::now(
                                "largest_paint",
                                entry.start_time_ms,
                                MetricCategory::Navigation,
                            ),
                        );
                    }
                });
            }
            Err(e) => tracing::warn!(
                target: "perf_track::vitals",
                error = %e,
                "paint timing signal unavailable"
            ),
        }

        match source.input_latencies() {
            Ok(mut rx) => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    while let Some(entry) = rx.recv().await {
                        // Platforms that omit processing start report zero delay.
                        let delay_ms = entry
                            .processing_start_ms
                            .map(|ps| ps - entry.start_time_ms)
                            .unwrap_or(0.0);
                        append(
                            &store,
                            Metric::now("input_delay", delay_ms, MetricCategory::UserAction),
                        );
                    }
                });
            }
            Err(e) => tracing::warn!(
                target: "perf_track::vitals",
                error = %e,
                "input latency signal unavailable"
            ),
        }

        match source.layout_shifts() {
            Ok(mut rx) => {
                let store = Arc::clone(&self.store);
                tokio::spawn(async move {
                    let mut shift_total = 0.0;
                    while let Some(entry) = rx.recv().await {
                        if !entry.had_recent_input {
                            shift_total += entry.value;
                        }
                        // The running total is appended on every occurrence,
                        // not the per-event delta.
                        append(
                            &store,
                            Metric::now("layout_shift", shift_total, MetricCategory::Navigation),
                        );
                    }
                });
            }
            Err(e) => tracing::warn!(
                target: "perf_track::vitals",
                error = %e,
                "layout instability signal unavailable"
            ),
        }
    }
}

fn append(store: &Arc<Mutex<MetricStore>>, metric: Metric) {
    store
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .append(metric);
}
