//! Background polling of the metric summary and render statistics.

use crate::client::PerfClient;
use std::sync::Arc;
use std::time::Duration;

/// Pending-task count above which the queue is flagged as under pressure.
pub const HIGH_QUEUE_THRESHOLD: usize = 10;

/// Classification of the scheduler's pending-task load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueuePressure {
    /// Queue is draining normally
    Normal,
    /// Queue buildup; renders are being requested faster than they settle
    High,
}

impl QueuePressure {
    /// Classify a pending-task count.
    pub fn classify(queue_size: usize) -> Self {
        if queue_size > HIGH_QUEUE_THRESHOLD {
            QueuePressure::High
        } else {
            QueuePressure::Normal
        }
    }
}

/// Start a background task that polls the client on a fixed interval.
///
/// Each tick logs the render statistics, the queue pressure, and the
/// per-category summary. Abort the returned handle to stop polling.
pub fn spawn_monitor(client: Arc<PerfClient>, interval: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            let stats = client.render_stats();
            let queue_size = client.queue_size();

            match QueuePressure::classify(queue_size) {
                QueuePressure::High => tracing::warn!(
                    target: "perf_track::dashboard",
                    queue_size = queue_size,
                    average_ms = stats.average_ms,
                    "render queue under pressure"
                ),
                QueuePressure::Normal => tracing::debug!(
                    target: "perf_track::dashboard",
                    queue_size = queue_size,
                    average_ms = stats.average_ms,
                    max_ms = stats.max_ms,
                    samples = stats.samples,
                    "render stats"
                ),
            }

            for row in client.summary() {
                tracing::debug!(
                    target: "perf_track::dashboard",
                    category = %row.category,
                    count = row.count,
                    average_ms = row.average_ms,
                    "category summary"
                );
            }
        }
    })
}
