//! Serializable snapshot export — the external interface surface.

use crate::metric::{CategorySummary, Metric};
use crate::session::TrackerSession;
use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Viewport dimensions at snapshot time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    /// Width in CSS pixels
    pub width: u32,
    /// Height in CSS pixels
    pub height: u32,
}

/// Network connection hints, when the platform exposes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionInfo {
    /// Coarse connection class (e.g. "4g", "3g")
    pub effective_type: String,
    /// Estimated downlink bandwidth in megabits per second
    pub downlink_mbps: f64,
    /// Estimated round-trip time in milliseconds
    pub rtt_ms: f64,
}

/// Host-supplied environment context for snapshots.
///
/// Recording and scheduling never consult this; it only enriches exports.
pub trait EnvironmentProbe: Send + Sync {
    /// Current viewport dimensions.
    fn viewport(&self) -> Viewport;
    /// Connection hints, if the platform reports them.
    fn connection(&self) -> Option<ConnectionInfo> {
        None
    }
}

/// Probe for hosts with no environment to report.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullProbe;

impl EnvironmentProbe for NullProbe {
    fn viewport(&self) -> Viewport {
        Viewport::default()
    }
}

/// Full export of the metric stream plus its summary and environment.
///
/// This shape is the one serialization contract of the subsystem; external
/// dashboards consume it as-is.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Every metric currently retained, oldest first
    pub metrics: Vec<Metric>,
    /// Per-category aggregates over `metrics`
    pub summary: Vec<CategorySummary>,
    /// When the snapshot was taken (Unix timestamp in ms)
    pub timestamp_ms: i64,
    /// Session identity
    pub session: TrackerSession,
    /// Viewport at snapshot time
    pub viewport: Viewport,
    /// Connection hints, when available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection: Option<ConnectionInfo>,
}

impl Snapshot {
    /// Assemble a snapshot stamped with the current time.
    pub fn capture(
        metrics: Vec<Metric>,
        summary: Vec<CategorySummary>,
        session: TrackerSession,
        probe: &dyn EnvironmentProbe,
    ) -> Self {
        Self {
            metrics,
            summary,
            timestamp_ms: Utc::now().timestamp_millis(),
            session,
            viewport: probe.viewport(),
            connection: probe.connection(),
        }
    }
}
