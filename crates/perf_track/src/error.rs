//! Error types for the performance tracking runtime.

use thiserror::Error;

/// Errors that can occur while setting up or exporting telemetry.
///
/// The recording paths themselves are infallible by design: overflow is
/// handled by eviction, unmatched span ends return `None`, and diagnostics
/// are log-only. Only subscription setup and snapshot serialization can
/// fail.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Failed to serialize a snapshot
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An environment signal stream could not be subscribed
    #[error("Signal unavailable: {0}")]
    SignalUnavailable(String),
}

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
