//! Session identity carried with exported snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a single tracked page/application session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerSession {
    /// Unique identifier for this session
    pub session_id: String,
    /// When the session started
    pub started_at: DateTime<Utc>,
    /// Application version string
    pub app_version: String,
    /// Platform identifier
    pub platform: String,
}

impl TrackerSession {
    /// Create a new session for the current platform.
    pub fn new(app_version: &str) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            started_at: Utc::now(),
            app_version: app_version.to_string(),
            platform: detect_platform(),
        }
    }

    /// Milliseconds elapsed since the session started.
    pub fn uptime_ms(&self) -> i64 {
        Utc::now()
            .signed_duration_since(self.started_at)
            .num_milliseconds()
            .max(0)
    }
}

fn detect_platform() -> String {
    #[cfg(target_os = "macos")]
    {
        "macos".to_string()
    }
    #[cfg(target_os = "windows")]
    {
        "windows".to_string()
    }
    #[cfg(target_os = "linux")]
    {
        "linux".to_string()
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        "unknown".to_string()
    }
}
