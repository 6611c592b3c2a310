//! Debounced Render Scheduling
//!
//! This crate provides the render-loop half of the performance runtime:
//!
//! - A fixed-capacity ring buffer of render-duration samples with running
//!   aggregate statistics
//! - A debounce scheduler that coalesces bursts of repeated update requests
//!   into a single execution per quiet window, keyed by logical task identity
//!
//! Executed tasks feed their wall-clock duration into the sample monitor, so
//! a dashboard can poll both the pending-task count and the completed-render
//! statistics from one place.
//!
//! # Example
//!
//! ```rust
//! use render_queue::{DebounceScheduler, DEFAULT_DEBOUNCE};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let scheduler = DebounceScheduler::new();
//!
//! // Bursts for the same key collapse into one trailing execution.
//! scheduler.schedule("dashboard", DEFAULT_DEBOUNCE, || { /* first */ });
//! scheduler.schedule("dashboard", DEFAULT_DEBOUNCE, || { /* this one runs */ });
//!
//! tokio::time::sleep(DEFAULT_DEBOUNCE * 2).await;
//! assert_eq!(scheduler.queue_size(), 0);
//! let stats = scheduler.render_stats();
//! assert_eq!(stats.samples, 1);
//! # }
//! ```

mod monitor;
mod scheduler;

pub use monitor::{RenderMonitor, RenderSample, RenderStats, DEFAULT_SAMPLE_CAPACITY};
pub use scheduler::{DebounceScheduler, TaskState, DEFAULT_DEBOUNCE};
