//! Debounced task scheduling keyed by logical task identity.
//!
//! Each key moves through an explicit `Idle -> Pending -> Executing -> Idle`
//! state machine. Scheduling a key that is already pending cancels the armed
//! timer and replaces it with the latest closure, so only the trailing call
//! within a quiet window executes. Completed executions feed their wall-clock
//! duration into the [`RenderMonitor`].

use crate::monitor::RenderMonitor;
use std::any::Any;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tokio::task::AbortHandle;

/// Default quiet window for debounced rendering.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(100);

/// Lifecycle state of a scheduled task key.
///
/// Keys with no entry in the queue are implicitly idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Timer armed, waiting for the quiet window to elapse
    Pending,
    /// Closure currently running; not preemptible
    Executing,
}

/// Live entry for a task key.
#[derive(Debug)]
struct TaskSlot {
    state: TaskState,
    /// Monotonic stamp; a fire with a stale generation has been superseded.
    generation: u64,
    abort: AbortHandle,
}

#[derive(Debug)]
struct SchedulerShared {
    tasks: Mutex<HashMap<String, TaskSlot>>,
    monitor: Arc<Mutex<RenderMonitor>>,
    generation: AtomicU64,
}

/// Debounce scheduler / render queue.
///
/// Cheap to clone; clones share the same queue and monitor, so an executing
/// closure may capture a clone and re-enter `schedule` safely (no lock is
/// held while user closures run).
#[derive(Debug, Clone)]
pub struct DebounceScheduler {
    shared: Arc<SchedulerShared>,
}

impl Default for DebounceScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceScheduler {
    /// Create a scheduler with a default-capacity render monitor.
    pub fn new() -> Self {
        Self::with_monitor(Arc::new(Mutex::new(RenderMonitor::default())))
    }

    /// Create a scheduler feeding an externally owned monitor.
    pub fn with_monitor(monitor: Arc<Mutex<RenderMonitor>>) -> Self {
        Self {
            shared: Arc::new(SchedulerShared {
                tasks: Mutex::new(HashMap::new()),
                monitor,
                generation: AtomicU64::new(0),
            }),
        }
    }

    /// Schedule `f` to run for `key` after `delay` of quiet time.
    ///
    /// If a timer is already armed for `key`, it is cancelled and replaced;
    /// the most recently supplied closure wins. Different keys are fully
    /// independent.
    pub fn schedule<F>(&self, key: impl Into<String>, delay: Duration, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let key = key.into();
        let generation = self.shared.generation.fetch_add(1, Ordering::SeqCst) + 1;

        // Hold the lock across spawn + insert so a zero-delay fire cannot
        // observe the map before its slot exists.
        let mut tasks = lock(&self.shared.tasks);

        if let Some(prev) = tasks.get(&key) {
            if prev.state == TaskState::Pending {
                prev.abort.abort();
                tracing::trace!(
                    target: "render_queue::scheduler",
                    key = %key,
                    "pending task superseded"
                );
            }
        }

        let shared = Arc::clone(&self.shared);
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            fire(&shared, &task_key, generation, f);
        });

        tasks.insert(
            key,
            TaskSlot {
                state: TaskState::Pending,
                generation,
                abort: handle.abort_handle(),
            },
        );
    }

    /// Schedule under the default debounce window.
    pub fn schedule_default<F>(&self, key: impl Into<String>, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        self.schedule(key, DEFAULT_DEBOUNCE, f);
    }

    /// Cancel a pending timer for `key` without executing it.
    ///
    /// An executing task is not preemptible; its entry is removed when the
    /// closure returns.
    pub fn cancel(&self, key: &str) {
        let mut tasks = lock(&self.shared.tasks);
        if let Some(slot) = tasks.get(key) {
            if slot.state == TaskState::Pending {
                slot.abort.abort();
                tasks.remove(key);
                tracing::trace!(
                    target: "render_queue::scheduler",
                    key = key,
                    "pending task cancelled"
                );
            }
        }
    }

    /// Number of keys currently pending or executing.
    ///
    /// Distinct from [`RenderStats::samples`](crate::RenderStats), which
    /// counts completed renders.
    pub fn queue_size(&self) -> usize {
        lock(&self.shared.tasks).len()
    }

    /// Current state of a task key, or `None` when idle.
    pub fn task_state(&self, key: &str) -> Option<TaskState> {
        lock(&self.shared.tasks).get(key).map(|slot| slot.state)
    }

    /// Aggregate statistics over recent completed renders.
    pub fn render_stats(&self) -> crate::RenderStats {
        lock(&self.shared.monitor).stats()
    }

    /// Shared handle to the underlying monitor.
    pub fn monitor(&self) -> Arc<Mutex<RenderMonitor>> {
        Arc::clone(&self.shared.monitor)
    }
}

/// Run a fired task: verify it has not been superseded, execute the closure,
/// record its duration, and return the key to idle.
fn fire<F: FnOnce()>(shared: &SchedulerShared, key: &str, generation: u64, f: F) {
    {
        let mut tasks = lock(&shared.tasks);
        match tasks.get_mut(key) {
            Some(slot) if slot.generation == generation => {
                slot.state = TaskState::Executing;
            }
            // Cancelled or replaced between timer expiry and this point.
            _ => return,
        }
    }

    let start = Instant::now();
    let result = catch_unwind(AssertUnwindSafe(f));
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    // The duration is recorded even for a panicking closure, so performance
    // visibility survives task failures.
    lock(&shared.monitor).record_sample(elapsed_ms);

    if let Err(panic) = result {
        tracing::error!(
            target: "render_queue::scheduler",
            key = key,
            elapsed_ms = elapsed_ms,
            error = %panic_message(panic.as_ref()),
            "scheduled task panicked"
        );
    }

    let mut tasks = lock(&shared.tasks);
    if let Some(slot) = tasks.get(key) {
        // A newer generation means the closure re-scheduled its own key;
        // leave the fresh slot in place.
        if slot.generation == generation {
            tasks.remove(key);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
