//! # Task System Core Traits
//!
//! This module defines the unit of work the worker pool executes.
//!
//! ## Task Lifecycle
//! 1. A `Task` is created and scheduled via `TaskManager::publish_task()`
//! 2. The task's `process()` method is called on a worker thread
//! 3. The task delivers its output through its own handoff queue
//! 4. The returned `TaskReport` is collected on the main thread
//!
//! ## Thread Safety
//! - `Task` must be `Send` to be transferred between threads
//! - Outputs travel through `HandoffQueue`s, never through the report

use web_time::Duration;

/// A unit of work that can be executed on a worker thread.
///
/// Tasks own everything they need (chunk handles, queue handles, generator
/// handles) so they can run without borrowing the pipeline.
pub trait Task: Send {
    /// Processes the task.
    ///
    /// # Implementation Notes
    /// - Must not block on other tasks
    /// - Must not hold more than one chunk lock at a time
    ///
    /// # Returns
    /// A `TaskReport` the main thread uses for bookkeeping and statistics.
    fn process(&self) -> TaskReport;
}

/// What a finished task tells the main thread about itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskReport {
    /// Short name of the task kind, e.g. `"generation"`.
    pub kind: &'static str,
    /// Wall-clock time spent in `process()`.
    pub elapsed: Duration,
}
