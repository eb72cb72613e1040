//! # Task Management System
//!
//! This module provides the worker pool the streaming pipeline runs its
//! generation and meshing tasks on. The pool is an explicit object owned by
//! whoever dispatches work; there is no process-wide pool.
//!
//! ## Architecture Overview
//!
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed on a worker
//! - `TaskReport`: What a finished task reports back to the main thread
//! - `TaskChannel`: Communication channel between the main thread and one worker
//!
//! Each worker is a `std::thread` with a dedicated task channel and report
//! channel. Tasks are distributed round-robin over workers that have room.
//!
//! ## Task Lifecycle
//! 1. Tasks are created and published via `TaskManager::publish_task()`
//! 2. The manager hands tasks to available worker channels using round-robin
//! 3. Workers process tasks and send back a report
//! 4. Reports are collected on the main thread in `process_completed_tasks()`
//! 5. Queued tasks move to workers in `process_queued_tasks()`
//!
//! ## Performance Considerations
//! - **Task Granularity**: one zone per generation task, one chunk per mesh task
//! - **Blocking**: tasks never wait on each other; a task only locks one chunk at a time
//!
//! ## Example Usage
//! ```rust
//! use voxel_terrain::task_management::{task::{Task, TaskReport}, TaskManager};
//! use web_time::Duration;
//!
//! struct Noop;
//!
//! impl Task for Noop {
//!     fn process(&self) -> TaskReport {
//!         TaskReport { kind: "noop", elapsed: Duration::ZERO }
//!     }
//! }
//!
//! let mut task_manager = TaskManager::new(2);
//! task_manager.publish_task(Box::new(Noop));
//!
//! // In the main loop:
//! while !task_manager.is_idle() {
//!     task_manager.process_completed_tasks();
//!     task_manager.process_queued_tasks();
//! }
//! ```

pub mod task;

use std::{
    collections::VecDeque,
    sync::mpsc::{channel, Receiver, Sender, TryRecvError},
    thread::{self, JoinHandle},
};

use log::{info, warn};
use task::{Task, TaskReport};

/// A communication channel between the main thread and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from main thread to worker
/// - `report_receiver`: Receives task reports from worker
/// - `num_tasks_in_flight`: Tracks number of tasks currently being processed
/// - `_worker`: Handle to the worker thread
///
/// Dropping the channel closes `task_sender`, which ends the worker's loop.
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task>>,
    report_receiver: Receiver<TaskReport>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting task reports
/// - Handling task queuing when all workers are busy
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// Everything beyond this waits in the manager's queue, so a worker that
/// dies only ever takes one task with it.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        info!(
            "Starting {} workers, available parallelism: {:?}",
            num_workers,
            thread::available_parallelism()
        );

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task>>();
            let (report_tx, report_rx) = channel::<TaskReport>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let report = task.process();
                    if report_tx.send(report).is_err() {
                        break;
                    }
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                report_receiver: report_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was sent, incrementing the channel's in-flight count
    /// - `Err(task)` if the worker has disconnected
    fn try_send_task(&mut self, task: Box<dyn Task>, channel_idx: usize) -> Result<(), Box<dyn Task>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// Round-robin starting from the channel after the last one used;
    /// channels at `MAX_TASKS_IN_FLIGHT` are skipped.
    ///
    /// # Returns
    /// - `Some(usize)` index of an available channel
    /// - `None` if all channels are busy or there are no channels
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// The task is sent to a worker right away if one is free, otherwise it
    /// is queued until `process_queued_tasks()` finds one.
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on a worker
    /// - `false` if the task was queued
    pub fn publish_task(&mut self, task: Box<dyn Task>) -> bool {
        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    warn!("Worker {} disconnected, queueing task", channel_idx);
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers while any has room.
    ///
    /// Tasks are dispatched in FIFO order; processing stops at the first task
    /// that can't be scheduled.
    pub fn process_queued_tasks(&mut self) {
        while !self.queued_tasks.is_empty() {
            let Some(channel_idx) = self.find_available_channel() else {
                break;
            };
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(_) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.queued_tasks.push_front(task);
                    break;
                }
            }
        }
    }

    /// Collects the reports of every task that finished since the last call.
    ///
    /// Must be called from the thread that owns the manager.
    ///
    /// A worker whose report channel has disconnected (its task panicked) is
    /// retired, and the task it was running is lost.
    pub fn process_completed_tasks(&mut self) -> Vec<TaskReport> {
        let mut reports = Vec::new();
        let mut retired = Vec::new();
        for (channel_idx, channel) in self.channels.iter_mut().enumerate() {
            loop {
                match channel.report_receiver.try_recv() {
                    Ok(report) => {
                        channel.num_tasks_in_flight -= 1;
                        reports.push(report);
                    }
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        warn!(
                            "Worker {} disconnected with {} task(s) in flight, retiring it",
                            channel_idx, channel.num_tasks_in_flight
                        );
                        retired.push(channel_idx);
                        break;
                    }
                }
            }
        }

        for channel_idx in retired.into_iter().rev() {
            self.channels.remove(channel_idx);
        }
        if self.current_channel >= self.channels.len() {
            self.current_channel = 0;
        }
        reports
    }

    /// Tasks sent to workers whose reports have not been collected yet.
    pub fn tasks_in_flight(&self) -> usize {
        self.channels.iter().map(|c| c.num_tasks_in_flight).sum()
    }

    pub fn queued_task_count(&self) -> usize {
        self.queued_tasks.len()
    }

    /// No task is queued or running.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty() && self.tasks_in_flight() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };
    use web_time::{Duration, Instant};

    struct CountingTask {
        counter: Arc<AtomicUsize>,
    }

    impl Task for CountingTask {
        fn process(&self) -> TaskReport {
            let start = Instant::now();
            self.counter.fetch_add(1, Ordering::SeqCst);
            TaskReport {
                kind: "count",
                elapsed: start.elapsed(),
            }
        }
    }

    fn drain(manager: &mut TaskManager) -> Vec<TaskReport> {
        let mut reports = Vec::new();
        for _ in 0..10_000 {
            manager.process_queued_tasks();
            reports.extend(manager.process_completed_tasks());
            if manager.is_idle() {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        reports
    }

    #[test]
    fn every_published_task_runs_once() {
        let mut manager = TaskManager::new(3);
        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..20 {
            manager.publish_task(Box::new(CountingTask {
                counter: counter.clone(),
            }));
        }
        assert!(manager.queued_task_count() >= 17);

        let reports = drain(&mut manager);
        assert!(manager.is_idle());
        assert_eq!(reports.len(), 20);
        assert!(reports.iter().all(|r| r.kind == "count"));
        assert_eq!(counter.load(Ordering::SeqCst), 20);
    }

    struct PanickingTask;

    impl Task for PanickingTask {
        fn process(&self) -> TaskReport {
            panic!("task failed");
        }
    }

    #[test]
    fn a_worker_that_panics_is_retired() {
        let mut manager = TaskManager::new(2);
        assert!(manager.publish_task(Box::new(PanickingTask)));
        for _ in 0..10_000 {
            manager.process_completed_tasks();
            if manager.worker_count() == 1 {
                break;
            }
            thread::sleep(Duration::from_millis(1));
        }
        assert_eq!(manager.worker_count(), 1);
        assert_eq!(manager.tasks_in_flight(), 0);
        assert!(manager.is_idle());

        let counter = Arc::new(AtomicUsize::new(0));
        for _ in 0..3 {
            manager.publish_task(Box::new(CountingTask {
                counter: counter.clone(),
            }));
        }
        assert_eq!(drain(&mut manager).len(), 3);
        assert_eq!(counter.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn a_pool_without_workers_only_queues() {
        let mut manager = TaskManager::new(0);
        let counter = Arc::new(AtomicUsize::new(0));
        assert!(!manager.publish_task(Box::new(CountingTask { counter })));
        manager.process_queued_tasks();
        assert_eq!(manager.queued_task_count(), 1);
        assert!(!manager.is_idle());
    }
}
