//! # Core Module
//!
//! Concurrency primitives shared by the world store and the worker pool.
//!
//! ## Key Components
//! - `MtResource`: Thread-safe reference-counted resource with read-write locking
//! - `HandoffQueue`: Mutex-guarded append/drain queue connecting pipeline stages
//!
//! ## Usage
//! ```rust
//! use voxel_terrain::core::{HandoffQueue, MtResource};
//!
//! let counter = MtResource::new(0);
//! *counter.get_mut() += 1;
//! assert_eq!(*counter.get(), 1);
//!
//! let queue = HandoffQueue::new();
//! queue.push(7u32);
//! assert_eq!(queue.drain_all(), vec![7]);
//! ```

pub mod handoff_queue;
pub mod mt_resource;

pub use handoff_queue::HandoffQueue;
pub use mt_resource::MtResource;
