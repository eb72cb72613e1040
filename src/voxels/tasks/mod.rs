//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. Zones are
//! generated on the worker pool so the main thread never waits on terrain.

pub mod chunk_generation_task;
