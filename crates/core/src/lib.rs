//! rover_assist_core - Pure no_std control logic for the rover assist autopilot
//!
//! This crate contains the platform-agnostic scheduling and navigation
//! algorithms. Everything here can be tested on host without feature flags.
//!
//! # Design Principles
//!
//! - **Zero cfg**: No `#[cfg(feature = ...)]` directives
//! - **Pure no_std**: Only `core` and `alloc` (for boxed task routines)
//! - **No logging**: Components return events; the host crate logs them
//! - **No globals**: Shared state is threaded through [`mode::AutopilotContext`]
//!
//! # Modules
//!
//! - [`control`]: PID feedback controller
//! - [`scheduler`]: Cooperative task scheduler for resumable routines
//! - [`navigation`]: Vehicle frame math, waypoint queue, collision avoidance
//! - [`vehicle`]: Controller capability trait and per-tick sensor inputs
//! - [`mode`]: Track / Follow / Route navigation modes and the cruise task
//! - [`parameters`]: Parameter store and parameter blocks

#![no_std]

extern crate alloc;

pub mod control;
pub mod mode;
pub mod navigation;
pub mod parameters;
pub mod scheduler;
pub mod vehicle;
