#![cfg_attr(not(test), no_std)]

//! rover_assist - Autopilot assist module for ground vehicles
//!
//! Host integration around the `rover_assist_core` control logic: the
//! [`Autopilot`](autopilot::Autopilot) runner that owns the scheduler,
//! logging, the operator status log, route recording and persistence, and
//! the text command surface.

extern crate alloc;

// Logging macros and status log
pub mod core;

// Scheduler-driven autopilot runner
pub mod autopilot;

// Route recording, persistence and operator commands
pub mod command;
pub mod recorder;
pub mod route_store;

pub use autopilot::{Autopilot, AutopilotError, NAV_INTERVAL};
pub use command::{run_command, Command, CommandError, CommandOutcome};
pub use recorder::{RouteRecorder, RECORD_SPACING};
pub use route_store::{KeyValueStore, MemoryStore, RouteError};
