//! Feedback controllers
//!
//! - [`pid`]: Leaky-integral PID used for steering and speed hold

pub mod pid;

pub use pid::{Pid, PidGains, MIN_DT};
