//! Host-side infrastructure
//!
//! Logging macros and the operator-facing status log.

pub mod log_buffer;
pub mod logging;
