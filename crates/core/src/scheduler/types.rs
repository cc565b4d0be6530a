//! Core types for the task scheduler
//!
//! - Task handles (stable identity across registry mutation)
//! - Errors and per-tick events
//! - Task and scheduler statistics

use core::fmt;

/// Stable identifier of a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(pub u32);

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task#{}", self.0)
    }
}

/// Errors from scheduler operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerError {
    /// The fixed-capacity registry has no free slot
    RegistryFull,
    /// No task is registered under the handle
    UnknownTask(TaskHandle),
    /// Interval is negative or not finite
    InvalidInterval,
    /// A step queued more task commands than fit
    CommandQueueFull,
}

impl fmt::Display for SchedulerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchedulerError::RegistryFull => write!(f, "task registry full"),
            SchedulerError::UnknownTask(handle) => write!(f, "unknown task {}", handle),
            SchedulerError::InvalidInterval => write!(f, "invalid task interval"),
            SchedulerError::CommandQueueFull => write!(f, "task command queue full"),
        }
    }
}

impl core::error::Error for SchedulerError {}

/// Notable outcome of a single task resumption
///
/// Returned from [`super::Scheduler::tick`] so the host can log without the
/// core crate depending on a logger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerEvent {
    /// The step returned a fault; the task will retry on its next due cycle
    Faulted {
        handle: TaskHandle,
        name: &'static str,
        reason: &'static str,
    },
    /// A one-shot task finished and was removed
    Completed {
        handle: TaskHandle,
        name: &'static str,
    },
    /// A looping task finished its routine and was rewound
    Restarted {
        handle: TaskHandle,
        name: &'static str,
    },
}

/// Runtime statistics for a single task
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TaskStats {
    /// Number of resumptions
    pub runs: u64,
    /// Number of resumptions that faulted
    pub faults: u32,
    /// Number of times the routine reported `Done`
    pub completions: u32,
    /// Time step handed to the last resumption (seconds)
    pub last_dt: f32,
}

impl TaskStats {
    /// Record one resumption
    pub fn record_run(&mut self, dt: f32) {
        self.runs = self.runs.saturating_add(1);
        self.last_dt = dt;
    }

    /// Record a faulted resumption
    pub fn record_fault(&mut self) {
        self.faults = self.faults.saturating_add(1);
    }

    /// Record a routine completion
    pub fn record_completion(&mut self) {
        self.completions = self.completions.saturating_add(1);
    }

    /// Reset all statistics
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Global scheduler statistics
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SchedulerStats {
    /// Number of ticks processed
    pub ticks: u64,
    /// Total faults across all tasks, including removed ones
    pub total_faults: u32,
    /// Total simulated time fed through `tick` (seconds)
    pub uptime_s: f32,
}
