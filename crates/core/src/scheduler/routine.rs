//! Resumable routine interface
//!
//! A routine is a plain struct whose fields are its resumption cursor.
//! Each call to [`Routine::step`] runs one iteration of the routine's loop
//! and reports how it left off.

use core::fmt;

use heapless::Vec;

use super::types::{SchedulerError, TaskHandle};

/// Maximum task-control commands a single step may queue
pub const MAX_PENDING_COMMANDS: usize = 8;

/// Outcome of one routine step
#[derive(Debug, Clone, PartialEq)]
pub enum Step<O> {
    /// Suspended with a value; becomes the task's published result
    Yield(O),
    /// Suspended without a value (give other tasks the tick)
    Suspend,
    /// The routine has nothing more to produce
    Done,
}

/// Unrecoverable fault raised by a routine step
///
/// Caught by the scheduler at task granularity; the task is retried on its
/// next due cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskFault {
    /// Human-readable reason
    pub reason: &'static str,
}

impl TaskFault {
    /// Create a fault with the given reason
    pub const fn new(reason: &'static str) -> Self {
        Self { reason }
    }
}

impl fmt::Display for TaskFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task fault: {}", self.reason)
    }
}

impl core::error::Error for TaskFault {}

/// Task-control request issued from inside a step
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaskCommand {
    /// Stop resuming the task
    Pause(TaskHandle),
    /// Resume a paused task
    Resume(TaskHandle),
    /// Remove the task at the end of the tick
    Cancel(TaskHandle),
    /// Change the minimum re-run interval (seconds)
    SetInterval(TaskHandle, f32),
}

/// Everything a routine may touch during one step
pub struct StepContext<'a, C> {
    /// State shared by all tasks of this scheduler
    pub shared: &'a mut C,
    /// Seconds since this task last ran
    pub dt: f32,
    /// Handle of the running task
    pub handle: TaskHandle,
    commands: &'a mut Vec<TaskCommand, MAX_PENDING_COMMANDS>,
}

impl<'a, C> StepContext<'a, C> {
    pub(crate) fn new(
        shared: &'a mut C,
        dt: f32,
        handle: TaskHandle,
        commands: &'a mut Vec<TaskCommand, MAX_PENDING_COMMANDS>,
    ) -> Self {
        Self {
            shared,
            dt,
            handle,
            commands,
        }
    }

    /// Pause another task (or this one)
    pub fn pause(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        self.queue(TaskCommand::Pause(handle))
    }

    /// Resume a paused task
    pub fn resume(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        self.queue(TaskCommand::Resume(handle))
    }

    /// Cancel a task; it is removed at the end of the current tick
    pub fn cancel(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        self.queue(TaskCommand::Cancel(handle))
    }

    /// Change a task's minimum re-run interval
    pub fn set_interval(&mut self, handle: TaskHandle, interval: f32) -> Result<(), SchedulerError> {
        self.queue(TaskCommand::SetInterval(handle, interval))
    }

    fn queue(&mut self, command: TaskCommand) -> Result<(), SchedulerError> {
        self.commands
            .push(command)
            .map_err(|_| SchedulerError::CommandQueueFull)
    }
}

/// A resumable control routine
///
/// `C` is the shared context type, `O` the published result type.
pub trait Routine<C, O> {
    /// Routine name for logging and diagnostics
    fn name(&self) -> &'static str;

    /// Run one iteration and suspend
    fn step(&mut self, cx: &mut StepContext<'_, C>) -> Result<Step<O>, TaskFault>;

    /// Rewind to the beginning after [`Step::Done`]
    fn restart(&mut self);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_queues_commands() {
        let mut shared = 0u8;
        let mut commands = Vec::new();
        let mut cx = StepContext::new(&mut shared, 0.1, TaskHandle(1), &mut commands);

        cx.pause(TaskHandle(2)).unwrap();
        cx.set_interval(TaskHandle(3), 0.5).unwrap();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0], TaskCommand::Pause(TaskHandle(2)));
        assert_eq!(commands[1], TaskCommand::SetInterval(TaskHandle(3), 0.5));
    }

    #[test]
    fn test_context_reports_full_queue() {
        let mut shared = 0u8;
        let mut commands = Vec::new();
        let mut cx = StepContext::new(&mut shared, 0.1, TaskHandle(1), &mut commands);

        for _ in 0..MAX_PENDING_COMMANDS {
            cx.cancel(TaskHandle(2)).unwrap();
        }
        assert_eq!(
            cx.resume(TaskHandle(2)),
            Err(SchedulerError::CommandQueueFull)
        );
    }

    #[test]
    fn test_task_fault_display() {
        let fault = TaskFault::new("sensor offline");
        let mut text: heapless::String<32> = heapless::String::new();
        core::fmt::write(&mut text, format_args!("{}", fault)).unwrap();
        assert_eq!(text.as_str(), "task fault: sensor offline");
    }
}
