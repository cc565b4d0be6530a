//! Task registry and tick loop
//!
//! The scheduler exclusively owns its tasks. Tasks are identified by
//! [`TaskHandle`]s that stay valid while other tasks come and go.
//!
//! # Tick semantics
//!
//! 1. Tasks are visited in reverse registration order
//! 2. Paused tasks are skipped and accumulate no time
//! 3. Elapsed time is added to each task; tasks below their interval wait
//! 4. A due task has its result cleared, its timer reset, and is stepped
//! 5. A faulting step is reported and retried on the next due cycle
//!
//! Commands queued by a step (pause, resume, cancel, interval) are applied
//! right after that step. Cancelled and completed one-shot tasks are swept
//! at the end of the tick.

use alloc::boxed::Box;
use heapless::Vec;

use super::routine::{Routine, Step, StepContext, TaskCommand};
use super::types::{SchedulerError, SchedulerEvent, SchedulerStats, TaskHandle, TaskStats};

/// Maximum number of registered tasks
pub const MAX_TASKS: usize = 16;

struct Task<C, O> {
    handle: TaskHandle,
    routine: Box<dyn Routine<C, O>>,
    interval: f32,
    since_last_run: f32,
    result: Option<O>,
    paused: bool,
    one_shot: bool,
    retired: bool,
    stats: TaskStats,
}

/// Cooperative scheduler over shared context `C` publishing results `O`
pub struct Scheduler<C, O> {
    tasks: Vec<Task<C, O>, MAX_TASKS>,
    next_id: u32,
    stats: SchedulerStats,
}

impl<C, O> Scheduler<C, O> {
    /// Create an empty scheduler
    pub fn new() -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            stats: SchedulerStats::default(),
        }
    }

    /// Register a routine
    ///
    /// # Arguments
    ///
    /// * `routine` - Routine to drive
    /// * `interval` - Minimum seconds between resumptions (0 = every tick)
    /// * `paused` - Register in the paused state
    /// * `one_shot` - Remove the task once its routine reports `Done`
    pub fn register<R>(
        &mut self,
        routine: R,
        interval: f32,
        paused: bool,
        one_shot: bool,
    ) -> Result<TaskHandle, SchedulerError>
    where
        R: Routine<C, O> + 'static,
    {
        self.register_boxed(Box::new(routine), interval, paused, one_shot)
    }

    /// Register an already boxed routine
    pub fn register_boxed(
        &mut self,
        routine: Box<dyn Routine<C, O>>,
        interval: f32,
        paused: bool,
        one_shot: bool,
    ) -> Result<TaskHandle, SchedulerError> {
        validate_interval(interval)?;

        let handle = TaskHandle(self.next_id);
        let task = Task {
            handle,
            routine,
            interval,
            since_last_run: 0.0,
            result: None,
            paused,
            one_shot,
            retired: false,
            stats: TaskStats::default(),
        };
        self.tasks
            .push(task)
            .map_err(|_| SchedulerError::RegistryFull)?;
        self.next_id = self.next_id.wrapping_add(1);
        Ok(handle)
    }

    /// Advance all due tasks by one tick
    ///
    /// Negative or non-finite `elapsed` is treated as zero.
    ///
    /// # Returns
    ///
    /// Faults and completions observed during this tick
    pub fn tick(&mut self, shared: &mut C, elapsed: f32) -> Vec<SchedulerEvent, MAX_TASKS> {
        let elapsed = if elapsed.is_finite() && elapsed > 0.0 {
            elapsed
        } else {
            0.0
        };
        self.stats.ticks = self.stats.ticks.saturating_add(1);
        self.stats.uptime_s += elapsed;

        let mut events = Vec::new();

        for index in (0..self.tasks.len()).rev() {
            let mut commands = Vec::new();

            {
                let task = &mut self.tasks[index];
                if task.paused || task.retired {
                    continue;
                }

                task.since_last_run += elapsed;
                if task.since_last_run < task.interval {
                    continue;
                }

                let dt = task.since_last_run;
                task.since_last_run = 0.0;
                task.result = None;
                task.stats.record_run(dt);

                let outcome = {
                    let mut cx = StepContext::new(&mut *shared, dt, task.handle, &mut commands);
                    task.routine.step(&mut cx)
                };

                let name = task.routine.name();
                let event = match outcome {
                    Ok(Step::Yield(value)) => {
                        task.result = Some(value);
                        None
                    }
                    Ok(Step::Suspend) => None,
                    Ok(Step::Done) => {
                        task.stats.record_completion();
                        if task.one_shot {
                            task.retired = true;
                            Some(SchedulerEvent::Completed {
                                handle: task.handle,
                                name,
                            })
                        } else {
                            task.routine.restart();
                            Some(SchedulerEvent::Restarted {
                                handle: task.handle,
                                name,
                            })
                        }
                    }
                    Err(fault) => {
                        task.stats.record_fault();
                        self.stats.total_faults = self.stats.total_faults.saturating_add(1);
                        Some(SchedulerEvent::Faulted {
                            handle: task.handle,
                            name,
                            reason: fault.reason,
                        })
                    }
                };

                if let Some(event) = event {
                    // One event per task per tick, so this never overflows
                    let _ = events.push(event);
                }
            }

            for command in commands {
                self.apply(command);
            }
        }

        self.tasks.retain(|task| !task.retired);
        events
    }

    /// Stop resuming a task
    pub fn pause(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        let index = self.index_of(handle)?;
        self.tasks[index].paused = true;
        Ok(())
    }

    /// Resume a paused task
    pub fn resume(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        let index = self.index_of(handle)?;
        self.tasks[index].paused = false;
        Ok(())
    }

    /// Remove a task immediately
    pub fn cancel(&mut self, handle: TaskHandle) -> Result<(), SchedulerError> {
        let index = self.index_of(handle)?;
        self.tasks.remove(index);
        Ok(())
    }

    /// Change a task's minimum re-run interval
    pub fn set_interval(&mut self, handle: TaskHandle, interval: f32) -> Result<(), SchedulerError> {
        validate_interval(interval)?;
        let index = self.index_of(handle)?;
        self.tasks[index].interval = interval;
        Ok(())
    }

    /// Last published result of a task
    pub fn result(&self, handle: TaskHandle) -> Option<&O> {
        let index = self.index_of(handle).ok()?;
        self.tasks[index].result.as_ref()
    }

    /// Whether the task is paused (`None` if unknown)
    pub fn is_paused(&self, handle: TaskHandle) -> Option<bool> {
        let index = self.index_of(handle).ok()?;
        Some(self.tasks[index].paused)
    }

    /// Whether a task is registered under the handle
    pub fn contains(&self, handle: TaskHandle) -> bool {
        self.index_of(handle).is_ok()
    }

    /// Statistics of a single task
    pub fn task_stats(&self, handle: TaskHandle) -> Option<TaskStats> {
        let index = self.index_of(handle).ok()?;
        Some(self.tasks[index].stats)
    }

    /// Name of a task's routine
    pub fn task_name(&self, handle: TaskHandle) -> Option<&'static str> {
        let index = self.index_of(handle).ok()?;
        Some(self.tasks[index].routine.name())
    }

    /// Global statistics
    pub fn stats(&self) -> SchedulerStats {
        self.stats
    }

    /// Number of registered tasks
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Check if no task is registered
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    fn apply(&mut self, command: TaskCommand) {
        // Commands naming a task that is already gone are dropped
        let _ = match command {
            TaskCommand::Pause(handle) => self.pause(handle),
            TaskCommand::Resume(handle) => self.resume(handle),
            TaskCommand::SetInterval(handle, interval) => self.set_interval(handle, interval),
            TaskCommand::Cancel(handle) => self.index_of(handle).map(|index| {
                self.tasks[index].retired = true;
            }),
        };
    }

    fn index_of(&self, handle: TaskHandle) -> Result<usize, SchedulerError> {
        self.tasks
            .iter()
            .position(|task| task.handle == handle && !task.retired)
            .ok_or(SchedulerError::UnknownTask(handle))
    }
}

impl<C, O> Default for Scheduler<C, O> {
    fn default() -> Self {
        Self::new()
    }
}

fn validate_interval(interval: f32) -> Result<(), SchedulerError> {
    if interval.is_finite() && interval >= 0.0 {
        Ok(())
    } else {
        Err(SchedulerError::InvalidInterval)
    }
}
