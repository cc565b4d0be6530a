//! Cooperative task scheduler for resumable control routines
//!
//! The host calls [`Scheduler::tick`] on a fixed cadence with the elapsed
//! time. Each registered task owns a [`Routine`] whose `step()` performs one
//! loop iteration and then returns control. Nothing here blocks and nothing
//! preempts: a step runs to its suspension point.
//!
//! # Components
//!
//! - [`routine`]: `Routine` trait, step outcomes and the step context
//! - [`types`]: Handles, errors, events and statistics
//! - [`registry`]: The `Scheduler` itself
//!
//! # Example
//!
//! ```rust
//! use rover_assist_core::scheduler::{Routine, Scheduler, Step, StepContext, TaskFault};
//!
//! struct Counter(u32);
//!
//! impl Routine<u32, u32> for Counter {
//!     fn name(&self) -> &'static str {
//!         "counter"
//!     }
//!
//!     fn step(&mut self, cx: &mut StepContext<'_, u32>) -> Result<Step<u32>, TaskFault> {
//!         self.0 += 1;
//!         *cx.shared += 1;
//!         Ok(Step::Yield(self.0))
//!     }
//!
//!     fn restart(&mut self) {
//!         self.0 = 0;
//!     }
//! }
//!
//! let mut scheduler: Scheduler<u32, u32> = Scheduler::new();
//! let handle = scheduler.register(Counter(0), 0.0, false, false).unwrap();
//! let mut shared = 0;
//! scheduler.tick(&mut shared, 0.02);
//! assert_eq!(scheduler.result(handle), Some(&1));
//! ```

pub mod registry;
pub mod routine;
pub mod types;

pub use registry::{Scheduler, MAX_TASKS};
pub use routine::{Routine, Step, StepContext, TaskCommand, TaskFault, MAX_PENDING_COMMANDS};
pub use types::{SchedulerError, SchedulerEvent, SchedulerStats, TaskHandle, TaskStats};
