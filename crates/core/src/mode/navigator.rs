//! Navigation task
//!
//! Selects, enters, updates and exits the navigation modes. Runs as a
//! scheduler routine; each step is one navigation cycle.
//!
//! # Selection
//!
//! | Condition | Mode |
//! |-----------|------|
//! | Disabled or no waypoints | Idle |
//! | More than one waypoint | Route |
//! | Basic mission flag set | Follow |
//! | Otherwise | Track |
//!
//! When the selection changes while a mode is active (waypoints added or
//! removed, mission flag toggled), the active mode is exited and the new one
//! entered on the same cycle.

use super::context::{AutopilotContext, ExitReason, NavEvent, TaskOutput};
use super::follow::FollowMode;
use super::route::RouteMode;
use super::track::TrackMode;
use super::traits::{Mode, ModeStatus};
use crate::navigation::{NavMode, NavigationResult};
use crate::parameters::NavigationParams;
use crate::scheduler::{Routine, Step, StepContext, TaskFault};
use crate::vehicle::VehicleController;

/// Currently running navigation mode
enum ActiveMode {
    Track(TrackMode),
    Follow(FollowMode),
    Route(RouteMode),
}

impl ActiveMode {
    /// Mode the context currently calls for, `Idle` when none should run
    fn select<V: VehicleController>(cx: &AutopilotContext<V>) -> NavMode {
        let count = cx.controller.waypoints().len();
        if !cx.enabled || count == 0 {
            NavMode::Idle
        } else if count > 1 {
            NavMode::Route
        } else if cx.basic_mission {
            NavMode::Follow
        } else {
            NavMode::Track
        }
    }

    fn build(kind: NavMode, params: &NavigationParams) -> Option<Self> {
        match kind {
            NavMode::Idle => None,
            NavMode::Track => Some(ActiveMode::Track(TrackMode::new(params))),
            NavMode::Follow => Some(ActiveMode::Follow(FollowMode::new(params))),
            NavMode::Route => Some(ActiveMode::Route(RouteMode::new(params))),
        }
    }

    fn kind(&self) -> NavMode {
        match self {
            ActiveMode::Track(_) => NavMode::Track,
            ActiveMode::Follow(_) => NavMode::Follow,
            ActiveMode::Route(_) => NavMode::Route,
        }
    }

    fn as_mode<V: VehicleController>(&mut self) -> &mut dyn Mode<V> {
        match self {
            ActiveMode::Track(mode) => mode,
            ActiveMode::Follow(mode) => mode,
            ActiveMode::Route(mode) => mode,
        }
    }
}

/// Navigation state machine routine
#[derive(Default)]
pub struct Navigator {
    active: Option<ActiveMode>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode currently running
    pub fn mode(&self) -> NavMode {
        self.active.as_ref().map_or(NavMode::Idle, ActiveMode::kind)
    }

    fn leave<V: VehicleController>(&mut self, cx: &mut AutopilotContext<V>, reason: ExitReason) {
        if let Some(mut active) = self.active.take() {
            let kind = active.kind();
            active.as_mode::<V>().exit(cx);
            cx.notify(NavEvent::Exited(kind, reason));
        }
    }
}

impl<V: VehicleController> Routine<AutopilotContext<V>, TaskOutput> for Navigator {
    fn name(&self) -> &'static str {
        "navigation"
    }

    fn step(
        &mut self,
        step: &mut StepContext<'_, AutopilotContext<V>>,
    ) -> Result<Step<TaskOutput>, TaskFault> {
        let dt = step.dt;
        let cx = &mut *step.shared;
        let mut result = NavigationResult::default();

        if !cx.frame().is_finite() {
            return Err(TaskFault::new("non-finite vehicle pose"));
        }

        let wanted = ActiveMode::select(cx);
        if wanted == NavMode::Idle {
            let reason = if cx.enabled {
                ExitReason::WaypointsCleared
            } else {
                ExitReason::Disabled
            };
            self.leave(cx, reason);
            cx.cruise.release();
            return Ok(Step::Yield(TaskOutput::Navigation(result)));
        }

        if self.mode() != wanted && self.active.is_some() {
            self.leave(cx, ExitReason::Reselected);
        }

        if self.active.is_none() {
            let Some(mut mode) = ActiveMode::build(wanted, &cx.params) else {
                return Ok(Step::Suspend);
            };
            mode.as_mode::<V>().enter(cx).map_err(TaskFault::new)?;
            cx.notify(NavEvent::Entered(wanted));
            self.active = Some(mode);
        }

        let Some(active) = self.active.as_mut() else {
            return Ok(Step::Suspend);
        };

        match active.as_mode::<V>().update(cx, dt, &mut result) {
            ModeStatus::Running => Ok(Step::Yield(TaskOutput::Navigation(result))),
            ModeStatus::Finished(reason) => {
                self.leave(cx, reason);
                cx.cruise.release();
                Ok(Step::Done)
            }
        }
    }

    fn restart(&mut self) {
        self.active = None;
    }
}
