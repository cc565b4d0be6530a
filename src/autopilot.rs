//! Autopilot runner
//!
//! Host-facing owner of the scheduler and the shared autopilot context.
//!
//! ## Responsibilities
//!
//! - Derive the tick delta from host timestamps
//! - Tick the scheduler (navigation + cruise tasks)
//! - Log task faults and mode transitions, mirror them to the status log
//! - Sample the route recorder
//! - Expose the published snapshots to the actuation loop
//!
//! ## Task order
//!
//! Navigation is registered before cruise. Tasks run in reverse registration
//! order, so within one tick the cruise task acts on the speed request the
//! navigation task made on its previous cycle.

use core::fmt;

use rover_assist_core::mode::{
    AutopilotContext, CruiseCommand, CruiseControl, ExitReason, NavEvent, Navigator, TaskOutput,
};
use rover_assist_core::navigation::{NavMode, NavigationResult, Waypoint};
use rover_assist_core::parameters::ParameterStore;
use rover_assist_core::scheduler::{
    Routine, Scheduler, SchedulerError, SchedulerEvent, TaskHandle,
};
use rover_assist_core::vehicle::{SensorInputs, VehicleController};

use crate::core::log_buffer::{LogLevel, StatusLog};
use crate::recorder::RouteRecorder;

/// Minimum navigation task period (seconds)
pub const NAV_INTERVAL: f32 = 0.05;

/// Cruise task period (seconds); runs every tick
pub const CRUISE_INTERVAL: f32 = 0.0;

/// Delta assumed for the first update (50 Hz)
const FIRST_UPDATE_DT: f32 = 0.02;

/// Autopilot setup errors
#[derive(Debug, thiserror::Error)]
pub enum AutopilotError {
    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),
}

/// Scheduler-driven autopilot for one vehicle
pub struct Autopilot<V: VehicleController> {
    scheduler: Scheduler<AutopilotContext<V>, TaskOutput>,
    context: AutopilotContext<V>,
    navigation: TaskHandle,
    cruise: TaskHandle,
    /// Last update timestamp (microseconds)
    last_update_us: Option<u64>,
    /// Mode reported by the last transition
    mode: NavMode,
    status: StatusLog,
    recorder: RouteRecorder,
}

impl<V: VehicleController> Autopilot<V> {
    /// Build the context from `store` and register the navigation and cruise tasks
    pub fn new(controller: V, store: &ParameterStore) -> Result<Self, AutopilotError> {
        let context = AutopilotContext::new(controller, store);
        let mut scheduler = Scheduler::new();
        let navigation = scheduler.register(Navigator::new(), NAV_INTERVAL, false, false)?;
        let cruise = scheduler.register(
            CruiseControl::new(&context.params),
            CRUISE_INTERVAL,
            false,
            false,
        )?;

        Ok(Self {
            scheduler,
            context,
            navigation,
            cruise,
            last_update_us: None,
            mode: NavMode::Idle,
            status: StatusLog::new(),
            recorder: RouteRecorder::new(),
        })
    }

    /// Advance using a host timestamp (microseconds)
    ///
    /// The first call assumes 20 ms have elapsed.
    pub fn update(&mut self, now_us: u64) {
        let dt = match self.last_update_us {
            Some(last_us) => now_us.saturating_sub(last_us) as f32 / 1_000_000.0,
            None => FIRST_UPDATE_DT,
        };
        self.last_update_us = Some(now_us);
        self.tick(dt);
    }

    /// Advance by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        let events = self.scheduler.tick(&mut self.context, dt);
        for event in events {
            self.report_task_event(event);
        }
        for event in self.context.drain_events() {
            self.report_nav_event(event);
        }

        if self.recorder.is_recording() {
            let now = self.scheduler.stats().uptime_s;
            let position = self.context.controller.position();
            if let Some(_point) = self.recorder.sample(&position, now) {
                crate::log_debug!("Recorded waypoint {}", _point.name.as_str());
            }
        }
    }

    fn report_task_event(&mut self, event: SchedulerEvent) {
        match event {
            SchedulerEvent::Faulted { name, reason, .. } => {
                crate::log_warn!("Task {} faulted: {}", name, reason);
                self.report(LogLevel::Warn, format_args!("{} fault: {}", name, reason));
            }
            SchedulerEvent::Completed { name: _name, .. } => {
                crate::log_debug!("Task {} completed", _name);
            }
            SchedulerEvent::Restarted { name: _name, .. } => {
                crate::log_debug!("Task {} restarted", _name);
            }
        }
    }

    fn report_nav_event(&mut self, event: NavEvent) {
        match event {
            NavEvent::Entered(mode) => {
                crate::log_info!("Mode transition: {} -> {}", self.mode.name(), mode.name());
                self.mode = mode;
                self.report(LogLevel::Info, format_args!("Autopilot: {}", mode.name()));
            }
            NavEvent::Exited(mode, reason) => {
                crate::log_info!("Mode {} exited: {}", mode.name(), reason.as_str());
                self.mode = NavMode::Idle;
                let level = match reason {
                    ExitReason::Reselected => return,
                    ExitReason::EmergencyStop => LogLevel::Warn,
                    _ => LogLevel::Info,
                };
                self.report(level, format_args!("{} ended: {}", mode.name(), reason.as_str()));
            }
            NavEvent::RouteWrapped { patrol } => {
                let text = if patrol { "Route reversed" } else { "Route restarted" };
                crate::log_debug!("{}", text);
                self.report(LogLevel::Info, format_args!("{}", text));
            }
        }
    }

    /// Append an operator-facing status line
    pub fn report(&mut self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.status.push(level, args);
    }

    /// Latest navigation snapshot
    pub fn navigation(&self) -> Option<&NavigationResult> {
        self.scheduler
            .result(self.navigation)
            .and_then(TaskOutput::as_navigation)
    }

    /// Latest cruise snapshot
    pub fn cruise(&self) -> Option<&CruiseCommand> {
        self.scheduler
            .result(self.cruise)
            .and_then(TaskOutput::as_cruise)
    }

    /// Mode reported by the last transition
    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.context.enabled {
            return;
        }
        if enabled {
            self.context.enabled = true;
        } else {
            self.context.disable();
        }
        crate::log_info!("Autopilot {}", if enabled { "enabled" } else { "disabled" });
    }

    pub fn is_enabled(&self) -> bool {
        self.context.enabled
    }

    /// Follow a moving target instead of tracking a single waypoint
    pub fn set_basic_mission(&mut self, basic: bool) {
        self.context.basic_mission = basic;
    }

    pub fn is_basic_mission(&self) -> bool {
        self.context.basic_mission
    }

    /// Hold brake currently requested
    pub fn hold_brake(&self) -> bool {
        self.context.hold_brake
    }

    /// Replace the controller's waypoint list, returning how many were kept
    pub fn load_waypoints(&mut self, waypoints: &[Waypoint]) -> usize {
        self.context.controller.replace_waypoints(waypoints)
    }

    /// Register an extra task sharing the autopilot context
    pub fn register_task<R>(&mut self, routine: R, interval: f32) -> Result<TaskHandle, AutopilotError>
    where
        R: Routine<AutopilotContext<V>, TaskOutput> + 'static,
    {
        Ok(self.scheduler.register(routine, interval, false, false)?)
    }

    pub fn scheduler(&self) -> &Scheduler<AutopilotContext<V>, TaskOutput> {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut Scheduler<AutopilotContext<V>, TaskOutput> {
        &mut self.scheduler
    }

    pub fn navigation_task(&self) -> TaskHandle {
        self.navigation
    }

    pub fn cruise_task(&self) -> TaskHandle {
        self.cruise
    }

    pub fn context(&self) -> &AutopilotContext<V> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut AutopilotContext<V> {
        &mut self.context
    }

    pub fn controller(&self) -> &V {
        &self.context.controller
    }

    pub fn controller_mut(&mut self) -> &mut V {
        &mut self.context.controller
    }

    /// Sensor state read by the next tick
    pub fn sensors_mut(&mut self) -> &mut SensorInputs {
        &mut self.context.sensors
    }

    pub fn status_log(&self) -> &StatusLog {
        &self.status
    }

    pub fn status_log_mut(&mut self) -> &mut StatusLog {
        &mut self.status
    }

    pub fn recorder(&self) -> &RouteRecorder {
        &self.recorder
    }

    pub fn recorder_mut(&mut self) -> &mut RouteRecorder {
        &mut self.recorder
    }
}
