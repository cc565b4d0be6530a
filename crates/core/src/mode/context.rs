//! Shared autopilot context
//!
//! Everything the navigation and cruise tasks share lives here and is
//! threaded through every task step. There is no global state.

use heapless::Vec;

use crate::navigation::{CollisionAvoidance, NavMode, NavigationResult, VehicleFrame};
use crate::parameters::{AvoidanceParams, NavigationParams, ParameterStore};
use crate::vehicle::{SensorInputs, VehicleController};

/// Maximum navigation events buffered between drains
pub const MAX_NAV_EVENTS: usize = 8;

/// Speed-hold request from the navigation task to the cruise task
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CruiseRequest {
    target_speed: f32,
    active: bool,
}

impl CruiseRequest {
    /// Ask the cruise task to hold `speed` (m/s)
    pub fn hold(&mut self, speed: f32) {
        self.target_speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
        self.active = true;
    }

    /// Withdraw the request
    pub fn release(&mut self) {
        self.target_speed = 0.0;
        self.active = false;
    }

    pub fn target_speed(&self) -> f32 {
        self.target_speed
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Propulsion command published by the cruise task
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CruiseCommand {
    /// Speed being held (m/s)
    pub target_speed: f32,
    /// Propulsion: -1.0 (full reverse) to 1.0 (full forward)
    pub propulsion: f32,
    /// Hold brake engaged
    pub braking: bool,
}

/// Result published by an autopilot task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutput {
    Navigation(NavigationResult),
    Cruise(CruiseCommand),
}

impl TaskOutput {
    pub fn as_navigation(&self) -> Option<&NavigationResult> {
        match self {
            TaskOutput::Navigation(result) => Some(result),
            _ => None,
        }
    }

    pub fn as_cruise(&self) -> Option<&CruiseCommand> {
        match self {
            TaskOutput::Cruise(command) => Some(command),
            _ => None,
        }
    }
}

/// Why a navigation mode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Autopilot disabled externally
    Disabled,
    /// Operator signalled deceleration
    EmergencyStop,
    /// Route finished with the Stop flight mode
    RouteComplete,
    /// Waypoint list emptied
    WaypointsCleared,
    /// Waypoint list or mission flag now selects another mode
    Reselected,
}

impl ExitReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExitReason::Disabled => "disabled",
            ExitReason::EmergencyStop => "emergency stop",
            ExitReason::RouteComplete => "route complete",
            ExitReason::WaypointsCleared => "waypoints cleared",
            ExitReason::Reselected => "reselected",
        }
    }
}

/// Navigation state change for the host to log
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavEvent {
    /// A mode was entered
    Entered(NavMode),
    /// A mode was left
    Exited(NavMode, ExitReason),
    /// The route wrapped or reversed at its end
    RouteWrapped { patrol: bool },
}

/// State shared by all autopilot tasks
pub struct AutopilotContext<V> {
    /// Vehicle being driven
    pub controller: V,
    /// Sensor state refreshed by the host before each tick
    pub sensors: SensorInputs,
    /// Autopilot enable flag
    pub enabled: bool,
    /// Follow a moving target instead of tracking a single waypoint
    pub basic_mission: bool,
    /// Avoidance engine shared by every mode
    pub avoidance: CollisionAvoidance,
    /// Speed-hold request for the cruise task
    pub cruise: CruiseRequest,
    /// Hold brake request
    pub hold_brake: bool,
    /// Navigation tuning
    pub params: NavigationParams,
    events: Vec<NavEvent, MAX_NAV_EVENTS>,
}

impl<V: VehicleController> AutopilotContext<V> {
    /// Build a context from the parameter store
    pub fn new(controller: V, store: &ParameterStore) -> Self {
        Self::with_params(
            controller,
            NavigationParams::from_store(store),
            AvoidanceParams::from_store(store),
        )
    }

    pub fn with_params(controller: V, params: NavigationParams, avoidance: AvoidanceParams) -> Self {
        Self {
            controller,
            sensors: SensorInputs::default(),
            enabled: false,
            basic_mission: false,
            avoidance: CollisionAvoidance::new(avoidance.to_config()),
            cruise: CruiseRequest::default(),
            hold_brake: false,
            params,
            events: Vec::new(),
        }
    }

    pub fn frame(&self) -> VehicleFrame {
        self.controller.frame()
    }

    /// Cruise speed clipped to the controller's speed limit
    pub fn cruise_speed(&self) -> f32 {
        self.params
            .cruise_speed
            .min(self.controller.speed_limit().max(0.0))
    }

    /// Disable the autopilot and release the cruise request
    pub fn disable(&mut self) {
        self.enabled = false;
        self.cruise.release();
    }

    /// Queue an event; dropped when the buffer is full
    pub fn notify(&mut self, event: NavEvent) {
        let _ = self.events.push(event);
    }

    /// Take all buffered events, oldest first
    pub fn drain_events(&mut self) -> Vec<NavEvent, MAX_NAV_EVENTS> {
        core::mem::take(&mut self.events)
    }
}
