//! Navigation type definitions
//!
//! - `NavMode`: Active navigation mode
//! - `NavigationResult`: Snapshot published by the navigation task each cycle

use heapless::String;

use super::waypoint::WAYPOINT_NAME_LEN;

/// Navigation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    /// Autopilot disabled or nothing to navigate to
    #[default]
    Idle,
    /// Steer toward a single live waypoint
    Track,
    /// Trail a moving target through its recent positions
    Follow,
    /// Traverse an ordered waypoint list
    Route,
}

impl NavMode {
    /// Get mode name for logging and telemetry
    pub fn name(&self) -> &'static str {
        match self {
            NavMode::Idle => "Idle",
            NavMode::Track => "Track",
            NavMode::Follow => "Follow",
            NavMode::Route => "Route",
        }
    }
}

/// Output of one navigation cycle
///
/// Reset to defaults at the start of every cycle; read-only to consumers
/// until the next one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NavigationResult {
    pub mode: NavMode,
    /// Steering command: -1.0 (full right) to +1.0 (full left)
    pub steering: f32,
    /// Raw signed steering angle before normalization (radians, +left)
    pub steer_angle: f32,
    /// Label of the active waypoint
    pub waypoint: Option<String<WAYPOINT_NAME_LEN>>,
    /// Number of waypoints in play (route length or trail length)
    pub waypoint_count: usize,
    /// Distance to the active waypoint (meters)
    pub distance: f32,
    /// Speed requested from the cruise task (m/s)
    pub target_speed: f32,
    /// Operator is steering by hand
    pub manual_override: bool,
    /// Hold brake applied
    pub holding: bool,
}
