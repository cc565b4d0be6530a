//! Vehicle controller capability trait

use heapless::Vec;
use nalgebra::{UnitQuaternion, Vector3};

use crate::navigation::{VehicleFrame, Waypoint};

/// Maximum waypoints a controller holds
pub const MAX_WAYPOINTS: usize = 50;

/// Behavior at the end of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FlightMode {
    /// Loop back to the first waypoint
    #[default]
    Circle,
    /// Reverse and bounce between the endpoints
    Patrol,
    /// Brake and disable the autopilot
    Stop,
}

impl FlightMode {
    /// Get flight mode name for logging and telemetry
    pub fn name(&self) -> &'static str {
        match self {
            FlightMode::Circle => "Circle",
            FlightMode::Patrol => "Patrol",
            FlightMode::Stop => "Stop",
        }
    }
}

/// Capability set of a vehicle the autopilot can drive
pub trait VehicleController {
    /// World position of the vehicle reference point
    fn position(&self) -> Vector3<f32>;

    /// World orientation (body x = forward, y = left, z = up)
    fn orientation(&self) -> UnitQuaternion<f32>;

    /// Maximum speed the autopilot may request (m/s)
    fn speed_limit(&self) -> f32;

    /// Externally supplied waypoint list
    fn waypoints(&self) -> &[Waypoint];

    /// End-of-route behavior
    fn flight_mode(&self) -> FlightMode;

    /// Replace the waypoint list
    ///
    /// Returns the number of waypoints kept (excess entries are dropped).
    fn replace_waypoints(&mut self, waypoints: &[Waypoint]) -> usize;

    /// Current vehicle frame
    fn frame(&self) -> VehicleFrame {
        VehicleFrame::new(self.position(), self.orientation())
    }
}

/// Plain controller backed by fields the host writes each tick
#[derive(Debug, Clone)]
pub struct StandardController {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
    pub speed_limit: f32,
    pub flight_mode: FlightMode,
    waypoints: Vec<Waypoint, MAX_WAYPOINTS>,
}

impl StandardController {
    /// Create a controller at the origin facing +x
    pub fn new(speed_limit: f32) -> Self {
        Self {
            position: Vector3::zeros(),
            orientation: UnitQuaternion::identity(),
            speed_limit,
            flight_mode: FlightMode::default(),
            waypoints: Vec::new(),
        }
    }

    /// Set position and heading (yaw in radians, counter-clockwise from +x)
    pub fn set_pose(&mut self, position: Vector3<f32>, yaw: f32) {
        self.position = position;
        self.orientation = UnitQuaternion::from_euler_angles(0.0, 0.0, yaw);
    }

    /// Append a waypoint, returning `false` when the list is full
    pub fn push_waypoint(&mut self, waypoint: Waypoint) -> bool {
        self.waypoints.push(waypoint).is_ok()
    }

    /// Remove all waypoints
    pub fn clear_waypoints(&mut self) {
        self.waypoints.clear();
    }
}

impl VehicleController for StandardController {
    fn position(&self) -> Vector3<f32> {
        self.position
    }

    fn orientation(&self) -> UnitQuaternion<f32> {
        self.orientation
    }

    fn speed_limit(&self) -> f32 {
        self.speed_limit
    }

    fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    fn flight_mode(&self) -> FlightMode {
        self.flight_mode
    }

    fn replace_waypoints(&mut self, waypoints: &[Waypoint]) -> usize {
        self.waypoints.clear();
        for waypoint in waypoints {
            if self.waypoints.push(waypoint.clone()).is_err() {
                break;
            }
        }
        self.waypoints.len()
    }
}
