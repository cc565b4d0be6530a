//! Software-in-the-loop harness for the rover assist autopilot.
//!
//! A kinematic bicycle-model rover, an obstacle world with a range sensor,
//! and a closed-loop [`Simulation`] that drives the real [`Autopilot`]
//! exactly as a host actuation loop would.
//!
//! [`Autopilot`]: rover_assist::Autopilot

pub mod error;
pub mod harness;
pub mod vehicle;
pub mod world;

pub use error::SimulatorError;
pub use harness::{Simulation, SimulationConfig, Telemetry};
pub use vehicle::{ActuatorCommands, KinematicRover, RoverConfig};
pub use world::{Obstacle, ObstacleWorld};
