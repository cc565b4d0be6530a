//! Vehicle capability interface and per-tick inputs
//!
//! The autopilot never type-tests the vehicle it drives. A concrete
//! controller implementing [`VehicleController`] is chosen once as the
//! autopilot's type parameter; the host refreshes [`SensorInputs`] before
//! each tick.

mod controller;
mod inputs;

pub use controller::{FlightMode, StandardController, VehicleController, MAX_WAYPOINTS};
pub use inputs::{ManualInput, SensorInputs, MAX_DETECTIONS};
