//! Navigation building blocks
//!
//! Geometry and state shared by every navigation mode.
//!
//! # Components
//!
//! - [`frame`]: Vehicle frame axes and steering angle
//! - [`waypoint`]: Waypoints and the bounded trailing queue
//! - [`avoidance`]: Collision avoidance engine
//! - [`types`]: Mode enum and the published result snapshot

pub mod avoidance;
pub mod frame;
pub mod types;
pub mod waypoint;

pub use avoidance::{AvoidanceConfig, BoundingBox, CollisionAvoidance, Detection, MAX_COOLDOWNS};
pub use frame::{normalized, planar_distance, VehicleFrame};
pub use types::{NavMode, NavigationResult};
pub use waypoint::{Waypoint, WaypointQueue, WAYPOINT_NAME_LEN};
