//! Vehicle frame of reference
//!
//! Body axes follow the ground-vehicle convention used throughout the
//! autopilot: x = forward, y = left, z = up. A positive steering angle
//! turns left.

use libm::{atan2f, sqrtf};
use nalgebra::{UnitQuaternion, Vector3};

/// Squared length under which a vector is treated as zero
pub(crate) const ZERO_EPSILON_SQ: f32 = 1.0e-10;

/// Position and orientation of the vehicle for one evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VehicleFrame {
    pub position: Vector3<f32>,
    pub orientation: UnitQuaternion<f32>,
}

impl VehicleFrame {
    pub fn new(position: Vector3<f32>, orientation: UnitQuaternion<f32>) -> Self {
        Self {
            position,
            orientation,
        }
    }

    pub fn forward(&self) -> Vector3<f32> {
        self.orientation * Vector3::x()
    }

    pub fn backward(&self) -> Vector3<f32> {
        -self.forward()
    }

    pub fn left(&self) -> Vector3<f32> {
        self.orientation * Vector3::y()
    }

    pub fn right(&self) -> Vector3<f32> {
        -self.left()
    }

    pub fn up(&self) -> Vector3<f32> {
        self.orientation * Vector3::z()
    }

    /// Remove the component along the vehicle's up axis
    pub fn horizontal(&self, v: Vector3<f32>) -> Vector3<f32> {
        let up = self.up();
        v - up * v.dot(&up)
    }

    /// Signed steering angle toward `direction` (radians, +left)
    ///
    /// Returns 0.0 for a zero-length or non-finite direction.
    pub fn steering_angle(&self, direction: &Vector3<f32>) -> f32 {
        let Some(unit) = normalized(direction) else {
            return 0.0;
        };
        let forward = unit.dot(&self.forward());
        let left = unit.dot(&self.left());
        if forward == 0.0 && left == 0.0 {
            return 0.0;
        }
        atan2f(left, forward)
    }

    /// Whether position and orientation are usable
    pub fn is_finite(&self) -> bool {
        self.position.iter().all(|c| c.is_finite())
            && self.orientation.coords.iter().all(|c| c.is_finite())
    }
}

/// Unit vector along `v`, or `None` when `v` is (near) zero or not finite
pub fn normalized(v: &Vector3<f32>) -> Option<Vector3<f32>> {
    let length_sq = v.norm_squared();
    if !length_sq.is_finite() || length_sq <= ZERO_EPSILON_SQ {
        return None;
    }
    Some(v / sqrtf(length_sq))
}

/// Horizontal distance between two world points
pub fn planar_distance(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    sqrtf(dx * dx + dy * dy)
}
