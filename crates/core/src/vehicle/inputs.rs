//! Per-tick inputs from the I/O layer

use heapless::Vec;
use nalgebra::Vector3;

use crate::navigation::Detection;

/// Maximum sensor detections per tick
pub const MAX_DETECTIONS: usize = 16;

/// Operator manual control axes (each -1.0 to 1.0)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ManualInput {
    /// Forward (+) / back (-)
    pub forward: f32,
    /// Right (+) / left (-)
    pub lateral: f32,
    /// Up (+) / down (-)
    pub vertical: f32,
}

impl ManualInput {
    /// Operator signals deceleration intent
    pub fn wants_stop(&self) -> bool {
        self.forward < 0.0
    }

    /// Operator is steering by hand
    pub fn is_steering(&self) -> bool {
        self.lateral != 0.0 && self.lateral.is_finite()
    }
}

/// Sensor state sampled by the host before each tick
#[derive(Debug, Clone, Default)]
pub struct SensorInputs {
    /// World linear velocity (m/s)
    pub velocity: Vector3<f32>,
    /// Operator input
    pub manual: ManualInput,
    /// Obstacle detections; `None` when no sensor is fitted
    pub detections: Option<Vec<Detection, MAX_DETECTIONS>>,
}

impl SensorInputs {
    /// Ground speed (horizontal magnitude of velocity)
    pub fn speed(&self) -> f32 {
        libm::sqrtf(self.velocity.x * self.velocity.x + self.velocity.y * self.velocity.y)
    }

    /// Fit an obstacle sensor with an empty detection list
    pub fn with_sensor(mut self) -> Self {
        self.detections = Some(Vec::new());
        self
    }
}
