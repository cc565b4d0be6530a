//! Obstacle world and range sensor.
//!
//! Obstacles are axis-aligned boxes, optionally moving at constant velocity.
//! The simulated range sensor reports every obstacle whose nearest surface
//! point lies within `sensor_range`, nearest first, up to the detection
//! capacity of [`SensorInputs`](rover_assist_core::vehicle::SensorInputs).

use heapless::Vec as HVec;
use nalgebra::Vector3;
use rover_assist_core::navigation::{BoundingBox, Detection};
use rover_assist_core::vehicle::MAX_DETECTIONS;

use crate::error::SimulatorError;

/// Maximum obstacles in one world.
pub const MAX_OBSTACLES: usize = 64;

/// A box obstacle.
#[derive(Debug, Clone, PartialEq)]
pub struct Obstacle {
    pub id: u64,
    pub center: Vector3<f32>,
    pub half_extents: Vector3<f32>,
    /// World velocity in m/s; zero for static obstacles.
    pub velocity: Vector3<f32>,
}

impl Obstacle {
    pub fn fixed(id: u64, center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            id,
            center,
            half_extents,
            velocity: Vector3::zeros(),
        }
    }

    pub fn moving(
        id: u64,
        center: Vector3<f32>,
        half_extents: Vector3<f32>,
        velocity: Vector3<f32>,
    ) -> Self {
        Self {
            id,
            center,
            half_extents,
            velocity,
        }
    }

    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::from_center(self.center, self.half_extents)
    }

    fn detection(&self) -> Detection {
        if self.velocity == Vector3::zeros() {
            Detection::stationary(self.id, self.bounds())
        } else {
            Detection::moving(self.id, self.center, self.velocity, self.half_extents)
        }
    }
}

/// Set of obstacles plus the sensor that observes them.
#[derive(Debug, Clone)]
pub struct ObstacleWorld {
    obstacles: Vec<Obstacle>,
    sensor_range: f32,
}

impl ObstacleWorld {
    pub fn new(sensor_range: f32) -> Self {
        Self {
            obstacles: Vec::new(),
            sensor_range,
        }
    }

    pub fn add(&mut self, obstacle: Obstacle) -> Result<(), SimulatorError> {
        if self.obstacles.len() >= MAX_OBSTACLES {
            return Err(SimulatorError::TooManyObstacles(MAX_OBSTACLES));
        }
        self.obstacles.push(obstacle);
        Ok(())
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }

    /// Advance moving obstacles.
    pub fn step(&mut self, dt: f32) {
        for obstacle in &mut self.obstacles {
            obstacle.center += obstacle.velocity * dt;
        }
    }

    /// `true` if `point` is inside any obstacle.
    pub fn collides(&self, point: &Vector3<f32>) -> bool {
        self.obstacles.iter().any(|o| o.bounds().contains(point))
    }

    /// Horizontal distance from `point` to the nearest obstacle surface.
    pub fn clearance(&self, point: &Vector3<f32>) -> Option<f32> {
        self.obstacles
            .iter()
            .map(|o| surface_distance(o, point))
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Sense obstacles around `position`, nearest first.
    pub fn detect(&self, position: &Vector3<f32>) -> HVec<Detection, MAX_DETECTIONS> {
        let mut in_range: Vec<(f32, &Obstacle)> = self
            .obstacles
            .iter()
            .map(|o| (surface_distance(o, position), o))
            .filter(|(distance, _)| *distance <= self.sensor_range)
            .collect();
        in_range.sort_by(|a, b| a.0.total_cmp(&b.0));

        in_range
            .into_iter()
            .take(MAX_DETECTIONS)
            .map(|(_, o)| o.detection())
            .collect()
    }
}

fn surface_distance(obstacle: &Obstacle, point: &Vector3<f32>) -> f32 {
    let closest = obstacle.bounds().closest_point(point);
    let offset = closest - point;
    (offset.x * offset.x + offset.y * offset.y).sqrt()
}
