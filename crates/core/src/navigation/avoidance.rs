//! Collision avoidance engine
//!
//! Turns raw sensor detections into a single blended steering target.
//!
//! - Moving obstacles that converge with the vehicle inside the collision
//!   horizon produce a lateral impulse along the vehicle's right axis,
//!   stronger the closer they are (inverse square).
//! - Static obstacles inside the influence range produce a lateral push, or
//!   a brake-and-lateral blend when nearly dead ahead (inverse distance).
//! - A vehicle already inside an obstacle's bounds is pushed straight out.
//!
//! Impulses build up in an accumulator that persists while obstacles are in
//! view and is cleared when the detection list is empty. A processed
//! obstacle is ignored for a few evaluations (cooldown).

use heapless::index_map::FnvIndexMap;
use heapless::Vec;
use nalgebra::Vector3;

use super::frame::{normalized, VehicleFrame, ZERO_EPSILON_SQ};

/// Maximum obstacles tracked in cooldown
///
/// When full, a new entry evicts the one closest to expiry.
pub const MAX_COOLDOWNS: usize = 32;

/// Accumulator length limit in multiples of `max_avoidance`
pub const ACCUMULATOR_LIMIT: f32 = 3.0;

/// Forward cosine at or above which a static obstacle counts as dead ahead
const AHEAD_COSINE: f32 = 0.9;

/// Forward cosine below which a static obstacle is behind the vehicle
const BESIDE_COSINE: f32 = 0.0;

/// Axis-aligned bounding box in world coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: Vector3<f32>,
    pub max: Vector3<f32>,
}

impl BoundingBox {
    /// Box spanning two opposite corners (in any order)
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// Box centered on `center` extending `half_extents` each way
    pub fn from_center(center: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Strict containment (points on the surface are outside)
    pub fn contains(&self, point: &Vector3<f32>) -> bool {
        (0..3).all(|i| point[i] > self.min[i] && point[i] < self.max[i])
    }

    /// Point of the box closest to `point`
    pub fn closest_point(&self, point: &Vector3<f32>) -> Vector3<f32> {
        point.sup(&self.min).inf(&self.max)
    }
}

/// One obstacle reported by the sensor
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    /// Stable identity across ticks
    pub id: u64,
    pub position: Vector3<f32>,
    /// World velocity (m/s); zero for static obstacles
    pub velocity: Vector3<f32>,
    pub bounds: BoundingBox,
    /// Sensor slot reported nothing
    pub empty: bool,
}

impl Detection {
    /// Static obstacle occupying `bounds`
    pub fn stationary(id: u64, bounds: BoundingBox) -> Self {
        Self {
            id,
            position: bounds.center(),
            velocity: Vector3::zeros(),
            bounds,
            empty: false,
        }
    }

    /// Moving obstacle of the given size
    pub fn moving(id: u64, position: Vector3<f32>, velocity: Vector3<f32>, half_extents: Vector3<f32>) -> Self {
        Self {
            id,
            position,
            velocity,
            bounds: BoundingBox::from_center(position, half_extents),
            empty: false,
        }
    }

    pub fn is_moving(&self) -> bool {
        self.velocity.norm_squared() > ZERO_EPSILON_SQ
    }
}

/// Avoidance tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvoidanceConfig {
    /// Avoidance active; when false the engine returns pure pursuit
    pub enabled: bool,
    /// Magnitude of a full-strength impulse
    pub max_avoidance: f32,
    /// Static obstacles farther than this are ignored (meters)
    pub influence_range: f32,
    /// Distance at or under which impulses reach full strength (meters)
    pub min_distance: f32,
    /// Moving obstacles are ignored beyond this time-to-collision (seconds)
    pub horizon: f32,
    /// Evaluations an obstacle is suppressed after an impulse
    pub cooldown_ticks: u8,
    /// Weight of the accumulator against the normalized pursuit direction
    pub close_range_weight: f32,
}

impl Default for AvoidanceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_avoidance: 1.0,
            influence_range: 15.0,
            min_distance: 2.0,
            horizon: 10.0,
            cooldown_ticks: 5,
            close_range_weight: 0.5,
        }
    }
}

/// Reactive avoidance state shared by all navigation modes
#[derive(Debug, Clone)]
pub struct CollisionAvoidance {
    config: AvoidanceConfig,
    accumulator: Vector3<f32>,
    cooldowns: FnvIndexMap<u64, u8, MAX_COOLDOWNS>,
}

impl CollisionAvoidance {
    pub fn new(config: AvoidanceConfig) -> Self {
        Self {
            config,
            accumulator: Vector3::zeros(),
            cooldowns: FnvIndexMap::new(),
        }
    }

    pub fn config(&self) -> &AvoidanceConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: AvoidanceConfig) {
        self.config = config;
    }

    /// Current accumulated avoidance vector
    pub fn accumulator(&self) -> Vector3<f32> {
        self.accumulator
    }

    /// Remaining cooldown of an obstacle
    pub fn cooldown(&self, id: u64) -> Option<u8> {
        self.cooldowns.get(&id).copied()
    }

    /// Clear the accumulator and every cooldown
    pub fn reset(&mut self) {
        self.accumulator = Vector3::zeros();
        self.cooldowns.clear();
    }

    /// Direction the vehicle should head toward `destination`
    ///
    /// # Arguments
    ///
    /// * `detections` - Sensor detections, `None` when no sensor is fitted
    /// * `frame` - Current vehicle frame
    /// * `velocity` - Vehicle world velocity
    /// * `destination` - World point being pursued
    ///
    /// # Returns
    ///
    /// The horizontal pursuit vector when nothing needs avoiding, otherwise
    /// the normalized pursuit direction plus the weighted accumulator.
    pub fn direction(
        &mut self,
        detections: Option<&[Detection]>,
        frame: &VehicleFrame,
        velocity: &Vector3<f32>,
        destination: &Vector3<f32>,
    ) -> Vector3<f32> {
        let pursuit = frame.horizontal(destination - frame.position);

        if !self.config.enabled {
            return pursuit;
        }
        let Some(detections) = detections else {
            return pursuit;
        };
        if detections.iter().all(|detection| detection.empty) {
            self.reset();
            return pursuit;
        }

        for detection in detections.iter().filter(|detection| !detection.empty) {
            if self.cooldowns.contains_key(&detection.id) {
                continue;
            }

            let impulse = if detection.is_moving() {
                self.moving_impulse(detection, frame, velocity)
            } else {
                self.static_impulse(detection, frame)
            };

            if let Some(impulse) = impulse {
                self.accumulator += impulse;
                self.start_cooldown(detection.id);
            }
        }

        self.decay_cooldowns();
        self.limit_accumulator();

        if self.accumulator.norm_squared() > ZERO_EPSILON_SQ {
            let heading = normalized(&pursuit).unwrap_or_else(Vector3::zeros);
            heading + self.accumulator * self.config.close_range_weight
        } else {
            pursuit
        }
    }

    fn moving_impulse(
        &self,
        detection: &Detection,
        frame: &VehicleFrame,
        velocity: &Vector3<f32>,
    ) -> Option<Vector3<f32>> {
        // Only obstacles heading against the vehicle's motion count
        if detection.velocity.dot(velocity) >= 0.0 {
            return None;
        }

        let offset = frame.horizontal(detection.position - frame.position);
        let distance = offset.norm();
        if distance > 0.0 {
            let relative = detection.velocity - velocity;
            let closing_speed = -relative.dot(&offset) / distance;
            if closing_speed <= 0.0 || distance / closing_speed >= self.config.horizon {
                return None;
            }
        }

        let min_sq = self.config.min_distance * self.config.min_distance;
        let magnitude = self.config.max_avoidance * min_sq / (distance * distance).max(min_sq);
        Some(self.away_from(&offset, frame) * magnitude)
    }

    fn static_impulse(&self, detection: &Detection, frame: &VehicleFrame) -> Option<Vector3<f32>> {
        let bounds = &detection.bounds;

        if bounds.contains(&frame.position) {
            let outward = frame.horizontal(frame.position - bounds.center());
            let direction = normalized(&outward).unwrap_or_else(|| frame.backward());
            return Some(direction * self.config.max_avoidance);
        }

        let offset = frame.horizontal(bounds.closest_point(&frame.position) - frame.position);
        let distance = offset.norm();
        if distance > self.config.influence_range {
            return None;
        }

        let clamped = distance
            .max(self.config.min_distance)
            .min(self.config.influence_range.max(self.config.min_distance));
        let magnitude = self.config.max_avoidance * self.config.min_distance / clamped;

        let cosine = match normalized(&offset) {
            Some(unit) => unit.dot(&frame.forward()),
            // Touching the surface: treat as dead ahead
            None => 1.0,
        };
        let lateral = self.away_from(&offset, frame);

        if cosine >= AHEAD_COSINE {
            let blend = normalized(&(frame.backward() + lateral)).unwrap_or(lateral);
            Some(blend * magnitude)
        } else if cosine >= BESIDE_COSINE {
            Some(lateral * magnitude)
        } else {
            None
        }
    }

    /// Unit lateral vector pointing away from the side `offset` lies on
    fn away_from(&self, offset: &Vector3<f32>, frame: &VehicleFrame) -> Vector3<f32> {
        let right = frame.right();
        // Obstacle on the left (or dead ahead) pushes right
        if offset.dot(&right) <= 0.0 {
            right
        } else {
            -right
        }
    }

    fn start_cooldown(&mut self, id: u64) {
        if self.cooldowns.len() >= MAX_COOLDOWNS {
            let expiring = self
                .cooldowns
                .iter()
                .min_by_key(|(_, remaining)| **remaining)
                .map(|(id, _)| *id);
            if let Some(expiring) = expiring {
                self.cooldowns.remove(&expiring);
            }
        }
        // Capacity was freed above
        let _ = self.cooldowns.insert(id, self.config.cooldown_ticks);
    }

    fn decay_cooldowns(&mut self) {
        let mut expired: Vec<u64, MAX_COOLDOWNS> = Vec::new();
        for (id, remaining) in self.cooldowns.iter_mut() {
            *remaining = remaining.saturating_sub(1);
            if *remaining == 0 {
                let _ = expired.push(*id);
            }
        }
        for id in expired {
            self.cooldowns.remove(&id);
        }
    }

    fn limit_accumulator(&mut self) {
        let limit = ACCUMULATOR_LIMIT * self.config.max_avoidance;
        let length = self.accumulator.norm();
        if !length.is_finite() {
            self.accumulator = Vector3::zeros();
        } else if length > limit {
            self.accumulator *= limit / length;
        }
    }
}

impl Default for CollisionAvoidance {
    fn default() -> Self {
        Self::new(AvoidanceConfig::default())
    }
}
