//! Collision Avoidance Parameter Definitions
//!
//! # Parameters
//!
//! - `OA_ENABLE` - Enable sensor-based avoidance
//! - `OA_MAX` - Magnitude of a full avoidance impulse
//! - `OA_RANGE` - Influence range of static obstacles (meters)
//! - `OA_MIN_DIST` - Distance at which an impulse reaches full magnitude (meters)
//! - `OA_HORIZON` - Time-to-collision horizon for moving obstacles (seconds)
//! - `OA_COOLDOWN` - Evaluations an obstacle is ignored after an impulse
//! - `OA_WEIGHT` - Weight of the avoidance accumulator against the pursuit direction

use super::error::ParameterError;
use super::storage::{load_bool, load_float, ParamFlags, ParamValue, ParameterStore};
use crate::navigation::AvoidanceConfig;

const DEFAULT_ENABLE: bool = true;
const DEFAULT_MAX: f32 = 1.0;
const DEFAULT_RANGE: f32 = 15.0;
const DEFAULT_MIN_DIST: f32 = 2.0;
const DEFAULT_HORIZON: f32 = 10.0;
const DEFAULT_COOLDOWN: i32 = 5;
const DEFAULT_WEIGHT: f32 = 0.5;

const MIN_MAX: f32 = 0.0;
const MAX_MAX: f32 = 10.0;

const MIN_RANGE: f32 = 1.0;
const MAX_RANGE: f32 = 100.0;

const MIN_MIN_DIST: f32 = 0.1;
const MAX_MIN_DIST: f32 = 50.0;

const MIN_HORIZON: f32 = 0.5;
const MAX_HORIZON: f32 = 60.0;

const MAX_COOLDOWN: i32 = u8::MAX as i32;

const MIN_WEIGHT: f32 = 0.0;
const MAX_WEIGHT: f32 = 10.0;

/// Avoidance parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct AvoidanceParams {
    pub enabled: bool,
    pub max_avoidance: f32,
    pub influence_range: f32,
    pub min_distance: f32,
    pub horizon: f32,
    pub cooldown_ticks: u8,
    pub close_range_weight: f32,
}

impl Default for AvoidanceParams {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_ENABLE,
            max_avoidance: DEFAULT_MAX,
            influence_range: DEFAULT_RANGE,
            min_distance: DEFAULT_MIN_DIST,
            horizon: DEFAULT_HORIZON,
            cooldown_ticks: DEFAULT_COOLDOWN as u8,
            close_range_weight: DEFAULT_WEIGHT,
        }
    }
}

impl AvoidanceParams {
    /// Register avoidance parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        store.register(
            "OA_ENABLE",
            ParamValue::Bool(DEFAULT_ENABLE),
            ParamFlags::empty(),
        )?;
        store.register("OA_MAX", ParamValue::Float(DEFAULT_MAX), ParamFlags::empty())?;
        store.register(
            "OA_RANGE",
            ParamValue::Float(DEFAULT_RANGE),
            ParamFlags::empty(),
        )?;
        store.register(
            "OA_MIN_DIST",
            ParamValue::Float(DEFAULT_MIN_DIST),
            ParamFlags::empty(),
        )?;
        store.register(
            "OA_HORIZON",
            ParamValue::Float(DEFAULT_HORIZON),
            ParamFlags::empty(),
        )?;
        store.register(
            "OA_COOLDOWN",
            ParamValue::Int(DEFAULT_COOLDOWN),
            ParamFlags::empty(),
        )?;
        store.register(
            "OA_WEIGHT",
            ParamValue::Float(DEFAULT_WEIGHT),
            ParamFlags::empty(),
        )?;

        Ok(())
    }

    /// Load avoidance parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let cooldown_ticks = match store.get("OA_COOLDOWN") {
            Some(ParamValue::Int(v)) => (*v).clamp(0, MAX_COOLDOWN) as u8,
            Some(ParamValue::Float(v)) => (*v as i32).clamp(0, MAX_COOLDOWN) as u8,
            _ => DEFAULT_COOLDOWN as u8,
        };

        Self {
            enabled: load_bool(store, "OA_ENABLE", DEFAULT_ENABLE),
            max_avoidance: load_float(store, "OA_MAX", DEFAULT_MAX, MIN_MAX, MAX_MAX),
            influence_range: load_float(store, "OA_RANGE", DEFAULT_RANGE, MIN_RANGE, MAX_RANGE),
            min_distance: load_float(
                store,
                "OA_MIN_DIST",
                DEFAULT_MIN_DIST,
                MIN_MIN_DIST,
                MAX_MIN_DIST,
            ),
            horizon: load_float(store, "OA_HORIZON", DEFAULT_HORIZON, MIN_HORIZON, MAX_HORIZON),
            cooldown_ticks,
            close_range_weight: load_float(
                store,
                "OA_WEIGHT",
                DEFAULT_WEIGHT,
                MIN_WEIGHT,
                MAX_WEIGHT,
            ),
        }
    }

    /// Convert to the engine configuration
    ///
    /// An influence range below the minimum distance is raised to it.
    pub fn to_config(&self) -> AvoidanceConfig {
        AvoidanceConfig {
            enabled: self.enabled,
            max_avoidance: self.max_avoidance,
            influence_range: self.influence_range.max(self.min_distance),
            min_distance: self.min_distance,
            horizon: self.horizon,
            cooldown_ticks: self.cooldown_ticks,
            close_range_weight: self.close_range_weight,
        }
    }

    /// Validate avoidance parameters
    pub fn is_valid(&self) -> bool {
        if self.max_avoidance < MIN_MAX || self.max_avoidance > MAX_MAX {
            return false;
        }
        if self.horizon < MIN_HORIZON || self.horizon > MAX_HORIZON {
            return false;
        }
        if self.close_range_weight < MIN_WEIGHT || self.close_range_weight > MAX_WEIGHT {
            return false;
        }
        self.min_distance < self.influence_range
    }
}
