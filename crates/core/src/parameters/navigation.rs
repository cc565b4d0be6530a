//! Navigation Parameter Definitions
//!
//! Tuning for the autopilot modes and the cruise task.
//!
//! # Parameters
//!
//! - `NAV_STR_P` / `NAV_STR_I` / `NAV_STR_D` / `NAV_STR_DCY` - Steering PID tuning (whole numbers)
//! - `NAV_SPD_P` / `NAV_SPD_I` / `NAV_SPD_D` / `NAV_SPD_DCY` - Speed PID tuning (whole numbers)
//! - `NAV_STR_MAX` - Steering angle for full deflection (degrees)
//! - `NAV_RADIUS` - Vehicle radius used for the reach threshold (meters)
//! - `NAV_REACH_T` - Reach look-ahead time, multiplied by speed (seconds)
//! - `NAV_OVR_TIME` - Manual steering override window (seconds)
//! - `NAV_FOL_GAP` - Minimum spacing between trail points in Follow (meters)
//! - `NAV_FOL_DIST` - Distance under which Follow matches the target's speed (meters)
//! - `NAV_CRUISE` - Default cruise speed (m/s)

use super::error::ParameterError;
use super::storage::{load_float, ParamFlags, ParamValue, ParameterStore};
use crate::control::Pid;

// --- Defaults ---

const DEFAULT_STEER_P: f32 = 10.0;
const DEFAULT_STEER_I: f32 = 1.0;
const DEFAULT_STEER_D: f32 = 20.0;
const DEFAULT_STEER_DECAY: f32 = 2.0;
const DEFAULT_SPEED_P: f32 = 5.0;
const DEFAULT_SPEED_I: f32 = 2.0;
const DEFAULT_SPEED_D: f32 = 0.0;
const DEFAULT_SPEED_DECAY: f32 = 1.0;
const DEFAULT_MAX_STEER_DEG: f32 = 45.0;
const DEFAULT_RADIUS: f32 = 1.5;
const DEFAULT_REACH_TIME: f32 = 0.5;
const DEFAULT_OVERRIDE_TIME: f32 = 3.0;
const DEFAULT_FOLLOW_GAP: f32 = 1.0;
const DEFAULT_FOLLOW_DIST: f32 = 5.0;
const DEFAULT_CRUISE_SPEED: f32 = 3.0;

// --- Ranges ---

const MIN_TUNING: f32 = 0.0;
const MAX_TUNING: f32 = 1000.0;

const MIN_DECAY: f32 = 0.0;
const MAX_DECAY: f32 = 10.0;

const MIN_STEER_DEG: f32 = 5.0;
const MAX_STEER_DEG: f32 = 180.0;

const MIN_RADIUS: f32 = 0.1;
const MAX_RADIUS: f32 = 20.0;

const MIN_REACH_TIME: f32 = 0.0;
const MAX_REACH_TIME: f32 = 10.0;

const MIN_OVERRIDE_TIME: f32 = 0.5;
const MAX_OVERRIDE_TIME: f32 = 30.0;

const MIN_FOLLOW_GAP: f32 = 0.1;
const MAX_FOLLOW_GAP: f32 = 20.0;

const MIN_FOLLOW_DIST: f32 = 0.5;
const MAX_FOLLOW_DIST: f32 = 100.0;

const MIN_CRUISE_SPEED: f32 = 0.0;
const MAX_CRUISE_SPEED: f32 = 50.0;

/// Whole-number PID tuning as entered by the operator
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PidTuning {
    pub p: f32,
    pub i: f32,
    pub d: f32,
    pub decay: f32,
}

impl PidTuning {
    /// Build a fresh controller with this tuning
    pub fn build(&self) -> Pid {
        Pid::with_tuning(self.p, self.i, self.d, self.decay)
    }
}

/// Navigation parameters loaded from parameter store
#[derive(Debug, Clone)]
pub struct NavigationParams {
    /// Steering PID tuning
    pub steering: PidTuning,
    /// Speed PID tuning (cruise task)
    pub speed: PidTuning,
    /// Steering angle mapped to full deflection (degrees)
    pub max_steer_deg: f32,
    /// Vehicle radius (meters)
    pub radius: f32,
    /// Reach look-ahead time (seconds)
    pub reach_time: f32,
    /// Manual steering override window (seconds)
    pub override_time: f32,
    /// Trail point spacing in Follow (meters)
    pub follow_gap: f32,
    /// Speed-matching distance in Follow (meters)
    pub follow_distance: f32,
    /// Default cruise speed (m/s)
    pub cruise_speed: f32,
}

impl Default for NavigationParams {
    fn default() -> Self {
        Self {
            steering: PidTuning {
                p: DEFAULT_STEER_P,
                i: DEFAULT_STEER_I,
                d: DEFAULT_STEER_D,
                decay: DEFAULT_STEER_DECAY,
            },
            speed: PidTuning {
                p: DEFAULT_SPEED_P,
                i: DEFAULT_SPEED_I,
                d: DEFAULT_SPEED_D,
                decay: DEFAULT_SPEED_DECAY,
            },
            max_steer_deg: DEFAULT_MAX_STEER_DEG,
            radius: DEFAULT_RADIUS,
            reach_time: DEFAULT_REACH_TIME,
            override_time: DEFAULT_OVERRIDE_TIME,
            follow_gap: DEFAULT_FOLLOW_GAP,
            follow_distance: DEFAULT_FOLLOW_DIST,
            cruise_speed: DEFAULT_CRUISE_SPEED,
        }
    }
}

impl NavigationParams {
    /// Register navigation parameters with default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), ParameterError> {
        let floats = [
            ("NAV_STR_P", DEFAULT_STEER_P),
            ("NAV_STR_I", DEFAULT_STEER_I),
            ("NAV_STR_D", DEFAULT_STEER_D),
            ("NAV_STR_DCY", DEFAULT_STEER_DECAY),
            ("NAV_SPD_P", DEFAULT_SPEED_P),
            ("NAV_SPD_I", DEFAULT_SPEED_I),
            ("NAV_SPD_D", DEFAULT_SPEED_D),
            ("NAV_SPD_DCY", DEFAULT_SPEED_DECAY),
            ("NAV_STR_MAX", DEFAULT_MAX_STEER_DEG),
            ("NAV_RADIUS", DEFAULT_RADIUS),
            ("NAV_REACH_T", DEFAULT_REACH_TIME),
            ("NAV_OVR_TIME", DEFAULT_OVERRIDE_TIME),
            ("NAV_FOL_GAP", DEFAULT_FOLLOW_GAP),
            ("NAV_FOL_DIST", DEFAULT_FOLLOW_DIST),
            ("NAV_CRUISE", DEFAULT_CRUISE_SPEED),
        ];

        for (name, default) in floats {
            store.register(name, ParamValue::Float(default), ParamFlags::empty())?;
        }

        Ok(())
    }

    /// Load navigation parameters from parameter store
    pub fn from_store(store: &ParameterStore) -> Self {
        let tuning = |p: (&str, f32), i: (&str, f32), d: (&str, f32), decay: (&str, f32)| {
            PidTuning {
                p: load_float(store, p.0, p.1, MIN_TUNING, MAX_TUNING),
                i: load_float(store, i.0, i.1, MIN_TUNING, MAX_TUNING),
                d: load_float(store, d.0, d.1, MIN_TUNING, MAX_TUNING),
                decay: load_float(store, decay.0, decay.1, MIN_DECAY, MAX_DECAY),
            }
        };

        Self {
            steering: tuning(
                ("NAV_STR_P", DEFAULT_STEER_P),
                ("NAV_STR_I", DEFAULT_STEER_I),
                ("NAV_STR_D", DEFAULT_STEER_D),
                ("NAV_STR_DCY", DEFAULT_STEER_DECAY),
            ),
            speed: tuning(
                ("NAV_SPD_P", DEFAULT_SPEED_P),
                ("NAV_SPD_I", DEFAULT_SPEED_I),
                ("NAV_SPD_D", DEFAULT_SPEED_D),
                ("NAV_SPD_DCY", DEFAULT_SPEED_DECAY),
            ),
            max_steer_deg: load_float(
                store,
                "NAV_STR_MAX",
                DEFAULT_MAX_STEER_DEG,
                MIN_STEER_DEG,
                MAX_STEER_DEG,
            ),
            radius: load_float(store, "NAV_RADIUS", DEFAULT_RADIUS, MIN_RADIUS, MAX_RADIUS),
            reach_time: load_float(
                store,
                "NAV_REACH_T",
                DEFAULT_REACH_TIME,
                MIN_REACH_TIME,
                MAX_REACH_TIME,
            ),
            override_time: load_float(
                store,
                "NAV_OVR_TIME",
                DEFAULT_OVERRIDE_TIME,
                MIN_OVERRIDE_TIME,
                MAX_OVERRIDE_TIME,
            ),
            follow_gap: load_float(
                store,
                "NAV_FOL_GAP",
                DEFAULT_FOLLOW_GAP,
                MIN_FOLLOW_GAP,
                MAX_FOLLOW_GAP,
            ),
            follow_distance: load_float(
                store,
                "NAV_FOL_DIST",
                DEFAULT_FOLLOW_DIST,
                MIN_FOLLOW_DIST,
                MAX_FOLLOW_DIST,
            ),
            cruise_speed: load_float(
                store,
                "NAV_CRUISE",
                DEFAULT_CRUISE_SPEED,
                MIN_CRUISE_SPEED,
                MAX_CRUISE_SPEED,
            ),
        }
    }

    /// Steering angle mapped to full deflection, in radians
    pub fn max_steer_angle(&self) -> f32 {
        self.max_steer_deg.to_radians()
    }

    /// Validate navigation parameters
    pub fn is_valid(&self) -> bool {
        if self.max_steer_deg < MIN_STEER_DEG || self.max_steer_deg > MAX_STEER_DEG {
            return false;
        }
        if self.radius < MIN_RADIUS || self.radius > MAX_RADIUS {
            return false;
        }
        if self.reach_time < MIN_REACH_TIME || self.reach_time > MAX_REACH_TIME {
            return false;
        }
        if self.override_time < MIN_OVERRIDE_TIME || self.override_time > MAX_OVERRIDE_TIME {
            return false;
        }
        if self.follow_gap < MIN_FOLLOW_GAP || self.follow_gap > MAX_FOLLOW_GAP {
            return false;
        }
        if self.cruise_speed < MIN_CRUISE_SPEED || self.cruise_speed > MAX_CRUISE_SPEED {
            return false;
        }

        // Trail points must be closer together than the speed-matching distance
        self.follow_gap < self.follow_distance
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_navigation_params_defaults() {
        let params = NavigationParams::default();

        assert!((params.steering.p - 10.0).abs() < 0.001);
        assert!((params.speed.i - 2.0).abs() < 0.001);
        assert!((params.max_steer_deg - 45.0).abs() < 0.001);
        assert!((params.radius - 1.5).abs() < 0.001);
        assert!((params.override_time - 3.0).abs() < 0.001);
        assert!(params.is_valid());
    }

    #[test]
    fn test_register_defaults_populates_all() {
        let mut store = ParameterStore::new();
        NavigationParams::register_defaults(&mut store).unwrap();

        assert_eq!(store.len(), 15);
        assert!(store.get("NAV_STR_DCY").is_some());
        assert!(store.get("NAV_CRUISE").is_some());
    }

    #[test]
    fn test_from_store_reads_custom_values() {
        let mut store = ParameterStore::new();
        NavigationParams::register_defaults(&mut store).unwrap();

        store.set("NAV_STR_P", ParamValue::Float(25.0)).unwrap();
        store.set("NAV_RADIUS", ParamValue::Float(3.0)).unwrap();
        store.set("NAV_CRUISE", ParamValue::Int(6)).unwrap();

        let params = NavigationParams::from_store(&store);
        assert!((params.steering.p - 25.0).abs() < 0.001);
        assert!((params.radius - 3.0).abs() < 0.001);
        assert!((params.cruise_speed - 6.0).abs() < 0.001);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut store = ParameterStore::new();
        NavigationParams::register_defaults(&mut store).unwrap();

        store.set("NAV_STR_MAX", ParamValue::Float(1.0)).unwrap();
        store.set("NAV_STR_DCY", ParamValue::Float(50.0)).unwrap();
        let params = NavigationParams::from_store(&store);
        assert!((params.max_steer_deg - MIN_STEER_DEG).abs() < 0.001);
        assert!((params.steering.decay - MAX_DECAY).abs() < 0.001);
    }

    #[test]
    fn test_empty_store_falls_back_to_defaults() {
        let store = ParameterStore::new();
        let params = NavigationParams::from_store(&store);
        assert!((params.follow_distance - DEFAULT_FOLLOW_DIST).abs() < 0.001);
        assert!((params.max_steer_angle() - core::f32::consts::FRAC_PI_4).abs() < 1e-5);
    }

    #[test]
    fn test_tuning_builds_scaled_pid() {
        let params = NavigationParams::default();
        let pid = params.steering.build();
        assert!((pid.gains().kp - 1.0).abs() < 1e-6);
        assert!((pid.gains().kd - 0.02).abs() < 1e-6);
    }

    #[test]
    fn test_is_valid_rejects_inconsistent_follow() {
        let params = NavigationParams {
            follow_gap: 10.0,
            follow_distance: 5.0,
            ..NavigationParams::default()
        };
        assert!(!params.is_valid());
    }
}
