//! Steering helm shared by every navigation mode
//!
//! Each mode update starts with the same governance sequence:
//!
//! 1. Request the mode's target speed from the cruise task
//! 2. Emergency stop on operator deceleration intent
//! 3. Emergency steer on operator lateral input, holding off automatic
//!    steering for the override window after the last input
//!
//! Only when none of these take over does the mode compute its own
//! steering through [`Helm::pursue`].

use nalgebra::Vector3;

use super::context::AutopilotContext;
use crate::control::Pid;
use crate::navigation::{NavigationResult, VehicleFrame};
use crate::parameters::NavigationParams;
use crate::vehicle::VehicleController;

/// Who steers this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Governance {
    /// Emergency stop: the autopilot has been disabled
    Stop,
    /// Operator override is active; steering already written
    Manual,
    /// The mode steers
    Auto,
}

/// Steering PID plus the manual override countdown
#[derive(Debug, Clone)]
pub struct Helm {
    steering: Pid,
    max_angle: f32,
    override_window: f32,
    override_remaining: f32,
}

impl Helm {
    pub fn new(params: &NavigationParams) -> Self {
        Self {
            steering: params.steering.build(),
            max_angle: params.max_steer_angle(),
            override_window: params.override_time,
            override_remaining: 0.0,
        }
    }

    /// Run cruise governance, emergency stop and emergency steer
    pub fn govern<V: VehicleController>(
        &mut self,
        cx: &mut AutopilotContext<V>,
        dt: f32,
        target_speed: f32,
        result: &mut NavigationResult,
    ) -> Governance {
        cx.cruise.hold(target_speed);
        result.target_speed = cx.cruise.target_speed();

        let manual = cx.sensors.manual;
        if manual.wants_stop() {
            cx.disable();
            return Governance::Stop;
        }

        if manual.is_steering() {
            self.override_remaining = self.override_window;
            self.steering.clear();
            result.manual_override = true;
            result.steering = (-manual.lateral).clamp(-1.0, 1.0);
            return Governance::Manual;
        }

        if self.override_remaining > 0.0 {
            self.override_remaining -= dt.max(0.0);
            result.manual_override = true;
            return Governance::Manual;
        }

        Governance::Auto
    }

    /// Steer toward `destination` through the avoidance engine
    pub fn pursue<V: VehicleController>(
        &mut self,
        cx: &mut AutopilotContext<V>,
        frame: &VehicleFrame,
        destination: &Vector3<f32>,
        dt: f32,
        result: &mut NavigationResult,
    ) {
        let direction = cx.avoidance.direction(
            cx.sensors.detections.as_deref(),
            frame,
            &cx.sensors.velocity,
            destination,
        );

        let angle = frame
            .steering_angle(&direction)
            .clamp(-self.max_angle, self.max_angle);
        result.steer_angle = angle;
        result.steering = self
            .steering
            .signal(angle / self.max_angle, dt)
            .clamp(-1.0, 1.0);
    }

    /// Remaining manual override time (seconds)
    pub fn override_remaining(&self) -> f32 {
        self.override_remaining.max(0.0)
    }

    /// Reset the PID and cancel any override
    pub fn clear(&mut self) {
        self.steering.clear();
        self.override_remaining = 0.0;
    }
}

/// Distance under which a waypoint counts as reached
///
/// Grows with speed so faster vehicles start turning for the next waypoint
/// earlier.
pub fn reach_threshold(params: &NavigationParams, speed: f32) -> f32 {
    let speed = if speed.is_finite() { speed.max(0.0) } else { 0.0 };
    params.radius + speed * params.reach_time
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterStore;
    use crate::vehicle::{ManualInput, StandardController};

    fn context() -> AutopilotContext<StandardController> {
        let mut cx = AutopilotContext::new(StandardController::new(5.0), &ParameterStore::new());
        cx.enabled = true;
        cx
    }

    #[test]
    fn test_govern_requests_cruise() {
        let mut cx = context();
        let mut helm = Helm::new(&cx.params);
        let mut result = NavigationResult::default();

        assert_eq!(helm.govern(&mut cx, 0.1, 2.5, &mut result), Governance::Auto);
        assert!(cx.cruise.is_active());
        assert!((result.target_speed - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_emergency_stop_disables() {
        let mut cx = context();
        cx.sensors.manual = ManualInput {
            forward: -1.0,
            ..ManualInput::default()
        };
        let mut helm = Helm::new(&cx.params);
        let mut result = NavigationResult::default();

        assert_eq!(helm.govern(&mut cx, 0.1, 2.5, &mut result), Governance::Stop);
        assert!(!cx.enabled);
        assert!(!cx.cruise.is_active());
    }

    #[test]
    fn test_emergency_steer_window() {
        let mut cx = context();
        let mut helm = Helm::new(&cx.params);
        let mut result = NavigationResult::default();

        cx.sensors.manual.lateral = 0.6;
        assert_eq!(helm.govern(&mut cx, 0.5, 1.0, &mut result), Governance::Manual);
        assert!((result.steering + 0.6).abs() < 1e-6, "negated manual input");
        assert!(result.manual_override);

        // Input released: window (3 s) runs down with zero steering
        cx.sensors.manual.lateral = 0.0;
        for _ in 0..5 {
            let mut result = NavigationResult::default();
            assert_eq!(helm.govern(&mut cx, 0.5, 1.0, &mut result), Governance::Manual);
            assert_eq!(result.steering, 0.0);
        }
        let mut result = NavigationResult::default();
        assert_eq!(helm.govern(&mut cx, 0.5, 1.0, &mut result), Governance::Manual);
        let mut result = NavigationResult::default();
        assert_eq!(helm.govern(&mut cx, 0.5, 1.0, &mut result), Governance::Auto);
        assert!(!result.manual_override);
    }

    #[test]
    fn test_new_input_rearms_window() {
        let mut cx = context();
        let mut helm = Helm::new(&cx.params);
        let mut result = NavigationResult::default();

        cx.sensors.manual.lateral = -1.0;
        helm.govern(&mut cx, 0.1, 1.0, &mut result);
        cx.sensors.manual.lateral = 0.0;
        helm.govern(&mut cx, 2.0, 1.0, &mut result);
        cx.sensors.manual.lateral = -1.0;
        helm.govern(&mut cx, 0.1, 1.0, &mut result);
        assert!((helm.override_remaining() - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_pursue_steers_toward_target() {
        let mut cx = context();
        let mut helm = Helm::new(&cx.params);
        let frame = cx.frame();

        let mut left = NavigationResult::default();
        helm.pursue(&mut cx, &frame, &Vector3::new(10.0, 10.0, 0.0), 0.1, &mut left);
        assert!(left.steering > 0.0, "target on the left, got {}", left.steering);
        assert!((left.steer_angle - cx.params.max_steer_angle()).abs() < 1e-5);

        helm.clear();
        let mut ahead = NavigationResult::default();
        helm.pursue(&mut cx, &frame, &Vector3::new(10.0, 0.0, 0.0), 0.1, &mut ahead);
        assert!(ahead.steering.abs() < 1e-6);
    }

    #[test]
    fn test_steering_angle_clamped() {
        let mut cx = context();
        let mut helm = Helm::new(&cx.params);
        let frame = cx.frame();
        let mut result = NavigationResult::default();

        // Directly behind and to the right
        helm.pursue(&mut cx, &frame, &Vector3::new(-10.0, -1.0, 0.0), 0.1, &mut result);
        assert!((result.steer_angle + cx.params.max_steer_angle()).abs() < 1e-5);
        assert!(result.steering >= -1.0 && result.steering < 0.0);
    }

    #[test]
    fn test_reach_threshold_grows_with_speed() {
        let params = NavigationParams::default();
        assert!((reach_threshold(&params, 0.0) - 1.5).abs() < 1e-6);
        assert!((reach_threshold(&params, 4.0) - 3.5).abs() < 1e-6);
        assert!((reach_threshold(&params, f32::NAN) - 1.5).abs() < 1e-6);
    }
}
