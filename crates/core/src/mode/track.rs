//! Track Mode
//!
//! Steers toward the first waypoint of the live list. The waypoint may
//! move between cycles; it is re-read every update.
//!
//! # Behavior
//!
//! - Inside the reach threshold: apply the hold brake and stop steering
//! - Target moves away again: release the brake and resume pursuit
//! - Waypoint list emptied: terminate

use super::context::{AutopilotContext, ExitReason};
use super::helm::{reach_threshold, Governance, Helm};
use super::traits::{Mode, ModeStatus};
use crate::navigation::{NavMode, NavigationResult};
use crate::parameters::NavigationParams;
use crate::vehicle::VehicleController;

/// Track mode
pub struct TrackMode {
    helm: Helm,
}

impl TrackMode {
    pub fn new(params: &NavigationParams) -> Self {
        Self {
            helm: Helm::new(params),
        }
    }
}

impl<V: VehicleController> Mode<V> for TrackMode {
    fn enter(&mut self, cx: &mut AutopilotContext<V>) -> Result<(), &'static str> {
        if cx.controller.waypoints().is_empty() {
            return Err("Track requires a waypoint");
        }
        self.helm.clear();
        cx.hold_brake = false;
        Ok(())
    }

    fn update(
        &mut self,
        cx: &mut AutopilotContext<V>,
        dt: f32,
        result: &mut NavigationResult,
    ) -> ModeStatus {
        let Some(target) = cx.controller.waypoints().first().cloned() else {
            return ModeStatus::Finished(ExitReason::WaypointsCleared);
        };

        let frame = cx.frame();
        result.mode = NavMode::Track;
        result.waypoint_count = cx.controller.waypoints().len();
        result.distance = target.distance_to(&frame.position);
        result.waypoint = Some(target.name.clone());

        let speed = cx.cruise_speed();
        match self.helm.govern(cx, dt, speed, result) {
            Governance::Stop => return ModeStatus::Finished(ExitReason::EmergencyStop),
            Governance::Manual => return ModeStatus::Running,
            Governance::Auto => {}
        }

        if result.distance < reach_threshold(&cx.params, cx.sensors.speed()) {
            cx.hold_brake = true;
            result.holding = true;
            return ModeStatus::Running;
        }

        cx.hold_brake = false;
        self.helm.pursue(cx, &frame, &target.position, dt, result);
        ModeStatus::Running
    }

    fn exit(&mut self, _cx: &mut AutopilotContext<V>) {
        self.helm.clear();
    }

    fn kind(&self) -> NavMode {
        NavMode::Track
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Waypoint;
    use crate::parameters::ParameterStore;
    use crate::vehicle::StandardController;
    use nalgebra::Vector3;

    fn context(target: Vector3<f32>) -> AutopilotContext<StandardController> {
        let mut controller = StandardController::new(5.0);
        controller.push_waypoint(Waypoint::new("T", target, 0.0));
        let mut cx = AutopilotContext::new(controller, &ParameterStore::new());
        cx.enabled = true;
        cx
    }

    #[test]
    fn test_track_pursues_and_reports() {
        let mut cx = context(Vector3::new(20.0, 5.0, 0.0));
        let mut mode = TrackMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        assert_eq!(mode.update(&mut cx, 0.1, &mut result), ModeStatus::Running);
        assert_eq!(result.mode, NavMode::Track);
        assert_eq!(result.waypoint.as_deref(), Some("T"));
        assert_eq!(result.waypoint_count, 1);
        assert!(result.steering > 0.0, "target is to the left");
        assert!(!cx.hold_brake);
        assert!(cx.cruise.is_active());
    }

    #[test]
    fn test_track_holds_inside_reach_and_releases() {
        let mut cx = context(Vector3::new(1.0, 0.0, 0.0));
        let mut mode = TrackMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert!(cx.hold_brake);
        assert!(result.holding);
        assert_eq!(result.steering, 0.0);

        let moved = [Waypoint::new("T", Vector3::new(30.0, 0.0, 0.0), 1.0)];
        cx.controller.replace_waypoints(&moved);
        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert!(!cx.hold_brake);
        assert!((result.distance - 30.0).abs() < 1e-4);
    }

    #[test]
    fn test_track_finishes_when_waypoints_cleared() {
        let mut cx = context(Vector3::new(10.0, 0.0, 0.0));
        let mut mode = TrackMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        cx.controller.clear_waypoints();
        let mut result = NavigationResult::default();
        assert_eq!(
            mode.update(&mut cx, 0.1, &mut result),
            ModeStatus::Finished(ExitReason::WaypointsCleared)
        );
    }

    #[test]
    fn test_track_emergency_stop() {
        let mut cx = context(Vector3::new(10.0, 0.0, 0.0));
        let mut mode = TrackMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        cx.sensors.manual.forward = -0.5;
        let mut result = NavigationResult::default();
        assert_eq!(
            mode.update(&mut cx, 0.1, &mut result),
            ModeStatus::Finished(ExitReason::EmergencyStop)
        );
        assert!(!cx.enabled);
    }

    #[test]
    fn test_track_enter_requires_waypoint() {
        let mut cx = AutopilotContext::new(StandardController::new(5.0), &ParameterStore::new());
        let mut mode = TrackMode::new(&cx.params);
        assert!(Mode::enter(&mut mode, &mut cx).is_err());
    }
}
