//! Follow Mode
//!
//! Trails a moving target. The target's position (first waypoint of the
//! live list) is sampled into a bounded trail every cycle; the vehicle
//! steers toward the oldest retained point so it retraces the target's path
//! instead of cutting corners.
//!
//! Once within the closing distance of the live target, the target speed
//! becomes the trail's estimated speed so the vehicle matches pace.

use super::context::{AutopilotContext, ExitReason};
use super::helm::{reach_threshold, Governance, Helm};
use super::traits::{Mode, ModeStatus};
use crate::navigation::{NavMode, NavigationResult, Waypoint, WaypointQueue};
use crate::parameters::NavigationParams;
use crate::vehicle::VehicleController;

/// Trail capacity
pub const FOLLOW_TRAIL_LEN: usize = 16;

/// Follow mode
pub struct FollowMode {
    helm: Helm,
    trail: WaypointQueue<FOLLOW_TRAIL_LEN>,
    /// Seconds since activation, used to time-stamp trail points
    clock: f32,
}

impl FollowMode {
    pub fn new(params: &NavigationParams) -> Self {
        Self {
            helm: Helm::new(params),
            trail: WaypointQueue::new(),
            clock: 0.0,
        }
    }

    /// Trail of recent target positions, oldest first
    pub fn trail(&self) -> &WaypointQueue<FOLLOW_TRAIL_LEN> {
        &self.trail
    }
}

impl<V: VehicleController> Mode<V> for FollowMode {
    fn enter(&mut self, cx: &mut AutopilotContext<V>) -> Result<(), &'static str> {
        if cx.controller.waypoints().is_empty() {
            return Err("Follow requires a target");
        }
        self.helm.clear();
        self.trail.clear();
        self.clock = 0.0;
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

        self.clock += dt.max(0.0);
        let sample = Waypoint::new(&target.name, target.position, self.clock);
        self.trail.enqueue(
            sample,
            WaypointQueue::<FOLLOW_TRAIL_LEN>::spaced(cx.params.follow_gap),
        );

        let frame = cx.frame();
        let closing = target.distance_to(&frame.position) < cx.params.follow_distance;
        let speed = if closing {
            self.trail.estimated_speed().min(cx.cruise_speed())
        } else {
            cx.cruise_speed()
        };

        result.mode = NavMode::Follow;
        match self.helm.govern(cx, dt, speed, result) {
            Governance::Stop => return ModeStatus::Finished(ExitReason::EmergencyStop),
            Governance::Manual => {
                self.report(result, &frame.position);
                return ModeStatus::Running;
            }
            Governance::Auto => {}
        }

        let threshold = reach_threshold(&cx.params, cx.sensors.speed());
        while self.trail.len() > 1 {
            match self.trail.peek() {
                Some(oldest) if oldest.distance_to(&frame.position) < threshold => {
                    self.trail.dequeue();
                }
                _ => break,
            }
        }
        self.report(result, &frame.position);

        let Some(aim) = self.trail.peek().map(|point| point.position) else {
            return ModeStatus::Running;
        };

        if result.distance < threshold {
            // Caught up with the only point left
            cx.hold_brake = true;
            result.holding = true;
            return ModeStatus::Running;
        }

        cx.hold_brake = false;
        self.helm.pursue(cx, &frame, &aim, dt, result);
        ModeStatus::Running
    }

    fn exit(&mut self, _cx: &mut AutopilotContext<V>) {
        self.helm.clear();
        self.trail.clear();
    }

    fn kind(&self) -> NavMode {
        NavMode::Follow
    }
}

impl FollowMode {
    fn report(&self, result: &mut NavigationResult, position: &nalgebra::Vector3<f32>) {
        result.waypoint_count = self.trail.len();
        if let Some(oldest) = self.trail.peek() {
            result.waypoint = Some(oldest.name.clone());
            result.distance = oldest.distance_to(position);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parameters::ParameterStore;
    use crate::vehicle::StandardController;
    use nalgebra::Vector3;

    fn context(target: Vector3<f32>) -> AutopilotContext<StandardController> {
        let mut controller = StandardController::new(10.0);
        controller.push_waypoint(Waypoint::new("lead", target, 0.0));
        let mut cx = AutopilotContext::new(controller, &ParameterStore::new());
        cx.enabled = true;
        cx.basic_mission = true;
        cx
    }

    fn move_target(cx: &mut AutopilotContext<StandardController>, x: f32) {
        let lead = [Waypoint::new("lead", Vector3::new(x, 0.0, 0.0), 0.0)];
        cx.controller.replace_waypoints(&lead);
    }

    #[test]
    fn test_trail_records_spaced_positions() {
        let mut cx = context(Vector3::new(20.0, 0.0, 0.0));
        let mut mode = FollowMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        for x in [20.0, 20.5, 22.0, 24.0] {
            move_target(&mut cx, x);
            let mut result = NavigationResult::default();
            mode.update(&mut cx, 0.5, &mut result);
        }

        // 20.5 is within the 1 m gap of 20.0
        assert_eq!(mode.trail().len(), 3);
        assert!((mode.trail().peek().unwrap().position.x - 20.0).abs() < 1e-6);
    }

    #[test]
    fn test_steers_toward_oldest_point() {
        let mut cx = context(Vector3::new(10.0, 10.0, 0.0));
        let mut mode = FollowMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);

        // Target has since moved to the right; the trail still leads left
        let lead = [Waypoint::new("lead", Vector3::new(10.0, -10.0, 0.0), 0.0)];
        cx.controller.replace_waypoints(&lead);
        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);

        assert_eq!(result.mode, NavMode::Follow);
        assert_eq!(result.waypoint_count, 2);
        assert!(result.steering > 0.0, "should steer left toward the oldest point");
    }

    #[test]
    fn test_matches_speed_when_close() {
        let mut cx = context(Vector3::new(1.0, 0.0, 0.0));
        let mut mode = FollowMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        // Lead creeps forward at 1.5 m/s, staying inside the closing distance
        for step in 0..3 {
            move_target(&mut cx, 1.0 + step as f32 * 1.5);
            let mut result = NavigationResult::default();
            mode.update(&mut cx, 1.0, &mut result);
            if step == 2 {
                assert!((result.target_speed - 1.5).abs() < 1e-4, "got {}", result.target_speed);
            }
        }
    }

    #[test]
    fn test_far_target_uses_cruise_speed() {
        let mut cx = context(Vector3::new(50.0, 0.0, 0.0));
        let mut mode = FollowMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert!((result.target_speed - cx.params.cruise_speed).abs() < 1e-6);
    }

    #[test]
    fn test_reached_trail_points_dequeued_and_last_holds() {
        let mut cx = context(Vector3::new(1.0, 0.0, 0.0));
        let mut mode = FollowMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert!(result.holding, "only point is within reach");
        assert!(cx.hold_brake);

        move_target(&mut cx, 1.2);
        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert_eq!(mode.trail().len(), 1);

        move_target(&mut cx, 8.0);
        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert_eq!(mode.trail().len(), 1, "reached point dropped");
        assert!(!result.holding);
        assert!(!cx.hold_brake);
    }
}
