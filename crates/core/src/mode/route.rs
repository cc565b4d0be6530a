//! Route Mode
//!
//! Traverses the controller's ordered waypoint list. On reaching the active
//! waypoint it advances to the next; at the end of the list the flight mode
//! decides what happens:
//!
//! | Flight mode | End of list |
//! |-------------|-------------|
//! | Circle | Continue with the first waypoint |
//! | Patrol | Reverse and bounce between the endpoints |
//! | Stop | Hold brake, disable the autopilot, terminate |

use super::context::{AutopilotContext, ExitReason, NavEvent};
use super::helm::{reach_threshold, Governance, Helm};
use super::traits::{Mode, ModeStatus};
use crate::navigation::{NavMode, NavigationResult};
use crate::parameters::NavigationParams;
use crate::vehicle::{FlightMode, VehicleController};

/// Route mode
pub struct RouteMode {
    helm: Helm,
    index: usize,
    reversed: bool,
}

impl RouteMode {
    pub fn new(params: &NavigationParams) -> Self {
        Self {
            helm: Helm::new(params),
            index: 0,
            reversed: false,
        }
    }

    /// Index of the active waypoint
    pub fn active_index(&self) -> usize {
        self.index
    }

    /// Index following the active one, `None` at the end of a Stop route
    ///
    /// Returns the index and whether the route wrapped or reversed.
    fn next_index(&mut self, len: usize, flight_mode: FlightMode) -> Option<(usize, bool)> {
        let last = len.saturating_sub(1);
        match flight_mode {
            FlightMode::Circle => {
                if self.index >= last {
                    Some((0, true))
                } else {
                    Some((self.index + 1, false))
                }
            }
            FlightMode::Patrol => {
                if last == 0 {
                    return Some((0, true));
                }
                if !self.reversed && self.index >= last {
                    self.reversed = true;
                } else if self.reversed && self.index == 0 {
                    self.reversed = false;
                } else {
                    let next = if self.reversed {
                        self.index - 1
                    } else {
                        self.index + 1
                    };
                    return Some((next, false));
                }
                let next = if self.reversed {
                    self.index.min(last) - 1
                } else {
                    1
                };
                Some((next, true))
            }
            FlightMode::Stop => {
                if self.index >= last {
                    None
                } else {
                    Some((self.index + 1, false))
                }
            }
        }
    }
}

impl<V: VehicleController> Mode<V> for RouteMode {
    fn enter(&mut self, cx: &mut AutopilotContext<V>) -> Result<(), &'static str> {
        if cx.controller.waypoints().is_empty() {
            return Err("Route requires waypoints");
        }
        self.helm.clear();
        self.index = 0;
        self.reversed = false;
        cx.hold_brake = false;
        Ok(())
    }

    fn update(
        &mut self,
        cx: &mut AutopilotContext<V>,
        dt: f32,
        result: &mut NavigationResult,
    ) -> ModeStatus {
        let len = cx.controller.waypoints().len();
        if len == 0 {
            return ModeStatus::Finished(ExitReason::WaypointsCleared);
        }
        // The list may have shrunk since the last cycle
        self.index = self.index.min(len - 1);

        let frame = cx.frame();
        let mut target = cx.controller.waypoints()[self.index].clone();

        result.mode = NavMode::Route;
        result.waypoint_count = len;
        let speed = cx.cruise_speed();
        match self.helm.govern(cx, dt, speed, result) {
            Governance::Stop => return ModeStatus::Finished(ExitReason::EmergencyStop),
            Governance::Manual => {
                result.waypoint = Some(target.name.clone());
                result.distance = target.distance_to(&frame.position);
                return ModeStatus::Running;
            }
            Governance::Auto => {}
        }

        let threshold = reach_threshold(&cx.params, cx.sensors.speed());
        if target.distance_to(&frame.position) < threshold {
            match self.next_index(len, cx.controller.flight_mode()) {
                Some((next, wrapped)) => {
                    self.index = next;
                    if wrapped {
                        cx.notify(NavEvent::RouteWrapped {
                            patrol: cx.controller.flight_mode() == FlightMode::Patrol,
                        });
                    }
                    target = cx.controller.waypoints()[self.index].clone();
                }
                None => {
                    cx.hold_brake = true;
                    cx.disable();
                    result.holding = true;
                    result.waypoint = Some(target.name.clone());
                    result.distance = target.distance_to(&frame.position);
                    return ModeStatus::Finished(ExitReason::RouteComplete);
                }
            }
        }

        result.waypoint = Some(target.name.clone());
        result.distance = target.distance_to(&frame.position);
        cx.hold_brake = false;
        self.helm.pursue(cx, &frame, &target.position, dt, result);
        ModeStatus::Running
    }

    fn exit(&mut self, _cx: &mut AutopilotContext<V>) {
        self.helm.clear();
    }

    fn kind(&self) -> NavMode {
        NavMode::Route
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::navigation::Waypoint;
    use crate::parameters::ParameterStore;
    use crate::vehicle::StandardController;
    use nalgebra::Vector3;

    fn context(flight_mode: FlightMode) -> AutopilotContext<StandardController> {
        let mut controller = StandardController::new(5.0);
        controller.flight_mode = flight_mode;
        controller.push_waypoint(Waypoint::new("A", Vector3::new(10.0, 0.0, 0.0), 0.0));
        controller.push_waypoint(Waypoint::new("B", Vector3::new(10.0, 10.0, 0.0), 0.0));
        controller.push_waypoint(Waypoint::new("C", Vector3::new(0.0, 10.0, 0.0), 0.0));
        let mut cx = AutopilotContext::new(controller, &ParameterStore::new());
        cx.enabled = true;
        cx
    }

    /// Teleport onto the active waypoint and run one cycle
    fn arrive(mode: &mut RouteMode, cx: &mut AutopilotContext<StandardController>) -> NavigationResult {
        let position = cx.controller.waypoints()[mode.active_index()].position;
        cx.controller.position = position;
        let mut result = NavigationResult::default();
        let status = mode.update(cx, 0.1, &mut result);
        assert_eq!(status, ModeStatus::Running);
        result
    }

    #[test]
    fn test_route_advances_in_order() {
        let mut cx = context(FlightMode::Circle);
        let mut mode = RouteMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert_eq!(result.waypoint.as_deref(), Some("A"));
        assert_eq!(result.waypoint_count, 3);

        let result = arrive(&mut mode, &mut cx);
        assert_eq!(result.waypoint.as_deref(), Some("B"));
    }

    #[test]
    fn test_circle_wraps_to_first() {
        let mut cx = context(FlightMode::Circle);
        let mut mode = RouteMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        arrive(&mut mode, &mut cx);
        arrive(&mut mode, &mut cx);
        let result = arrive(&mut mode, &mut cx);

        assert_eq!(result.waypoint.as_deref(), Some("A"));
        assert_eq!(mode.active_index(), 0);
        assert!(cx.enabled);
        assert_eq!(
            cx.drain_events().as_slice(),
            &[NavEvent::RouteWrapped { patrol: false }]
        );
    }

    #[test]
    fn test_patrol_bounces() {
        let mut cx = context(FlightMode::Patrol);
        let mut mode = RouteMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        let mut visited: heapless::Vec<usize, 8> = heapless::Vec::new();
        for _ in 0..6 {
            arrive(&mut mode, &mut cx);
            visited.push(mode.active_index()).unwrap();
        }
        assert_eq!(visited.as_slice(), &[1, 2, 1, 0, 1, 2]);
    }

    #[test]
    fn test_stop_brakes_and_disables() {
        let mut cx = context(FlightMode::Stop);
        let mut mode = RouteMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();

        arrive(&mut mode, &mut cx);
        arrive(&mut mode, &mut cx);

        cx.controller.position = Vector3::new(0.0, 10.0, 0.0);
        let mut result = NavigationResult::default();
        assert_eq!(
            mode.update(&mut cx, 0.1, &mut result),
            ModeStatus::Finished(ExitReason::RouteComplete)
        );
        assert!(cx.hold_brake);
        assert!(!cx.enabled);
        assert!(result.holding);
    }

    #[test]
    fn test_shrunken_list_clamps_index() {
        let mut cx = context(FlightMode::Circle);
        let mut mode = RouteMode::new(&cx.params);
        Mode::enter(&mut mode, &mut cx).unwrap();
        arrive(&mut mode, &mut cx);
        arrive(&mut mode, &mut cx);
        assert_eq!(mode.active_index(), 2);

        let short = [
            Waypoint::new("X", Vector3::new(50.0, 0.0, 0.0), 0.0),
            Waypoint::new("Y", Vector3::new(60.0, 0.0, 0.0), 0.0),
        ];
        cx.controller.replace_waypoints(&short);
        let mut result = NavigationResult::default();
        mode.update(&mut cx, 0.1, &mut result);
        assert_eq!(result.waypoint.as_deref(), Some("Y"));
    }
}
