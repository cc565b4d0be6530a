//! Route recorder
//!
//! While recording, samples the vehicle position every tick and keeps the
//! points spaced at least [`RECORD_SPACING`] apart. Points are labelled
//! `WP1`, `WP2`, ... in recording order. Stopping hands the route back so it
//! can be loaded as the controller's waypoint list.

use core::fmt::Write;

use heapless::{String, Vec};
use nalgebra::Vector3;
use rover_assist_core::navigation::{planar_distance, Waypoint, WAYPOINT_NAME_LEN};
use rover_assist_core::vehicle::MAX_WAYPOINTS;

/// Minimum spacing between recorded points (meters)
pub const RECORD_SPACING: f32 = 2.0;

/// Bounded route recorder
#[derive(Debug, Clone, Default)]
pub struct RouteRecorder {
    recording: bool,
    route: Vec<Waypoint, MAX_WAYPOINTS>,
}

impl RouteRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh recording, discarding any previous one
    pub fn start(&mut self) {
        self.route.clear();
        self.recording = true;
    }

    /// Stop recording and return the recorded route
    pub fn stop(&mut self) -> &[Waypoint] {
        self.recording = false;
        &self.route
    }

    pub fn is_recording(&self) -> bool {
        self.recording
    }

    /// `true` once the route can take no more points
    pub fn is_full(&self) -> bool {
        self.route.is_full()
    }

    /// Recorded points, oldest first
    pub fn route(&self) -> &[Waypoint] {
        &self.route
    }

    /// Offer the current position
    ///
    /// Returns the new point if one was admitted. Non-finite positions,
    /// points too close to the last one, and points past capacity are
    /// dropped.
    pub fn sample(&mut self, position: &Vector3<f32>, now: f32) -> Option<&Waypoint> {
        if !self.recording || self.route.is_full() {
            return None;
        }
        if !position.iter().all(|c| c.is_finite()) {
            return None;
        }
        if let Some(last) = self.route.last() {
            if planar_distance(&last.position, position) < RECORD_SPACING {
                return None;
            }
        }

        let mut label: String<WAYPOINT_NAME_LEN> = String::new();
        let _ = write!(label, "WP{}", self.route.len() + 1);
        self.route
            .push(Waypoint::new(&label, *position, now))
            .ok()?;
        self.route.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_recorder_ignores_samples() {
        let mut recorder = RouteRecorder::new();
        assert!(recorder.sample(&Vector3::zeros(), 0.0).is_none());
        assert!(recorder.route().is_empty());
    }

    #[test]
    fn test_spacing_and_labels() {
        let mut recorder = RouteRecorder::new();
        recorder.start();

        for step in 0..10 {
            let x = step as f32 * 0.5;
            recorder.sample(&Vector3::new(x, 0.0, 0.0), step as f32);
        }

        // x = 0.0, 2.0, 4.0
        let labels: std::vec::Vec<_> = recorder.route().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(labels, ["WP1", "WP2", "WP3"]);
        assert!((recorder.route()[1].position.x - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_stop_returns_route_and_halts() {
        let mut recorder = RouteRecorder::new();
        recorder.start();
        recorder.sample(&Vector3::new(0.0, 0.0, 0.0), 0.0);
        recorder.sample(&Vector3::new(0.0, 5.0, 0.0), 1.0);

        assert_eq!(recorder.stop().len(), 2);
        assert!(!recorder.is_recording());
        assert!(recorder.sample(&Vector3::new(0.0, 50.0, 0.0), 2.0).is_none());
    }

    #[test]
    fn test_restart_discards_previous_route() {
        let mut recorder = RouteRecorder::new();
        recorder.start();
        recorder.sample(&Vector3::zeros(), 0.0);
        recorder.start();
        assert!(recorder.route().is_empty());
    }

    #[test]
    fn test_capacity_bounded() {
        let mut recorder = RouteRecorder::new();
        recorder.start();
        for step in 0..(MAX_WAYPOINTS + 10) {
            recorder.sample(&Vector3::new(step as f32 * 3.0, 0.0, 0.0), 0.0);
        }
        assert!(recorder.is_full());
        assert_eq!(recorder.route().len(), MAX_WAYPOINTS);
    }

    #[test]
    fn test_non_finite_position_dropped() {
        let mut recorder = RouteRecorder::new();
        recorder.start();
        assert!(recorder
            .sample(&Vector3::new(f32::NAN, 0.0, 0.0), 0.0)
            .is_none());
    }
}
