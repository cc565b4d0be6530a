//! Waypoints and the bounded trailing waypoint queue

use heapless::{Deque, String};
use nalgebra::Vector3;

use super::frame::planar_distance;

/// Maximum waypoint label length
pub const WAYPOINT_NAME_LEN: usize = 24;

/// Named world position and the time it was recorded
#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub name: String<WAYPOINT_NAME_LEN>,
    pub position: Vector3<f32>,
    /// Recording time (seconds)
    pub recorded_at: f32,
}

impl Waypoint {
    /// Create a waypoint; labels longer than [`WAYPOINT_NAME_LEN`] are truncated
    pub fn new(name: &str, position: Vector3<f32>, recorded_at: f32) -> Self {
        let mut label = String::new();
        for c in name.chars() {
            if label.push(c).is_err() {
                break;
            }
        }
        Self {
            name: label,
            position,
            recorded_at,
        }
    }

    /// Horizontal distance to a world point
    pub fn distance_to(&self, point: &Vector3<f32>) -> f32 {
        planar_distance(&self.position, point)
    }
}

/// Bounded FIFO of recently visited points
///
/// Admission is gated by a caller-supplied distinctness predicate. When the
/// queue is full the oldest entry is evicted to make room.
#[derive(Debug, Clone)]
pub struct WaypointQueue<const N: usize> {
    points: Deque<Waypoint, N>,
}

impl<const N: usize> WaypointQueue<N> {
    pub fn new() -> Self {
        Self {
            points: Deque::new(),
        }
    }

    /// Admit `point` if `is_distinct` accepts it
    ///
    /// Returns whether the point was admitted.
    pub fn enqueue<F>(&mut self, point: Waypoint, is_distinct: F) -> bool
    where
        F: FnOnce(&Self, &Waypoint) -> bool,
    {
        if !is_distinct(self, &point) {
            return false;
        }
        if self.points.is_full() {
            self.points.pop_front();
        }
        self.points.push_back(point).is_ok()
    }

    /// Oldest entry
    pub fn peek(&self) -> Option<&Waypoint> {
        self.points.front()
    }

    /// Remove and return the oldest entry
    pub fn dequeue(&mut self) -> Option<Waypoint> {
        self.points.pop_front()
    }

    /// Newest entry
    pub fn latest(&self) -> Option<&Waypoint> {
        self.points.back()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn capacity(&self) -> usize {
        N
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    /// Entries oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Waypoint> {
        self.points.iter()
    }

    /// Average speed over consecutive entries
    ///
    /// Pairs recorded at the same instant (or out of order) are skipped.
    /// Returns 0.0 with fewer than two entries.
    pub fn estimated_speed(&self) -> f32 {
        let mut distance = 0.0;
        let mut elapsed = 0.0;

        for (a, b) in self.points.iter().zip(self.points.iter().skip(1)) {
            let dt = b.recorded_at - a.recorded_at;
            if dt <= 0.0 {
                continue;
            }
            distance += a.distance_to(&b.position);
            elapsed += dt;
        }

        if elapsed > 0.0 {
            distance / elapsed
        } else {
            0.0
        }
    }

    /// Predicate admitting points farther than `threshold` from the newest entry
    pub fn spaced(threshold: f32) -> impl Fn(&Self, &Waypoint) -> bool {
        move |queue: &Self, candidate: &Waypoint| match queue.latest() {
            Some(last) => last.distance_to(&candidate.position) > threshold,
            None => true,
        }
    }
}

impl<const N: usize> Default for WaypointQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}
