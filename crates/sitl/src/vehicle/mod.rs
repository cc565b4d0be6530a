//! Kinematic bicycle model of a wheeled rover.
//!
//! Steering +1.0 turns the front wheels fully left. Propulsion sets the
//! drivetrain's target speed as a fraction of `max_speed`; the actual speed
//! follows with a first-order lag. The hold brake decelerates to a stop at
//! `brake_decel` regardless of propulsion.

pub mod config;

pub use config::RoverConfig;

use nalgebra::{UnitQuaternion, Vector3};

/// Actuator values applied for one simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ActuatorCommands {
    /// -1.0 (full right) to 1.0 (full left).
    pub steering: f32,
    /// -1.0 (full reverse) to 1.0 (full forward).
    pub propulsion: f32,
    pub braking: bool,
}

/// Simulated rover state.
#[derive(Debug, Clone)]
pub struct KinematicRover {
    config: RoverConfig,
    /// X position in meters.
    x: f32,
    /// Y position in meters.
    y: f32,
    /// Heading in radians (0 = +x, counter-clockwise).
    heading: f32,
    /// Signed forward speed in m/s.
    speed: f32,
}

impl KinematicRover {
    pub fn new(config: RoverConfig) -> Self {
        Self {
            config,
            x: 0.0,
            y: 0.0,
            heading: 0.0,
            speed: 0.0,
        }
    }

    /// Place the rover at rest.
    pub fn place(&mut self, x: f32, y: f32, heading: f32) {
        self.x = x;
        self.y = y;
        self.heading = normalize_angle(heading);
        self.speed = 0.0;
    }

    /// Integrate one time step.
    pub fn step(&mut self, commands: &ActuatorCommands, dt: f32) {
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }

        if commands.braking {
            let change = self.config.brake_decel * dt;
            self.speed = if self.speed.abs() <= change {
                0.0
            } else {
                self.speed - change * self.speed.signum()
            };
        } else {
            let target = finite_or_zero(commands.propulsion).clamp(-1.0, 1.0) * self.config.max_speed;
            let alpha = (dt / self.config.drive_time_constant).min(1.0);
            self.speed += (target - self.speed) * alpha;
        }

        let wheel_angle = finite_or_zero(commands.steering).clamp(-1.0, 1.0) * self.config.max_wheel_angle;
        let yaw_rate = self.speed / self.config.wheel_base * wheel_angle.tan();
        self.heading = normalize_angle(self.heading + yaw_rate * dt);

        self.x += self.speed * self.heading.cos() * dt;
        self.y += self.speed * self.heading.sin() * dt;
    }

    pub fn position(&self) -> Vector3<f32> {
        Vector3::new(self.x, self.y, 0.0)
    }

    pub fn heading(&self) -> f32 {
        self.heading
    }

    pub fn orientation(&self) -> UnitQuaternion<f32> {
        UnitQuaternion::from_euler_angles(0.0, 0.0, self.heading)
    }

    /// Signed forward speed in m/s.
    pub fn speed(&self) -> f32 {
        self.speed
    }

    /// World-frame velocity.
    pub fn velocity(&self) -> Vector3<f32> {
        Vector3::new(
            self.speed * self.heading.cos(),
            self.speed * self.heading.sin(),
            0.0,
        )
    }

    pub fn config(&self) -> &RoverConfig {
        &self.config
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Wrap an angle to [-pi, pi].
pub fn normalize_angle(angle: f32) -> f32 {
    let mut a = angle % (2.0 * std::f32::consts::PI);
    if a > std::f32::consts::PI {
        a -= 2.0 * std::f32::consts::PI;
    } else if a < -std::f32::consts::PI {
        a += 2.0 * std::f32::consts::PI;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rover() -> KinematicRover {
        KinematicRover::new(RoverConfig::default())
    }

    fn drive(rover: &mut KinematicRover, commands: ActuatorCommands, seconds: f32) {
        let steps = (seconds / 0.01).round() as usize;
        for _ in 0..steps {
            rover.step(&commands, 0.01);
        }
    }

    #[test]
    fn test_straight_line_motion() {
        let mut rover = rover();
        drive(
            &mut rover,
            ActuatorCommands {
                propulsion: 0.5,
                ..Default::default()
            },
            5.0,
        );

        let p = rover.position();
        assert!(p.x > 8.0, "expected forward travel, got {}", p.x);
        assert!(p.y.abs() < 1e-4, "expected no drift, got {}", p.y);
        assert!((rover.speed() - 2.5).abs() < 0.05, "speed {}", rover.speed());
    }

    #[test]
    fn test_positive_steering_turns_left() {
        let mut rover = rover();
        drive(
            &mut rover,
            ActuatorCommands {
                steering: 1.0,
                propulsion: 0.2,
                braking: false,
            },
            1.0,
        );
        assert!(rover.heading() > 0.0, "heading {}", rover.heading());
        assert!(rover.position().y > 0.0);
    }

    #[test]
    fn test_brake_stops_without_reversing() {
        let mut rover = rover();
        drive(
            &mut rover,
            ActuatorCommands {
                propulsion: 1.0,
                ..Default::default()
            },
            3.0,
        );
        assert!(rover.speed() > 4.0);

        drive(
            &mut rover,
            ActuatorCommands {
                propulsion: 1.0,
                braking: true,
                ..Default::default()
            },
            2.0,
        );
        assert_eq!(rover.speed(), 0.0);
    }

    #[test]
    fn test_invalid_dt_ignored() {
        let mut rover = rover();
        let commands = ActuatorCommands {
            propulsion: 1.0,
            ..Default::default()
        };
        rover.step(&commands, 0.0);
        rover.step(&commands, f32::NAN);
        assert_eq!(rover.position(), Vector3::zeros());
    }

    #[test]
    fn test_config_validation() {
        assert!(RoverConfig::default().validate().is_ok());
        let bad = RoverConfig {
            wheel_base: 0.0,
            ..Default::default()
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_normalize_angle() {
        let tau = 2.0 * std::f32::consts::PI;
        assert!((normalize_angle(tau + 0.5) - 0.5).abs() < 1e-5);
        assert!((normalize_angle(-tau - 0.5) + 0.5).abs() < 1e-5);
        assert!((normalize_angle(-0.5) + 0.5).abs() < 1e-6);
    }
}
