use crate::error::SimulatorError;

/// Physical parameters of the simulated rover.
#[derive(Debug, Clone)]
pub struct RoverConfig {
    /// Distance between front and rear axles in meters.
    pub wheel_base: f32,
    /// Front wheel angle at full steering deflection in radians.
    pub max_wheel_angle: f32,
    /// Speed at full propulsion in m/s.
    pub max_speed: f32,
    /// Time constant of the drivetrain speed response in seconds.
    pub drive_time_constant: f32,
    /// Deceleration with the hold brake applied in m/s².
    pub brake_decel: f32,
    /// Velocity sensor noise standard deviation in m/s.
    pub velocity_noise: f32,
}

impl Default for RoverConfig {
    fn default() -> Self {
        Self {
            wheel_base: 0.5,
            max_wheel_angle: 0.5,
            max_speed: 5.0,
            drive_time_constant: 0.5,
            brake_decel: 4.0,
            velocity_noise: 0.02,
        }
    }
}

impl RoverConfig {
    /// Check that every parameter is physically meaningful.
    pub fn validate(&self) -> Result<(), SimulatorError> {
        let positive = |v: f32| v.is_finite() && v > 0.0;
        if !positive(self.wheel_base) {
            return Err(SimulatorError::InvalidConfig("wheel_base must be positive"));
        }
        if !positive(self.max_wheel_angle) || self.max_wheel_angle >= core::f32::consts::FRAC_PI_2 {
            return Err(SimulatorError::InvalidConfig("max_wheel_angle must be in (0, pi/2)"));
        }
        if !positive(self.max_speed) {
            return Err(SimulatorError::InvalidConfig("max_speed must be positive"));
        }
        if !positive(self.drive_time_constant) {
            return Err(SimulatorError::InvalidConfig("drive_time_constant must be positive"));
        }
        if !positive(self.brake_decel) {
            return Err(SimulatorError::InvalidConfig("brake_decel must be positive"));
        }
        if !self.velocity_noise.is_finite() || self.velocity_noise < 0.0 {
            return Err(SimulatorError::InvalidConfig("velocity_noise must be non-negative"));
        }
        Ok(())
    }
}
