//! PID controller with leaky integral
//!
//! Gains are entered as whole-number tuning values and scaled by fixed
//! design constants so that operators can tune with integers:
//!
//! | Input | Scale | Example |
//! |-------|-------|---------|
//! | `kp` | / 10 | 10 → 1.0 |
//! | `ki` | / 10 | 2 → 0.2 |
//! | `kd` | / 1000 | 50 → 0.05 |
//! | `decay` | / 10 | 2 → 0.2 |
//!
//! The integral accumulator leaks by `decay` each call, which bounds windup
//! during sustained error (e.g. climbing a hill at a fixed throttle).

/// Smallest time step accepted by [`Pid::signal`] in seconds.
///
/// Non-positive or non-finite `dt` is clamped to this value.
pub const MIN_DT: f32 = 1.0e-3;

const KP_SCALE: f32 = 10.0;
const KI_SCALE: f32 = 10.0;
const KD_SCALE: f32 = 1000.0;
const DECAY_SCALE: f32 = 10.0;

/// Scaled controller gains
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f32,
    /// Integral gain
    pub ki: f32,
    /// Derivative gain
    pub kd: f32,
    /// Fraction of the accumulator dropped each call (0.0-1.0)
    pub decay: f32,
}

impl PidGains {
    /// Build gains from whole-number tuning input
    pub fn from_tuning(kp: f32, ki: f32, kd: f32, decay: f32) -> Self {
        Self {
            kp: kp / KP_SCALE,
            ki: ki / KI_SCALE,
            kd: kd / KD_SCALE,
            decay: (decay / DECAY_SCALE).clamp(0.0, 1.0),
        }
    }
}

/// Stateful PID controller
#[derive(Debug, Clone)]
pub struct Pid {
    gains: PidGains,
    accumulator: f32,
    previous_error: f32,
    first_run: bool,
}

impl Pid {
    /// Create a controller with all gains zero
    pub fn new() -> Self {
        Self {
            gains: PidGains::default(),
            accumulator: 0.0,
            previous_error: 0.0,
            first_run: true,
        }
    }

    /// Create a controller from whole-number tuning input
    pub fn with_tuning(kp: f32, ki: f32, kd: f32, decay: f32) -> Self {
        let mut pid = Self::new();
        pid.tune(kp, ki, kd, decay);
        pid
    }

    /// Set gains from whole-number tuning input
    ///
    /// Running state is left untouched.
    pub fn tune(&mut self, kp: f32, ki: f32, kd: f32, decay: f32) {
        self.gains = PidGains::from_tuning(kp, ki, kd, decay);
    }

    /// Current scaled gains
    pub fn gains(&self) -> PidGains {
        self.gains
    }

    /// Compute the control signal for `error` over `dt` seconds
    ///
    /// Returns 0.0 without touching state if `error` is not finite.
    pub fn signal(&mut self, error: f32, dt: f32) -> f32 {
        if !error.is_finite() {
            return 0.0;
        }
        let dt = sanitize_dt(dt);

        let proportional = self.gains.kp * error;
        let integral = self.integral(error, dt);
        let derivative = self.derivative(error, dt);

        proportional + integral + derivative
    }

    /// Reset running state without touching gains
    pub fn clear(&mut self) {
        self.accumulator = 0.0;
        self.previous_error = 0.0;
        self.first_run = true;
    }

    fn integral(&mut self, error: f32, dt: f32) -> f32 {
        self.accumulator *= 1.0 - self.gains.decay;
        self.accumulator += error * dt;
        self.gains.ki * self.accumulator
    }

    fn derivative(&mut self, error: f32, dt: f32) -> f32 {
        let previous = self.previous_error;
        self.previous_error = error;

        // No previous error exists yet; a derivative here would be a spike
        if self.first_run {
            self.first_run = false;
            return 0.0;
        }

        self.gains.kd * (error - previous) / dt
    }
}

impl Default for Pid {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize_dt(dt: f32) -> f32 {
    if dt.is_finite() && dt > MIN_DT {
        dt
    } else {
        MIN_DT
    }
}
