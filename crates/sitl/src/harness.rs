//! Closed-loop simulation harness.
//!
//! Plays the role of the host actuation loop: each step feeds the rover's
//! pose, measured velocity and sensor detections into the autopilot,
//! advances it with a microsecond timestamp, then applies the published
//! steering and cruise commands to the kinematic model.

use nalgebra::Vector3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rover_assist::Autopilot;
use rover_assist_core::navigation::{NavMode, NavigationResult};
use rover_assist_core::parameters::ParameterStore;
use rover_assist_core::vehicle::{StandardController, VehicleController};

use crate::error::SimulatorError;
use crate::vehicle::{ActuatorCommands, KinematicRover, RoverConfig};
use crate::world::ObstacleWorld;

/// Harness configuration.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub rover: RoverConfig,
    /// Speed limit reported by the vehicle controller in m/s.
    pub speed_limit: f32,
    /// Simulation step size in microseconds.
    pub step_size_us: u64,
    /// Range sensor reach in meters; `None` simulates a vehicle without one.
    pub sensor_range: Option<f32>,
    /// RNG seed for deterministic mode. None = random.
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rover: RoverConfig::default(),
            speed_limit: 5.0,
            step_size_us: 20_000, // 50 Hz
            sensor_range: Some(12.0),
            seed: Some(42),
        }
    }
}

/// State captured after one simulation step.
#[derive(Debug, Clone, PartialEq)]
pub struct Telemetry {
    pub time_s: f32,
    pub position: Vector3<f32>,
    pub heading: f32,
    pub speed: f32,
    pub commands: ActuatorCommands,
    /// Navigation snapshot published this step, if any.
    pub navigation: Option<NavigationResult>,
    pub collided: bool,
}

impl Telemetry {
    pub fn mode(&self) -> NavMode {
        self.navigation.as_ref().map_or(NavMode::Idle, |n| n.mode)
    }
}

/// Autopilot + rover + world in a closed loop.
pub struct Simulation {
    autopilot: Autopilot<StandardController>,
    rover: KinematicRover,
    world: ObstacleWorld,
    rng: StdRng,
    config: SimulationConfig,
    sim_time_us: u64,
    step_count: u64,
}

impl Simulation {
    pub fn new(config: SimulationConfig, store: &ParameterStore) -> Result<Self, SimulatorError> {
        config.rover.validate()?;
        if config.step_size_us == 0 {
            return Err(SimulatorError::InvalidConfig("step_size_us must be positive"));
        }

        let autopilot = Autopilot::new(StandardController::new(config.speed_limit), store)?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            autopilot,
            rover: KinematicRover::new(config.rover.clone()),
            world: ObstacleWorld::new(config.sensor_range.unwrap_or(0.0)),
            rng,
            config,
            sim_time_us: 0,
            step_count: 0,
        })
    }

    /// Create with default configuration and parameters.
    pub fn with_defaults() -> Result<Self, SimulatorError> {
        Self::new(SimulationConfig::default(), &ParameterStore::new())
    }

    /// Run one closed-loop step.
    pub fn step(&mut self) -> Telemetry {
        let dt = self.config.step_size_us as f32 / 1_000_000.0;
        self.sim_time_us += self.config.step_size_us;
        self.step_count += 1;

        self.sense();
        self.autopilot.update(self.sim_time_us);

        let commands = self.actuate();
        self.rover.step(&commands, dt);
        self.world.step(dt);

        let position = self.rover.position();
        Telemetry {
            time_s: self.sim_time_us as f32 / 1_000_000.0,
            position,
            heading: self.rover.heading(),
            speed: self.rover.speed(),
            commands,
            navigation: self.autopilot.navigation().cloned(),
            collided: self.world.collides(&position),
        }
    }

    /// Run `steps` steps, returning the telemetry of each.
    pub fn run(&mut self, steps: usize) -> Vec<Telemetry> {
        (0..steps).map(|_| self.step()).collect()
    }

    /// Step until `done` holds or `max_steps` elapse.
    ///
    /// Returns the telemetry of the step that satisfied `done`.
    pub fn run_until<F>(&mut self, max_steps: usize, mut done: F) -> Option<Telemetry>
    where
        F: FnMut(&Telemetry) -> bool,
    {
        for _ in 0..max_steps {
            let telemetry = self.step();
            if done(&telemetry) {
                return Some(telemetry);
            }
        }
        None
    }

    fn sense(&mut self) {
        let position = self.rover.position();
        let noise = self.config.rover.velocity_noise;
        let velocity = self.rover.velocity()
            + Vector3::new(self.gaussian_noise(noise), self.gaussian_noise(noise), 0.0);
        let detections = self
            .config
            .sensor_range
            .map(|_| self.world.detect(&position));

        let controller = self.autopilot.controller_mut();
        controller.position = position;
        controller.orientation = self.rover.orientation();

        let sensors = self.autopilot.sensors_mut();
        sensors.velocity = velocity;
        sensors.detections = detections;
    }

    fn actuate(&self) -> ActuatorCommands {
        let steering = self.autopilot.navigation().map_or(0.0, |n| n.steering);
        match self.autopilot.cruise() {
            Some(cruise) => ActuatorCommands {
                steering,
                propulsion: cruise.propulsion,
                braking: cruise.braking,
            },
            None => ActuatorCommands {
                steering,
                ..Default::default()
            },
        }
    }

    /// Box-Muller gaussian sample.
    fn gaussian_noise(&mut self, stddev: f32) -> f32 {
        if stddev == 0.0 {
            return 0.0;
        }
        let u1: f32 = self.rng.gen::<f32>().max(f32::EPSILON);
        let u2: f32 = self.rng.gen();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
        z * stddev
    }

    pub fn autopilot(&self) -> &Autopilot<StandardController> {
        &self.autopilot
    }

    pub fn autopilot_mut(&mut self) -> &mut Autopilot<StandardController> {
        &mut self.autopilot
    }

    pub fn rover(&self) -> &KinematicRover {
        &self.rover
    }

    pub fn rover_mut(&mut self) -> &mut KinematicRover {
        &mut self.rover
    }

    pub fn world(&self) -> &ObstacleWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ObstacleWorld {
        &mut self.world
    }

    /// Distance from the rover to the controller's first waypoint.
    pub fn distance_to_first_waypoint(&self) -> Option<f32> {
        self.autopilot
            .controller()
            .waypoints()
            .first()
            .map(|w| w.distance_to(&self.rover.position()))
    }

    pub fn sim_time_us(&self) -> u64 {
        self.sim_time_us
    }

    pub fn step_count(&self) -> u64 {
        self.step_count
    }
}
