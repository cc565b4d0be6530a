use rover_assist::AutopilotError;

/// Errors that can occur while building or running a simulation.
#[derive(Debug, thiserror::Error)]
pub enum SimulatorError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),

    #[error("Too many obstacles (max {0})")]
    TooManyObstacles(usize),

    #[error("Autopilot error: {0}")]
    Autopilot(#[from] AutopilotError),
}
