//! Operator command surface
//!
//! Text commands, tokens case-insensitive:
//!
//! | Command | Effect |
//! |---------|--------|
//! | `record` | Toggle recording; stopping loads the recorded route |
//! | `load <name> [reverse]` | Load a stored route as the waypoint list |
//! | `play <name> [reverse]` | Load a stored route and enable the autopilot |
//! | `save [name]` | Store the current waypoints (default name `default`) |
//!
//! Route names are folded to lowercase.

use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::str::FromStr;

use rover_assist_core::vehicle::VehicleController;

use crate::autopilot::Autopilot;
use crate::core::log_buffer::LogLevel;
use crate::route_store::{load_route, save_route, KeyValueStore, RouteError};

/// Route name used by `save` without an argument
pub const DEFAULT_ROUTE_NAME: &str = "default";

/// Command parsing and execution errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("Unexpected argument: {0}")]
    UnexpectedArgument(String),

    #[error("No waypoints")]
    NoWaypoints,

    #[error(transparent)]
    Route(#[from] RouteError),
}

/// Parsed operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Record,
    Load { name: String, reverse: bool },
    Play { name: String, reverse: bool },
    Save { name: String },
}

/// Result of a successful command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    RecordingStarted,
    RecordingStopped { waypoints: usize },
    Loaded { waypoints: usize },
    Playing { waypoints: usize },
    Saved { waypoints: usize },
}

impl Command {
    pub fn parse(input: &str) -> Result<Self, CommandError> {
        let mut tokens = input.split_whitespace();
        let keyword = tokens.next().ok_or(CommandError::Empty)?;

        let command = if keyword.eq_ignore_ascii_case("record") {
            Command::Record
        } else if keyword.eq_ignore_ascii_case("load") || keyword.eq_ignore_ascii_case("play") {
            let name = tokens
                .next()
                .ok_or(CommandError::MissingArgument("route name"))?
                .to_ascii_lowercase();
            let reverse = match tokens.next() {
                None => false,
                Some(flag) if flag.eq_ignore_ascii_case("reverse") => true,
                Some(other) => return Err(CommandError::UnexpectedArgument(other.to_string())),
            };
            if keyword.eq_ignore_ascii_case("load") {
                Command::Load { name, reverse }
            } else {
                Command::Play { name, reverse }
            }
        } else if keyword.eq_ignore_ascii_case("save") {
            let name = tokens
                .next()
                .map_or_else(|| DEFAULT_ROUTE_NAME.to_string(), str::to_ascii_lowercase);
            Command::Save { name }
        } else {
            return Err(CommandError::Unknown(keyword.to_string()));
        };

        match tokens.next() {
            Some(extra) => Err(CommandError::UnexpectedArgument(extra.to_string())),
            None => Ok(command),
        }
    }

    /// Apply the command to `autopilot`, reading and writing routes in `store`
    pub fn execute<V, S>(
        &self,
        autopilot: &mut Autopilot<V>,
        store: &mut S,
    ) -> Result<CommandOutcome, CommandError>
    where
        V: VehicleController,
        S: KeyValueStore + ?Sized,
    {
        match self {
            Command::Record => {
                if autopilot.recorder().is_recording() {
                    let route: Vec<_> = autopilot.recorder_mut().stop().to_vec();
                    let waypoints = autopilot.load_waypoints(&route);
                    Ok(CommandOutcome::RecordingStopped { waypoints })
                } else {
                    autopilot.recorder_mut().start();
                    Ok(CommandOutcome::RecordingStarted)
                }
            }
            Command::Load { name, reverse } => {
                let waypoints = load(autopilot, store, name, *reverse)?;
                Ok(CommandOutcome::Loaded { waypoints })
            }
            Command::Play { name, reverse } => {
                let waypoints = load(autopilot, store, name, *reverse)?;
                autopilot.set_enabled(true);
                Ok(CommandOutcome::Playing { waypoints })
            }
            Command::Save { name } => {
                let waypoints = autopilot.controller().waypoints();
                if waypoints.is_empty() {
                    return Err(CommandError::NoWaypoints);
                }
                save_route(store, name, waypoints)?;
                Ok(CommandOutcome::Saved {
                    waypoints: waypoints.len(),
                })
            }
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Command::parse(s)
    }
}

fn load<V, S>(
    autopilot: &mut Autopilot<V>,
    store: &S,
    name: &str,
    reverse: bool,
) -> Result<usize, CommandError>
where
    V: VehicleController,
    S: KeyValueStore + ?Sized,
{
    let mut route = load_route(store, name)?;
    if route.is_empty() {
        return Err(CommandError::NoWaypoints);
    }
    if reverse {
        route.reverse();
    }
    Ok(autopilot.load_waypoints(&route))
}

/// Parse and execute one command line, mirroring the outcome to the status log
pub fn run_command<V, S>(
    autopilot: &mut Autopilot<V>,
    store: &mut S,
    line: &str,
) -> Result<CommandOutcome, CommandError>
where
    V: VehicleController,
    S: KeyValueStore + ?Sized,
{
    let result = Command::parse(line).and_then(|command| command.execute(autopilot, store));
    match &result {
        Ok(outcome) => {
            crate::log_info!("Command accepted: {}", line);
            match outcome {
                CommandOutcome::RecordingStarted => {
                    autopilot.report(LogLevel::Info, format_args!("Recording"))
                }
                CommandOutcome::RecordingStopped { waypoints } => autopilot.report(
                    LogLevel::Info,
                    format_args!("Recorded {} waypoints", waypoints),
                ),
                CommandOutcome::Loaded { waypoints } => autopilot
                    .report(LogLevel::Info, format_args!("Loaded {} waypoints", waypoints)),
                CommandOutcome::Playing { waypoints } => autopilot
                    .report(LogLevel::Info, format_args!("Playing {} waypoints", waypoints)),
                CommandOutcome::Saved { waypoints } => autopilot
                    .report(LogLevel::Info, format_args!("Saved {} waypoints", waypoints)),
            }
        }
        Err(error) => {
            crate::log_warn!("Command rejected: {}", line);
            autopilot.report(LogLevel::Warn, format_args!("{}", error));
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(Command::parse("record"), Ok(Command::Record));
        assert_eq!(
            Command::parse("  LOAD Home  "),
            Ok(Command::Load {
                name: "home".to_string(),
                reverse: false
            })
        );
        assert_eq!(
            "play yard Reverse".parse::<Command>(),
            Ok(Command::Play {
                name: "yard".to_string(),
                reverse: true
            })
        );
        assert_eq!(
            Command::parse("save"),
            Ok(Command::Save {
                name: DEFAULT_ROUTE_NAME.to_string()
            })
        );
        assert_eq!(
            Command::parse("Save Loop"),
            Ok(Command::Save {
                name: "loop".to_string()
            })
        );
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(Command::parse("   "), Err(CommandError::Empty));
        assert_eq!(
            Command::parse("fly home"),
            Err(CommandError::Unknown("fly".to_string()))
        );
        assert_eq!(
            Command::parse("load"),
            Err(CommandError::MissingArgument("route name"))
        );
        assert_eq!(
            Command::parse("load home backwards"),
            Err(CommandError::UnexpectedArgument("backwards".to_string()))
        );
        assert_eq!(
            Command::parse("record now"),
            Err(CommandError::UnexpectedArgument("now".to_string()))
        );
        assert_eq!(
            Command::parse("play home reverse twice"),
            Err(CommandError::UnexpectedArgument("twice".to_string()))
        );
    }

    #[test]
    fn test_error_messages() {
        let error = CommandError::from(RouteError::NotFound("home".to_string()));
        assert_eq!(format!("{}", error), "No route named home");
        assert_eq!(
            format!("{}", CommandError::MissingArgument("route name")),
            "Missing argument: route name"
        );
    }
}
