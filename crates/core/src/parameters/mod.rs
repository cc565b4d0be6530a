//! Parameter management types and utilities
//!
//! Every tunable value lives in a [`ParameterStore`]. Parameter blocks
//! (`NavigationParams`, `AvoidanceParams`) register their defaults and load
//! themselves back with range clamping.

pub mod avoidance;
pub mod error;
pub mod navigation;
pub mod storage;

pub use avoidance::AvoidanceParams;
pub use error::ParameterError;
pub use navigation::{NavigationParams, PidTuning};
pub use storage::{ParamFlags, ParamMetadata, ParamValue, ParameterStore, MAX_PARAMS, PARAM_NAME_LEN};

/// Register every parameter block's defaults
pub fn register_all(store: &mut ParameterStore) -> Result<(), ParameterError> {
    NavigationParams::register_defaults(store)?;
    AvoidanceParams::register_defaults(store)?;
    Ok(())
}
