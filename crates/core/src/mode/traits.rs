//! Mode trait definition
//!
//! Interface shared by the Track, Follow and Route navigation modes.

use super::context::{AutopilotContext, ExitReason};
use crate::navigation::{NavMode, NavigationResult};
use crate::vehicle::VehicleController;

/// Outcome of one mode update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    /// Keep running next cycle
    Running,
    /// The mode has terminated
    Finished(ExitReason),
}

/// Navigation mode trait
///
/// # Lifecycle
///
/// 1. `enter()` - Called once when the mode is activated
/// 2. `update()` - Called every navigation cycle while active
/// 3. `exit()` - Called once when leaving the mode, for any reason
pub trait Mode<V: VehicleController> {
    /// Initialize mode (called once on activation)
    ///
    /// Returns `Err` if the mode cannot be entered.
    fn enter(&mut self, cx: &mut AutopilotContext<V>) -> Result<(), &'static str>;

    /// Run one navigation cycle
    ///
    /// # Arguments
    ///
    /// * `cx` - Shared autopilot context
    /// * `dt` - Seconds since the previous cycle
    /// * `result` - Snapshot to fill (already reset to defaults)
    fn update(
        &mut self,
        cx: &mut AutopilotContext<V>,
        dt: f32,
        result: &mut NavigationResult,
    ) -> ModeStatus;

    /// Cleanup mode (clears controllers so nothing carries into the next activation)
    fn exit(&mut self, cx: &mut AutopilotContext<V>);

    /// Mode reported in results and logs
    fn kind(&self) -> NavMode;
}
