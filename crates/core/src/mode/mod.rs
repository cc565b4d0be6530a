//! Autopilot navigation modes and tasks
//!
//! # Contents
//!
//! - [`Mode`] trait and the Track, Follow and Route modes
//! - [`Navigator`]: the navigation state machine task
//! - [`CruiseControl`]: the speed-hold task
//! - [`AutopilotContext`]: state shared between both tasks
//!
//! The two tasks communicate only through the context: the navigator writes
//! a [`CruiseRequest`] and the hold-brake flag, the cruise task reads them.

mod context;
mod cruise;
mod follow;
mod helm;
mod navigator;
mod route;
mod track;
mod traits;

pub use context::{
    AutopilotContext, CruiseCommand, CruiseRequest, ExitReason, NavEvent, TaskOutput,
    MAX_NAV_EVENTS,
};
pub use cruise::CruiseControl;
pub use follow::{FollowMode, FOLLOW_TRAIL_LEN};
pub use helm::{reach_threshold, Governance, Helm};
pub use navigator::Navigator;
pub use route::RouteMode;
pub use track::TrackMode;
pub use traits::{Mode, ModeStatus};
