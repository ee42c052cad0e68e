//! Robot State
//!
//! The single unit of mutable state for the whole engine. The control task
//! owns one [`RobotState`] and passes it by mutable reference into every
//! navigator operation; there are no process-wide singletons.

use crate::system::color::{CalibrationSet, ColorDescriptor};
use crate::system::maneuver::MoveLog;

/// Aggregate engine state for one navigation run.
#[derive(Debug, Clone, Default)]
pub struct RobotState {
    /// Reference descriptors from the operator calibration run
    pub calibration: CalibrationSet,
    /// Most recent descriptor sampled from the sensor
    pub last_color: ColorDescriptor,
    /// Clear-channel ambient baseline, captured before each wall approach
    pub ambient: u16,
    /// Consecutive classifications that landed on the "no colour" reference
    pub no_color_streak: u8,
    /// Once set, navigation stops and the backtrack replays the move log.
    /// Only a restart clears it.
    pub backtrack: bool,
    /// Every maneuver executed on the way in, in execution order
    pub log: MoveLog,
}

impl RobotState {
    pub fn new() -> Self {
        Self::default()
    }
}
