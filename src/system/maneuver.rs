//! Move Sequence Recorder
//!
//! Every maneuver the buggy executes on its way through the maze is appended
//! to a bounded, ordered log with just enough data to be replayed in reverse.
//! The backtrack replayer walks this log from the newest entry down, inverting
//! the directional sense of each move.

use crate::system::motor::{Heading, Spin};

/// Maximum number of moves one run can remember
pub const MOVE_LOG_CAPACITY: usize = 50;

/// One atomic recorded motion, immutable once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Maneuver {
    /// Straight segment: replayed by driving at `power` until the trip timer
    /// passes `ticks`.
    Straight {
        heading: Heading,
        power: u8,
        ticks: u16,
    },
    /// In-place rotation, replayed immediately for the same angle. Rotations
    /// are angle-bounded, not time-bounded, so they carry no duration.
    Rotate { spin: Spin, angle: u16 },
}

impl Maneuver {
    /// Flips the directional sense, keeping every magnitude unchanged
    pub fn inverted(self) -> Self {
        match self {
            Maneuver::Straight {
                heading,
                power,
                ticks,
            } => Maneuver::Straight {
                heading: heading.inverted(),
                power,
                ticks,
            },
            Maneuver::Rotate { spin, angle } => Maneuver::Rotate {
                spin: spin.inverted(),
                angle,
            },
        }
    }
}

/// Recording rejected because the log is at capacity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LogFull;

/// Append-only, capacity-bounded sequence of maneuvers.
#[derive(Debug, Clone, Default)]
pub struct MoveLog {
    moves: heapless::Vec<Maneuver, MOVE_LOG_CAPACITY>,
}

impl MoveLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a maneuver, rejecting it once the capacity is reached
    pub fn record(&mut self, maneuver: Maneuver) -> Result<(), LogFull> {
        self.moves.push(maneuver).map_err(|_| LogFull)
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Recorded maneuvers in execution order
    pub fn iter(&self) -> impl Iterator<Item = &Maneuver> {
        self.moves.iter()
    }

    /// Recorded maneuvers from the newest entry down to the first
    pub fn iter_rev(&self) -> impl Iterator<Item = &Maneuver> {
        self.moves.iter().rev()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }
}
