//! Wall-Colour Decision Table
//!
//! Pure mapping from a classified wall colour to the maneuver plan it
//! commands, separated from the side-effecting executor in [`crate::nav`] so
//! the table itself is testable in isolation.

use crate::system::color::WallColor;
use crate::system::motor::Spin;

/// One step of a maneuver plan
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    /// Rotate in place by `angle` degrees
    Rotate { spin: Spin, angle: u16 },
    /// Reverse one maze cell (fixed duration, see `NavConfig`)
    ReverseCell,
}

/// Outcome of classifying the wall ahead
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Execute and record these steps
    Act(&'static [Step]),
    /// White wall: the maze exit, triggers the backtrack
    Finish,
    /// Black / unclassifiable: count the miss, backtrack after too many
    NoColor,
    /// Nothing matched the calibration at all: do nothing this round
    Ignore,
}

const fn rotate(spin: Spin, angle: u16) -> Step {
    Step::Rotate { spin, angle }
}

const RED: &[Step] = &[rotate(Spin::Right, 90)];
const GREEN: &[Step] = &[rotate(Spin::Left, 90)];
const BLUE: &[Step] = &[rotate(Spin::Left, 180)];
const YELLOW: &[Step] = &[Step::ReverseCell, rotate(Spin::Right, 90)];
const PINK: &[Step] = &[Step::ReverseCell, rotate(Spin::Left, 90)];
const ORANGE: &[Step] = &[rotate(Spin::Right, 135)];
const LIGHT_BLUE: &[Step] = &[rotate(Spin::Left, 135)];

/// Maps a classification result to its maneuver plan
pub fn decide(color: Option<WallColor>) -> Decision {
    match color {
        Some(WallColor::Red) => Decision::Act(RED),
        Some(WallColor::Green) => Decision::Act(GREEN),
        Some(WallColor::Blue) => Decision::Act(BLUE),
        Some(WallColor::Yellow) => Decision::Act(YELLOW),
        Some(WallColor::Pink) => Decision::Act(PINK),
        Some(WallColor::Orange) => Decision::Act(ORANGE),
        Some(WallColor::LightBlue) => Decision::Act(LIGHT_BLUE),
        Some(WallColor::White) => Decision::Finish,
        Some(WallColor::Black) => Decision::NoColor,
        None => Decision::Ignore,
    }
}
