//! Maze buggy navigation and motion control engine
//!
//! Drives a two-wheel buggy through a maze by wall-following: approach a wall,
//! classify its colour against nine calibrated references, execute the maneuver
//! that colour commands, and remember every move so the whole run can be
//! replayed in reverse to return to the start.
//!
//! The engine is hardware-free: motors, colour sensor, trip timer, lamps and
//! buttons are reached through the capability traits in [`system::hw`] and
//! `embedded-hal`. The `firmware` feature adds the RP2350 binary that wires
//! real peripherals into the engine and spawns the control tasks.

#![no_std]

#[cfg(test)]
extern crate std;

/// Navigation state machine: wall approach, colour dispatch, backtrack
pub mod nav;
/// Core types, algorithms and hardware capability traits
pub mod system;
/// Embassy task implementations
#[cfg(feature = "firmware")]
pub mod task;

#[cfg(test)]
mod testing;
