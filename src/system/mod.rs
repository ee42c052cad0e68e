//! Core system components for buggy operation
pub mod color;
pub mod color_click;
pub mod decision;
pub mod hw;
pub mod maneuver;
pub mod motor;
pub mod state;

#[cfg(feature = "firmware")]
pub mod buggy_hw;
#[cfg(feature = "firmware")]
pub mod resources;
