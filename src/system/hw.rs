//! Hardware Capability Traits
//!
//! The navigator reaches every peripheral through these traits (plus the
//! `embedded-hal` PWM and delay traits), keeping the engine host-testable and
//! free of register-level code. The firmware implementations live in
//! [`super::buggy_hw`] and [`super::color_click`].

use crate::system::color::ColorSample;

/// Four-channel colour sensor.
///
/// Reads are synchronous from the engine's point of view: they suspend until
/// a value is available and carry no staleness signal.
#[allow(async_fn_in_trait)]
pub trait ColorSensor {
    type Error;

    /// Reads all four channels as one sample
    async fn read(&mut self) -> Result<ColorSample, Self::Error>;

    /// Reads the clear channel alone (ambient-light baseline)
    async fn read_clear(&mut self) -> Result<u16, Self::Error>;
}

/// Resettable elapsed-tick counter used to time straight segments.
///
/// `ticks` is logically monotonic from the last `reset`. Implementations must
/// derive it by wrapping subtraction from a free-running counter so a 16-bit
/// wraparound mid-move still compares correctly.
pub trait TripTimer {
    fn reset(&mut self);

    /// Ticks elapsed since the last reset (wrapping)
    fn ticks(&self) -> u16;
}

/// Operator-visible lamps. Feedback only, never read back by the engine.
pub trait Lamps {
    /// LED array lighting the wall ahead of the sensor
    fn set_array(&mut self, on: bool);
    /// Brake lamp, lit while the ambient baseline is captured
    fn set_brake(&mut self, on: bool);
    /// Both turn indicators, lit for the whole backtrack replay
    fn set_indicators(&mut self, on: bool);
}

/// Momentary operator button
#[allow(async_fn_in_trait)]
pub trait Button {
    /// Resolves on the next debounced press
    async fn wait_press(&mut self);
}
