//! RP2350 implementations of the hardware capability traits.
//!
//! Thin adapters from GPIO and the embassy time driver onto the traits in
//! [`crate::system::hw`], so the navigation engine stays target-free.

use embassy_rp::gpio::{Input, Output};
use embassy_time::{Instant, Timer};

use crate::system::hw::{Button, Lamps, TripTimer};

/// Debounce settle after an edge (ms)
const DEBOUNCE_MS: u64 = 30;

/// All buggy lamps as plain GPIO outputs.
///
/// The headlamp array is tricolour; the engine only ever asks for white, so
/// all three channels switch together.
pub struct BuggyLamps {
    pub array_red: Output<'static>,
    pub array_green: Output<'static>,
    pub array_blue: Output<'static>,
    pub brake: Output<'static>,
    pub indicator_left: Output<'static>,
    pub indicator_right: Output<'static>,
}

impl Lamps for BuggyLamps {
    fn set_array(&mut self, on: bool) {
        self.array_red.set_level(on.into());
        self.array_green.set_level(on.into());
        self.array_blue.set_level(on.into());
    }

    fn set_brake(&mut self, on: bool) {
        self.brake.set_level(on.into());
    }

    fn set_indicators(&mut self, on: bool) {
        self.indicator_left.set_level(on.into());
        self.indicator_right.set_level(on.into());
    }
}

/// Millisecond trip timer over the system time driver.
///
/// Ticks are milliseconds since the last reset, truncated to 16 bits; the
/// wrap-around every ~65.5 s matches the trip durations the engine records.
pub struct MsTripTimer {
    epoch: Instant,
}

impl MsTripTimer {
    pub fn new() -> Self {
        Self {
            epoch: Instant::now(),
        }
    }
}

impl Default for MsTripTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl TripTimer for MsTripTimer {
    fn reset(&mut self) {
        self.epoch = Instant::now();
    }

    fn ticks(&self) -> u16 {
        self.epoch.elapsed().as_millis() as u16
    }
}

/// Active-low push button with edge-plus-settle debouncing
pub struct PushButton {
    input: Input<'static>,
}

impl PushButton {
    pub fn new(input: Input<'static>) -> Self {
        Self { input }
    }
}

impl Button for PushButton {
    async fn wait_press(&mut self) {
        loop {
            self.input.wait_for_falling_edge().await;
            Timer::after_millis(DEBOUNCE_MS).await;
            if self.input.is_low() {
                return;
            }
        }
    }
}
