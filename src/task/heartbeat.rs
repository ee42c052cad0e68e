//! Alive indicator on the onboard LED.

use defmt::info;
use embassy_rp::gpio::{Level, Output};
use embassy_time::{Duration, Ticker};

use crate::system::resources::HeartbeatResources;

/// Toggle period. One full 16-bit lap of the millisecond trip counter, so the
/// LED also marks the wrap cadence of the recorded trip durations.
const TOGGLE_PERIOD: Duration = Duration::from_millis(65_536);

#[embassy_executor::task]
pub async fn heartbeat(r: HeartbeatResources) {
    let mut led = Output::new(r.led_pin, Level::Low);
    let mut ticker = Ticker::every(TOGGLE_PERIOD);
    info!("heartbeat running");
    loop {
        ticker.next().await;
        led.toggle();
    }
}
