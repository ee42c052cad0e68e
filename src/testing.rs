//! Hand-rolled test doubles for the hardware capability traits.
//!
//! Fakes share their observable state with the test through `Rc<RefCell<..>>`
//! handles so the navigator can own the device half while the test keeps the
//! inspection half.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::pwm::{ErrorType, SetDutyCycle};
use embedded_hal_async::delay::DelayNs;

use crate::system::color::ColorSample;
use crate::system::hw::{Button, ColorSensor, Lamps, TripTimer};

/// Inspection handle over every duty value a [`FakePwm`] has been given
#[derive(Clone, Default)]
pub struct PwmLog(Rc<RefCell<Vec<u16>>>);

impl PwmLog {
    pub fn writes(&self) -> u32 {
        self.0.borrow().len() as u32
    }

    pub fn max_duty(&self) -> u16 {
        self.0.borrow().iter().copied().max().unwrap_or(0)
    }

    /// Number of writes that hit exactly `period` (100% duty)
    pub fn full_power_hits(&self, period: u16) -> u32 {
        self.0.borrow().iter().filter(|&&d| d == period).count() as u32
    }
}

/// PWM output that records every duty write
pub struct FakePwm {
    period: u16,
    log: PwmLog,
}

impl FakePwm {
    pub fn new(period: u16) -> (Self, PwmLog) {
        let log = PwmLog::default();
        (
            Self {
                period,
                log: log.clone(),
            },
            log,
        )
    }
}

impl ErrorType for FakePwm {
    type Error = core::convert::Infallible;
}

impl SetDutyCycle for FakePwm {
    fn max_duty_cycle(&self) -> u16 {
        self.period
    }

    fn set_duty_cycle(&mut self, duty: u16) -> Result<(), Self::Error> {
        self.log.0.borrow_mut().push(duty);
        Ok(())
    }
}

/// Delay source that resolves immediately
pub struct NullDelay;

impl DelayNs for NullDelay {
    async fn delay_ns(&mut self, _ns: u32) {}
}

/// Sensor script ran dry before the scenario finished
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SensorExhausted;

/// Colour sensor fed from a queue of pre-scripted samples.
///
/// `read_clear` always reports the fixed ambient value; `read` pops the next
/// scripted sample and fails once the script is exhausted, so a runaway loop
/// surfaces as a test failure instead of a hang.
pub struct ScriptedSensor {
    samples: Rc<RefCell<VecDeque<ColorSample>>>,
    ambient: u16,
}

impl ScriptedSensor {
    pub fn new(ambient: u16) -> (Self, Rc<RefCell<VecDeque<ColorSample>>>) {
        let samples = Rc::new(RefCell::new(VecDeque::new()));
        (
            Self {
                samples: samples.clone(),
                ambient,
            },
            samples,
        )
    }

    /// Queues a flat sample with only the clear channel set
    pub fn push_clear(samples: &Rc<RefCell<VecDeque<ColorSample>>>, clear: u16) {
        samples.borrow_mut().push_back(ColorSample {
            red: 0,
            green: 0,
            blue: 0,
            clear,
        });
    }
}

impl ColorSensor for ScriptedSensor {
    type Error = SensorExhausted;

    async fn read(&mut self) -> Result<ColorSample, Self::Error> {
        self.samples.borrow_mut().pop_front().ok_or(SensorExhausted)
    }

    async fn read_clear(&mut self) -> Result<u16, Self::Error> {
        Ok(self.ambient)
    }
}

/// Trip timer that advances a fixed step on every read, so poll loops always
/// terminate deterministically
pub struct FakeTimer {
    now: Cell<u16>,
    step: u16,
}

impl FakeTimer {
    pub fn new(step: u16) -> Self {
        Self {
            now: Cell::new(0),
            step,
        }
    }
}

impl TripTimer for FakeTimer {
    fn reset(&mut self) {
        self.now.set(0);
    }

    fn ticks(&self) -> u16 {
        let t = self.now.get().wrapping_add(self.step);
        self.now.set(t);
        t
    }
}

/// Shared view of the lamp states
#[derive(Clone, Default)]
pub struct LampState(Rc<RefCell<LampFields>>);

#[derive(Default)]
pub struct LampFields {
    pub array: bool,
    pub brake: bool,
    pub indicators: bool,
    pub indicator_changes: u32,
}

impl LampState {
    pub fn array(&self) -> bool {
        self.0.borrow().array
    }

    pub fn brake(&self) -> bool {
        self.0.borrow().brake
    }

    pub fn indicators(&self) -> bool {
        self.0.borrow().indicators
    }

    pub fn indicator_changes(&self) -> u32 {
        self.0.borrow().indicator_changes
    }
}

/// Lamp sink recording the current on/off states
#[derive(Default)]
pub struct FakeLamps(LampState);

impl FakeLamps {
    pub fn new() -> (Self, LampState) {
        let state = LampState::default();
        (Self(state.clone()), state)
    }
}

impl Lamps for FakeLamps {
    fn set_array(&mut self, on: bool) {
        self.0 .0.borrow_mut().array = on;
    }

    fn set_brake(&mut self, on: bool) {
        self.0 .0.borrow_mut().brake = on;
    }

    fn set_indicators(&mut self, on: bool) {
        let mut fields = self.0 .0.borrow_mut();
        if fields.indicators != on {
            fields.indicator_changes += 1;
        }
        fields.indicators = on;
    }
}

/// Button that is always pressed
pub struct InstantButton;

impl Button for InstantButton {
    async fn wait_press(&mut self) {}
}
