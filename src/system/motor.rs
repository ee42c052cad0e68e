//! Motor Actuation Module
//!
//! Maps abstract (direction, power, brake-mode) wheel commands onto pairs of
//! PWM duty cycles and provides the ramped composite maneuvers the navigator
//! uses: drive straight, rotate in place, stop.
//!
//! Power never jumps: every change steps 1% per tick with a short delay in
//! between, emulating the mechanical inertia limit of the drivetrain. PWM
//! outputs are reached through the `embedded-hal` [`SetDutyCycle`] capability,
//! so the same code drives real hardware and test doubles.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

/// Upper bound for wheel power (percent)
pub const MAX_POWER: u8 = 100;

/// Angle of one atomic rotation pulse (degrees)
pub const ROTATE_PULSE_DEG: u16 = 45;

/// Delay between +1% power steps when accelerating (µs)
const ACCEL_STEP_US: u32 = 100;

/// Delay between −1% power steps when stopping (µs)
const DECEL_STEP_US: u32 = 50;

/// Full-power hold per rotation pulse (ms)
const ROTATE_HOLD_MS: u32 = 75;

/// Pause between rotation pulses (ms)
const ROTATE_PAUSE_MS: u32 = 250;

/// Travel direction of a straight move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Heading {
    Forward,
    Backward,
}

impl Heading {
    pub fn inverted(self) -> Self {
        match self {
            Heading::Forward => Heading::Backward,
            Heading::Backward => Heading::Forward,
        }
    }
}

/// Turn direction of a rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Spin {
    Left,
    Right,
}

impl Spin {
    pub fn inverted(self) -> Self {
        match self {
            Spin::Left => Spin::Right,
            Spin::Right => Spin::Left,
        }
    }
}

/// H-bridge drive scheme for the undriven half of a wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BrakeMode {
    /// Short brake (slow decay): inverted duty on the active side, the
    /// opposite side held high. Brakes the motor electrically between pulses.
    Brake,
    /// Coast (fast decay): plain duty on the active side, opposite side low.
    Coast,
}

/// Computes the (active, opposite) duty pair for one wheel.
///
/// Brake mode inverts the active side (full-on at power 0) and pins the
/// opposite side high; coast mode scales the active side directly and pins
/// the opposite side low. The `power × period / 100` division truncates, and
/// that truncation is part of the contract. Power clamps to [`MAX_POWER`].
pub fn duty_pair(brake_mode: BrakeMode, power: u8, period: u16) -> (u16, u16) {
    let power = power.min(MAX_POWER);
    let scaled = ((u32::from(power) * u32::from(period)) / 100) as u16;
    match brake_mode {
        BrakeMode::Brake => (period - scaled, period),
        BrakeMode::Coast => (scaled, 0),
    }
}

/// One wheel: two physical PWM outputs plus the command state driving them.
///
/// `pos` carries the duty for forward drive and `neg` for backward; the
/// heading decides which of the two is the "active" side of the bridge.
pub struct Motor<P> {
    pos: P,
    neg: P,
    power: u8,
    heading: Heading,
    brake_mode: BrakeMode,
    period: u16,
}

impl<P: SetDutyCycle> Motor<P> {
    pub fn new(pos: P, neg: P, brake_mode: BrakeMode) -> Self {
        let period = pos.max_duty_cycle();
        Self {
            pos,
            neg,
            power: 0,
            heading: Heading::Forward,
            brake_mode,
            period,
        }
    }

    /// Current power (0–100)
    pub fn power(&self) -> u8 {
        self.power
    }

    pub fn heading(&self) -> Heading {
        self.heading
    }

    fn set_heading(&mut self, heading: Heading) {
        self.heading = heading;
    }

    /// Writes the duty pair for the current command state to the outputs
    fn apply(&mut self) -> Result<(), P::Error> {
        let (active, opposite) = duty_pair(self.brake_mode, self.power, self.period);
        match self.heading {
            Heading::Forward => {
                self.pos.set_duty_cycle(active)?;
                self.neg.set_duty_cycle(opposite)?;
            }
            Heading::Backward => {
                self.pos.set_duty_cycle(opposite)?;
                self.neg.set_duty_cycle(active)?;
            }
        }
        Ok(())
    }
}

/// Both wheels plus the delay source pacing the power ramps.
pub struct MotorPair<P, D> {
    left: Motor<P>,
    right: Motor<P>,
    delay: D,
}

impl<P: SetDutyCycle, D: DelayNs> MotorPair<P, D> {
    pub fn new(left: Motor<P>, right: Motor<P>, delay: D) -> Self {
        Self { left, right, delay }
    }

    pub fn left(&self) -> &Motor<P> {
        &self.left
    }

    pub fn right(&self) -> &Motor<P> {
        &self.right
    }

    /// Ramps both wheels up to `target` power, 1%/tick at 100 µs.
    ///
    /// Only ever steps upward; a wheel already above the target keeps its
    /// power until the next [`stop`](Self::stop).
    pub async fn ramp_up(&mut self, target: u8) -> Result<(), P::Error> {
        let target = target.min(MAX_POWER);
        while self.left.power < target || self.right.power < target {
            if self.left.power < target {
                self.left.power += 1;
            }
            if self.right.power < target {
                self.right.power += 1;
            }
            self.left.apply()?;
            self.right.apply()?;
            self.delay.delay_us(ACCEL_STEP_US).await;
        }
        Ok(())
    }

    /// Ramps both wheels down to zero synchronously, 1%/tick at 50 µs.
    pub async fn stop(&mut self) -> Result<(), P::Error> {
        while self.left.power > 0 || self.right.power > 0 {
            if self.left.power > 0 {
                self.left.power -= 1;
            }
            if self.right.power > 0 {
                self.right.power -= 1;
            }
            self.left.apply()?;
            self.right.apply()?;
            self.delay.delay_us(DECEL_STEP_US).await;
        }
        Ok(())
    }

    /// Drives both wheels in `heading`, ramping up to `power`.
    ///
    /// The direction change is applied immediately at the current power, then
    /// the ramp takes over.
    pub async fn straight(&mut self, heading: Heading, power: u8) -> Result<(), P::Error> {
        self.left.set_heading(heading);
        self.right.set_heading(heading);
        self.left.apply()?;
        self.right.apply()?;
        self.ramp_up(power).await
    }

    /// Rotates in place by `angle` degrees using differential drive.
    ///
    /// Each 45° is one atomic pulse: ramp to full power, hold 75 ms, stop,
    /// pause 250 ms. Full power keeps the pulse angle repeatable. Angles that
    /// are not a multiple of 45° round down; below 45° nothing moves.
    pub async fn rotate(&mut self, spin: Spin, angle: u16) -> Result<(), P::Error> {
        let (left, right) = match spin {
            Spin::Right => (Heading::Forward, Heading::Backward),
            Spin::Left => (Heading::Backward, Heading::Forward),
        };
        self.left.set_heading(left);
        self.right.set_heading(right);
        self.left.apply()?;
        self.right.apply()?;

        for _ in 0..angle / ROTATE_PULSE_DEG {
            self.ramp_up(MAX_POWER).await?;
            self.delay.delay_ms(ROTATE_HOLD_MS).await;
            self.stop().await?;
            self.delay.delay_ms(ROTATE_PAUSE_MS).await;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePwm, NullDelay, PwmLog};
    use embassy_futures::block_on;

    const PERIOD: u16 = 99;

    fn pair() -> (MotorPair<FakePwm, NullDelay>, PwmLog, PwmLog, PwmLog, PwmLog) {
        let (lp, lp_log) = FakePwm::new(PERIOD);
        let (ln, ln_log) = FakePwm::new(PERIOD);
        let (rp, rp_log) = FakePwm::new(PERIOD);
        let (rn, rn_log) = FakePwm::new(PERIOD);
        let pair = MotorPair::new(
            Motor::new(lp, ln, BrakeMode::Coast),
            Motor::new(rp, rn, BrakeMode::Coast),
            NullDelay,
        );
        (pair, lp_log, ln_log, rp_log, rn_log)
    }

    #[test]
    fn coast_duty_corners() {
        assert_eq!(duty_pair(BrakeMode::Coast, 0, PERIOD), (0, 0));
        assert_eq!(duty_pair(BrakeMode::Coast, 100, PERIOD), (PERIOD, 0));
    }

    #[test]
    fn brake_duty_corners() {
        assert_eq!(duty_pair(BrakeMode::Brake, 0, PERIOD), (PERIOD, PERIOD));
        assert_eq!(duty_pair(BrakeMode::Brake, 100, PERIOD), (0, PERIOD));
    }

    #[test]
    fn duty_pair_clamps_power_above_maximum() {
        assert_eq!(
            duty_pair(BrakeMode::Coast, 150, PERIOD),
            duty_pair(BrakeMode::Coast, MAX_POWER, PERIOD)
        );
        // Brake mode must not underflow past the full-power point.
        assert_eq!(duty_pair(BrakeMode::Brake, 150, PERIOD), (0, PERIOD));
    }

    #[test]
    fn duty_division_truncates() {
        // 33 * 99 / 100 = 32.67, truncated
        assert_eq!(duty_pair(BrakeMode::Coast, 33, PERIOD), (32, 0));
        assert_eq!(duty_pair(BrakeMode::Brake, 33, PERIOD), (67, PERIOD));
    }

    #[test]
    fn ramp_up_steps_to_target_and_never_down() {
        let (mut pair, lp_log, ..) = pair();
        block_on(async {
            pair.ramp_up(20).await.unwrap();
            assert_eq!(pair.left().power(), 20);
            assert_eq!(pair.right().power(), 20);
            // A lower target leaves the power where it is.
            pair.ramp_up(10).await.unwrap();
            assert_eq!(pair.left().power(), 20);
        });
        // One duty write per 1% step.
        assert_eq!(lp_log.writes(), 20);
    }

    #[test]
    fn stop_ramps_both_wheels_to_zero() {
        let (mut pair, ..) = pair();
        block_on(async {
            pair.ramp_up(35).await.unwrap();
            pair.stop().await.unwrap();
        });
        assert_eq!(pair.left().power(), 0);
        assert_eq!(pair.right().power(), 0);
    }

    #[test]
    fn straight_backward_drives_the_negative_outputs() {
        let (mut pair, lp_log, ln_log, ..) = pair();
        block_on(pair.straight(Heading::Backward, 20)).unwrap();
        // Coast mode backward: neg side carries the duty, pos side stays low.
        assert!(ln_log.max_duty() > 0);
        assert_eq!(lp_log.max_duty(), 0);
    }

    #[test]
    fn rotate_issues_one_pulse_per_45_degrees() {
        for (angle, pulses) in [(44u16, 0u32), (45, 1), (90, 2), (135, 3), (180, 4)] {
            let (mut pair, lp_log, ln_log, ..) = pair();
            block_on(pair.rotate(Spin::Right, angle)).unwrap();
            // Full power is reached exactly once per pulse; a right spin
            // drives the left wheel forward.
            assert_eq!(lp_log.full_power_hits(PERIOD), pulses, "angle {}", angle);
            assert_eq!(ln_log.full_power_hits(PERIOD), 0);
        }
    }

    #[test]
    fn rotate_left_mirrors_the_wheel_directions() {
        let (mut pair, lp_log, ln_log, rp_log, rn_log) = pair();
        block_on(pair.rotate(Spin::Left, 45)).unwrap();
        assert_eq!(lp_log.full_power_hits(PERIOD), 0);
        assert_eq!(ln_log.full_power_hits(PERIOD), 1);
        assert_eq!(rp_log.full_power_hits(PERIOD), 1);
        assert_eq!(rn_log.full_power_hits(PERIOD), 0);
    }
}
