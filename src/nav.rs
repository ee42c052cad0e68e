//! Navigation Engine
//!
//! Sequences one maze run: approach the wall ahead, bump and classify its
//! colour, execute the maneuver that colour commands while recording it, and
//! once a terminal condition fires, replay the whole log in reverse to return
//! to the start.
//!
//! The engine is a single cooperative control flow: every wait is an await on
//! the injected delay or a poll of the trip timer, never a spin. All mutable
//! run state lives in the [`RobotState`] the caller owns.

use embedded_hal::pwm::SetDutyCycle;
use embedded_hal_async::delay::DelayNs;

use crate::system::color::{classify_descriptor, ColorDescriptor, WallColor};
use crate::system::decision::{decide, Decision, Step};
use crate::system::hw::{Button, ColorSensor, Lamps, TripTimer};
use crate::system::maneuver::Maneuver;
use crate::system::motor::{Heading, MotorPair};
use crate::system::state::RobotState;

/// Settle before/after the ambient baseline capture (ms)
const AMBIENT_SETTLE_MS: u32 = 500;

/// Pause between wall approach and colour action (ms)
const APPROACH_PAUSE_MS: u32 = 1000;

/// Wall bump at full approach, aligning the buggy square to the wall (ms)
const BUMP_HOLD_MS: u32 = 500;

/// Settle on either side of the classification read (ms)
const CLASSIFY_SETTLE_MS: u32 = 500;

/// Back-off drive away from the wall (ms)
const BACKOFF_HOLD_MS: u32 = 700;

/// Pause before the decided maneuver starts (ms)
const DECIDE_SETTLE_MS: u32 = 1000;

/// Pause between the steps of a multi-step plan (ms)
const STEP_SETTLE_MS: u32 = 500;

/// Settle after every replayed backtrack entry (ms)
const REPLAY_SETTLE_MS: u32 = 500;

/// Trip-timer poll cadence while replaying a straight segment (µs)
const REPLAY_POLL_US: u32 = 200;

/// Indicator flash half-period during calibration (ms)
const FLASH_MS: u32 = 250;

/// Hold before a calibration reference is sampled (ms)
const CALIBRATION_SETTLE_MS: u32 = 1500;

/// Empirically tuned navigation constants.
///
/// The asymmetric ambient band and the fixed recorded durations were tuned on
/// the physical maze; they are configuration, not derived values.
#[derive(Debug, Clone, Copy)]
pub struct NavConfig {
    /// Drive power while searching for the wall (percent)
    pub approach_power: u8,
    /// Drive power for the alignment bump (percent)
    pub bump_power: u8,
    /// Drive power when backing away from the wall (percent)
    pub backoff_power: u8,
    /// Clear-channel drop below ambient that ends the approach
    pub band_below: u16,
    /// Clear-channel rise above ambient that ends the approach
    pub band_above: u16,
    /// Added to the measured approach time to cover sensor and stop latency
    pub approach_record_offset: u16,
    /// Power recorded for the back-off move (not the power actually driven)
    pub backoff_record_power: u8,
    /// Duration recorded for the back-off move, regardless of elapsed time
    pub backoff_record_ticks: u16,
    /// Reverse-one-cell drive time and recorded duration (ticks ≍ ms)
    pub reverse_cell_ticks: u16,
    /// Consecutive no-colour classifications that trigger the backtrack
    pub no_color_limit: u8,
    /// Abort a wall approach after this many ticks; `None` keeps searching
    /// forever
    pub approach_timeout_ticks: Option<u16>,
    /// Forget the run after replaying it, making a second start press a fresh
    /// run instead of replaying the same log again
    pub clear_log_after_backtrack: bool,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            approach_power: 20,
            bump_power: 40,
            backoff_power: 20,
            band_below: 13,
            band_above: 30,
            approach_record_offset: 400,
            backoff_record_power: 40,
            backoff_record_ticks: 600,
            reverse_cell_ticks: 2500,
            no_color_limit: 3,
            approach_timeout_ticks: Some(60_000),
            clear_log_after_backtrack: false,
        }
    }
}

/// Navigation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavError<SE, PE> {
    /// Colour sensor read failed
    Sensor(SE),
    /// PWM output rejected a duty write
    Pwm(PE),
    /// The move log is at capacity; the run cannot be recorded further
    LogFull,
    /// The wall approach exceeded its timeout without leaving the ambient
    /// band
    WallTimeout,
}

/// The whole navigation and motion control engine over one set of hardware.
pub struct Navigator<P, D, S, T, L> {
    motors: MotorPair<P, D>,
    delay: D,
    sensor: S,
    timer: T,
    lamps: L,
    config: NavConfig,
}

impl<P, D, S, T, L> Navigator<P, D, S, T, L>
where
    P: SetDutyCycle,
    D: DelayNs,
    S: ColorSensor,
    T: TripTimer,
    L: Lamps,
{
    pub fn new(
        motors: MotorPair<P, D>,
        delay: D,
        sensor: S,
        timer: T,
        lamps: L,
        config: NavConfig,
    ) -> Self {
        Self {
            motors,
            delay,
            sensor,
            timer,
            lamps,
            config,
        }
    }

    pub fn motors(&self) -> &MotorPair<P, D> {
        &self.motors
    }

    /// Reads a sample, stores its descriptor as the most recent colour
    async fn sample(
        &mut self,
        state: &mut RobotState,
    ) -> Result<ColorDescriptor, NavError<S::Error, P::Error>> {
        let sample = self.sensor.read().await.map_err(NavError::Sensor)?;
        let descriptor = ColorDescriptor::from_sample(&sample);
        state.last_color = descriptor;
        Ok(descriptor)
    }

    /// Drives straight until the wall ahead changes the clear channel.
    ///
    /// Captures the ambient baseline first (brake lamp lit, LED array on for
    /// the rest of the run), then creeps forward at low power until the clear
    /// channel leaves `[ambient − band_below, ambient + band_above]`. The
    /// band is asymmetric by calibration, not by accident.
    ///
    /// The approach maneuver is recorded only when the current no-colour
    /// streak is clean; the recorded duration carries a fixed offset to
    /// compensate sensor and stop latency.
    pub async fn approach_wall(
        &mut self,
        state: &mut RobotState,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        self.lamps.set_brake(true);
        self.lamps.set_array(true);
        self.delay.delay_ms(AMBIENT_SETTLE_MS).await;
        state.ambient = self.sensor.read_clear().await.map_err(NavError::Sensor)?;
        self.delay.delay_ms(AMBIENT_SETTLE_MS).await;
        self.lamps.set_brake(false);

        let low = state.ambient.saturating_sub(self.config.band_below);
        let high = state.ambient.saturating_add(self.config.band_above);

        self.timer.reset();
        loop {
            self.motors
                .straight(Heading::Forward, self.config.approach_power)
                .await
                .map_err(NavError::Pwm)?;
            let descriptor = self.sample(state).await?;

            if descriptor.clear < low || descriptor.clear > high {
                self.motors.stop().await.map_err(NavError::Pwm)?;
                if state.no_color_streak == 0 {
                    let ticks = self
                        .timer
                        .ticks()
                        .wrapping_add(self.config.approach_record_offset);
                    state
                        .log
                        .record(Maneuver::Straight {
                            heading: Heading::Forward,
                            power: self.config.approach_power,
                            ticks,
                        })
                        .map_err(|_| NavError::LogFull)?;
                }
                return Ok(());
            }

            if let Some(limit) = self.config.approach_timeout_ticks {
                if self.timer.ticks() > limit {
                    self.motors.stop().await.map_err(NavError::Pwm)?;
                    return Err(NavError::WallTimeout);
                }
            }
        }
    }

    /// Bumps the wall, classifies its colour and executes the decision.
    ///
    /// Phase order is fixed: bump to square up, stop, classify, back off,
    /// record the back-off (first of a streak only, with its fixed tuned
    /// values), then dispatch the decision table.
    pub async fn wall_action(
        &mut self,
        state: &mut RobotState,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        self.motors
            .straight(Heading::Forward, self.config.bump_power)
            .await
            .map_err(NavError::Pwm)?;
        self.delay.delay_ms(BUMP_HOLD_MS).await;
        self.motors.stop().await.map_err(NavError::Pwm)?;

        self.delay.delay_ms(CLASSIFY_SETTLE_MS).await;
        let descriptor = self.sample(state).await?;
        let color = classify_descriptor(&descriptor, &state.calibration);
        self.delay.delay_ms(CLASSIFY_SETTLE_MS).await;

        self.motors
            .straight(Heading::Backward, self.config.backoff_power)
            .await
            .map_err(NavError::Pwm)?;
        self.delay.delay_ms(BACKOFF_HOLD_MS).await;
        self.motors.stop().await.map_err(NavError::Pwm)?;

        if state.no_color_streak == 0 {
            state
                .log
                .record(Maneuver::Straight {
                    heading: Heading::Backward,
                    power: self.config.backoff_record_power,
                    ticks: self.config.backoff_record_ticks,
                })
                .map_err(|_| NavError::LogFull)?;
        }
        self.delay.delay_ms(DECIDE_SETTLE_MS).await;

        match decide(color) {
            Decision::Act(steps) => {
                for step in steps {
                    self.execute(state, *step).await?;
                }
                state.no_color_streak = 0;
            }
            Decision::Finish => {
                state.backtrack = true;
                state.no_color_streak = 0;
            }
            Decision::NoColor => {
                state.no_color_streak += 1;
                if state.no_color_streak >= self.config.no_color_limit {
                    state.backtrack = true;
                }
            }
            Decision::Ignore => {
                state.no_color_streak = 0;
            }
        }
        Ok(())
    }

    /// Executes and records one step of a maneuver plan
    async fn execute(
        &mut self,
        state: &mut RobotState,
        step: Step,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        match step {
            Step::Rotate { spin, angle } => {
                self.motors.rotate(spin, angle).await.map_err(NavError::Pwm)?;
                state
                    .log
                    .record(Maneuver::Rotate { spin, angle })
                    .map_err(|_| NavError::LogFull)?;
            }
            Step::ReverseCell => {
                self.motors
                    .straight(Heading::Backward, self.config.backoff_power)
                    .await
                    .map_err(NavError::Pwm)?;
                self.delay
                    .delay_ms(u32::from(self.config.reverse_cell_ticks))
                    .await;
                self.motors.stop().await.map_err(NavError::Pwm)?;
                state
                    .log
                    .record(Maneuver::Straight {
                        heading: Heading::Backward,
                        power: self.config.backoff_power,
                        ticks: self.config.reverse_cell_ticks,
                    })
                    .map_err(|_| NavError::LogFull)?;
                self.delay.delay_ms(STEP_SETTLE_MS).await;
            }
        }
        Ok(())
    }

    /// Replays the move log newest-first with every direction inverted,
    /// returning the buggy to its start pose.
    ///
    /// Rotations replay immediately; straight segments replay until the trip
    /// timer passes the recorded duration. Both indicators stay lit for the
    /// whole replay. The log is kept afterwards unless configured otherwise,
    /// so a second backtrack replays the same run.
    pub async fn backtrack(
        &mut self,
        state: &mut RobotState,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        self.lamps.set_indicators(true);

        for maneuver in state.log.iter_rev() {
            match maneuver.inverted() {
                Maneuver::Rotate { spin, angle } => {
                    self.motors.rotate(spin, angle).await.map_err(NavError::Pwm)?;
                }
                Maneuver::Straight {
                    heading,
                    power,
                    ticks,
                } => {
                    self.timer.reset();
                    self.motors
                        .straight(heading, power)
                        .await
                        .map_err(NavError::Pwm)?;
                    while self.timer.ticks() <= ticks {
                        self.delay.delay_us(REPLAY_POLL_US).await;
                    }
                    self.motors.stop().await.map_err(NavError::Pwm)?;
                }
            }
            self.delay.delay_ms(REPLAY_SETTLE_MS).await;
        }

        self.lamps.set_indicators(false);
        if self.config.clear_log_after_backtrack {
            state.log.clear();
        }
        Ok(())
    }

    /// One full maze run: approach and act until a terminal condition sets
    /// the backtrack flag, then replay home.
    pub async fn run(
        &mut self,
        state: &mut RobotState,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        while !state.backtrack {
            self.approach_wall(state).await?;
            self.delay.delay_ms(APPROACH_PAUSE_MS).await;
            self.wall_action(state).await?;
        }
        self.backtrack(state).await
    }

    /// Operator-driven capture of the nine reference colours.
    ///
    /// For each reference in calibration order: flash the indicators
    /// index-plus-one times to show which colour is up, wait for the confirm
    /// button, light the array, settle, sample.
    pub async fn calibrate<B: Button>(
        &mut self,
        state: &mut RobotState,
        button: &mut B,
    ) -> Result<(), NavError<S::Error, P::Error>> {
        for (i, color) in WallColor::ALL.into_iter().enumerate() {
            self.flash_indicators(i as u32 + 1).await;
            button.wait_press().await;

            self.lamps.set_array(true);
            self.delay.delay_ms(CALIBRATION_SETTLE_MS).await;
            let sample = self.sensor.read().await.map_err(NavError::Sensor)?;
            state
                .calibration
                .set(color, ColorDescriptor::from_sample(&sample));
            self.lamps.set_array(false);
        }
        Ok(())
    }

    async fn flash_indicators(&mut self, count: u32) {
        for _ in 0..count {
            self.lamps.set_indicators(true);
            self.delay.delay_ms(FLASH_MS).await;
            self.lamps.set_indicators(false);
            self.delay.delay_ms(FLASH_MS).await;
        }
    }
}
