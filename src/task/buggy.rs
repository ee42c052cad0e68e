//! Buggy Control Task
//!
//! Wires the real peripherals into the navigation engine and runs the
//! operator loop: the start button launches a maze run, the calibrate button
//! launches a calibration pass (and confirms each reference within it).

use defmt::{error, info, Debug2Format};
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::{i2c, pwm};
use embassy_time::Delay;

use crate::nav::{NavConfig, Navigator};
use crate::system::buggy_hw::{BuggyLamps, MsTripTimer, PushButton};
use crate::system::color_click::ColorClick;
use crate::system::motor::{BrakeMode, Motor, MotorPair};
use crate::system::resources::{
    ButtonResources, ColorClickResources, Irqs, LampResources, MotorDriverResources,
};
use crate::system::state::RobotState;

#[embassy_executor::task]
pub async fn buggy(
    cc: ColorClickResources,
    m: MotorDriverResources,
    l: LampResources,
    b: ButtonResources,
) {
    // Motor PWM at 10kHz; cheaper DC motors work better at lower frequencies.
    let desired_freq_hz = 10_000;
    let clock_freq_hz = embassy_rp::clocks::clk_sys_freq();

    // Minimum divider that keeps the period under the 16-bit counter limit
    let divider = ((clock_freq_hz / desired_freq_hz) / 65535 + 1) as u8;
    let period = (clock_freq_hz / (desired_freq_hz * divider as u32)) as u16 - 1;

    let mut pwm_config = pwm::Config::default();
    pwm_config.divider = divider.into();
    pwm_config.top = period;

    // Each wheel owns a full slice: channel A drives forward, B backward.
    let left_pwm = pwm::Pwm::new_output_ab(m.left_slice, m.left_pos_pin, m.left_neg_pin, pwm_config.clone());
    let (left_pos, left_neg) = left_pwm.split();
    let right_pwm =
        pwm::Pwm::new_output_ab(m.right_slice, m.right_pos_pin, m.right_neg_pin, pwm_config.clone());
    let (right_pos, right_neg) = right_pwm.split();

    let motors = MotorPair::new(
        Motor::new(left_pos.unwrap(), left_neg.unwrap(), BrakeMode::Brake),
        Motor::new(right_pos.unwrap(), right_neg.unwrap(), BrakeMode::Brake),
        Delay,
    );

    let mut i2c_config = i2c::Config::default();
    i2c_config.frequency = 400_000;
    let bus = i2c::I2c::new_async(cc.i2c, cc.scl_pin, cc.sda_pin, Irqs, i2c_config);
    let mut sensor = ColorClick::new(bus);
    if let Err(e) = sensor.init(&mut Delay).await {
        error!("colour sensor init failed: {}", Debug2Format(&e));
        return;
    }

    let lamps = BuggyLamps {
        array_red: Output::new(l.array_red_pin, Level::Low),
        array_green: Output::new(l.array_green_pin, Level::Low),
        array_blue: Output::new(l.array_blue_pin, Level::Low),
        brake: Output::new(l.brake_pin, Level::Low),
        indicator_left: Output::new(l.indicator_left_pin, Level::Low),
        indicator_right: Output::new(l.indicator_right_pin, Level::Low),
    };

    let mut start = PushButton::new(Input::new(b.start_pin, Pull::Up));
    let mut calibrate = PushButton::new(Input::new(b.calibrate_pin, Pull::Up));

    let mut nav = Navigator::new(
        motors,
        Delay,
        sensor,
        MsTripTimer::new(),
        lamps,
        NavConfig::default(),
    );
    let mut state = RobotState::new();
    info!("buggy ready");

    loop {
        match select(start.wait_press(), calibrate.wait_press()).await {
            Either::First(()) => {
                // The backtrack flag survives a completed run, so a second
                // press skips navigation and replays the retained log.
                info!("run started");
                match nav.run(&mut state).await {
                    Ok(()) => info!("run complete, {} moves logged", state.log.len()),
                    Err(e) => error!("run aborted: {}", Debug2Format(&e)),
                }
            }
            Either::Second(()) => {
                info!("calibration started");
                match nav.calibrate(&mut state, &mut calibrate).await {
                    Ok(()) => info!("calibration complete"),
                    Err(e) => error!("calibration aborted: {}", Debug2Format(&e)),
                }
            }
        }
    }
}
