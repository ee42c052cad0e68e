//! Hardware Resource Management
//!
//! Allocates the RP2350 pins and peripherals to the firmware tasks. Each
//! resource group is owned by exactly one task, so there is no shared
//! peripheral state to protect.
//!
//! # Resource Groups
//! - Color Click: TCS3471 RGBC sensor on I2C0
//! - Motor Driver: one PWM slice per wheel, both channels driven
//! - Lamps: LED head array, brake lamp and the two turn indicators
//! - Buttons: run start and calibration start, active low
//! - Heartbeat: onboard LED

use assign_resources::assign_resources;
use embassy_rp::bind_interrupts;
use embassy_rp::i2c::InterruptHandler as I2cInterruptHandler;
use embassy_rp::peripherals::{self, I2C0};

assign_resources! {
    /// TCS3471 colour sensor (Color Click board) on I2C0
    color_click: ColorClickResources {
        i2c: I2C0,
        sda_pin: PIN_12,
        scl_pin: PIN_13,
    },
    /// Dual H-bridge wheel drive, one full PWM slice per wheel
    motor_driver: MotorDriverResources {
        left_slice: PWM_SLICE6,
        left_pos_pin: PIN_28,
        left_neg_pin: PIN_29,
        right_slice: PWM_SLICE5,
        right_pos_pin: PIN_26,
        right_neg_pin: PIN_27,
    },
    /// Tricolour headlamp array, brake lamp and turn indicators
    lamps: LampResources {
        array_red_pin: PIN_2,
        array_green_pin: PIN_6,
        array_blue_pin: PIN_7,
        brake_pin: PIN_3,
        indicator_left_pin: PIN_4,
        indicator_right_pin: PIN_5,
    },
    /// Operator buttons, active low with internal pull-ups
    buttons: ButtonResources {
        start_pin: PIN_16,
        calibrate_pin: PIN_17,
    },
    /// Onboard LED used as the alive indicator
    heartbeat: HeartbeatResources {
        led_pin: PIN_25,
    },
}

bind_interrupts!(pub struct Irqs {
    I2C0_IRQ => I2cInterruptHandler<I2C0>;
});
