//! Buggy firmware entry point
//!
//! Initializes the RP2350 and spawns the control tasks.

#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::block::ImageDef;
use embassy_rp::config::Config;
use maze_buggy::split_resources;
use maze_buggy::system::resources::{
    AssignedResources, ButtonResources, ColorClickResources, HeartbeatResources, LampResources,
    MotorDriverResources,
};
use maze_buggy::task::{buggy::buggy, heartbeat::heartbeat};
use {defmt_rtt as _, panic_probe as _};

/// Firmware image type for bootloader
#[link_section = ".start_block"]
#[used]
pub static IMAGE_DEF: ImageDef = ImageDef::secure_exe();

/// Firmware entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    let p = embassy_rp::init(Config::default());

    let r = split_resources!(p);

    spawner.spawn(heartbeat(r.heartbeat)).unwrap();
    spawner
        .spawn(buggy(r.color_click, r.motor_driver, r.lamps, r.buttons))
        .unwrap();
}
