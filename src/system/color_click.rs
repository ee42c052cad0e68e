//! Driver for the TCS3471 RGBC sensor on the Color Click board.
//!
//! Minimal async register driver over `embedded-hal-async` I2C: power-up and
//! integration-time setup, plus 16-bit little-endian channel reads. Generic
//! over the bus so it runs against any I2C implementation.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;

use crate::system::color::ColorSample;
use crate::system::hw::ColorSensor;

/// Fixed 7-bit bus address of the TCS3471
const ADDR: u8 = 0x29;

/// Command bit, required on every register access
const CMD: u8 = 0x80;
/// Command with auto-increment, for multi-byte channel reads
const CMD_AUTO_INC: u8 = 0xA0;

const REG_ENABLE: u8 = 0x00;
const REG_ATIME: u8 = 0x01;
const REG_CLEAR_LO: u8 = 0x14;
const REG_RED_LO: u8 = 0x16;
const REG_GREEN_LO: u8 = 0x18;
const REG_BLUE_LO: u8 = 0x1A;

/// ENABLE: power on
const PON: u8 = 0x01;
/// ENABLE: power on + ADC enable
const PON_AEN: u8 = 0x03;

/// Integration time 0xD5 ≙ 43 cycles ≙ ~100 ms per conversion
const ATIME_100MS: u8 = 0xD5;

pub struct ColorClick<I> {
    i2c: I,
}

impl<I: I2c> ColorClick<I> {
    pub fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Powers the sensor up and starts continuous RGBC conversions.
    ///
    /// The datasheet requires 2.4 ms between PON and enabling the ADC; we
    /// wait a round 3 ms.
    pub async fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), I::Error> {
        self.write_register(REG_ENABLE, PON).await?;
        delay.delay_ms(3).await;
        self.write_register(REG_ENABLE, PON_AEN).await?;
        self.write_register(REG_ATIME, ATIME_100MS).await
    }

    async fn write_register(&mut self, reg: u8, value: u8) -> Result<(), I::Error> {
        self.i2c.write(ADDR, &[CMD | reg, value]).await
    }

    /// Reads one 16-bit channel, low byte first
    async fn read_channel(&mut self, lo_reg: u8) -> Result<u16, I::Error> {
        let mut buf = [0u8; 2];
        self.i2c
            .write_read(ADDR, &[CMD_AUTO_INC | lo_reg], &mut buf)
            .await?;
        Ok(u16::from_le_bytes(buf))
    }
}

impl<I: I2c> ColorSensor for ColorClick<I> {
    type Error = I::Error;

    async fn read(&mut self) -> Result<ColorSample, Self::Error> {
        Ok(ColorSample {
            red: self.read_channel(REG_RED_LO).await?,
            green: self.read_channel(REG_GREEN_LO).await?,
            blue: self.read_channel(REG_BLUE_LO).await?,
            clear: self.read_channel(REG_CLEAR_LO).await?,
        })
    }

    async fn read_clear(&mut self) -> Result<u16, Self::Error> {
        self.read_channel(REG_CLEAR_LO).await
    }
}
