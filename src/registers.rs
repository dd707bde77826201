//! Register map definitions for the ADXL345 accelerometer.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{DataRate, Range};

/// Register address of `DEVID`.
pub const REG_DEVID: u8 = 0x00;
/// Register address of `ACT_TAP_STATUS`.
pub const REG_ACT_TAP_STATUS: u8 = 0x2B;
/// Register address of `BW_RATE`.
pub const REG_BW_RATE: u8 = 0x2C;
/// Register address of `POWER_CTL`.
pub const REG_POWER_CTL: u8 = 0x2D;
/// Register address of `INT_SOURCE`.
pub const REG_INT_SOURCE: u8 = 0x30;
/// Register address of `DATA_FORMAT`.
pub const REG_DATA_FORMAT: u8 = 0x31;
/// Register address of `DATAX0`.
pub const REG_DATAX0: u8 = 0x32;
/// Register address of `DATAY0`.
pub const REG_DATAY0: u8 = 0x34;
/// Register address of `DATAZ0`.
pub const REG_DATAZ0: u8 = 0x36;
/// Register address of `FIFO_STATUS`.
pub const REG_FIFO_STATUS: u8 = 0x39;

/// Number of addressable registers (`0x00..=0x39`).
pub const REGISTER_COUNT: usize = 0x3A;

/// Fixed value of the `DEVID` register.
pub const EXPECTED_DEVID: u8 = 0xE5;

/// `BW_RATE[3:0]`: output data rate code.
pub const BW_RATE_RATE_MASK: u8 = 0x0F;
/// `DATA_FORMAT[1:0]`: g-range code.
pub const DATA_FORMAT_RANGE_MASK: u8 = 0x03;

/// Returns `true` for registers whose contents change without host writes.
pub const fn is_volatile(register: u8) -> bool {
    matches!(
        register,
        REG_ACT_TAP_STATUS | REG_INT_SOURCE | REG_FIFO_STATUS
    ) || (register >= REG_DATAX0 && register < REG_DATAX0 + 6)
}

/// Where a bitfield register lives and what it holds after power-on.
pub trait Register: From<u8> + Into<u8> {
    /// Register address as documented in the datasheet.
    const ADDRESS: u8;
    /// Power-on value.
    const RESET_VALUE: u8;

    /// Decoded power-on value.
    fn reset() -> Self {
        Self::from(Self::RESET_VALUE)
    }
}

/// Bitfield representation of the `BW_RATE` register (address `0x2C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BwRate {
    // Output data rate code (bits 3:0).
    pub rate: DataRate,
    // Reduced power operation (bit 4).
    pub low_power: bool,
    #[skip]
    __: B3,
}

impl From<u8> for BwRate {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<BwRate> for u8 {
    fn from(value: BwRate) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `POWER_CTL` register (address `0x2D`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerControl {
    // Sleep-mode reading frequency (bits 1:0).
    pub wakeup: B2,
    // Sleep mode (bit 2).
    pub sleep: bool,
    // Measurement mode; standby when clear (bit 3).
    pub measure: bool,
    // Automatic sleep on inactivity (bit 4).
    pub auto_sleep: bool,
    // Links activity and inactivity detection (bit 5).
    pub link: bool,
    #[skip]
    __: B2,
}

impl From<u8> for PowerControl {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<PowerControl> for u8 {
    fn from(value: PowerControl) -> Self {
        value.into_bytes()[0]
    }
}

/// Bitfield representation of the `DATA_FORMAT` register (address `0x31`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataFormat {
    // g-range selection (bits 1:0).
    pub range: Range,
    // Left-justified (MSB) output (bit 2).
    pub justify: bool,
    // Full resolution, 4 mg/LSB in every range (bit 3).
    pub full_res: bool,
    #[skip]
    __: B1,
    // Active-low interrupts (bit 5).
    pub int_invert: bool,
    // 3-wire SPI (bit 6).
    pub spi_3wire: bool,
    // Self-test force (bit 7).
    pub self_test: bool,
}

impl From<u8> for DataFormat {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<DataFormat> for u8 {
    fn from(value: DataFormat) -> Self {
        value.into_bytes()[0]
    }
}

impl Register for BwRate {
    const ADDRESS: u8 = REG_BW_RATE;
    const RESET_VALUE: u8 = 0x0A;
}

impl Register for PowerControl {
    const ADDRESS: u8 = REG_POWER_CTL;
    const RESET_VALUE: u8 = 0x00;
}

impl Register for DataFormat {
    const ADDRESS: u8 = REG_DATA_FORMAT;
    const RESET_VALUE: u8 = 0x00;
}
