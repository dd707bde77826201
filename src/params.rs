//! Strongly typed parameter enumerations for the ADXL345 driver.
//!
//! These enums map directly to datasheet field encodings. The device engine
//! itself works on raw field codes; the enums are how configuration and the
//! attribute front-end translate between codes and physical units.
//!
//! # Examples
//!
//! ```rust
//! use adxl345::params::{DataRate, Range};
//!
//! assert_eq!(DataRate::Hz400.code(), 0x0C);
//! assert_eq!(DataRate::from_hz(400), DataRate::Hz400);
//! assert_eq!(Range::G8.g(), 8);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::registers::{REG_DATAX0, REG_DATAY0, REG_DATAZ0};

/// Output data rate selections encoded in `BW_RATE.RATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 4]
pub enum DataRate {
    /// 0.10 Hz.
    Hz0_10 = 0x0,
    /// 0.20 Hz.
    Hz0_20 = 0x1,
    /// 0.39 Hz.
    Hz0_39 = 0x2,
    /// 0.78 Hz.
    Hz0_78 = 0x3,
    /// 1.56 Hz.
    Hz1_56 = 0x4,
    /// 3.13 Hz.
    Hz3_13 = 0x5,
    /// 6.25 Hz.
    Hz6_25 = 0x6,
    /// 12.5 Hz.
    Hz12_5 = 0x7,
    /// 25 Hz.
    Hz25 = 0x8,
    /// 50 Hz.
    Hz50 = 0x9,
    /// 100 Hz (reset default).
    Hz100 = 0xA,
    /// 200 Hz.
    Hz200 = 0xB,
    /// 400 Hz.
    Hz400 = 0xC,
    /// 800 Hz.
    Hz800 = 0xD,
    /// 1600 Hz.
    Hz1600 = 0xE,
    /// 3200 Hz.
    Hz3200 = 0xF,
}

impl DataRate {
    /// Every rate, ordered by code.
    pub const ALL: [Self; 16] = [
        Self::Hz0_10,
        Self::Hz0_20,
        Self::Hz0_39,
        Self::Hz0_78,
        Self::Hz1_56,
        Self::Hz3_13,
        Self::Hz6_25,
        Self::Hz12_5,
        Self::Hz25,
        Self::Hz50,
        Self::Hz100,
        Self::Hz200,
        Self::Hz400,
        Self::Hz800,
        Self::Hz1600,
        Self::Hz3200,
    ];

    /// Decodes a field code, ignoring bits above the 4-bit field.
    pub const fn from_code(code: u8) -> Self {
        Self::ALL[(code & 0x0F) as usize]
    }

    /// Returns the raw field code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the rate in millihertz.
    pub const fn millihertz(self) -> u32 {
        match self {
            Self::Hz0_10 => 100,
            Self::Hz0_20 => 200,
            Self::Hz0_39 => 390,
            Self::Hz0_78 => 780,
            Self::Hz1_56 => 1_560,
            Self::Hz3_13 => 3_130,
            Self::Hz6_25 => 6_250,
            Self::Hz12_5 => 12_500,
            Self::Hz25 => 25_000,
            Self::Hz50 => 50_000,
            Self::Hz100 => 100_000,
            Self::Hz200 => 200_000,
            Self::Hz400 => 400_000,
            Self::Hz800 => 800_000,
            Self::Hz1600 => 1_600_000,
            Self::Hz3200 => 3_200_000,
        }
    }

    /// Returns the rate in whole hertz, rounded down.
    pub const fn hz(self) -> u32 {
        self.millihertz() / 1_000
    }

    /// Picks the fastest rate whose whole-hertz value does not exceed `hz`.
    ///
    /// Requests below every rate resolve to the slowest one.
    pub fn from_hz(hz: i32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|rate| i64::from(rate.hz()) <= i64::from(hz))
            .unwrap_or(Self::Hz0_10)
    }

    /// Returns `true` when the rate may be combined with `BW_RATE.LOW_POWER`.
    pub const fn supports_low_power(self) -> bool {
        matches!(
            self,
            Self::Hz12_5 | Self::Hz25 | Self::Hz50 | Self::Hz100 | Self::Hz200 | Self::Hz400
        )
    }
}

/// Full-scale measurement range encoded in `DATA_FORMAT.RANGE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum Range {
    /// +/-2 g.
    G2 = 0b00,
    /// +/-4 g.
    G4 = 0b01,
    /// +/-8 g.
    G8 = 0b10,
    /// +/-16 g.
    G16 = 0b11,
}

impl Range {
    /// Every range, ordered by code.
    pub const ALL: [Self; 4] = [Self::G2, Self::G4, Self::G8, Self::G16];

    /// Decodes a field code, ignoring bits above the 2-bit field.
    pub const fn from_code(code: u8) -> Self {
        Self::ALL[(code & 0b11) as usize]
    }

    /// Returns the raw field code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Returns the full-scale value in g.
    pub const fn g(self) -> u32 {
        match self {
            Self::G2 => 2,
            Self::G4 => 4,
            Self::G8 => 8,
            Self::G16 => 16,
        }
    }

    /// Picks the widest range not above `g`, or +/-2 g below that.
    pub fn from_g(g: i32) -> Self {
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|range| i64::from(range.g()) <= i64::from(g))
            .unwrap_or(Self::G2)
    }
}

/// Measurement axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Axis {
    /// X axis.
    X,
    /// Y axis.
    Y,
    /// Z axis.
    Z,
}

impl Axis {
    /// Returns the address of the axis low data byte (`DATAx0`).
    pub const fn data_register(self) -> u8 {
        match self {
            Self::X => REG_DATAX0,
            Self::Y => REG_DATAY0,
            Self::Z => REG_DATAZ0,
        }
    }
}
