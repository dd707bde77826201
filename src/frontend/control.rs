//! Numeric control-code adapter.
//!
//! Codes follow the Linux `_IOC` layout: command number in bits 7:0, the
//! driver's magic type in bits 15:8, payload size in bits 29:16 and the
//! transfer direction in bits 31:30. Get/set commands exchange one `i32`
//! carrying a raw register field code.
#![allow(unused_parens)]

use embassy_sync::blocking_mutex::raw::RawMutex;
use modular_bitfield::prelude::*;

use crate::device::Adxl345;
use crate::error::{Error, Result};
use crate::interface::Adxl345Interface;

/// Type byte shared by every control code of this driver.
pub const IOCTL_MAGIC: u8 = 0x4C;
/// Highest command number in use.
pub const IOCTL_MAX_NR: u8 = 6;

const INT_SIZE: u16 = core::mem::size_of::<i32>() as u16;

/// Payload direction as seen from the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[bits = 2]
pub enum Direction {
    /// No payload.
    NoData = 0,
    /// Caller passes a value in.
    Write = 1,
    /// Driver hands a value back.
    Read = 2,
    /// Both directions.
    ReadWrite = 3,
}

/// Bit layout of a control code.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IoctlCode {
    pub nr: u8,
    pub kind: u8,
    pub size: B14,
    pub direction: Direction,
}

impl From<u32> for IoctlCode {
    fn from(value: u32) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<IoctlCode> for u32 {
    fn from(value: IoctlCode) -> Self {
        u32::from_le_bytes(value.into_bytes())
    }
}

/// Commands understood by the control adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Enter measurement mode.
    Enable,
    /// Enter standby.
    Disable,
    /// Return the `BW_RATE` rate code.
    GetRate,
    /// Set the `BW_RATE` rate code.
    SetRate,
    /// Return the `DATA_FORMAT` range code.
    GetRange,
    /// Set the `DATA_FORMAT` range code.
    SetRange,
    /// Offset calibration; accepted but not implemented.
    Calibrate,
}

/// Reasons a raw code does not name a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DecodeError {
    /// Foreign magic or a command number above [`IOCTL_MAX_NR`].
    NoSuchOperation,
    /// Right magic and number range, but size or direction do not match.
    InvalidArgument,
}

impl DecodeError {
    fn into_error<E>(self) -> Error<E> {
        match self {
            Self::NoSuchOperation => Error::NoSuchOperation,
            Self::InvalidArgument => Error::InvalidArgument,
        }
    }
}

impl Command {
    /// Every command, ordered by number.
    pub const ALL: [Self; 7] = [
        Self::Enable,
        Self::Disable,
        Self::GetRate,
        Self::SetRate,
        Self::GetRange,
        Self::SetRange,
        Self::Calibrate,
    ];

    /// Command number (`_IOC_NR`).
    pub const fn nr(self) -> u8 {
        match self {
            Self::Enable => 0,
            Self::Disable => 1,
            Self::GetRate => 2,
            Self::SetRate => 3,
            Self::GetRange => 4,
            Self::SetRange => 5,
            Self::Calibrate => 6,
        }
    }

    fn direction(self) -> Direction {
        match self {
            Self::GetRate | Self::GetRange => Direction::Read,
            Self::SetRate | Self::SetRange => Direction::Write,
            Self::Enable | Self::Disable | Self::Calibrate => Direction::NoData,
        }
    }

    fn size(self) -> u16 {
        match self.direction() {
            Direction::NoData => 0,
            _ => INT_SIZE,
        }
    }

    /// Full 32-bit control code.
    pub fn code(self) -> u32 {
        IoctlCode::new()
            .with_nr(self.nr())
            .with_kind(IOCTL_MAGIC)
            .with_size(self.size())
            .with_direction(self.direction())
            .into()
    }

    /// Resolves a raw code; only exact matches are accepted.
    pub fn decode(code: u32) -> core::result::Result<Self, DecodeError> {
        let fields = IoctlCode::from(code);
        if fields.kind() != IOCTL_MAGIC || fields.nr() > IOCTL_MAX_NR {
            return Err(DecodeError::NoSuchOperation);
        }

        Self::ALL
            .into_iter()
            .find(|command| command.code() == code)
            .ok_or(DecodeError::InvalidArgument)
    }

    /// Runs the command against `device`.
    ///
    /// Get commands overwrite `arg` with the field code. Set commands use
    /// the low byte of `arg` and leave field-width truncation to the engine.
    pub fn execute<IFACE, E, M>(self, device: &Adxl345<'_, IFACE, M>, arg: &mut i32) -> Result<(), E>
    where
        IFACE: Adxl345Interface<Error = E>,
        M: RawMutex,
    {
        let identity = device.identity();
        match self {
            Self::Enable => device.enable()?,
            Self::Disable => device.disable()?,
            Self::GetRate => {
                *arg = i32::from(device.read_sample_rate()?);
                debug!("{} get rate {}", identity, *arg);
            }
            Self::SetRate => {
                device.write_sample_rate(*arg as u8)?;
                debug!("{} set rate {}", identity, device.state().sample_rate);
            }
            Self::GetRange => {
                *arg = i32::from(device.read_measurement_range()?);
                debug!("{} get range {}", identity, *arg);
            }
            Self::SetRange => {
                device.write_measurement_range(*arg as u8)?;
                debug!("{} set range {}", identity, device.state().measurement_range);
            }
            Self::Calibrate => return Err(Error::Unsupported),
        }
        Ok(())
    }
}

/// Decodes `code` and runs it against `device`.
pub fn dispatch<IFACE, E, M>(device: &Adxl345<'_, IFACE, M>, code: u32, arg: &mut i32) -> Result<(), E>
where
    IFACE: Adxl345Interface<Error = E>,
    M: RawMutex,
{
    match Command::decode(code) {
        Ok(command) => command.execute(device, arg),
        Err(err) => Err(err.into_error()),
    }
}
