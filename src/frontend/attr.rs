//! Named text attributes of a device.
//!
//! | name      | access     | value                                   |
//! |-----------|------------|-----------------------------------------|
//! | `enable`  | write-only | any text; enters measurement mode       |
//! | `disable` | write-only | any text; enters standby                |
//! | `rate`    | read/write | output data rate in whole hertz (floor) |
//! | `range`   | read/write | full-scale range in g                   |
//! | `x` `y` `z` | read-only | raw axis reading                       |
//!
//! Shown values end with a newline. Stored numbers are decimal with an
//! optional sign and at most one trailing newline; rate and range snap down
//! to the nearest supported setting.
//!
//! The four rates below 1 Hz all show as `0`. Storing a value that the
//! current rate already shows as keeps the current rate, so writing back
//! what was read never changes the setting. Otherwise `0` selects 0.78 Hz
//! and any negative value 0.10 Hz; the control codes reach every rate
//! directly.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{render_line, Line};
use crate::device::Adxl345;
use crate::error::{Error, Result};
use crate::interface::Adxl345Interface;
use crate::params::{Axis, DataRate, Range};

/// Which directions an attribute supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Access {
    /// Show only.
    ReadOnly,
    /// Store only.
    WriteOnly,
    /// Show and store.
    ReadWrite,
}

impl Access {
    /// Returns `true` if the attribute can be shown.
    pub const fn readable(self) -> bool {
        matches!(self, Self::ReadOnly | Self::ReadWrite)
    }

    /// Returns `true` if the attribute can be stored.
    pub const fn writable(self) -> bool {
        matches!(self, Self::WriteOnly | Self::ReadWrite)
    }
}

/// Attributes published for every device.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Attribute {
    /// `enable`: enters measurement mode on any store.
    Enable,
    /// `disable`: enters standby on any store.
    Disable,
    /// `rate`: output data rate in hertz.
    Rate,
    /// `range`: full-scale range in g.
    Range,
    /// `x`: X-axis reading.
    X,
    /// `y`: Y-axis reading.
    Y,
    /// `z`: Z-axis reading.
    Z,
}

impl Attribute {
    /// Every attribute in publication order.
    pub const ALL: [Self; 7] = [
        Self::Enable,
        Self::Disable,
        Self::Rate,
        Self::Range,
        Self::X,
        Self::Y,
        Self::Z,
    ];

    /// Attribute file name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Enable => "enable",
            Self::Disable => "disable",
            Self::Rate => "rate",
            Self::Range => "range",
            Self::X => "x",
            Self::Y => "y",
            Self::Z => "z",
        }
    }

    /// Directions the attribute supports.
    pub const fn access(self) -> Access {
        match self {
            Self::Enable | Self::Disable => Access::WriteOnly,
            Self::Rate | Self::Range => Access::ReadWrite,
            Self::X | Self::Y | Self::Z => Access::ReadOnly,
        }
    }

    /// Looks an attribute up by file name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|attr| attr.name() == name)
    }
}

/// Attribute view of one device.
pub struct Attributes<'d, 'r, IFACE, M: RawMutex> {
    device: &'d Adxl345<'r, IFACE, M>,
}

impl<'d, 'r, IFACE, M: RawMutex> Attributes<'d, 'r, IFACE, M> {
    pub(crate) fn new(device: &'d Adxl345<'r, IFACE, M>) -> Self {
        Self { device }
    }
}

impl<IFACE, E, M> Attributes<'_, '_, IFACE, M>
where
    IFACE: Adxl345Interface<Error = E>,
    M: RawMutex,
{
    /// Reads `attr` from the device and renders it.
    pub fn show(&self, attr: Attribute) -> Result<Line, E> {
        let line = match attr {
            Attribute::Rate => {
                let rate = DataRate::from_code(self.device.read_sample_rate()?);
                render_line(rate.hz())
            }
            Attribute::Range => {
                let range = Range::from_code(self.device.read_measurement_range()?);
                render_line(range.g())
            }
            Attribute::X => render_line(self.device.read_axis(Axis::X)?),
            Attribute::Y => render_line(self.device.read_axis(Axis::Y)?),
            Attribute::Z => render_line(self.device.read_axis(Axis::Z)?),
            Attribute::Enable | Attribute::Disable => return Err(Error::AccessDenied),
        };
        Ok(line)
    }

    /// Parses `input` and applies it to `attr`.
    ///
    /// Returns the number of bytes consumed, which is always all of `input`.
    pub fn store(&self, attr: Attribute, input: &str) -> Result<usize, E> {
        match attr {
            Attribute::Enable => self.device.enable()?,
            Attribute::Disable => self.device.disable()?,
            Attribute::Rate => {
                let hz = parse_int(input)?;
                let current = DataRate::from_code(self.device.read_sample_rate()?);
                let rate = if i64::from(current.hz()) == i64::from(hz) {
                    current
                } else {
                    DataRate::from_hz(hz)
                };
                self.device.write_sample_rate(rate.code())?;
            }
            Attribute::Range => {
                let range = Range::from_g(parse_int(input)?);
                self.device.write_measurement_range(range.code())?;
            }
            Attribute::X | Attribute::Y | Attribute::Z => return Err(Error::AccessDenied),
        }
        Ok(input.len())
    }

    /// [`show`](Self::show) addressed by attribute name.
    pub fn show_named(&self, name: &str) -> Result<Line, E> {
        let Some(attr) = Attribute::from_name(name) else {
            return Err(Error::NoSuchOperation);
        };
        self.show(attr)
    }

    /// [`store`](Self::store) addressed by attribute name.
    pub fn store_named(&self, name: &str, input: &str) -> Result<usize, E> {
        let Some(attr) = Attribute::from_name(name) else {
            return Err(Error::NoSuchOperation);
        };
        self.store(attr, input)
    }
}

fn parse_int<E>(input: &str) -> Result<i32, E> {
    let text = input.strip_suffix('\n').unwrap_or(input);
    text.parse().map_err(|_| Error::Parse)
}
