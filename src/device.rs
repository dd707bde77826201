//! High-level ADXL345 device engine.
//!
//! [`Adxl345`] owns the register transport together with the cached device
//! state. Both live behind one mutex per device: every operation takes
//! `&self`, locks for its whole duration and releases on every exit path, so
//! the streaming, control-code and attribute front-ends can share a device
//! without interleaving register traffic or observing half-updated state.

use core::cell::RefCell;
use core::fmt;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiDevice;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::frontend::attr::Attributes;
use crate::frontend::chardev::CharDevice;
use crate::interface::i2c::I2cInterface;
use crate::interface::spi::SpiInterface;
use crate::interface::Adxl345Interface;
use crate::params::Axis;
use crate::registers::{
    BwRate,
    DataFormat,
    PowerControl,
    Register,
    BW_RATE_RATE_MASK,
    DATA_FORMAT_RANGE_MASK,
    EXPECTED_DEVID,
    REG_DATAX0,
    REG_DEVID,
};
use crate::registry::{Identity, Registration, Registry};
use crate::sync::SpinRawMutex;

// Number of consecutive bytes spanning X, Y, Z axis samples.
const RAW_AXIS_BYTES: usize = 6;

/// One acceleration sample in raw LSBs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Axes {
    /// X-axis reading.
    pub x: i16,
    /// Y-axis reading.
    pub y: i16,
    /// Z-axis reading.
    pub z: i16,
}

impl Axes {
    /// Decodes the six `DATAX0..DATAZ1` bytes.
    pub fn from_le_bytes(raw: [u8; RAW_AXIS_BYTES]) -> Self {
        Self {
            x: i16::from_le_bytes([raw[0], raw[1]]),
            y: i16::from_le_bytes([raw[2], raw[3]]),
            z: i16::from_le_bytes([raw[4], raw[5]]),
        }
    }

    /// Returns the reading of a single axis.
    pub fn get(&self, axis: Axis) -> i16 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    fn set(&mut self, axis: Axis, value: i16) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
            Axis::Z => self.z = value,
        }
    }
}

/// Renders `x,y,z` as signed decimals.
impl fmt::Display for Axes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.x, self.y, self.z)
    }
}

/// Last known register-derived state of a device.
///
/// `sample_rate` and `measurement_range` are raw field codes and are only
/// trustworthy right after the driver read or wrote the register; changes
/// made to the part behind the driver's back are not observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceState {
    /// `BW_RATE.RATE` code.
    pub sample_rate: u8,
    /// `DATA_FORMAT.RANGE` code.
    pub measurement_range: u8,
    /// Most recent axis readings.
    pub axes: Axes,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            sample_rate: BwRate::reset().rate().code(),
            measurement_range: DataFormat::reset().range().code(),
            axes: Axes::default(),
        }
    }
}

struct Inner<IFACE> {
    interface: IFACE,
    state: DeviceState,
}

/// Synchronous driver for one live ADXL345.
///
/// `M` picks the raw mutex of the device lock. The default [`SpinRawMutex`]
/// belongs to this device alone, so operations on different devices never
/// wait on each other.
pub struct Adxl345<'r, IFACE, M: RawMutex = SpinRawMutex> {
    registration: Registration<'r, M>,
    inner: Mutex<M, RefCell<Inner<IFACE>>>,
}

impl<'r, IFACE, M: RawMutex> Adxl345<'r, IFACE, M> {
    // ==================================================================
    // == Ownership & Identity ==========================================
    // ==================================================================
    /// Identity assigned by the registry at bring-up.
    pub fn identity(&self) -> Identity {
        self.registration.identity()
    }

    /// Consistent snapshot of the cached state.
    pub fn state(&self) -> DeviceState {
        self.inner.lock(|inner| inner.borrow().state)
    }

    /// Cached axis readings from the last sample.
    pub fn axes(&self) -> Axes {
        self.state().axes
    }

    /// Provides exclusive access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.inner.get_mut().get_mut().interface
    }

    /// Tears the device down and returns the owned interface.
    ///
    /// The identity goes back to the registry; front-end views borrow the
    /// device, so all of them are closed by the time this runs.
    pub fn release(self) -> IFACE {
        let Self {
            registration,
            inner,
        } = self;
        let identity = registration.identity();
        drop(registration);
        info!("{} removed", identity);
        inner.into_inner().into_inner().interface
    }

    /// Streaming-read view of this device.
    pub fn char_device(&self) -> CharDevice<'_, 'r, IFACE, M> {
        CharDevice::new(self)
    }

    /// Attribute view of this device.
    pub fn attributes(&self) -> Attributes<'_, 'r, IFACE, M> {
        Attributes::new(self)
    }

    fn with_inner<R>(&self, f: impl FnOnce(&mut Inner<IFACE>) -> R) -> R {
        self.inner.lock(|cell| f(&mut cell.borrow_mut()))
    }
}

impl<'r, SPI, M> Adxl345<'r, SpiInterface<SPI>, M>
where
    SPI: SpiDevice,
    M: RawMutex,
{
    // ==================================================================
    // == Bus Convenience Constructors ==================================
    // ==================================================================
    /// Brings up a device on an SPI bus.
    pub fn bring_up_spi(
        registry: &'r Registry<M>,
        spi: SPI,
        config: Config,
    ) -> Result<Self, SPI::Error> {
        Self::bring_up(registry, SpiInterface::new(spi), config)
    }

    /// Releases the driver, returning the SPI device.
    pub fn release_spi(self) -> SPI {
        self.release().release()
    }
}

impl<'r, I2C, M> Adxl345<'r, I2cInterface<I2C>, M>
where
    I2C: I2c,
    M: RawMutex,
{
    /// Brings up a device on an I2C bus at `address`.
    pub fn bring_up_i2c(
        registry: &'r Registry<M>,
        i2c: I2C,
        address: u8,
        config: Config,
    ) -> Result<Self, I2C::Error> {
        Self::bring_up(registry, I2cInterface::new(i2c, address), config)
    }

    /// Releases the driver, returning the I2C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<'r, IFACE, CommE, M> Adxl345<'r, IFACE, M>
where
    IFACE: Adxl345Interface<Error = CommE>,
    M: RawMutex,
{
    // ==================================================================
    // == Bring-up ======================================================
    // ==================================================================
    /// Creates and verifies a device.
    ///
    /// Reserves an identity, checks `DEVID`, programs `DATA_FORMAT` (and
    /// `BW_RATE` when the config names a rate), enables measurement and
    /// finally reads one sample to prove the data path works. If any step
    /// fails the identity is handed back and nothing stays registered.
    pub fn bring_up(registry: &'r Registry<M>, interface: IFACE, config: Config) -> Result<Self, CommE> {
        if config.validate().is_err() {
            return Err(Error::InvalidConfig);
        }
        let Ok(registration) = registry.register() else {
            return Err(Error::Capacity);
        };

        let device = Self {
            registration,
            inner: Mutex::new(RefCell::new(Inner {
                interface,
                state: DeviceState::default(),
            })),
        };
        let identity = device.identity();

        device.check_id()?;
        device.apply_config(&config)?;
        device.enable()?;
        let axes = device.sample_all_axes()?;

        info!(
            "{} up, axes x: {}, y: {}, z: {}",
            identity, axes.x, axes.y, axes.z
        );
        Ok(device)
    }

    /// Verifies the identification register against the ADXL345 constant.
    pub fn check_id(&self) -> Result<(), CommE> {
        let id = self.with_inner(|inner| inner.interface.read_register(REG_DEVID))?;
        if id != EXPECTED_DEVID {
            warn!("invalid DEVID {=u8:#x}", id);
            return Err(Error::IdentityMismatch(id));
        }
        Ok(())
    }

    fn apply_config(&self, config: &Config) -> Result<(), CommE> {
        let format = config.data_format();
        let bw_rate = config.bw_rate();
        self.with_inner(|inner| -> Result<_, CommE> {
            inner
                .interface
                .write_register(DataFormat::ADDRESS, u8::from(format))?;
            inner.state.measurement_range = format.range().code();

            if let Some(bw_rate) = bw_rate {
                inner
                    .interface
                    .write_register(BwRate::ADDRESS, u8::from(bw_rate))?;
                inner.state.sample_rate = bw_rate.rate().code();
            }
            Ok(())
        })
    }

    // ==================================================================
    // == Power =========================================================
    // ==================================================================
    /// Switches the part into measurement mode.
    pub fn enable(&self) -> Result<(), CommE> {
        let measure = PowerControl::new().with_measure(true);
        self.write_power_control(measure)
    }

    /// Puts the part into standby.
    pub fn disable(&self) -> Result<(), CommE> {
        self.write_power_control(PowerControl::new())
    }

    fn write_power_control(&self, power: PowerControl) -> Result<(), CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            inner.interface.write_register(PowerControl::ADDRESS, u8::from(power))?;
            Ok(())
        })
    }

    // ==================================================================
    // == Rate & Range ==================================================
    // ==================================================================
    /// Reads the output data rate code and refreshes the cache.
    pub fn read_sample_rate(&self) -> Result<u8, CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            let rate = inner.interface.read_register(BwRate::ADDRESS)? & BW_RATE_RATE_MASK;
            inner.state.sample_rate = rate;
            Ok(rate)
        })
    }

    /// Writes the output data rate code.
    ///
    /// Bits above the 4-bit field never reach the register, but the cache
    /// stores `rate` as given without reading it back, so an oversized code
    /// shows up in [`state`](Self::state) until the next read.
    pub fn write_sample_rate(&self, rate: u8) -> Result<(), CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            inner
                .interface
                .update_bits(BwRate::ADDRESS, BW_RATE_RATE_MASK, rate)?;
            inner.state.sample_rate = rate;
            Ok(())
        })
    }

    /// Reads the g-range code and refreshes the cache.
    pub fn read_measurement_range(&self) -> Result<u8, CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            let range = inner.interface.read_register(DataFormat::ADDRESS)? & DATA_FORMAT_RANGE_MASK;
            inner.state.measurement_range = range;
            Ok(range)
        })
    }

    /// Writes the g-range code.
    ///
    /// Bits above the 2-bit field are silently dropped, so `4` selects
    /// +/-2 g. Like [`write_sample_rate`](Self::write_sample_rate) the cache
    /// trusts the written value.
    pub fn write_measurement_range(&self, range: u8) -> Result<(), CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            inner
                .interface
                .update_bits(DataFormat::ADDRESS, DATA_FORMAT_RANGE_MASK, range)?;
            inner.state.measurement_range = range;
            Ok(())
        })
    }

    // ==================================================================
    // == Data Acquisition ==============================================
    // ==================================================================
    /// Reads one axis and refreshes only that slot of the cache.
    pub fn read_axis(&self, axis: Axis) -> Result<i16, CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            let value = inner.interface.read_u16_le(axis.data_register())? as i16;
            inner.state.axes.set(axis, value);
            Ok(value)
        })
    }

    /// Burst-reads all three axes and replaces the cached triple at once.
    pub fn sample_all_axes(&self) -> Result<Axes, CommE> {
        self.with_inner(|inner| -> Result<_, CommE> {
            let mut raw = [0u8; RAW_AXIS_BYTES];
            inner.interface.read_many(REG_DATAX0, &mut raw)?;

            let axes = Axes::from_le_bytes(raw);
            inner.state.axes = axes;
            Ok(axes)
        })
    }
}
