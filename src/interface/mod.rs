//! Register transport abstraction for the ADXL345 driver.
//!
//! The device engine only needs "read N bytes starting at register R" and
//! "write N bytes starting at register R". Everything else (single
//! registers, little-endian pairs, masked updates) is derived from those two
//! primitives here, so a new bus only has to provide them.

pub mod cache;
pub mod i2c;
pub mod spi;

/// Abstraction over the low-level bus access required by the driver.
pub trait Adxl345Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple consecutive registers from the provided buffer.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_many(register, &mut value)?;
        Ok(value[0])
    }

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_many(register, core::slice::from_ref(&value))
    }

    /// Reads two consecutive registers as a little-endian word.
    fn read_u16_le(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut raw = [0u8; 2];
        self.read_many(register, &mut raw)?;
        Ok(u16::from_le_bytes(raw))
    }

    /// Read-modify-write that only touches the bits selected by `mask`.
    fn update_bits(
        &mut self,
        register: u8,
        mask: u8,
        value: u8,
    ) -> core::result::Result<(), Self::Error> {
        let current = self.read_register(register)?;
        let updated = (current & !mask) | (value & mask);
        self.write_register(register, updated)
    }
}

impl<T> Adxl345Interface for &mut T
where
    T: Adxl345Interface + ?Sized,
{
    type Error = T::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        T::read_many(self, register, buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        T::write_many(self, register, data)
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        T::read_register(self, register)
    }

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        T::write_register(self, register, value)
    }

    fn read_u16_le(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        T::read_u16_le(self, register)
    }

    fn update_bits(
        &mut self,
        register: u8,
        mask: u8,
        value: u8,
    ) -> core::result::Result<(), Self::Error> {
        T::update_bits(self, register, mask, value)
    }
}
