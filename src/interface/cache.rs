//! Register-cache wrapper over any [`Adxl345Interface`].
//!
//! Keeps a shadow copy of every non-volatile register the driver has read or
//! written. Reads of cached registers and the read half of
//! [`update_bits`](Adxl345Interface::update_bits) are served from the shadow,
//! and masked updates that would not change the register skip the bus.
//!
//! The shadow is only as fresh as the last access made through this wrapper.
//! Call [`CachedInterface::invalidate`] after anything else touches the part
//! (reset, another bus master).

use super::Adxl345Interface;
use crate::registers::{is_volatile, REGISTER_COUNT};

/// Caching register transport.
pub struct CachedInterface<IFACE> {
    interface: IFACE,
    shadow: [Option<u8>; REGISTER_COUNT],
}

impl<IFACE> CachedInterface<IFACE> {
    /// Wraps `interface` with an empty shadow.
    pub const fn new(interface: IFACE) -> Self {
        Self {
            interface,
            shadow: [None; REGISTER_COUNT],
        }
    }

    /// Drops every cached value.
    pub fn invalidate(&mut self) {
        self.shadow = [None; REGISTER_COUNT];
    }

    /// Returns the cached value of `register`, if any.
    pub fn cached(&self, register: u8) -> Option<u8> {
        self.shadow.get(register as usize).copied().flatten()
    }

    /// Provides mutable access to the wrapped interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }

    /// Consumes the wrapper and returns the inner interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    fn remember(&mut self, register: u8, values: &[u8]) {
        for (offset, value) in values.iter().enumerate() {
            let target = register as usize + offset;
            if target >= REGISTER_COUNT || is_volatile(target as u8) {
                continue;
            }
            self.shadow[target] = Some(*value);
        }
    }
}

impl<IFACE> Adxl345Interface for CachedInterface<IFACE>
where
    IFACE: Adxl345Interface,
{
    type Error = IFACE::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if let [slot] = buf {
            if let Some(value) = self.cached(register) {
                *slot = value;
                return Ok(());
            }
        }

        self.interface.read_many(register, buf)?;
        self.remember(register, buf);
        Ok(())
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        self.interface.write_many(register, data)?;
        self.remember(register, data);
        Ok(())
    }

    fn update_bits(
        &mut self,
        register: u8,
        mask: u8,
        value: u8,
    ) -> core::result::Result<(), Self::Error> {
        let current = self.read_register(register)?;
        let updated = (current & !mask) | (value & mask);
        if updated == current && self.cached(register).is_some() {
            return Ok(());
        }
        self.write_register(register, updated)
    }
}
