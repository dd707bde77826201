//! SPI interface implementation built on top of `embedded-hal` `SpiDevice`.
//!
//! The ADXL345 frames every transfer with a command byte: bit 7 selects a
//! read, bit 6 requests address auto-increment, and bits 5:0 carry the
//! register address.

use embedded_hal::spi::{Operation, SpiDevice};

use super::Adxl345Interface;

const READ_FLAG: u8 = 0x80;
const MULTI_BYTE_FLAG: u8 = 0x40;
const ADDRESS_MASK: u8 = 0x3F;

/// SPI-based interface implementation for the ADXL345 driver.
pub struct SpiInterface<SPI> {
    spi: SPI,
}

impl<SPI> SpiInterface<SPI> {
    /// Creates a new interface from the provided SPI device abstraction.
    pub const fn new(spi: SPI) -> Self {
        Self { spi }
    }

    /// Builds the command byte used to address registers over SPI.
    fn command_byte(register: u8, is_read: bool, len: usize) -> u8 {
        let mut command = register & ADDRESS_MASK;
        if is_read {
            command |= READ_FLAG;
        }
        if len > 1 {
            command |= MULTI_BYTE_FLAG;
        }
        command
    }

    /// Provides mutable access to the wrapped SPI device.
    pub fn spi_mut(&mut self) -> &mut SPI {
        &mut self.spi
    }

    /// Consumes the interface and returns the owned SPI device.
    pub fn release(self) -> SPI {
        self.spi
    }
}

impl<SPI> Adxl345Interface for SpiInterface<SPI>
where
    SPI: SpiDevice,
{
    type Error = SPI::Error;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, true, buf.len())];
        let mut operations = [Operation::Write(&command), Operation::Read(buf)];
        self.spi.transaction(&mut operations)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        if data.is_empty() {
            return Ok(());
        }

        let command = [Self::command_byte(register, false, data.len())];
        let mut operations = [Operation::Write(&command), Operation::Write(data)];
        self.spi.transaction(&mut operations)
    }
}

#[cfg(test)]
mod tests {
    use super::SpiInterface;
    use crate::interface::Adxl345Interface;
    use embedded_hal_mock::eh1::spi::{Mock as SpiMock, Transaction as SpiTransaction};

    fn read(command: u8, response: Vec<u8>) -> [SpiTransaction<u8>; 4] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![command]),
            SpiTransaction::read_vec(response),
            SpiTransaction::transaction_end(),
        ]
    }

    fn write(command: u8, payload: Vec<u8>) -> [SpiTransaction<u8>; 4] {
        [
            SpiTransaction::transaction_start(),
            SpiTransaction::write_vec(vec![command]),
            SpiTransaction::write_vec(payload),
            SpiTransaction::transaction_end(),
        ]
    }

    #[test]
    fn burst_read_sets_read_and_multi_byte_flags() {
        let expectations = read(0xF2, vec![0x10, 0x00, 0x20, 0x00, 0x30, 0x00]);
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        let mut buffer = [0u8; 6];
        interface.read_many(0x32, &mut buffer).unwrap();
        assert_eq!(buffer, [0x10, 0x00, 0x20, 0x00, 0x30, 0x00]);
        spi.done();
    }

    #[test]
    fn single_read_sets_only_read_flag() {
        let expectations = read(0x80, vec![0xE5]);
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        assert_eq!(interface.read_register(0x00).unwrap(), 0xE5);
        spi.done();
    }

    #[test]
    fn word_read_is_a_multi_byte_transfer() {
        let expectations = read(0xF4, vec![0xFE, 0xFF]);
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        assert_eq!(interface.read_u16_le(0x34).unwrap() as i16, -2);
        spi.done();
    }

    #[test]
    fn single_write_masks_address() {
        let expectations = write(0x2D, vec![0x08]);
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        interface.write_register(0x2D, 0x08).unwrap();
        spi.done();
    }

    #[test]
    fn multi_write_sets_multi_byte_flag() {
        let expectations = write(0x5E, vec![0x01, 0x02, 0x03]);
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        interface.write_many(0x1E, &[0x01, 0x02, 0x03]).unwrap();
        spi.done();
    }

    #[test]
    fn update_bits_reads_then_writes() {
        let mut expectations = Vec::new();
        expectations.extend(read(0xAC, vec![0x1A]));
        expectations.extend(write(0x2C, vec![0x1C]));
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        interface.update_bits(0x2C, 0x0F, 0x0C).unwrap();
        spi.done();
    }

    #[test]
    fn empty_transfers_are_skipped() {
        let expectations: [SpiTransaction<u8>; 0] = [];
        let mut spi = SpiMock::new(&expectations);
        let mut interface = SpiInterface::new(spi.clone());

        interface.read_many(0x32, &mut []).unwrap();
        interface.write_many(0x32, &[]).unwrap();
        spi.done();
    }
}
