//! Simulated register file used by the unit tests.

use std::sync::mpsc::{Receiver, Sender};

use crate::interface::Adxl345Interface;
use crate::registers::{EXPECTED_DEVID, REG_BW_RATE, REG_DATAX0, REG_DEVID};

/// Error returned by [`FakeRegisters`] when a failure is injected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeError;

/// In-memory ADXL345 register space.
pub struct FakeRegisters {
    registers: [u8; 64],
    transfers: usize,
    fail_reads: bool,
    fail_writes: bool,
    stream: Option<i16>,
    writes: Vec<(u8, u8)>,
    hold: Option<(Sender<()>, Receiver<()>)>,
}

impl FakeRegisters {
    /// Power-on register contents: `DEVID` and `BW_RATE` at their reset values.
    pub fn new() -> Self {
        let mut registers = [0u8; 64];
        registers[REG_DEVID as usize] = EXPECTED_DEVID;
        registers[REG_BW_RATE as usize] = 0x0A;
        Self {
            registers,
            transfers: 0,
            fail_reads: false,
            fail_writes: false,
            stream: None,
            writes: Vec::new(),
            hold: None,
        }
    }

    pub fn set(&mut self, register: u8, value: u8) {
        self.registers[register as usize] = value;
    }

    pub fn get(&self, register: u8) -> u8 {
        self.registers[register as usize]
    }

    /// Loads the data registers with one sample.
    pub fn set_axes(&mut self, x: i16, y: i16, z: i16) {
        for (index, value) in [x, y, z].into_iter().enumerate() {
            let [lo, hi] = value.to_le_bytes();
            let base = REG_DATAX0 as usize + index * 2;
            self.registers[base] = lo;
            self.registers[base + 1] = hi;
        }
    }

    /// Every burst read from `DATAX0` loads a fresh `(n, 2n, 3n)` sample
    /// first, starting at `start` and counting up.
    pub fn stream_from(&mut self, start: i16) {
        self.stream = Some(start);
    }

    /// Parks the next read mid-transfer: signals `entered`, then waits on
    /// `resume` before completing.
    pub fn hold_next_read(&mut self, entered: Sender<()>, resume: Receiver<()>) {
        self.hold = Some((entered, resume));
    }

    pub fn fail_reads(&mut self, fail: bool) {
        self.fail_reads = fail;
    }

    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }

    /// Number of successful bus transfers.
    pub fn transfers(&self) -> usize {
        self.transfers
    }

    /// Register writes in the order they happened.
    pub fn writes(&self) -> &[(u8, u8)] {
        &self.writes
    }
}

impl Adxl345Interface for FakeRegisters {
    type Error = FakeError;

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> Result<(), FakeError> {
        if let Some((entered, resume)) = self.hold.take() {
            let _ = entered.send(());
            let _ = resume.recv();
        }
        if self.fail_reads {
            return Err(FakeError);
        }
        if register == REG_DATAX0 && buf.len() == 6 {
            if let Some(n) = self.stream {
                self.set_axes(n, n.wrapping_mul(2), n.wrapping_mul(3));
                self.stream = Some(n.wrapping_add(1));
            }
        }
        let start = register as usize;
        buf.copy_from_slice(&self.registers[start..start + buf.len()]);
        self.transfers += 1;
        Ok(())
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> Result<(), FakeError> {
        if self.fail_writes {
            return Err(FakeError);
        }
        for (offset, value) in data.iter().enumerate() {
            let target = register + offset as u8;
            self.registers[target as usize] = *value;
            self.writes.push((target, *value));
        }
        self.transfers += 1;
        Ok(())
    }
}
