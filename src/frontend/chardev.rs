//! Streaming text view of a device.
//!
//! Every read takes a fresh burst sample and renders it as `x,y,z\n`. The
//! caller owns the offset, exactly like a positional file read; nothing is
//! buffered between calls.

use embassy_sync::blocking_mutex::raw::RawMutex;

use super::{control, render_line};
use crate::device::Adxl345;
use crate::error::Result;
use crate::interface::Adxl345Interface;

/// Openable streaming endpoint of one device.
pub struct CharDevice<'d, 'r, IFACE, M: RawMutex> {
    device: &'d Adxl345<'r, IFACE, M>,
}

impl<'d, 'r, IFACE, M: RawMutex> CharDevice<'d, 'r, IFACE, M> {
    pub(crate) fn new(device: &'d Adxl345<'r, IFACE, M>) -> Self {
        Self { device }
    }

    /// Opens a new handle. Handles are independent and may be used from
    /// different threads at once.
    pub fn open(&self) -> OpenFile<'d, 'r, IFACE, M> {
        debug!("{} handle opened", self.device.identity());
        OpenFile {
            device: self.device,
        }
    }
}

/// Open handle on a [`CharDevice`].
pub struct OpenFile<'d, 'r, IFACE, M: RawMutex> {
    device: &'d Adxl345<'r, IFACE, M>,
}

impl<IFACE, E, M> OpenFile<'_, '_, IFACE, M>
where
    IFACE: Adxl345Interface<Error = E>,
    M: RawMutex,
{
    /// Samples all axes and copies the rendered line, starting at `offset`,
    /// into `buf`.
    ///
    /// Returns the number of bytes copied; `0` once `offset` is at or past
    /// the end of the line.
    pub fn read(&self, offset: usize, buf: &mut [u8]) -> Result<usize, E> {
        let axes = self.device.sample_all_axes()?;
        let line = render_line(axes);

        let Some(rest) = line.as_bytes().get(offset..) else {
            return Ok(0);
        };
        let len = rest.len().min(buf.len());
        buf[..len].copy_from_slice(&rest[..len]);
        Ok(len)
    }

    /// Runs a control code against the device behind this handle.
    pub fn ioctl(&self, code: u32, arg: &mut i32) -> Result<(), E> {
        control::dispatch(self.device, code, arg)
    }
}

impl<IFACE, M: RawMutex> Drop for OpenFile<'_, '_, IFACE, M> {
    fn drop(&mut self) {
        debug!("{} handle closed", self.device.identity());
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use crate::error::Error;
    use crate::frontend::control::Command;
    use crate::registry::Registry;
    use crate::testing::{FakeError, FakeRegisters};
    use crate::Adxl345;

    #[test]
    fn read_renders_fresh_sample() {
        let registry: Registry = Registry::new();
        let mut device = Adxl345::bring_up(&registry, FakeRegisters::new(), Config::default()).unwrap();
        device.interface_mut().set_axes(16, -32, 48);

        let chardev = device.char_device();
        let file = chardev.open();
        let mut buf = [0u8; 64];
        let len = file.read(0, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"16,-32,48\n");
    }

    #[test]
    fn read_honours_offset_and_buffer_size() {
        let registry: Registry = Registry::new();
        let mut device = Adxl345::bring_up(&registry, FakeRegisters::new(), Config::default()).unwrap();
        device.interface_mut().set_axes(1, 2, 3);

        let chardev = device.char_device();
        let file = chardev.open();
        let mut buf = [0u8; 3];
        assert_eq!(file.read(2, &mut buf).unwrap(), 3);
        assert_eq!(&buf, b"2,3");

        // "1,2,3\n" is six bytes long.
        assert_eq!(file.read(6, &mut buf).unwrap(), 0);
        assert_eq!(file.read(100, &mut buf).unwrap(), 0);
        assert_eq!(file.read(5, &mut buf).unwrap(), 1);
        assert_eq!(buf[0], b'\n');
    }

    #[test]
    fn each_read_takes_a_new_sample() {
        let registry: Registry = Registry::new();
        let mut regs = FakeRegisters::new();
        regs.stream_from(1);
        let device = Adxl345::bring_up(&registry, regs, Config::default()).unwrap();

        let chardev = device.char_device();
        let file = chardev.open();
        let mut buf = [0u8; 16];
        // Bring-up consumed the first sample.
        let len = file.read(0, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"2,4,6\n");
        let len = file.read(0, &mut buf).unwrap();
        assert_eq!(&buf[..len], b"3,6,9\n");
    }

    #[test]
    fn failed_sample_is_reported() {
        let registry: Registry = Registry::new();
        let mut device = Adxl345::bring_up(&registry, FakeRegisters::new(), Config::default()).unwrap();
        device.interface_mut().fail_reads(true);

        let chardev = device.char_device();
        let file = chardev.open();
        let mut buf = [0u8; 16];
        assert_eq!(file.read(0, &mut buf), Err(Error::Interface(FakeError)));
    }

    #[test]
    fn ioctl_through_open_handle() {
        let registry: Registry = Registry::new();
        let device = Adxl345::bring_up(&registry, FakeRegisters::new(), Config::default()).unwrap();

        let chardev = device.char_device();
        let file = chardev.open();
        let mut arg = 2;
        file.ioctl(Command::SetRange.code(), &mut arg).unwrap();
        file.ioctl(Command::GetRange.code(), &mut arg).unwrap();
        assert_eq!(arg, 2);
        assert_eq!(device.state().measurement_range, 2);
    }

    #[test]
    fn handles_share_one_device_across_threads() {
        let registry: Registry = Registry::new();
        let mut regs = FakeRegisters::new();
        regs.stream_from(1);
        let device = Adxl345::bring_up(&registry, regs, Config::default()).unwrap();
        let chardev = device.char_device();

        std::thread::scope(|scope| {
            for _ in 0..4 {
                let file = chardev.open();
                scope.spawn(move || {
                    let mut buf = [0u8; 32];
                    for _ in 0..250 {
                        let len = file.read(0, &mut buf).unwrap();
                        let text = core::str::from_utf8(&buf[..len]).unwrap();
                        let values: Vec<i32> = text
                            .trim_end()
                            .split(',')
                            .map(|v| v.parse().unwrap())
                            .collect();
                        assert_eq!(values[1], values[0] * 2);
                        assert_eq!(values[2], values[0] * 3);
                    }
                });
            }
        });
    }
}
