//! User-facing adapters over a live [`Adxl345`](crate::Adxl345).
//!
//! Each adapter is a thin view borrowing the device: [`chardev`] renders
//! samples as a text stream, [`control`] decodes numeric control codes and
//! [`attr`] exposes named text attributes. None of them keep state of their
//! own; every call goes through the device engine and its lock.

use core::fmt::{self, Write};

pub mod attr;
pub mod chardev;
pub mod control;

/// Longest rendered line, `"-32768,-32768,-32768\n"`, fits with room to spare.
pub const LINE_CAPACITY: usize = 24;

/// Fixed-capacity text produced by the front-ends.
pub type Line = heapless::String<LINE_CAPACITY>;

/// Renders `value` followed by a newline.
pub(crate) fn render_line(value: impl fmt::Display) -> Line {
    let mut line = Line::new();
    // Every value rendered here is bounded by LINE_CAPACITY.
    let _ = writeln!(line, "{value}");
    line
}
