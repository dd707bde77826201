#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod error;

pub mod config;
pub mod device;
pub mod frontend;
pub mod interface;
pub mod params;
pub mod registers;
pub mod registry;
pub mod sync;

#[cfg(test)]
mod testing;

pub use crate::device::{Adxl345, Axes, DeviceState};
pub use crate::error::{Error, Result};
pub use crate::registry::{Identity, Registry, MAX_DEVICES};
pub use crate::sync::SpinRawMutex;
