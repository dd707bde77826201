//! Error handling primitives for the ADXL345 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver and its front-ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<E> {
    /// Any error reported by the underlying register transport.
    Interface(E),
    /// `DEVID` did not hold the ADXL345 constant; carries the value read.
    IdentityMismatch(u8),
    /// Every device slot in the registry is taken.
    Capacity,
    /// The provided configuration parameters are invalid.
    InvalidConfig,
    /// Attribute text was not a decimal integer.
    Parse,
    /// A control code in the driver's range that matches no known command.
    InvalidArgument,
    /// A control code outside the driver's range.
    NoSuchOperation,
    /// The command is recognised but not implemented.
    Unsupported,
    /// The attribute does not allow the requested direction.
    AccessDenied,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
