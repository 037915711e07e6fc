//! Errors returned by the driver.

use core::fmt;

/// Error returned by driver operations. Geometry is never an error: requests that clip to
/// nothing return `Ok(())` without touching the bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Error<E> {
    /// The display interface failed to transmit.
    Interface(E),
    /// A configuration command operand was outside the range its register accepts. The offending
    /// command is not sent, though commands ahead of it in the same call may have been.
    OutOfRange,
}

/// Marker for a command operand outside its register range, raised while encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutOfRange;

impl<E> From<OutOfRange> for Error<E> {
    fn from(_: OutOfRange) -> Self {
        Error::OutOfRange
    }
}

impl<E: fmt::Debug> fmt::Display for Error<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Interface(e) => write!(f, "display interface error: {:?}", e),
            Error::OutOfRange => write!(f, "command operand out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl<E: fmt::Debug> std::error::Error for Error<E> {}
