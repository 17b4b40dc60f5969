//! Driver error types

use core::fmt;

/// Errors returned by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// The SPI device reported a transfer failure
    Bus,
    /// Reading CTS or driving the shutdown line failed
    Pin,
    /// CTS was not asserted within the configured budget
    Timeout,
    /// The response buffer was read without the 0xFF ready marker in front of it.
    ///
    /// Carries the status byte the chip returned instead.
    ProtocolFault(u8),
    /// A parameter was out of range; nothing was sent to the chip
    InvalidArgument,
    /// A response decoded to a value the chip should never report
    InvalidResponse,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "SPI transfer failed"),
            Self::Pin => write!(f, "GPIO access failed"),
            Self::Timeout => write!(f, "timed out waiting for CTS"),
            Self::ProtocolFault(status) => {
                write!(f, "response not ready (status byte {:#04x})", status)
            }
            Self::InvalidArgument => write!(f, "invalid argument"),
            Self::InvalidResponse => write!(f, "invalid response from device"),
        }
    }
}

/// Errors found while validating a configuration table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigTableError {
    /// A length prefix runs past the end of the table
    Truncated {
        /// Offset of the offending length byte
        offset: usize,
    },
    /// A frame is longer than the largest command the chip accepts
    FrameTooLong {
        /// Offset of the offending length byte
        offset: usize,
        /// The declared frame length
        len: u8,
    },
    /// The table ends without a zero-length terminator
    MissingTerminator,
}

impl fmt::Display for ConfigTableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated { offset } => write!(f, "frame at offset {} is truncated", offset),
            Self::FrameTooLong { offset, len } => {
                write!(f, "frame at offset {} is {} bytes long", offset, len)
            }
            Self::MissingTerminator => write!(f, "table has no zero-length terminator"),
        }
    }
}
