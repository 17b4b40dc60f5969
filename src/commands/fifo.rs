//! FIFO and packet handler commands
//!
//! FIFO_INFO doubles as the FIFO reset command: the reset bits in its single
//! parameter flush the TX and/or RX FIFO before the counts are reported.
//! PACKET_INFO reports the length of the packet currently being received and
//! can override the length of a variable field on the fly.

use bitflags::bitflags;
use core::convert::Infallible;

use crate::{Command, FromByteArray, ToByteArray};

bitflags! {
    /// FIFO_INFO reset selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FifoReset: u8 {
        /// Flush the RX FIFO
        const RX = 1 << 1;
        /// Flush the TX FIFO
        const TX = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for FifoReset {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "FifoReset {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

impl ToByteArray for FifoReset {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.bits()])
    }
}

/// FIFO_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FifoStatus {
    /// Bytes waiting in the RX FIFO
    pub rx_fifo_count: u8,
    /// Free bytes in the TX FIFO
    pub tx_fifo_space: u8,
}

impl FromByteArray for FifoStatus {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            rx_fifo_count: bytes[0],
            tx_fifo_space: bytes[1],
        })
    }
}

/// FIFO_INFO command (0x15)
///
/// Reports FIFO fill levels, optionally resetting either FIFO first.
///
/// # Important Notes
/// - Reset the TX FIFO before loading a new packet
/// - Reset the RX FIFO before entering RX to drop stale bytes
#[derive(Debug, Clone)]
pub struct FifoInfo {
    pub reset: FifoReset,
}

impl Command for FifoInfo {
    type IdType = u8;
    type CommandParameters = FifoReset;
    type ResponseParameters = FifoStatus;

    fn id() -> Self::IdType {
        0x15
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.reset
    }
}

/// FIFO_INFO issued for its reset side effect only.
///
/// Same opcode as [`FifoInfo`], but the response buffer is left unread.
#[derive(Debug, Clone)]
pub struct ResetFifo {
    pub reset: FifoReset,
}

impl Command for ResetFifo {
    type IdType = u8;
    type CommandParameters = FifoReset;
    type ResponseParameters = crate::NoParameters;

    fn id() -> Self::IdType {
        0x15
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.reset
    }
}

/// PACKET_INFO parameters
#[derive(Debug, Clone, Copy, Default)]
pub struct PacketInfoConfig {
    /// Field number whose length is overridden; 0 leaves the lengths alone
    pub field: u8,
    /// New field length
    pub length: u16,
    /// Signed length adjustment applied to the remaining fields
    pub diff_length: u16,
}

impl ToByteArray for PacketInfoConfig {
    type Error = Infallible;
    type Array = [u8; 5];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0u8; 5];
        bytes[0] = self.field;
        bytes[1..3].copy_from_slice(&self.length.to_be_bytes());
        bytes[3..5].copy_from_slice(&self.diff_length.to_be_bytes());
        Ok(bytes)
    }
}

/// PACKET_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PacketLength {
    /// Length of the last received packet's variable field
    pub length: u16,
}

impl FromByteArray for PacketLength {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes([bytes[0], bytes[1]]),
        })
    }
}

/// PACKET_INFO command (0x16)
///
/// Returns the length of the variable field of the packet being received.
#[derive(Debug, Clone)]
pub struct PacketInfo {
    pub config: PacketInfoConfig,
}

impl Command for PacketInfo {
    type IdType = u8;
    type CommandParameters = PacketInfoConfig;
    type ResponseParameters = PacketLength;

    fn id() -> Self::IdType {
        0x16
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_reset_bits_match_datasheet() {
        assert_eq!(FifoReset::TX.to_bytes().unwrap(), [0x01]);
        assert_eq!(FifoReset::RX.to_bytes().unwrap(), [0x02]);
        assert_eq!(FifoReset::empty().to_bytes().unwrap(), [0x00]);
    }

    #[test]
    fn packet_info_lengths_are_big_endian() {
        let config = PacketInfoConfig {
            field: 2,
            length: 0x0102,
            diff_length: 0xFFFE,
        };
        assert_eq!(config.to_bytes().unwrap(), [2, 0x01, 0x02, 0xFF, 0xFE]);
        assert_eq!(
            PacketLength::from_bytes([0x00, 0x2A, 0x00]).unwrap().length,
            42
        );
    }
}
