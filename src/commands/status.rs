//! Status commands
//!
//! This module contains commands for identifying the chip and reading its
//! interrupt status:
//! - Part number, revision and ROM id
//! - Firmware revision and running image
//! - Pending and current interrupt flags for the packet handler, modem and
//!   chip groups
//!
//! These are mostly useful at bring-up to confirm the right part is on the
//! bus and while debugging packet handling.

use bitflags::bitflags;
use core::convert::Infallible;

use crate::{Command, FromByteArray, NoParameters, ToByteArray};

/// PART_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PartInfoResponse {
    /// Chip mask revision
    pub chip_rev: u8,
    /// Part number, e.g. 0x4463
    pub part: u16,
    /// Part build
    pub part_build: u8,
    /// Chip id
    pub id: u16,
    /// Customer id
    pub customer: u8,
    /// ROM id (3 = revB1B, 6 = revC2A)
    pub rom_id: u8,
}

impl FromByteArray for PartInfoResponse {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            chip_rev: bytes[0],
            part: u16::from_be_bytes([bytes[1], bytes[2]]),
            part_build: bytes[3],
            id: u16::from_be_bytes([bytes[4], bytes[5]]),
            customer: bytes[6],
            rom_id: bytes[7],
        })
    }
}

/// PART_INFO command (0x01)
///
/// Reports basic part information. The quickest check that the SPI wiring
/// and CTS handshake work.
#[derive(Debug, Clone)]
pub struct PartInfo;

impl Command for PartInfo {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = PartInfoResponse;

    fn id() -> Self::IdType {
        0x01
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// FUNC_INFO response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FuncInfoResponse {
    /// External revision number
    pub rev_ext: u8,
    /// Branch revision number
    pub rev_branch: u8,
    /// Internal revision number
    pub rev_int: u8,
    /// Patch id, 0 when running from ROM
    pub patch: u16,
    /// Current functional mode (1 = main application)
    pub func: u8,
}

impl FromByteArray for FuncInfoResponse {
    type Error = Infallible;
    type Array = [u8; 7];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            rev_ext: bytes[0],
            rev_branch: bytes[1],
            rev_int: bytes[2],
            patch: u16::from_be_bytes([bytes[3], bytes[4]]),
            func: bytes[5],
        })
    }
}

/// FUNC_INFO command (0x10)
///
/// Reports the firmware revision and which image is running.
#[derive(Debug, Clone)]
pub struct FuncInfo;

impl Command for FuncInfo {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = FuncInfoResponse;

    fn id() -> Self::IdType {
        0x10
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

bitflags! {
    /// Interrupt groups with something pending
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptGroups: u8 {
        const CHIP = 1 << 2;
        const MODEM = 1 << 1;
        const PACKET_HANDLER = 1;
    }

    /// Packet handler interrupt flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PacketHandlerFlags: u8 {
        const FILTER_MATCH = 1 << 7;
        const FILTER_MISS = 1 << 6;
        /// Packet transmission finished
        const PACKET_SENT = 1 << 5;
        /// Packet received and stored in the RX FIFO
        const PACKET_RX = 1 << 4;
        const CRC_ERROR = 1 << 3;
        const TX_FIFO_ALMOST_EMPTY = 1 << 1;
        const RX_FIFO_ALMOST_FULL = 1;
    }

    /// Modem interrupt flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ModemFlags: u8 {
        const POSTAMBLE_DETECT = 1 << 6;
        const INVALID_SYNC = 1 << 5;
        const RSSI_JUMP = 1 << 4;
        /// RSSI above the configured threshold
        const RSSI = 1 << 3;
        const INVALID_PREAMBLE = 1 << 2;
        const PREAMBLE_DETECT = 1 << 1;
        const SYNC_DETECT = 1;
    }

    /// Chip interrupt flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ChipFlags: u8 {
        const CAL = 1 << 6;
        const FIFO_UNDERFLOW_OVERFLOW_ERROR = 1 << 5;
        const STATE_CHANGE = 1 << 4;
        /// The last command was invalid
        const CMD_ERROR = 1 << 3;
        const CHIP_READY = 1 << 2;
        const LOW_BATT = 1 << 1;
        const WUT = 1;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for InterruptGroups {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "InterruptGroups {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for PacketHandlerFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "PacketHandlerFlags {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ModemFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ModemFlags {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ChipFlags {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "ChipFlags {{ 0b{0=0..8:08b} }}", self.bits())
    }
}

/// GET_INT_STATUS parameters
///
/// A set bit leaves the matching pending flag untouched; a clear bit clears
/// it once it has been reported. The default clears everything.
#[derive(Debug, Clone, Copy)]
pub struct IntStatusConfig {
    pub retain_packet_handler: PacketHandlerFlags,
    pub retain_modem: ModemFlags,
    pub retain_chip: ChipFlags,
}

impl Default for IntStatusConfig {
    fn default() -> Self {
        Self {
            retain_packet_handler: PacketHandlerFlags::empty(),
            retain_modem: ModemFlags::empty(),
            retain_chip: ChipFlags::empty(),
        }
    }
}

impl ToByteArray for IntStatusConfig {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.retain_packet_handler.bits(),
            self.retain_modem.bits(),
            self.retain_chip.bits(),
        ])
    }
}

/// GET_INT_STATUS response
///
/// `*_pending` flags latch until cleared; `*_status` flags reflect the
/// condition right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IntStatus {
    pub groups_pending: InterruptGroups,
    pub groups_status: InterruptGroups,
    pub packet_handler_pending: PacketHandlerFlags,
    pub packet_handler_status: PacketHandlerFlags,
    pub modem_pending: ModemFlags,
    pub modem_status: ModemFlags,
    pub chip_pending: ChipFlags,
    pub chip_status: ChipFlags,
}

impl FromByteArray for IntStatus {
    type Error = Infallible;
    type Array = [u8; 9];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            groups_pending: InterruptGroups::from_bits_retain(bytes[0]),
            groups_status: InterruptGroups::from_bits_retain(bytes[1]),
            packet_handler_pending: PacketHandlerFlags::from_bits_retain(bytes[2]),
            packet_handler_status: PacketHandlerFlags::from_bits_retain(bytes[3]),
            modem_pending: ModemFlags::from_bits_retain(bytes[4]),
            modem_status: ModemFlags::from_bits_retain(bytes[5]),
            chip_pending: ChipFlags::from_bits_retain(bytes[6]),
            chip_status: ChipFlags::from_bits_retain(bytes[7]),
        })
    }
}

/// GET_INT_STATUS command (0x20)
///
/// Reads all interrupt flags and clears the pending ones not retained.
///
/// # Important Notes
/// - Clearing all pending flags releases the nIRQ line
/// - `ChipFlags::CMD_ERROR` flags a malformed command, e.g. a bad
///   configuration table entry
#[derive(Debug, Clone, Default)]
pub struct GetIntStatus {
    pub config: IntStatusConfig,
}

impl Command for GetIntStatus {
    type IdType = u8;
    type CommandParameters = IntStatusConfig;
    type ResponseParameters = IntStatus;

    fn id() -> Self::IdType {
        0x20
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn part_info_decodes_part_number() {
        let info =
            PartInfoResponse::from_bytes([0x11, 0x44, 0x63, 0x00, 0x86, 0x00, 0x00, 0x06]).unwrap();
        assert_eq!(info.part, 0x4463);
        assert_eq!(info.id, 0x8600);
        assert_eq!(info.rom_id, 6);
    }

    #[test]
    fn int_status_keeps_unknown_bits() {
        let status = IntStatus::from_bytes([0x01, 0x01, 0x30, 0x00, 0, 0, 0x04, 0x04, 0]).unwrap();
        assert!(status.groups_pending.contains(InterruptGroups::PACKET_HANDLER));
        assert!(status
            .packet_handler_pending
            .contains(PacketHandlerFlags::PACKET_SENT | PacketHandlerFlags::PACKET_RX));
        assert!(status.chip_pending.contains(ChipFlags::CHIP_READY));

        let odd = IntStatus::from_bytes([0, 0, 0x04, 0, 0, 0x80, 0, 0, 0]).unwrap();
        assert_eq!(odd.packet_handler_pending.bits(), 0x04);
        assert_eq!(odd.modem_status.bits(), 0x80);
    }
}
