//! Packet handler properties (group 0x12)
//!
//! This module contains the properties that define the packet format:
//! - CRC polynomial and seed
//! - Bit order and field splitting
//! - Where the variable length byte lives and how it is interpreted
//! - Per-field lengths and CRC handling
//!
//! The driver programs these after replaying the configuration table so the
//! packet format always matches the framing it uses on the FIFOs, whatever
//! the table left behind.

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// CRC configuration (address: 0x1200)
///
/// Selects the CRC polynomial used by the packet handler.
#[register(0x1200u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktCrcConfig {
    /// Seed the CRC with all ones instead of all zeros
    pub seed_ones: bool,
    /// Polynomial selection (bits 3:0), 0 disables CRC
    pub polynomial: u8,
}

/// General packet configuration (address: 0x1206)
///
/// # Bit Layout
/// - Bit 7: split RX and TX field definitions
/// - Bit 6: disable the packet handler in RX
/// - Bit 5: 4(G)FSK
/// - Bit 3: Manchester polarity
/// - Bit 2: invert the CRC
/// - Bit 1: CRC byte order
/// - Bit 0: bit order (0 = MSB first)
#[register(0x1206u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktConfig1 {
    pub value: u8,
}

/// Variable length field configuration (address: 0x1208)
///
/// Describes the length byte that precedes a variable-length payload.
#[register(0x1208u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktLen {
    /// Multi-byte length is big-endian
    pub big_endian: bool,
    /// Length field is two bytes instead of one
    pub two_bytes: bool,
    /// Keep the length byte in the RX FIFO
    pub in_fifo: bool,
    /// Field whose length is taken from the length byte (bits 2:0)
    pub dst_field: u8,
}

impl PktLen {
    /// One length byte, kept in the RX FIFO, sizing field 2
    pub fn variable_payload() -> Self {
        Self {
            big_endian: true,
            two_bytes: false,
            in_fifo: true,
            dst_field: 2,
        }
    }
}

/// Field holding the length byte (address: 0x1209)
#[register(0x1209u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktLenFieldSource {
    pub field: u8,
}

/// Length byte adjustment (address: 0x120A)
///
/// Added to the received length byte before it is used.
#[register(0x120Au16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktLenAdjust {
    pub adjust: i8,
}

/// Field 1 length (address: 0x120D, spans 0x120D-0x120E)
///
/// In fixed length mode this is the whole packet.
#[register(0x120Du16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField1Length {
    /// Length in bytes (13 bits)
    pub length: u16,
}

/// Field 1 configuration (address: 0x120F)
#[register(0x120Fu16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField1Config {
    pub value: u8,
}

/// Field 1 CRC configuration (address: 0x1210)
#[register(0x1210u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField1CrcConfig {
    pub value: u8,
}

/// Field 2 length (address: 0x1211, spans 0x1211-0x1212)
///
/// In variable length mode this is the largest payload accepted.
#[register(0x1211u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField2Length {
    /// Length in bytes (13 bits)
    pub length: u16,
}

/// Field 2 configuration (address: 0x1213)
#[register(0x1213u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField2Config {
    pub value: u8,
}

/// Field 2 CRC configuration (address: 0x1214)
#[register(0x1214u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, Default, PartialEq, Eq)]
pub struct PktField2CrcConfig {
    pub value: u8,
}

impl FromByteArray for PktCrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            seed_ones: bytes[0] & 0x80 != 0,
            polynomial: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for PktCrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.seed_ones as u8) << 7) | (self.polynomial & 0x0F)])
    }
}

impl FromByteArray for PktConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PktConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for PktLen {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            big_endian: bytes[0] & 0x20 != 0,
            two_bytes: bytes[0] & 0x10 != 0,
            in_fifo: bytes[0] & 0x08 != 0,
            dst_field: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for PktLen {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.big_endian as u8) << 5)
            | ((self.two_bytes as u8) << 4)
            | ((self.in_fifo as u8) << 3)
            | (self.dst_field & 0x07)])
    }
}

impl FromByteArray for PktLenFieldSource {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            field: bytes[0] & 0x07,
        })
    }
}

impl ToByteArray for PktLenFieldSource {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.field & 0x07])
    }
}

impl FromByteArray for PktLenAdjust {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            adjust: bytes[0] as i8,
        })
    }
}

impl ToByteArray for PktLenAdjust {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.adjust as u8])
    }
}

impl FromByteArray for PktField1Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes) & 0x1FFF,
        })
    }
}

impl ToByteArray for PktField1Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.length & 0x1FFF).to_be_bytes())
    }
}

impl FromByteArray for PktField1Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PktField1Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for PktField1CrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PktField1CrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for PktField2Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            length: u16::from_be_bytes(bytes) & 0x1FFF,
        })
    }
}

impl ToByteArray for PktField2Length {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok((self.length & 0x1FFF).to_be_bytes())
    }
}

impl FromByteArray for PktField2Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PktField2Config {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

impl FromByteArray for PktField2CrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl ToByteArray for PktField2CrcConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.value])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variable_payload_length_byte_matches_legacy_value() {
        assert_eq!(PktLen::variable_payload().to_bytes().unwrap(), [0x2A]);
        assert_eq!(
            PktLen::from_bytes([0x2A]).unwrap(),
            PktLen::variable_payload()
        );
    }

    #[test]
    fn field_lengths_are_thirteen_bits() {
        let len = PktField2Length { length: 0xFFFF };
        assert_eq!(len.to_bytes().unwrap(), [0x1F, 0xFF]);
    }
}
