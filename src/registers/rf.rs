//! Power amplifier properties (group 0x22)

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// PA output level (address: 0x2201)
///
/// Scales the PA drive. 0x7F is maximum output (+20 dBm on the Si4463),
/// the relationship to dBm is not linear and depends on the matching
/// network.
#[register(0x2201u16)]
#[derive(Debug, Clone, Copy, ReadableRegister, WritableRegister, PartialEq, Eq)]
pub struct PaPowerLevel {
    /// Drive level (bits 6:0)
    pub level: u8,
}

impl Default for PaPowerLevel {
    fn default() -> Self {
        Self { level: 0x7F }
    }
}

impl FromByteArray for PaPowerLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            level: bytes[0] & 0x7F,
        })
    }
}

impl ToByteArray for PaPowerLevel {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.level & 0x7F])
    }
}
