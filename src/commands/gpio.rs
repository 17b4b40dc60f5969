//! GPIO configuration command
//!
//! The Si446x has four general purpose pins plus nIRQ and SDO, each of which
//! can be routed to one of the internal signals. Bits 5:0 of every pin byte
//! select the function, bit 6 enables the pull-up.

use core::convert::Infallible;

use crate::{Command, FromByteArray, ToByteArray};

/// Pin functions shared by all configurable pins
pub mod pin_function {
    /// Leave the pin as it is
    pub const DONOTHING: u8 = 0;
    /// Tri-state
    pub const TRISTATE: u8 = 1;
    pub const DRIVE0: u8 = 2;
    pub const DRIVE1: u8 = 3;
    pub const INPUT: u8 = 4;
    /// High once the chip is ready for the next command
    pub const CTS: u8 = 8;
    /// Active low interrupt output
    pub const NIRQ: u8 = 39;
    pub const RX_STATE: u8 = 33;
    pub const TX_STATE: u8 = 32;
    /// Pull-up enable, OR it with a function
    pub const PULL_UP: u8 = 1 << 6;
}

/// Configuration of every configurable pin
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GpioPins {
    pub gpio: [u8; 4],
    pub nirq: u8,
    pub sdo: u8,
    /// Drive strength in bits 6:5
    pub gen_config: u8,
}

impl ToByteArray for GpioPins {
    type Error = Infallible;
    type Array = [u8; 7];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([
            self.gpio[0],
            self.gpio[1],
            self.gpio[2],
            self.gpio[3],
            self.nirq,
            self.sdo,
            self.gen_config,
        ])
    }
}

impl FromByteArray for GpioPins {
    type Error = Infallible;
    type Array = [u8; 8];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gpio: [bytes[0], bytes[1], bytes[2], bytes[3]],
            nirq: bytes[4],
            sdo: bytes[5],
            gen_config: bytes[6],
        })
    }
}

/// GPIO_PIN_CFG command (0x13)
///
/// Configures all pins and returns the resulting pin states. With the CTS
/// handshake used by this driver one of the GPIOs must stay routed to CTS.
#[derive(Debug, Clone)]
pub struct GpioPinCfg {
    pub pins: GpioPins,
}

impl Command for GpioPinCfg {
    type IdType = u8;
    type CommandParameters = GpioPins;
    type ResponseParameters = GpioPins;

    fn id() -> Self::IdType {
        0x13
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.pins
    }
}
