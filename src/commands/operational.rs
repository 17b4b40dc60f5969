//! Operational commands
//!
//! This module contains commands that move the radio between operating states:
//! - Booting the chip after a shutdown pulse
//! - Requesting and querying the current state
//! - Starting transmission and reception
//!
//! The chip itself is the only source of truth for its state. None of these
//! commands wait for a transition to finish; poll [`RequestDeviceState`]
//! until the expected state is reported.

use bitflags::bitflags;
use core::convert::Infallible;

use crate::{Command, FromByteArray, NoParameters, ToByteArray};

bitflags! {
    /// POWER_UP boot options
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct BootOptions: u8 {
        /// Boot from a patch previously loaded into RAM
        const PATCH = 1 << 7;
        /// Boot the main application image (EZRadio PRO functionality)
        const FUNC_PRO = 1;
    }
}

impl Default for BootOptions {
    fn default() -> Self {
        Self::FUNC_PRO
    }
}

/// Reference oscillator attached to the XIN/XOUT pins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum XtalOptions {
    /// Crystal between XIN and XOUT
    #[default]
    Crystal = 0,
    /// External TCXO driving XIN
    Tcxo = 1,
}

/// POWER_UP parameters
#[derive(Debug, Clone, Copy)]
pub struct PowerUpConfig {
    pub boot_options: BootOptions,
    pub xtal_options: XtalOptions,
    /// Reference frequency in Hz, sent big-endian
    pub xo_freq: u32,
}

impl ToByteArray for PowerUpConfig {
    type Error = Infallible;
    type Array = [u8; 6];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut bytes = [0u8; 6];
        bytes[0] = self.boot_options.bits();
        bytes[1] = self.xtal_options as u8;
        bytes[2..6].copy_from_slice(&self.xo_freq.to_be_bytes());
        Ok(bytes)
    }
}

/// POWER_UP command (0x02)
///
/// Boots the chip and tells it the reference oscillator frequency.
///
/// # Important Notes
/// - Must be the first command after a shutdown pulse
/// - CTS stays low for up to ~15ms while the chip boots
/// - The chip ends up in SPI_ACTIVE; the configuration table moves it on
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub config: PowerUpConfig,
}

impl PowerUp {
    /// POWER_UP for the main image with a crystal reference.
    pub fn new(xo_freq: u32) -> Self {
        Self {
            config: PowerUpConfig {
                boot_options: BootOptions::default(),
                xtal_options: XtalOptions::default(),
                xo_freq,
            },
        }
    }
}

impl Command for PowerUp {
    type IdType = u8;
    type CommandParameters = PowerUpConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x02
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// Error type for invalid device state values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceStateError {
    /// The value does not correspond to a reportable state
    InvalidValue(u8),
}

/// Operating state reported by the chip.
///
/// The shutdown state is not listed: with the shutdown line high the chip is
/// unpowered and never raises CTS, so any query ends in a timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceState {
    /// Sleep or standby, depending on the wake-up timer configuration
    Sleep = 0x1,
    /// Only the SPI interface and its LDO are running
    SpiActive = 0x2,
    /// Crystal oscillator running, fastest exit to TX/RX
    Ready = 0x3,
    /// Alternate ready state
    Ready2 = 0x4,
    /// Synthesizer tuned for TX
    TxTune = 0x5,
    /// Synthesizer tuned for RX
    RxTune = 0x6,
    /// Transmitting
    Tx = 0x7,
    /// Receiving
    Rx = 0x8,
}

impl TryFrom<u8> for DeviceState {
    type Error = DeviceStateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x1 => Ok(Self::Sleep),
            0x2 => Ok(Self::SpiActive),
            0x3 => Ok(Self::Ready),
            0x4 => Ok(Self::Ready2),
            0x5 => Ok(Self::TxTune),
            0x6 => Ok(Self::RxTune),
            0x7 => Ok(Self::Tx),
            0x8 => Ok(Self::Rx),
            invalid => Err(DeviceStateError::InvalidValue(invalid)),
        }
    }
}

/// State to move to, either on request or when a TX/RX operation ends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NextState {
    /// Stay in the current state
    NoChange,
    /// Move to the given state
    State(DeviceState),
}

impl NextState {
    /// Wire encoding used by START_RX and CHANGE_STATE
    pub fn code(self) -> u8 {
        match self {
            Self::NoChange => 0x0,
            Self::State(state) => state as u8,
        }
    }
}

impl From<DeviceState> for NextState {
    fn from(state: DeviceState) -> Self {
        Self::State(state)
    }
}

impl ToByteArray for NextState {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.code()])
    }
}

/// CHANGE_STATE command (0x34)
///
/// Requests a state transition. Returns as soon as the chip accepts the
/// command; the transition completes asynchronously.
#[derive(Debug, Clone)]
pub struct ChangeState {
    pub next: NextState,
}

impl Command for ChangeState {
    type IdType = u8;
    type CommandParameters = NextState;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x34
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.next
    }
}

/// REQUEST_DEVICE_STATE response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeviceStateInfo {
    /// Current state, decoded from the low nibble of the first byte
    pub state: DeviceState,
    /// Channel currently tuned
    pub channel: u8,
}

impl FromByteArray for DeviceStateInfo {
    type Error = DeviceStateError;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            state: DeviceState::try_from(bytes[0] & 0x0F)?,
            channel: bytes[1],
        })
    }
}

/// REQUEST_DEVICE_STATE command (0x33)
///
/// Returns the current operating state and channel.
#[derive(Debug, Clone)]
pub struct RequestDeviceState;

impl Command for RequestDeviceState {
    type IdType = u8;
    type CommandParameters = NoParameters;
    type ResponseParameters = DeviceStateInfo;

    fn id() -> Self::IdType {
        0x33
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        NoParameters::default()
    }
}

/// START_TX parameters
#[derive(Debug, Clone, Copy)]
pub struct TxConfig {
    /// Channel number, added to the base frequency by the synthesizer
    pub channel: u8,
    /// TX condition byte
    /// - Bits 7:4: state after the packet is sent
    /// - Bit 2: retransmit the last packet
    /// - Bit 0: start on wake-up timer instead of immediately
    pub condition: u8,
    /// Payload length, or 0 to use the packet handler field lengths
    pub length: u16,
}

impl ToByteArray for TxConfig {
    type Error = Infallible;
    type Array = [u8; 4];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let length = self.length.to_be_bytes();
        Ok([self.channel, self.condition, length[0], length[1]])
    }
}

/// START_TX command (0x31)
///
/// Transmits the contents of the TX FIFO.
///
/// # Important Notes
/// - The FIFO must already hold the packet
/// - `length` excludes the CRC generated by the packet handler
#[derive(Debug, Clone)]
pub struct StartTx {
    pub config: TxConfig,
}

impl Command for StartTx {
    type IdType = u8;
    type CommandParameters = TxConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x31
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

/// START_RX parameters
#[derive(Debug, Clone, Copy)]
pub struct RxConfig {
    pub channel: u8,
    /// RX condition byte (bit 0: start on wake-up timer)
    pub condition: u8,
    /// Payload length, or 0 to use the packet handler field lengths
    pub length: u16,
    /// State after a preamble timeout
    pub on_timeout: NextState,
    /// State after a packet with a valid CRC
    pub on_valid: NextState,
    /// State after a packet with an invalid CRC
    pub on_invalid: NextState,
}

impl ToByteArray for RxConfig {
    type Error = Infallible;
    type Array = [u8; 7];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let length = self.length.to_be_bytes();
        Ok([
            self.channel,
            self.condition,
            length[0],
            length[1],
            self.on_timeout.code(),
            self.on_valid.code(),
            self.on_invalid.code(),
        ])
    }
}

/// START_RX command (0x32)
///
/// Enters receive mode. The three next-state fields let the chip leave RX on
/// its own once a packet arrives or the preamble search times out.
#[derive(Debug, Clone)]
pub struct StartRx {
    pub config: RxConfig,
}

impl Command for StartRx {
    type IdType = u8;
    type CommandParameters = RxConfig;
    type ResponseParameters = NoParameters;

    fn id() -> Self::IdType {
        0x32
    }

    fn invoking_parameters(self) -> Self::CommandParameters {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_up_sends_frequency_big_endian() {
        let bytes = PowerUp::new(30_000_000)
            .invoking_parameters()
            .to_bytes()
            .unwrap();
        assert_eq!(bytes, [0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80]);
    }

    #[test]
    fn state_is_taken_from_low_nibble() {
        let info = DeviceStateInfo::from_bytes([0xA3, 0x05, 0x00]).unwrap();
        assert_eq!(info.state, DeviceState::Ready);
        assert_eq!(info.channel, 5);

        assert_eq!(
            DeviceStateInfo::from_bytes([0x00, 0x00, 0x00]).unwrap_err(),
            DeviceStateError::InvalidValue(0)
        );
    }

    #[test]
    fn start_rx_encodes_next_states() {
        let config = RxConfig {
            channel: 2,
            condition: 0,
            length: 0x0120,
            on_timeout: NextState::NoChange,
            on_valid: DeviceState::Ready.into(),
            on_invalid: DeviceState::Rx.into(),
        };
        assert_eq!(config.to_bytes().unwrap(), [2, 0, 0x01, 0x20, 0, 3, 8]);
    }
}
