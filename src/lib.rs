#![no_std]
//! Si446x Radio Driver
//!
//! This crate provides a type-safe interface for the Silicon Labs Si4460/1/3/4
//! (EZRadioPRO) sub-GHz radio transceivers. The Si446x family are highly
//! integrated ISM band transceivers controlled entirely through a command
//! interface over SPI, with a clear-to-send (CTS) handshake gating every
//! command.
//!
//! # Features
//! - Frequency range: 119-1050 MHz
//! - Modulation support: (G)FSK, 4(G)FSK, (G)MSK, OOK
//! - Output power up to +20 dBm (Si4463/4)
//! - 64 byte TX and RX FIFOs with a configurable packet handler
//! - Autonomous state transitions at the end of TX/RX
//!
//! # Architecture
//! The driver is organized into several modules:
//!
//! - [`device`]: Main device interface for hardware interaction
//!   - Bounded CTS wait, command frames and validated responses
//!   - Typed command execution and property access
//!
//! - [`commands`]: Command definitions grouped by function
//!   - [`commands::opcode`]: Opcodes driven directly by the device
//!
//! - [`registers`]: Property definitions (packet handler, power amplifier)
//!
//! - [`config`]: Run-time configuration and vendor configuration tables
//!
//! - Lifecycle, packet and status operations are methods on [`Device`]
//!
//! # Usage
//! The driver uses the `regiface` crate to describe commands and properties
//! as types. Bring-up follows a fixed sequence:
//!
//! 1. Create a [`Device`] with the SPI device, CTS input, shutdown output and a delay
//! 2. [`Device::reset`], then wait for CTS
//! 3. [`Device::power_up`] with the crystal frequency
//! 4. [`Device::config_init`] with the table generated for your RF parameters
//! 5. Poll [`Device::request_state`] until the chip reports READY
//! 6. [`Device::send_packet`] / [`Device::start_rx`] + [`Device::read_packet`]
//!
//! # Important Notes
//! - POWER_UP must be the first command after reset
//! - The driver never caches the chip's state; it always asks
//! - No operation retries on its own; every fault is returned to the caller
//!
//! # Example
//! ```no_run
//! use embedded_hal::{delay::DelayNs, digital::{InputPin, OutputPin}, spi::SpiDevice};
//! use si446x::{Config, ConfigTable, Device, DeviceState, Error};
//!
//! const RADIO_CONFIG: &[u8] = &[
//!     0x05, 0x11, 0x00, 0x01, 0x00, 0x52, // GLOBAL_XO_TUNE
//!     0x00,
//! ];
//!
//! fn bring_up<SPI, CTS, SDN, D>(
//!     spi: SPI,
//!     cts: CTS,
//!     sdn: SDN,
//!     delay: D,
//! ) -> Result<Device<SPI, CTS, SDN, D>, Error>
//! where
//!     SPI: SpiDevice,
//!     CTS: InputPin,
//!     SDN: OutputPin,
//!     D: DelayNs,
//! {
//!     let table = ConfigTable::new(RADIO_CONFIG).expect("valid radio configuration");
//!     let mut device = Device::new(spi, cts, sdn, delay, Config::default());
//!
//!     device.reset()?;
//!     device.wait_for_cts()?;
//!     device.power_up(30_000_000)?;
//!     device.config_init(&table)?;
//!     while device.request_state()? != DeviceState::Ready {}
//!
//!     Ok(device)
//! }
//! ```

pub use regiface::{Command, FromByteArray, NoParameters, ToByteArray};

pub mod commands;
pub mod config;
mod control;
pub mod device;
mod diagnostics;
mod error;
mod frame;
mod pipeline;
pub mod registers;

pub use commands::*;
pub use config::{Config, ConfigFrame, ConfigFrames, ConfigTable, PacketFormat};
pub use device::Device;
pub use diagnostics::rssi_dbm;
pub use error::{ConfigTableError, Error};
pub use frame::{Frame, MAX_FRAME_LEN};
pub use registers::*;
