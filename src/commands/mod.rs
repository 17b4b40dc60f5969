//! Radio command implementations
//!
//! Each fixed-shape Si446x command is a type implementing [`Command`](crate::Command):
//! its opcode is the command id, its parameters serialize big-endian, and its
//! response type describes how many bytes to pull out of the command buffer.
//! Commands are grouped by function:
//!
//! - [`operational`]: boot, state changes and TX/RX start
//!   - POWER_UP, CHANGE_STATE, REQUEST_DEVICE_STATE
//!   - START_TX, START_RX
//!
//! - [`fifo`]: FIFO and packet handler bookkeeping
//!   - FIFO_INFO (including FIFO resets), PACKET_INFO
//!
//! - [`status`]: identification and interrupt status
//!   - PART_INFO, FUNC_INFO, GET_INT_STATUS
//!
//! - [`gpio`]: GPIO_PIN_CFG
//!
//! Commands that do not have a fixed shape (property access, FIFO data, the
//! response buffer itself and fast response registers) are driven directly by
//! [`Device`](crate::Device) using the opcodes in [`opcode`].
//!
//! # Command Execution
//! 1. Wait for CTS high
//! 2. Clock out the opcode and parameters in one chip-select assertion
//! 3. If the command has a response, wait for CTS again
//! 4. Send READ_CMD_BUFF; the first byte back must be 0xFF before the
//!    response can be trusted
//!
//! # Important Notes
//! - POWER_UP must be the first command after reset
//! - The chip does not queue commands; CTS low means the previous one is
//!   still being processed
//! - Responses stay in the command buffer until the next command is sent

mod fifo;
mod gpio;
mod operational;
mod status;

pub use fifo::*;
pub use gpio::*;
pub use operational::*;
pub use status::*;

/// Opcodes used outside the typed command path
pub mod opcode {
    /// No operation, keeps the SPI link alive
    pub const NOP: u8 = 0x00;
    /// Set up to 12 properties starting at a group/index
    pub const SET_PROPERTY: u8 = 0x11;
    /// Read up to 16 properties starting at a group/index
    pub const GET_PROPERTY: u8 = 0x12;
    /// Read the command response buffer
    pub const READ_CMD_BUFF: u8 = 0x44;
    /// Read fast response register A
    pub const FRR_A_READ: u8 = 0x50;
    /// Load bytes into the TX FIFO
    pub const WRITE_TX_FIFO: u8 = 0x66;
    /// Pop bytes from the RX FIFO
    pub const READ_RX_FIFO: u8 = 0x77;
}

/// Status byte the chip returns ahead of a valid response
pub const READY_MARKER: u8 = 0xFF;
