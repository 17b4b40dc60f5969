//! Si446x Device Interface
//!
//! This module provides the transport every other part of the driver goes
//! through. The `Device` struct owns the SPI device, the CTS input, the
//! shutdown output and a delay source, and provides methods for:
//! - Waiting for CTS with a bounded budget
//! - Sending command frames and reading validated responses
//! - Executing typed commands
//! - Reading and writing properties
//!
//! Every frame is one `SpiDevice` transaction, so chip select is asserted for
//! exactly one frame at a time. Sharing the bus with other drivers is done by
//! handing this driver its own `SpiDevice` (e.g. from `embedded-hal-bus`).
//!
//! # Example
//! ```no_run
//! # fn demo<SPI, CTS, SDN, D>(spi: SPI, cts: CTS, sdn: SDN, delay: D) -> Result<(), si446x::Error>
//! # where
//! #     SPI: embedded_hal::spi::SpiDevice,
//! #     CTS: embedded_hal::digital::InputPin,
//! #     SDN: embedded_hal::digital::OutputPin,
//! #     D: embedded_hal::delay::DelayNs,
//! # {
//! use si446x::{Config, Device, PartInfo};
//!
//! let mut device = Device::new(spi, cts, sdn, delay, Config::default());
//!
//! // Read the part number
//! let info = device.execute_command(PartInfo)?;
//! assert_eq!(info.part, 0x4463);
//! # Ok(())
//! # }
//! ```

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::{Operation, SpiDevice},
};
use regiface::{ByteArray, Command, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

use crate::{
    commands::{opcode, READY_MARKER},
    Config, Error, Frame, PropertyAddress,
};

/// Most response bytes the driver reads after the ready marker
pub const MAX_RESPONSE_LEN: usize = 16;

/// Properties per GET_PROPERTY/SET_PROPERTY must stay below this
pub const MAX_PROPERTIES: usize = 16;

/// Main device interface for the Si446x radio.
///
/// `SPI` is the chip's SPI device, `CTS` the GPIO the chip drives high when it
/// can take a command, `SDN` the shutdown line and `D` the delay used for
/// the reset pulse and between CTS samples.
pub struct Device<SPI, CTS, SDN, D> {
    pub(crate) spi: SPI,
    pub(crate) cts: CTS,
    pub(crate) sdn: SDN,
    pub(crate) delay: D,
    pub(crate) config: Config,
}

impl<SPI, CTS, SDN, D> Device<SPI, CTS, SDN, D> {
    /// Creates a new Device instance.
    ///
    /// Nothing is sent to the chip; call [`reset`](Device::reset) and
    /// [`power_up`](Device::power_up) to bring it up.
    pub fn new(spi: SPI, cts: CTS, sdn: SDN, delay: D, config: Config) -> Self {
        Self {
            spi,
            cts,
            sdn,
            delay,
            config,
        }
    }

    /// Releases the underlying peripherals.
    pub fn release(self) -> (SPI, CTS, SDN, D) {
        (self.spi, self.cts, self.sdn, self.delay)
    }

    /// Returns the configuration the driver was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl<SPI, CTS, SDN, D> Device<SPI, CTS, SDN, D>
where
    SPI: SpiDevice,
    CTS: InputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Polls CTS until the chip is ready for a command.
    ///
    /// CTS is sampled as a level every `cts_poll_interval_us` for at most
    /// `cts_timeout_us`. Also usable right after [`reset`](Device::reset) to
    /// wait for power-on reset to finish.
    ///
    /// # Errors
    /// * `Error::Timeout` - CTS stayed low for the whole budget
    /// * `Error::Pin` - CTS could not be read
    pub fn wait_for_cts(&mut self) -> Result<(), Error> {
        let mut remaining = self.config.cts_timeout_us;
        loop {
            if self.cts.is_high().map_err(|_| Error::Pin)? {
                return Ok(());
            }
            if remaining == 0 {
                #[cfg(feature = "defmt")]
                defmt::warn!("CTS timeout after {}us", self.config.cts_timeout_us);
                return Err(Error::Timeout);
            }
            let step = self.config.cts_poll_interval_us.clamp(1, remaining);
            self.delay.delay_us(step);
            remaining -= step;
        }
    }

    /// Sends one command frame.
    ///
    /// Waits for CTS, then clocks the frame out in a single transaction.
    /// Does not wait for the command to complete.
    ///
    /// # Errors
    /// * `Error::Timeout` - CTS never went high
    /// * `Error::Bus` - SPI communication failed
    pub fn send_command(&mut self, frame: &Frame) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::trace!("send_command({:02x})", frame.as_bytes());
        self.wait_for_cts()?;
        self.spi
            .write(frame.as_bytes())
            .map_err(|_| Error::Bus)
    }

    /// Reads the response to the last command into `response`.
    ///
    /// READ_CMD_BUFF returns a status byte first. The status is read on its
    /// own and the read is abandoned unless it is the 0xFF ready marker; only
    /// then is the command buffer read again, marker and response together.
    /// On any fault `response` is left exactly as it was.
    ///
    /// # Errors
    /// * `Error::ProtocolFault` - the ready marker was missing
    /// * `Error::InvalidArgument` - `response` is longer than [`MAX_RESPONSE_LEN`];
    ///   nothing is sent
    /// * `Error::Timeout` - CTS never went high
    /// * `Error::Bus` - SPI communication failed
    pub fn read_response(&mut self, response: &mut [u8]) -> Result<(), Error> {
        let len = response.len();
        if len > MAX_RESPONSE_LEN {
            return Err(Error::InvalidArgument);
        }

        self.wait_for_cts()?;

        let mut status = [0u8];
        self.read_cmd_buff(&mut status)?;
        if status[0] != READY_MARKER {
            #[cfg(feature = "defmt")]
            defmt::warn!("response not ready, status {:02x}", status[0]);
            return Err(Error::ProtocolFault(status[0]));
        }
        if len == 0 {
            return Ok(());
        }

        let mut raw = [0u8; MAX_RESPONSE_LEN + 1];
        self.read_cmd_buff(&mut raw[..=len])?;
        if raw[0] != READY_MARKER {
            #[cfg(feature = "defmt")]
            defmt::warn!("response lost, status {:02x}", raw[0]);
            return Err(Error::ProtocolFault(raw[0]));
        }

        response.copy_from_slice(&raw[1..=len]);
        Ok(())
    }

    /// One READ_CMD_BUFF transaction, status byte included.
    fn read_cmd_buff(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[opcode::READ_CMD_BUFF]),
                Operation::Read(buf),
            ])
            .map_err(|_| Error::Bus)
    }

    /// Executes a command on the device.
    ///
    /// The response is read only when the command defines one.
    ///
    /// # Type Parameters
    /// * `C` - Command type implementing the Command trait with u8 ID
    ///
    /// # Returns
    /// Command response parameters on success
    ///
    /// # Errors
    /// * `Error::InvalidResponse` - the response could not be decoded
    /// * any error from [`send_command`](Device::send_command) or
    ///   [`read_response`](Device::read_response)
    pub fn execute_command<C>(&mut self, command: C) -> Result<C::ResponseParameters, Error>
    where
        C: Command<IdType = u8>,
        C::CommandParameters: ToByteArray,
    {
        let request = command
            .invoking_parameters()
            .to_bytes()
            .map_err(|_| Error::InvalidArgument)?;
        self.send_command(&Frame::new(C::id(), request.as_ref())?)?;

        let mut raw_response = <C::ResponseParameters as FromByteArray>::Array::new();
        if !raw_response.as_ref().is_empty() {
            self.read_response(raw_response.as_mut())?;
        }

        C::ResponseParameters::from_bytes(raw_response).map_err(|_| Error::InvalidResponse)
    }

    /// Reads `values.len()` consecutive properties starting at `start`.
    ///
    /// The response carries one leading byte ahead of the values, which is
    /// dropped.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - [`MAX_PROPERTIES`] or more values requested;
    ///   nothing is sent
    pub fn get_properties(
        &mut self,
        start: PropertyAddress,
        values: &mut [u8],
    ) -> Result<(), Error> {
        let count = values.len();
        if count >= MAX_PROPERTIES {
            return Err(Error::InvalidArgument);
        }

        self.send_command(&Frame::new(
            opcode::GET_PROPERTY,
            &[start.group, count as u8, start.index],
        )?)?;

        let mut raw = [0u8; MAX_PROPERTIES];
        self.read_response(&mut raw[..=count])?;
        values.copy_from_slice(&raw[1..=count]);
        Ok(())
    }

    /// Writes consecutive properties starting at `start`.
    ///
    /// Indices must be ascending from `start`; the chip defines what happens
    /// otherwise. The datasheet documents up to 12 values per command.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - [`MAX_PROPERTIES`] or more values; nothing is sent
    pub fn set_properties(&mut self, start: PropertyAddress, values: &[u8]) -> Result<(), Error> {
        if values.len() >= MAX_PROPERTIES {
            return Err(Error::InvalidArgument);
        }

        let mut params = [0u8; 3 + MAX_PROPERTIES];
        params[0] = start.group;
        params[1] = values.len() as u8;
        params[2] = start.index;
        params[3..3 + values.len()].copy_from_slice(values);

        self.send_command(&Frame::new(
            opcode::SET_PROPERTY,
            &params[..3 + values.len()],
        )?)
    }

    /// Reads a single property.
    pub fn get_property1(&mut self, address: PropertyAddress) -> Result<u8, Error> {
        let mut value = [0u8];
        self.get_properties(address, &mut value)?;
        Ok(value[0])
    }

    /// Writes a single property.
    pub fn set_property1(&mut self, address: PropertyAddress, value: u8) -> Result<(), Error> {
        self.set_properties(address, &[value])
    }

    /// Reads a typed property.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing ReadableRegister with u16 ID
    pub fn read_property<R>(&mut self) -> Result<R, Error>
    where
        R: ReadableRegister<IdType = u16>,
    {
        let mut raw_value = R::Array::new();
        self.get_properties(R::id().into(), raw_value.as_mut())?;
        R::from_bytes(raw_value).map_err(|_| Error::InvalidResponse)
    }

    /// Writes a typed property.
    ///
    /// # Type Parameters
    /// * `R` - Register type implementing WritableRegister with u16 ID
    pub fn write_property<R>(&mut self, register: R) -> Result<(), Error>
    where
        R: WritableRegister<IdType = u16>,
    {
        let raw_value = register.to_bytes().map_err(|_| Error::InvalidArgument)?;
        self.set_properties(R::id().into(), raw_value.as_ref())
    }

    /// Sends a NOP and returns the byte clocked back.
    ///
    /// Does not wait for CTS; only useful to keep the SPI link exercised.
    pub fn nop(&mut self) -> Result<u8, Error> {
        let mut read = [0u8];
        self.spi
            .transaction(&mut [Operation::Transfer(&mut read, &[opcode::NOP])])
            .map_err(|_| Error::Bus)?;
        Ok(read[0])
    }
}
