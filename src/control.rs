//! Device lifecycle and state control
//!
//! Bringing the radio up is always the same sequence:
//!
//! 1. [`reset`](Device::reset) pulses the shutdown line
//! 2. wait for power-on reset ([`wait_for_cts`](Device::wait_for_cts) or a
//!    fixed ~6 ms delay)
//! 3. [`power_up`](Device::power_up) boots the firmware
//! 4. [`config_init`](Device::config_init) replays the vendor table and sets
//!    the packet format
//! 5. poll [`request_state`](Device::request_state) until the expected state
//!    is reported
//!
//! The driver never remembers what state the chip is in. Every question about
//! state is answered by asking the chip.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::SpiDevice,
};

use crate::{
    ChangeState, ConfigTable, Device, DeviceState, Error, Frame, NextState, PaPowerLevel,
    PacketFormat, PktConfig1, PktCrcConfig, PktField1Config, PktField1CrcConfig,
    PktField1Length, PktField2Config, PktField2CrcConfig, PktField2Length, PktLen,
    PktLenAdjust, PktLenFieldSource, PowerUp, RequestDeviceState,
};

impl<SPI, CTS, SDN, D> Device<SPI, CTS, SDN, D>
where
    SPI: SpiDevice,
    CTS: InputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Resets the chip by pulsing the shutdown line.
    ///
    /// The line is held high for `reset_pulse_us`, then released. The chip
    /// then runs its power-on reset and must not be sent commands until it
    /// raises CTS. Chip select is idle here: it is only asserted inside SPI
    /// transactions.
    pub fn reset(&mut self) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("reset");
        self.sdn.set_high().map_err(|_| Error::Pin)?;
        self.delay.delay_us(self.config.reset_pulse_us);
        self.sdn.set_low().map_err(|_| Error::Pin)
    }

    /// Boots the chip with a crystal of `xo_freq` Hz.
    ///
    /// Must be the first command after [`reset`](Device::reset).
    pub fn power_up(&mut self, xo_freq: u32) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("power_up({}Hz)", xo_freq);
        self.execute_command(PowerUp::new(xo_freq))?;
        Ok(())
    }

    /// Replays `table` and programs the packet format.
    ///
    /// Every frame of the table is sent verbatim, then the packet handler
    /// properties are set for the configured [`PacketFormat`]. Stops at the
    /// first failure; the chip's configuration is then undefined and the
    /// whole sequence should be restarted from [`reset`](Device::reset).
    pub fn config_init(&mut self, table: &ConfigTable<'_>) -> Result<(), Error> {
        #[cfg(feature = "defmt")]
        defmt::debug!("config_init: replaying {} frames", table.len());
        for frame in table {
            self.send_command(&Frame::from_bytes(frame.as_bytes())?)?;
        }

        match self.config.packet_format {
            PacketFormat::Fixed(length) => self.write_property(PktField1Length {
                length: length.into(),
            }),
            PacketFormat::Variable => {
                self.write_property(PktConfig1::default())?;
                self.write_property(PktCrcConfig::default())?;
                self.write_property(PktLenFieldSource { field: 1 })?;
                self.write_property(PktLen::variable_payload())?;
                self.write_property(PktLenAdjust::default())?;
                // Field 1 is the length byte, field 2 the payload.
                self.write_property(PktField1Length { length: 1 })?;
                self.write_property(PktField1Config::default())?;
                self.write_property(PktField1CrcConfig::default())?;
                // Longest payload send_packet will queue
                self.write_property(PktField2Length {
                    length: self.config.tx_payload_limit() as u16,
                })?;
                self.write_property(PktField2Config::default())?;
                self.write_property(PktField2CrcConfig::default())
            }
        }
    }

    /// Requests a transition to `target`.
    ///
    /// Returns once the request is sent; poll
    /// [`request_state`](Device::request_state) to see it complete.
    pub fn change_state(&mut self, target: DeviceState) -> Result<(), Error> {
        self.execute_command(ChangeState {
            next: NextState::State(target),
        })?;
        Ok(())
    }

    /// Asks the chip for its current state.
    ///
    /// # Errors
    /// * `Error::InvalidResponse` - the chip reported an unknown state code
    /// * `Error::Timeout` - the chip is in shutdown or hung
    pub fn request_state(&mut self) -> Result<DeviceState, Error> {
        Ok(self.execute_command(RequestDeviceState)?.state)
    }

    /// Sets the PA drive level (0x00-0x7F).
    pub fn set_power(&mut self, level: u8) -> Result<(), Error> {
        self.write_property(PaPowerLevel { level })
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec;

    use embedded_hal_mock::eh1::{
        delay::NoopDelay,
        digital::{Mock as PinMock, State as PinState, Transaction as PinTransaction},
        spi::{Mock as SpiMock, Transaction as SpiTransaction},
    };

    use super::*;
    use crate::Config;

    #[test]
    fn reset_pulses_shutdown_line() {
        let mut device = Device::new(
            SpiMock::<u8>::new(&[]),
            PinMock::new(&[]),
            PinMock::new(&[
                PinTransaction::set(PinState::High),
                PinTransaction::set(PinState::Low),
            ]),
            NoopDelay::new(),
            Config::default(),
        );

        device.reset().unwrap();

        let (mut spi, mut cts, mut sdn, _) = device.release();
        spi.done();
        cts.done();
        sdn.done();
    }

    #[test]
    fn power_up_and_change_state_send_without_response() {
        let mut device = Device::new(
            SpiMock::<u8>::new(&[
                SpiTransaction::transaction_start(),
                SpiTransaction::write_vec(vec![0x02, 0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80]),
                SpiTransaction::transaction_end(),
                SpiTransaction::transaction_start(),
                SpiTransaction::write_vec(vec![0x34, 0x08]),
                SpiTransaction::transaction_end(),
            ]),
            PinMock::new(&vec![PinTransaction::get(PinState::High); 2]),
            PinMock::new(&[]),
            NoopDelay::new(),
            Config::default(),
        );

        assert_eq!(device.power_up(30_000_000), Ok(()));
        assert_eq!(device.change_state(DeviceState::Rx), Ok(()));

        let (mut spi, mut cts, mut sdn, _) = device.release();
        spi.done();
        cts.done();
        sdn.done();
    }

    #[test]
    fn shutdown_chip_reports_timeout() {
        let mut device = Device::new(
            SpiMock::<u8>::new(&[]),
            PinMock::new(&vec![PinTransaction::get(PinState::Low); 3]),
            PinMock::new(&[]),
            NoopDelay::new(),
            Config::default()
                .with_cts_timeout_us(100)
                .with_cts_poll_interval_us(50),
        );

        assert_eq!(device.request_state(), Err(Error::Timeout));

        let (mut spi, mut cts, mut sdn, _) = device.release();
        spi.done();
        cts.done();
        sdn.done();
    }
}
