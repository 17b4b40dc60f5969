//! Status queries
//!
//! Thin wrappers around the status commands plus the fast RSSI read.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::{Operation, SpiDevice},
};

use crate::{
    commands::opcode, Device, Error, FifoInfo, FifoReset, FifoStatus, FuncInfo,
    FuncInfoResponse, GetIntStatus, GpioPinCfg, GpioPins, IntStatus, PacketInfo,
    PacketInfoConfig, PartInfo, PartInfoResponse,
};

/// RSSI calibration offset in dB
const RSSI_OFFSET_DB: i16 = 130;

/// Converts a raw RSSI reading to dBm: `raw / 2 - 130`, truncating.
pub fn rssi_dbm(raw: u8) -> i16 {
    i16::from(raw / 2) - RSSI_OFFSET_DB
}

impl<SPI, CTS, SDN, D> Device<SPI, CTS, SDN, D>
where
    SPI: SpiDevice,
    CTS: InputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Reads the part number, revision and ROM id.
    pub fn part_info(&mut self) -> Result<PartInfoResponse, Error> {
        self.execute_command(PartInfo)
    }

    /// Reads the firmware revision and the running functional image.
    pub fn func_info(&mut self) -> Result<FuncInfoResponse, Error> {
        self.execute_command(FuncInfo)
    }

    /// Reads and clears every pending interrupt.
    pub fn int_status(&mut self) -> Result<IntStatus, Error> {
        self.execute_command(GetIntStatus::default())
    }

    /// Reads the FIFO fill levels without resetting either FIFO.
    pub fn fifo_info(&mut self) -> Result<FifoStatus, Error> {
        self.execute_command(FifoInfo {
            reset: FifoReset::empty(),
        })
    }

    /// Reads the length of the packet being received, optionally overriding
    /// the length of `field`.
    pub fn packet_info(&mut self, field: u8, length: u16, diff_length: u16) -> Result<u16, Error> {
        let info = self.execute_command(PacketInfo {
            config: PacketInfoConfig {
                field,
                length,
                diff_length,
            },
        })?;
        Ok(info.length)
    }

    /// Configures the GPIO pins and returns their resulting state.
    pub fn gpio_config(&mut self, pins: GpioPins) -> Result<GpioPins, Error> {
        self.execute_command(GpioPinCfg { pins })
    }

    /// Reads the latched RSSI in dBm.
    ///
    /// Uses fast response register A, which the configuration table is
    /// expected to have set to latched RSSI. The read has no response buffer
    /// handshake: one opcode byte out, one value byte back.
    pub fn rssi(&mut self) -> Result<i16, Error> {
        self.wait_for_cts()?;

        let mut raw = [0u8];
        self.spi
            .transaction(&mut [
                Operation::Write(&[opcode::FRR_A_READ]),
                Operation::Read(&mut raw),
            ])
            .map_err(|_| Error::Bus)?;

        Ok(rssi_dbm(raw[0]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rssi_conversion_truncates() {
        assert_eq!(rssi_dbm(200), -30);
        assert_eq!(rssi_dbm(0), -130);
        assert_eq!(rssi_dbm(1), -130);
        assert_eq!(rssi_dbm(255), -3);
    }
}
