//! FIFO management and packet transfer
//!
//! The Si446x buffers outgoing and incoming packets in two on-chip FIFOs.
//! Transmitting means loading the TX FIFO and issuing START_TX; receiving
//! means issuing START_RX and, once the packet handler reports a packet,
//! draining the RX FIFO.
//!
//! With [`PacketFormat::Variable`] the first FIFO byte is the payload length,
//! both on the way out and on the way in. With [`PacketFormat::Fixed`] every
//! packet is the configured length and no length byte is used.

use embedded_hal::{
    delay::DelayNs,
    digital::{InputPin, OutputPin},
    spi::{Operation, SpiDevice},
};

use crate::{
    commands::opcode, config::FIFO_CAPACITY, Device, Error, FifoReset, NextState,
    PacketFormat, ResetFifo, RxConfig, StartRx, StartTx, TxConfig,
};

impl<SPI, CTS, SDN, D> Device<SPI, CTS, SDN, D>
where
    SPI: SpiDevice,
    CTS: InputPin,
    SDN: OutputPin,
    D: DelayNs,
{
    /// Flushes the TX FIFO.
    pub fn reset_tx_fifo(&mut self) -> Result<(), Error> {
        self.execute_command(ResetFifo {
            reset: FifoReset::TX,
        })?;
        Ok(())
    }

    /// Flushes the RX FIFO.
    pub fn reset_rx_fifo(&mut self) -> Result<(), Error> {
        self.execute_command(ResetFifo {
            reset: FifoReset::RX,
        })?;
        Ok(())
    }

    /// Loads `payload` into the TX FIFO and starts transmitting it.
    ///
    /// The payload is cut to the configured maximum payload length (and to
    /// what fits in the FIFO next to the length byte). In variable length
    /// mode the length byte goes first and counts towards the START_TX
    /// length.
    ///
    /// # Returns
    /// The number of payload bytes actually queued.
    pub fn send_packet(&mut self, payload: &[u8], channel: u8, condition: u8) -> Result<usize, Error> {
        let len = payload.len().min(self.config.tx_payload_limit());
        let payload = &payload[..len];

        self.reset_tx_fifo()?;

        let prefix = match self.config.packet_format {
            PacketFormat::Variable => Some(len as u8),
            PacketFormat::Fixed(_) => None,
        };
        self.write_tx_fifo(prefix, payload)?;

        #[cfg(feature = "defmt")]
        defmt::debug!("send_packet: {} bytes on channel {}", len, channel);
        let tx_len = len + usize::from(prefix.is_some());
        self.start_tx(channel, condition, tx_len as u16)?;
        Ok(len)
    }

    /// Starts transmitting what is already in the TX FIFO.
    ///
    /// A `length` of 0 uses the field lengths programmed in the packet
    /// handler, which is what fixed length mode expects.
    pub fn start_tx(&mut self, channel: u8, condition: u8, length: u16) -> Result<(), Error> {
        self.execute_command(StartTx {
            config: TxConfig {
                channel,
                condition,
                length,
            },
        })?;
        Ok(())
    }

    /// Flushes both FIFOs and enters RX.
    ///
    /// The three next states decide where the chip goes on its own after a
    /// preamble timeout, a packet with a valid CRC and a packet with an
    /// invalid CRC.
    #[allow(clippy::too_many_arguments)]
    pub fn start_rx(
        &mut self,
        channel: u8,
        condition: u8,
        length: u16,
        on_timeout: NextState,
        on_valid: NextState,
        on_invalid: NextState,
    ) -> Result<(), Error> {
        self.reset_rx_fifo()?;
        self.reset_tx_fifo()?;
        self.execute_command(StartRx {
            config: RxConfig {
                channel,
                condition,
                length,
                on_timeout,
                on_valid,
                on_invalid,
            },
        })?;
        Ok(())
    }

    /// Drains one packet from the RX FIFO into `buf`.
    ///
    /// In variable length mode the length byte is read first. The length is
    /// clamped to the FIFO capacity and to `buf`, so a corrupted length byte
    /// can never make this read more than [`FIFO_CAPACITY`] bytes. When the
    /// packet is cut short the RX FIFO is flushed, so the next read never
    /// starts in the middle of a payload.
    ///
    /// # Returns
    /// The number of bytes written to `buf`.
    pub fn read_packet(&mut self, buf: &mut [u8]) -> Result<usize, Error> {
        self.wait_for_cts()?;

        let declared = match self.config.packet_format {
            PacketFormat::Variable => {
                let mut len = [0u8];
                self.read_rx_fifo(&mut len)?;
                len[0]
            }
            PacketFormat::Fixed(len) => len,
        };

        let len = usize::from(declared).min(FIFO_CAPACITY).min(buf.len());
        #[cfg(feature = "defmt")]
        if usize::from(declared) != len {
            defmt::warn!("read_packet: length {} clamped to {}", declared, len);
        }

        if len > 0 {
            self.read_rx_fifo(&mut buf[..len])?;
        }
        if len < usize::from(declared) {
            self.reset_rx_fifo()?;
        }
        Ok(len)
    }

    /// Writes an optional length byte and the payload with one WRITE_TX_FIFO.
    fn write_tx_fifo(&mut self, prefix: Option<u8>, payload: &[u8]) -> Result<(), Error> {
        let prefix = prefix.map(|len| [len]);
        let prefix: &[u8] = match &prefix {
            Some(len) => len,
            None => &[],
        };

        self.wait_for_cts()?;
        self.spi
            .transaction(&mut [
                Operation::Write(&[opcode::WRITE_TX_FIFO]),
                Operation::Write(prefix),
                Operation::Write(payload),
            ])
            .map_err(|_| Error::Bus)
    }

    /// Pops `buf.len()` bytes off the RX FIFO. Successive reads continue
    /// where the previous one stopped.
    fn read_rx_fifo(&mut self, buf: &mut [u8]) -> Result<(), Error> {
        self.spi
            .transaction(&mut [
                Operation::Write(&[opcode::READ_RX_FIFO]),
                Operation::Read(buf),
            ])
            .map_err(|_| Error::Bus)
    }
}
