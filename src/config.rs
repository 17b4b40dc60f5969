//! Driver configuration and vendor configuration tables
//!
//! [`Config`] holds the timing budgets and packet framing the driver needs at
//! run time. [`ConfigTable`] wraps the opaque command sequence generated by the
//! vendor's radio configuration tool (`RADIO_CONFIGURATION_DATA_ARRAY`) and
//! validates it once, when it is loaded, so a malformed table never reaches
//! the bus.

use crate::{frame::MAX_FRAME_LEN, ConfigTableError};

/// Capacity of the on-chip RX FIFO as used by the packet pipeline
pub const FIFO_CAPACITY: usize = 60;

/// Default upper bound on a transmitted payload: a 28 byte application buffer
/// plus 4 bytes of key and addressing overhead.
pub const DEFAULT_MAX_PAYLOAD_LEN: u8 = 28 + 4;

/// How packet length is conveyed between the driver and the packet handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PacketFormat {
    /// Every packet carries exactly this many payload bytes; the length is
    /// programmed into the field 1 length property.
    Fixed(u8),
    /// A length byte precedes the payload on the wire and in both FIFOs.
    Variable,
}

impl PacketFormat {
    /// Number of framing bytes the driver adds in front of each payload
    pub fn prefix_len(self) -> usize {
        match self {
            Self::Fixed(_) => 0,
            Self::Variable => 1,
        }
    }
}

/// Run-time driver configuration.
///
/// # Defaults
/// - CTS budget: 50 ms polled every 10 µs (POWER_UP alone can take ~15 ms)
/// - Shutdown pulse: 10 µs
/// - Variable length packets, at most [`DEFAULT_MAX_PAYLOAD_LEN`] bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Config {
    /// Total time to wait for CTS before reporting a timeout
    pub cts_timeout_us: u32,
    /// Delay between two CTS samples
    pub cts_poll_interval_us: u32,
    /// How long the shutdown line is held high during reset
    pub reset_pulse_us: u32,
    /// Packet framing used by the TX and RX paths
    pub packet_format: PacketFormat,
    /// Longest payload `send_packet` will put in the TX FIFO
    pub max_payload_len: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cts_timeout_us: 50_000,
            cts_poll_interval_us: 10,
            reset_pulse_us: 10,
            packet_format: PacketFormat::Variable,
            max_payload_len: DEFAULT_MAX_PAYLOAD_LEN,
        }
    }
}

impl Config {
    /// Sets the total CTS wait budget.
    pub fn with_cts_timeout_us(mut self, timeout_us: u32) -> Self {
        self.cts_timeout_us = timeout_us;
        self
    }

    /// Sets the delay between CTS samples.
    pub fn with_cts_poll_interval_us(mut self, interval_us: u32) -> Self {
        self.cts_poll_interval_us = interval_us;
        self
    }

    /// Sets how long `reset` holds the shutdown line high.
    pub fn with_reset_pulse_us(mut self, pulse_us: u32) -> Self {
        self.reset_pulse_us = pulse_us;
        self
    }

    /// Selects fixed or variable length packets.
    pub fn with_packet_format(mut self, format: PacketFormat) -> Self {
        self.packet_format = format;
        self
    }

    /// Sets the longest payload queued for transmission. Values above what
    /// fits in the FIFO next to the length byte are capped.
    pub fn with_max_payload_len(mut self, len: u8) -> Self {
        self.max_payload_len = len;
        self
    }

    /// Payload bytes that fit in one TX FIFO load alongside the length prefix.
    pub(crate) fn tx_payload_limit(&self) -> usize {
        usize::from(self.max_payload_len).min(FIFO_CAPACITY - self.packet_format.prefix_len())
    }
}

/// One command taken from a [`ConfigTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigFrame<'a> {
    /// Complete frame bytes, opcode first
    raw: &'a [u8],
}

impl<'a> ConfigFrame<'a> {
    /// Command opcode
    pub fn opcode(&self) -> u8 {
        self.raw[0]
    }

    /// Parameter bytes following the opcode
    pub fn params(&self) -> &'a [u8] {
        &self.raw[1..]
    }

    pub fn as_bytes(&self) -> &'a [u8] {
        self.raw
    }
}

/// A validated vendor configuration table.
///
/// The table is a sequence of `len, bytes[len]` records closed by a zero
/// length byte. Anything after the terminator is ignored.
///
/// # Example
/// ```
/// use si446x::ConfigTable;
///
/// const TABLE: &[u8] = &[
///     0x07, 0x02, 0x01, 0x00, 0x01, 0xC9, 0xC3, 0x80, // POWER_UP, 30 MHz
///     0x05, 0x11, 0x00, 0x01, 0x00, 0x52,             // GLOBAL_XO_TUNE
///     0x00,
/// ];
///
/// let table = ConfigTable::new(TABLE).unwrap();
/// assert_eq!(table.len(), 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConfigTable<'a> {
    /// Records up to, not including, the terminator
    records: &'a [u8],
    frames: usize,
}

impl<'a> ConfigTable<'a> {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    /// * `ConfigTableError::Truncated` - a record runs past the end of `raw`
    /// * `ConfigTableError::FrameTooLong` - a record exceeds the largest command frame
    /// * `ConfigTableError::MissingTerminator` - no zero length byte closes the table
    pub fn new(raw: &'a [u8]) -> Result<Self, ConfigTableError> {
        let mut offset = 0;
        let mut frames = 0;

        loop {
            let len = *raw.get(offset).ok_or(ConfigTableError::MissingTerminator)?;
            if len == 0 {
                break;
            }
            if usize::from(len) > MAX_FRAME_LEN {
                return Err(ConfigTableError::FrameTooLong { offset, len });
            }
            let end = offset + 1 + usize::from(len);
            if end > raw.len() {
                return Err(ConfigTableError::Truncated { offset });
            }
            offset = end;
            frames += 1;
        }

        Ok(Self {
            records: &raw[..offset],
            frames,
        })
    }

    /// Number of frames in the table
    pub fn len(&self) -> usize {
        self.frames
    }

    /// True when the table holds only the terminator
    pub fn is_empty(&self) -> bool {
        self.frames == 0
    }

    /// Iterates the frames in replay order.
    pub fn frames(&self) -> ConfigFrames<'a> {
        ConfigFrames {
            remaining: self.records,
        }
    }
}

impl<'a> IntoIterator for &ConfigTable<'a> {
    type Item = ConfigFrame<'a>;
    type IntoIter = ConfigFrames<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.frames()
    }
}

/// Iterator over the frames of a [`ConfigTable`].
#[derive(Debug, Clone)]
pub struct ConfigFrames<'a> {
    remaining: &'a [u8],
}

impl<'a> Iterator for ConfigFrames<'a> {
    type Item = ConfigFrame<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Records were validated in `ConfigTable::new`.
        let (&len, rest) = self.remaining.split_first()?;
        let (raw, rest) = rest.split_at(usize::from(len));
        self.remaining = rest;
        Some(ConfigFrame { raw })
    }
}
