//! Command frames
//!
//! A frame is one opcode followed by its parameter bytes. The Si446x accepts
//! at most 16 parameter bytes for SET_PROPERTY and never more than 19 for any
//! command, so every frame fits in [`MAX_FRAME_LEN`] bytes and is clocked out
//! inside a single chip-select assertion.

use heapless::Vec;

use crate::Error;

/// Largest frame the chip accepts: the opcode plus 19 parameter bytes
pub const MAX_FRAME_LEN: usize = 20;

/// An immutable command frame.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    bytes: Vec<u8, MAX_FRAME_LEN>,
}

impl Frame {
    /// Builds a frame from an opcode and its parameters.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - the parameters do not fit in one frame
    pub fn new(opcode: u8, params: &[u8]) -> Result<Self, Error> {
        let mut bytes = Vec::new();
        bytes.push(opcode).map_err(|_| Error::InvalidArgument)?;
        bytes
            .extend_from_slice(params)
            .map_err(|_| Error::InvalidArgument)?;
        Ok(Self { bytes })
    }

    /// Copies a complete frame, opcode included.
    ///
    /// # Errors
    /// * `Error::InvalidArgument` - `raw` is empty or longer than [`MAX_FRAME_LEN`]
    pub fn from_bytes(raw: &[u8]) -> Result<Self, Error> {
        match raw.split_first() {
            Some((&opcode, params)) => Self::new(opcode, params),
            None => Err(Error::InvalidArgument),
        }
    }

    /// Command opcode
    pub fn opcode(&self) -> u8 {
        self.bytes[0]
    }

    /// Parameter bytes following the opcode
    pub fn params(&self) -> &[u8] {
        &self.bytes[1..]
    }

    /// The bytes exactly as they go on the wire
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_keeps_opcode_first() {
        let frame = Frame::new(0x34, &[0x03]).unwrap();
        assert_eq!(frame.opcode(), 0x34);
        assert_eq!(frame.params(), &[0x03]);
        assert_eq!(frame.as_bytes(), &[0x34, 0x03]);
    }

    #[test]
    fn oversized_frame_is_rejected() {
        assert_eq!(Frame::new(0x11, &[0u8; 19]).map(|f| f.as_bytes().len()), Ok(20));
        assert_eq!(Frame::new(0x11, &[0u8; 20]), Err(Error::InvalidArgument));
        assert_eq!(Frame::from_bytes(&[]), Err(Error::InvalidArgument));
    }
}
