//! Property definitions for the Si446x
//!
//! Properties are the chip's configuration registers. Each one is addressed
//! by a group and an index; the register id used here is `group << 8 | index`,
//! which is how the datasheet's property table lists them. Multi-byte
//! properties occupy consecutive indices and are written in one SET_PROPERTY.

mod packet;
mod rf;

pub use packet::*;
pub use rf::*;

/// A property's (group, index) address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PropertyAddress {
    pub group: u8,
    pub index: u8,
}

impl PropertyAddress {
    /// Address of property `index` in `group`
    pub const fn new(group: u8, index: u8) -> Self {
        Self { group, index }
    }
}

impl From<u16> for PropertyAddress {
    fn from(id: u16) -> Self {
        let [group, index] = id.to_be_bytes();
        Self { group, index }
    }
}

impl From<PropertyAddress> for u16 {
    fn from(address: PropertyAddress) -> Self {
        u16::from_be_bytes([address.group, address.index])
    }
}
