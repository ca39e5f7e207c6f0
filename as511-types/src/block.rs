//! Controller memory blocks

use std::fmt;

use crate::address::MemoryAddress;
use crate::error::{Error, Result};

/// Block type ids understood by the block information query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockType {
    /// Data block
    Db = 0x01,
    /// Sequence block
    Sb = 0x02,
    /// Program block
    Pb = 0x04,
    /// Extended function block
    Fx = 0x05,
    /// Function block
    Fb = 0x08,
    /// Extended data block
    Dx = 0x0C,
    /// Organization block
    Ob = 0x10,
}

impl BlockType {
    pub fn name(self) -> &'static str {
        match self {
            Self::Db => "DB",
            Self::Sb => "SB",
            Self::Pb => "PB",
            Self::Fx => "FX",
            Self::Fb => "FB",
            Self::Dx => "DX",
            Self::Ob => "OB",
        }
    }
}

impl From<BlockType> for u8 {
    fn from(block_type: BlockType) -> u8 {
        block_type as u8
    }
}

impl TryFrom<u8> for BlockType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x01 => Ok(Self::Db),
            0x02 => Ok(Self::Sb),
            0x04 => Ok(Self::Pb),
            0x05 => Ok(Self::Fx),
            0x08 => Ok(Self::Fb),
            0x0C => Ok(Self::Dx),
            0x10 => Ok(Self::Ob),
            _ => Err(Error::UnknownBlockType(value)),
        }
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Absolute address range of a block
///
/// Produced by the block information query and handed back to
/// `read`/`write` by callers. `final_address` is always
/// `initial_address + block_length`; construction fails instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockDescriptor {
    /// First address of the block
    pub initial_address: MemoryAddress,

    /// Block length in words
    pub block_length: u16,

    /// `initial_address + block_length`
    pub final_address: MemoryAddress,
}

impl BlockDescriptor {
    /// Build a descriptor, computing the final address
    ///
    /// # Examples
    ///
    /// ```
    /// use as511_types::{BlockDescriptor, MemoryAddress};
    ///
    /// let block = BlockDescriptor::new(MemoryAddress::new(100), 10).unwrap();
    /// assert_eq!(block.final_address, MemoryAddress::new(110));
    /// ```
    pub fn new(initial_address: MemoryAddress, block_length: u16) -> Result<Self> {
        let final_address =
            initial_address
                .checked_add(block_length)
                .ok_or(Error::AddressOverflow {
                    initial: initial_address.value(),
                    length: block_length,
                })?;

        Ok(Self {
            initial_address,
            block_length,
            final_address,
        })
    }
}

impl fmt::Display for BlockDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Block[{}..{}, {} words]",
            self.initial_address, self.final_address, self.block_length
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_descriptor_new() {
        let block = BlockDescriptor::new(MemoryAddress::new(100), 10).unwrap();
        assert_eq!(block.initial_address.value(), 100);
        assert_eq!(block.block_length, 10);
        assert_eq!(block.final_address.value(), 110);
    }

    #[test]
    fn test_descriptor_overflow() {
        let result = BlockDescriptor::new(MemoryAddress::new(0xFFF0), 0x20);
        assert_eq!(
            result,
            Err(Error::AddressOverflow {
                initial: 0xFFF0,
                length: 0x20
            })
        );
    }

    #[test]
    fn test_block_type_conversion() {
        assert_eq!(u8::from(BlockType::Db), 0x01);
        assert_eq!(BlockType::try_from(0x08).unwrap(), BlockType::Fb);
        assert!(matches!(
            BlockType::try_from(0x42),
            Err(Error::UnknownBlockType(0x42))
        ));
    }
}
