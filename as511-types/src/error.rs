//! Errors raised while building typed values

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("Address overflow: 0x{initial:04X} + {length} words exceeds 0xFFFF")]
    AddressOverflow {
        initial: u16,
        length: u16,
    },

    #[error("Unknown block type id: 0x{0:02X}")]
    UnknownBlockType(u8),
}
