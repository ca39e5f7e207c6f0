//! Controller memory addresses

use std::fmt;

/// 16-bit controller memory address
///
/// Always travels on the wire as two big-endian bytes.
///
/// # Examples
///
/// ```
/// use as511_types::MemoryAddress;
///
/// let addr = MemoryAddress::new(0x1234);
/// assert_eq!(addr.to_be_bytes(), [0x12, 0x34]);
/// assert_eq!(MemoryAddress::from_be_bytes([0x12, 0x34]), addr);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct MemoryAddress(u16);

impl MemoryAddress {
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    pub const fn from_be_bytes(bytes: [u8; 2]) -> Self {
        Self(u16::from_be_bytes(bytes))
    }

    pub const fn to_be_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    pub const fn value(self) -> u16 {
        self.0
    }

    /// Add a word offset, returning `None` past 0xFFFF
    pub fn checked_add(self, words: u16) -> Option<Self> {
        self.0.checked_add(words).map(Self)
    }
}

impl From<u16> for MemoryAddress {
    fn from(value: u16) -> Self {
        Self(value)
    }
}

impl From<MemoryAddress> for u16 {
    fn from(addr: MemoryAddress) -> u16 {
        addr.0
    }
}

impl From<[u8; 2]> for MemoryAddress {
    fn from(bytes: [u8; 2]) -> Self {
        Self::from_be_bytes(bytes)
    }
}

impl fmt::Display for MemoryAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}
