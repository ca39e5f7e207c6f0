//! Data-phase frames
//!
//! The controller never announces how long an answer is. The receiver stops
//! decoding once a length-and-trailer condition holds, and which condition
//! applies depends on the operation in progress.

use std::fmt;

use byteorder::{BigEndian, ByteOrder};
use bytes::Bytes;

use crate::{
    constants::{block_info, BLOCK_INFO_FRAME_LEN, READ_ENVELOPE_LEN},
    control::ControlByte,
    error::{Error, Result},
};

/// When to stop decoding an inbound data phase
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Termination {
    /// Exactly 15 decoded bytes ending in DLE, ETX
    BlockInfo,

    /// `block_length + 8` decoded bytes, last one ETX
    Read { block_length: u16 },
}

impl Termination {
    /// Minimum decoded length before the trailer is checked
    pub fn expected_len(self) -> usize {
        match self {
            Self::BlockInfo => BLOCK_INFO_FRAME_LEN,
            Self::Read { block_length } => usize::from(block_length) + READ_ENVELOPE_LEN,
        }
    }

    /// Check whether the decoded bytes complete the frame
    ///
    /// Only ever called after a byte was appended, so a read frame whose
    /// target byte is not ETX simply keeps growing. A block information
    /// frame has a fixed size and completes only at exactly 15 bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use as511_core::Termination;
    ///
    /// let policy = Termination::Read { block_length: 0 };
    /// assert!(!policy.is_complete(&[0; 7]));
    /// assert!(policy.is_complete(&[0, 0, 0, 0, 0, 0, 0x10, 0x03]));
    /// ```
    pub fn is_complete(self, decoded: &[u8]) -> bool {
        match self {
            Self::BlockInfo => {
                decoded.len() == self.expected_len()
                    && decoded.ends_with(&[ControlByte::DLE, ControlByte::ETX])
            }
            Self::Read { .. } => {
                decoded.len() >= self.expected_len() && decoded.last() == Some(&ControlByte::ETX)
            }
        }
    }

    /// Check whether a fixed-size frame is full without its trailer
    ///
    /// Read frames have no upper bound and are never exhausted.
    pub fn is_exhausted(self, decoded: &[u8]) -> bool {
        match self {
            Self::BlockInfo => decoded.len() >= self.expected_len() && !self.is_complete(decoded),
            Self::Read { .. } => false,
        }
    }
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BlockInfo => write!(f, "block info ({} bytes)", self.expected_len()),
            Self::Read { block_length } => {
                write!(f, "read ({} words, {} bytes)", block_length, self.expected_len())
            }
        }
    }
}

/// Decoded block information answer
///
/// ```text
/// offset  0     1..=2          3..=10     11..=12        13  14
///         pad   initial (BE)   reserved   length (BE)    DLE ETX
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BlockInfoFrame {
    raw: Bytes,
}

impl BlockInfoFrame {
    /// Wrap a decoded answer, checking it covers the layout
    pub fn parse(decoded: Bytes) -> Result<Self> {
        let required = block_info::BLOCK_LENGTH + 2;
        if decoded.len() < required {
            return Err(Error::FrameTooShort {
                expected: required,
                actual: decoded.len(),
            });
        }

        Ok(Self { raw: decoded })
    }

    pub fn initial_address(&self) -> u16 {
        BigEndian::read_u16(&self.raw[block_info::INITIAL_ADDRESS..])
    }

    /// Block length in words
    pub fn block_length(&self) -> u16 {
        BigEndian::read_u16(&self.raw[block_info::BLOCK_LENGTH..])
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }
}

impl fmt::Debug for BlockInfoFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockInfoFrame")
            .field("initial_address", &format!("0x{:04X}", self.initial_address()))
            .field("block_length", &self.block_length())
            .field("raw", &hex::encode(&self.raw))
            .finish()
    }
}
