//! Protocol constants

/// Decoded length of the block information answer
pub const BLOCK_INFO_FRAME_LEN: usize = 15;

/// Decoded bytes framing the payload of a read answer
///
/// Five leading pad bytes and the trailing DLE, ETX pair account for seven of
/// them. The eighth is observed on hardware but not yet explained.
pub const READ_ENVELOPE_LEN: usize = 8;

/// Default serial baud rate of the programming port
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Default per-byte read timeout (milliseconds)
pub const DEFAULT_READ_TIMEOUT_MS: u64 = 500;

/// Default write timeout (milliseconds)
pub const DEFAULT_WRITE_TIMEOUT_MS: u64 = 500;

/// Byte offsets inside the decoded block information answer
pub mod block_info {
    /// Big-endian initial address, two bytes
    pub const INITIAL_ADDRESS: usize = 1;

    /// Big-endian block length in words, two bytes
    pub const BLOCK_LENGTH: usize = 11;
}
