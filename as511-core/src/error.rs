//! Error types for as511-core

use crate::step::Step;

/// Result type alias for as511 protocol operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core protocol errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// Controller sent a different byte than the current step requires
    #[error("Unexpected byte during {step}: expected 0x{expected:02X}, got 0x{actual:02X}")]
    UnexpectedByte {
        step: Step,
        expected: u8,
        actual: u8,
    },

    /// Decoded frame is shorter than its layout
    #[error("Frame too short: expected at least {expected} bytes, got {actual} bytes")]
    FrameTooShort {
        expected: usize,
        actual: usize,
    },

    /// Fixed-size frame filled up without its DLE, ETX trailer
    #[error("Missing frame trailer after {length} bytes")]
    MissingTrailer { length: usize },

    /// Unknown function code
    #[error("Unknown function code: 0x{0:02X}")]
    UnknownFunction(u8),
}
