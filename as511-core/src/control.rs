//! AS511 control bytes and function codes
//!
//! EOT and the read function code share the value 0x04. They never appear in
//! the same protocol phase, so they live in two separate types.

use std::fmt;

use crate::error::{Error, Result};

/// Single-byte framing markers
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ControlByte {
    Stx = 0x02,
    Etx = 0x03,
    Eot = 0x04,
    Ack = 0x06,
    Dle = 0x10,
    AgEnd = 0x12,
    /// Literal acknowledge sent by the controller before the header
    Syn = 0x16,
}

impl ControlByte {
    pub const STX: u8 = Self::Stx as u8;
    pub const ETX: u8 = Self::Etx as u8;
    pub const EOT: u8 = Self::Eot as u8;
    pub const ACK: u8 = Self::Ack as u8;
    pub const DLE: u8 = Self::Dle as u8;
    pub const AG_END: u8 = Self::AgEnd as u8;
    pub const SYN: u8 = Self::Syn as u8;

    pub fn name(self) -> &'static str {
        match self {
            Self::Stx => "STX",
            Self::Etx => "ETX",
            Self::Eot => "EOT",
            Self::Ack => "ACK",
            Self::Dle => "DLE",
            Self::AgEnd => "AG_END",
            Self::Syn => "SYN",
        }
    }

    /// Look up the marker for a raw byte, if it is one
    pub fn from_byte(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(Self::Stx),
            0x03 => Some(Self::Etx),
            0x04 => Some(Self::Eot),
            0x06 => Some(Self::Ack),
            0x10 => Some(Self::Dle),
            0x12 => Some(Self::AgEnd),
            0x16 => Some(Self::Syn),
            _ => None,
        }
    }
}

impl From<ControlByte> for u8 {
    fn from(byte: ControlByte) -> u8 {
        byte as u8
    }
}

impl fmt::Display for ControlByte {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

/// Function codes sent right after the opening request
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FunctionCode {
    Write = 0x03,
    Read = 0x04,
    BlockInfo = 0x1A,
}

impl FunctionCode {
    pub fn name(self) -> &'static str {
        match self {
            Self::Write => "WRITE",
            Self::Read => "READ",
            Self::BlockInfo => "BLOCK_INFO",
        }
    }
}

impl From<FunctionCode> for u8 {
    fn from(code: FunctionCode) -> u8 {
        code as u8
    }
}

impl TryFrom<u8> for FunctionCode {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0x03 => Ok(Self::Write),
            0x04 => Ok(Self::Read),
            0x1A => Ok(Self::BlockInfo),
            _ => Err(Error::UnknownFunction(value)),
        }
    }
}

impl fmt::Display for FunctionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(0x{:02X})", self.name(), *self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_control_values() {
        assert_eq!(ControlByte::STX, 0x02);
        assert_eq!(ControlByte::ETX, 0x03);
        assert_eq!(ControlByte::EOT, 0x04);
        assert_eq!(ControlByte::ACK, 0x06);
        assert_eq!(ControlByte::DLE, 0x10);
        assert_eq!(ControlByte::AG_END, 0x12);
        assert_eq!(ControlByte::SYN, 0x16);
    }

    #[test]
    fn test_control_from_byte() {
        assert_eq!(ControlByte::from_byte(0x10), Some(ControlByte::Dle));
        assert_eq!(ControlByte::from_byte(0x55), None);
    }

    #[test]
    fn test_function_conversion() {
        assert_eq!(u8::from(FunctionCode::BlockInfo), 0x1A);
        assert_eq!(FunctionCode::try_from(0x04).unwrap(), FunctionCode::Read);
        assert!(FunctionCode::try_from(0x99).is_err());
    }

    #[test]
    fn test_read_code_shares_eot_value() {
        assert_eq!(u8::from(FunctionCode::Read), ControlByte::EOT);
    }

    #[test]
    fn test_display() {
        assert_eq!(ControlByte::Dle.to_string(), "DLE(0x10)");
        assert_eq!(FunctionCode::Write.to_string(), "WRITE(0x03)");
    }
}
