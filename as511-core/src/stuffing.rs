//! DLE stuffing
//!
//! Outbound payload bytes equal to DLE are doubled so they cannot be taken
//! for a framing marker. Inbound, the second half of each doubled DLE is
//! dropped again while single marker DLEs (as in DLE, ETX) pass through.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use tracing::trace;

use crate::control::ControlByte;

const DLE: u8 = ControlByte::DLE;

/// Stuff a payload for the wire
///
/// # Examples
///
/// ```
/// use as511_core::stuff;
///
/// assert_eq!(&stuff(&[0x10, 0x20])[..], &[0x10, 0x10, 0x20]);
/// ```
pub fn stuff(payload: &[u8]) -> BytesMut {
    let extra = payload.iter().filter(|&&b| b == DLE).count();
    let mut wire = BytesMut::with_capacity(payload.len() + extra);

    for &byte in payload {
        wire.put_u8(byte);
        if byte == DLE {
            wire.put_u8(DLE);
        }
    }

    trace!(
        payload_len = payload.len(),
        wire_len = wire.len(),
        "Stuffed payload"
    );

    wire
}

/// Unstuff a complete wire capture in one go
pub fn unstuff(wire: &[u8]) -> Bytes {
    let mut unstuffer = Unstuffer::with_capacity(wire.len());
    for &byte in wire {
        unstuffer.push(byte);
    }
    unstuffer.into_bytes()
}

/// Whether the last DLE pair has already been collapsed
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum DleState {
    #[default]
    Open,
    Collapsed,
}

/// Outcome of feeding one wire byte to an [`Unstuffer`]
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Pushed {
    /// Byte was added to the payload
    Appended,
    /// Byte was the second half of a doubled DLE and was dropped
    Collapsed,
}

/// Incremental DLE unstuffer
///
/// Owns the decoded payload and the collapse state for a single data phase.
/// Create one per decode; nothing carries over between frames.
///
/// # Examples
///
/// ```
/// use as511_core::{Pushed, Unstuffer};
///
/// let mut unstuffer = Unstuffer::new();
/// assert_eq!(unstuffer.push(0x10), Pushed::Appended);
/// assert_eq!(unstuffer.push(0x10), Pushed::Collapsed);
/// assert_eq!(unstuffer.push(0x03), Pushed::Appended);
/// assert_eq!(unstuffer.as_bytes(), &[0x10, 0x03]);
/// ```
#[derive(Clone, Default)]
pub struct Unstuffer {
    payload: BytesMut,
    state: DleState,
}

impl Unstuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            payload: BytesMut::with_capacity(capacity),
            state: DleState::Open,
        }
    }

    /// Feed one wire byte
    pub fn push(&mut self, byte: u8) -> Pushed {
        let follows_dle = self.payload.last() == Some(&DLE);

        if byte == DLE && follows_dle && self.state == DleState::Open {
            self.state = DleState::Collapsed;
            return Pushed::Collapsed;
        }

        self.state = DleState::Open;
        self.payload.put_u8(byte);
        Pushed::Appended
    }

    /// Number of decoded bytes so far
    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    pub fn state(&self) -> DleState {
        self.state
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.payload
    }

    pub fn into_bytes(self) -> Bytes {
        self.payload.freeze()
    }
}

impl fmt::Debug for Unstuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unstuffer")
            .field("payload", &hex::encode(&self.payload))
            .field("state", &self.state)
            .finish()
    }
}
