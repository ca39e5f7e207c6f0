//! # as511-core
//!
//! Core protocol implementation for the AS511 programming-port protocol.
//!
//! This crate provides the I/O-free protocol primitives:
//! - Control bytes and function codes
//! - DLE stuffing and unstuffing
//! - Data-phase termination policies and frame layouts
//! - Protocol constants

pub mod constants;
pub mod control;
pub mod error;
pub mod frame;
pub mod step;
pub mod stuffing;

pub use control::{ControlByte, FunctionCode};
pub use error::{Error, Result};
pub use frame::{BlockInfoFrame, Termination};
pub use step::Step;
pub use stuffing::{stuff, unstuff, DleState, Pushed, Unstuffer};
