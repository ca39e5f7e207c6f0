//! Type definitions for as511
//!
//! Plain values exchanged with the controller: memory addresses, block
//! descriptors and block type ids.

pub mod address;
pub mod block;
pub mod error;

pub use address::MemoryAddress;
pub use block::{BlockDescriptor, BlockType};
pub use error::{Error, Result};
