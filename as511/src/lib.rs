//! # as511
//!
//! Rust implementation of the AS511 programming-port protocol spoken by
//! S5-family programmable controllers.
//!
//! ## Features
//!
//! - Block information, memory read and memory write
//! - Exact DLE framing and handshake checking
//! - Async/await API using Tokio
//! - Serial transport via `tokio-serial`
//!
//! ## Quick Start
//!
//! ```no_run
//! use as511::{BlockType, Plc};
//!
//! #[tokio::main]
//! async fn main() -> as511::Result<()> {
//!     // Open the programming port
//!     let mut plc = Plc::serial("/dev/ttyUSB0");
//!     plc.connect().await?;
//!     
//!     // Locate and read data block 10
//!     let block = plc.block_information(BlockType::Db, 10).await?;
//!     let data = plc.read_block(&block).await?;
//!     println!("{} -> {} bytes", block, data.len());
//!     
//!     // Close
//!     plc.disconnect().await?;
//!     
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod handshake;
pub mod plc;

// Re-exports
pub use error::{Error, Result};
pub use handshake::Handshake;
pub use plc::Plc;

// Re-export types
pub use as511_core::{ControlByte, FunctionCode, Step, Termination};
pub use as511_transport::{MemoryTransport, SerialConfig, SerialTransport, Transport};
pub use as511_types::{BlockDescriptor, BlockType, MemoryAddress};
