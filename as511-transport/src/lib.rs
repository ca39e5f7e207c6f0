//! Transport layer for the AS511 protocol
//!
//! Provides the byte channel to the controller's programming port.

pub mod error;
pub mod memory;
pub mod serial;

pub use error::{Error, Result};
pub use memory::MemoryTransport;
pub use serial::{available_ports, SerialConfig, SerialTransport};
pub use tokio_serial::{DataBits, Parity, StopBits};

use async_trait::async_trait;

/// Half-duplex byte channel to a controller
///
/// Reads and writes are bounded by the timeouts the transport was configured
/// with; none of them blocks indefinitely.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Open the channel
    async fn open(&mut self) -> Result<()>;
    
    /// Close the channel
    async fn close(&mut self) -> Result<()>;
    
    /// Check if open
    fn is_open(&self) -> bool;
    
    /// Write raw bytes
    async fn write_bytes(&mut self, data: &[u8]) -> Result<()>;
    
    /// Read a single byte (with timeout)
    async fn read_byte(&mut self) -> Result<u8>;

    /// Drop any bytes received but not yet read
    fn discard_input(&mut self) -> Result<()>;

    /// Drop any bytes queued but not yet sent
    fn discard_output(&mut self) -> Result<()>;
    
    /// Get port name
    fn port_name(&self) -> String;
}
