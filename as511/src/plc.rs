//! High-level controller interface

use bytes::Bytes;
use tracing::{debug, info, warn};

use as511_core::{BlockInfoFrame, FunctionCode, Termination};
use as511_transport::{SerialConfig, SerialTransport, Transport};
use as511_types::{BlockDescriptor, MemoryAddress};

use crate::error::{Error, Result};
use crate::handshake::Handshake;

/// Programmable controller reached over an AS511 link
///
/// Owns the channel; every operation borrows it mutably, so only one exchange
/// can be in flight at a time. A failed operation leaves the line in an
/// unknown framing state: call [`Plc::flush`] before the next one.
///
/// # Examples
///
/// ```no_run
/// use as511::{BlockType, Plc};
///
/// #[tokio::main]
/// async fn main() -> as511::Result<()> {
///     let mut plc = Plc::serial("/dev/ttyUSB0");
///
///     plc.connect().await?;
///
///     let block = plc.block_information(BlockType::Db, 10).await?;
///     let data = plc.read_block(&block).await?;
///     println!("{}: {} bytes", block, data.len());
///
///     plc.disconnect().await?;
///     Ok(())
/// }
/// ```
pub struct Plc {
    transport: Box<dyn Transport>,
}

impl Plc {
    /// Create a controller handle over any transport
    pub fn new(transport: impl Transport + 'static) -> Self {
        Self {
            transport: Box::new(transport),
        }
    }

    /// Create a controller handle on a serial port (9600 8E1)
    pub fn serial(path: impl Into<String>) -> Self {
        Self::new(SerialTransport::new(path))
    }

    /// Create a controller handle on a serial port with custom line settings
    pub fn serial_with_config(path: impl Into<String>, config: SerialConfig) -> Self {
        Self::new(SerialTransport::with_config(path, config))
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        self.transport.is_open()
    }

    /// Open the channel
    pub async fn connect(&mut self) -> Result<()> {
        info!("Opening {}...", self.transport.port_name());

        self.transport.open().await?;

        info!("Opened {}", self.transport.port_name());
        Ok(())
    }

    /// Close the channel
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            return Ok(());
        }

        info!("Closing {}...", self.transport.port_name());

        self.transport.close().await?;

        info!("Closed");
        Ok(())
    }

    /// Resolve a block to its address range
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The controller breaks the handshake (`UnexpectedByte`)
    /// - The line times out or drops (`Transport` / `Incomplete`)
    /// - The reported range runs past 0xFFFF (`AddressOverflow`)
    pub async fn block_information(
        &mut self,
        block_type: impl Into<u8>,
        block_number: u8,
    ) -> Result<BlockDescriptor> {
        let block_type = block_type.into();
        self.ensure_connected()?;

        info!(block_type, block_number, "Querying block information...");

        let mut handshake = self.handshake();
        handshake.open_request().await?;
        handshake.select_function(FunctionCode::BlockInfo).await?;
        handshake.await_header_ready().await?;
        handshake.send_header(&[block_type, block_number]).await?;
        handshake.await_data_ready().await?;
        let decoded = handshake.receive_frame(Termination::BlockInfo).await?;
        handshake.ack_data().await?;
        handshake.terminate().await?;

        let frame = BlockInfoFrame::parse(decoded)?;
        debug!("Block information: {:?}", frame);

        let block = BlockDescriptor::new(
            MemoryAddress::new(frame.initial_address()),
            frame.block_length(),
        )?;

        info!("Block information: {}", block);
        Ok(block)
    }

    /// Read a memory range
    ///
    /// Returns the decoded answer as received, envelope bytes included.
    pub async fn read(
        &mut self,
        initial_address: impl Into<MemoryAddress>,
        block_length: u16,
        final_address: impl Into<MemoryAddress>,
    ) -> Result<Bytes> {
        let initial_address = initial_address.into();
        let final_address = final_address.into();
        self.ensure_connected()?;

        info!(
            "Reading {}..{} ({} words)...",
            initial_address, final_address, block_length
        );

        let [initial_hi, initial_lo] = initial_address.to_be_bytes();
        let [final_hi, final_lo] = final_address.to_be_bytes();

        let mut handshake = self.handshake();
        handshake.open_request().await?;
        handshake.select_function(FunctionCode::Read).await?;
        handshake.await_header_ready().await?;
        handshake
            .send_header(&[initial_hi, initial_lo, final_hi, final_lo])
            .await?;
        handshake.await_data_ready().await?;
        let data = handshake
            .receive_frame(Termination::Read { block_length })
            .await?;
        handshake.ack_data().await?;
        handshake.terminate().await?;

        info!("Read {} bytes from {}", data.len(), initial_address);
        Ok(data)
    }

    /// Read the range a block descriptor covers
    pub async fn read_block(&mut self, block: &BlockDescriptor) -> Result<Bytes> {
        self.read(block.initial_address, block.block_length, block.final_address)
            .await
    }

    /// Write bytes starting at an address
    ///
    /// The address goes out as its own acknowledged telegram; the payload
    /// follows stuffed in a second one.
    pub async fn write(
        &mut self,
        initial_address: impl Into<MemoryAddress>,
        data: &[u8],
    ) -> Result<()> {
        let initial_address = initial_address.into();
        self.ensure_connected()?;

        info!("Writing {} bytes to {}...", data.len(), initial_address);

        let mut handshake = self.handshake();
        handshake.open_request().await?;
        handshake.select_function(FunctionCode::Write).await?;
        handshake.await_header_ready().await?;
        handshake.send_header(&initial_address.to_be_bytes()).await?;
        handshake.send_stuffed(data).await?;
        handshake.end_telegram().await?;
        handshake.terminate().await?;

        info!("Wrote {} bytes to {}", data.len(), initial_address);
        Ok(())
    }

    /// Discard everything pending on the line
    ///
    /// Required after any failed operation before the next one is attempted.
    pub fn flush(&mut self) -> Result<()> {
        self.ensure_connected()?;

        warn!("Flushing {}", self.transport.port_name());

        self.transport.discard_input()?;
        self.transport.discard_output()?;
        Ok(())
    }

    // Helper methods

    fn ensure_connected(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn handshake(&mut self) -> Handshake<'_> {
        Handshake::new(self.transport.as_mut())
    }
}
