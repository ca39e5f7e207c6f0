//! Serial transport for the programming port
//!
//! The AS511 port runs as a plain RS-232/20 mA link, by default at
//! 9600 baud, 8 data bits, even parity, 1 stop bit.

use std::io::ErrorKind;
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::time::timeout;
use tokio_serial::{ClearBuffer, DataBits, Parity, SerialPort, SerialStream, StopBits};
use tracing::{debug, trace, warn};

use as511_core::constants::{DEFAULT_BAUD_RATE, DEFAULT_READ_TIMEOUT_MS, DEFAULT_WRITE_TIMEOUT_MS};

use crate::{error::*, Transport};

/// Line settings and timeouts for a serial channel
#[derive(Debug, Clone, PartialEq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: DataBits,
    pub parity: Parity,
    pub stop_bits: StopBits,
    /// Budget for each single-byte read
    pub read_timeout: Duration,
    /// Budget for each write call
    pub write_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            data_bits: DataBits::Eight,
            parity: Parity::Even,
            stop_bits: StopBits::One,
            read_timeout: Duration::from_millis(DEFAULT_READ_TIMEOUT_MS),
            write_timeout: Duration::from_millis(DEFAULT_WRITE_TIMEOUT_MS),
        }
    }
}

impl SerialConfig {
    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn with_data_bits(mut self, data_bits: DataBits) -> Self {
        self.data_bits = data_bits;
        self
    }

    pub fn with_parity(mut self, parity: Parity) -> Self {
        self.parity = parity;
        self
    }

    pub fn with_stop_bits(mut self, stop_bits: StopBits) -> Self {
        self.stop_bits = stop_bits;
        self
    }

    /// Set per-byte read timeout
    pub fn with_read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// Set write timeout
    pub fn with_write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }
}

/// List the names of serial ports present on this machine
pub fn available_ports() -> Result<Vec<String>> {
    let ports = tokio_serial::available_ports()?;
    Ok(ports.into_iter().map(|p| p.port_name).collect())
}

/// Serial transport for AS511 controllers
pub struct SerialTransport {
    path: String,
    config: SerialConfig,
    stream: Option<SerialStream>,
}

impl SerialTransport {
    /// Create new serial transport with default line settings
    pub fn new(path: impl Into<String>) -> Self {
        Self::with_config(path, SerialConfig::default())
    }

    pub fn with_config(path: impl Into<String>, config: SerialConfig) -> Self {
        Self {
            path: path.into(),
            config,
            stream: None,
        }
    }

    pub fn config(&self) -> &SerialConfig {
        &self.config
    }
}

#[async_trait]
impl Transport for SerialTransport {
    async fn open(&mut self) -> Result<()> {
        if self.is_open() {
            return Err(Error::AlreadyConnected);
        }

        debug!(
            "Opening {} ({} baud, {:?}, {:?}, {:?})...",
            self.path,
            self.config.baud_rate,
            self.config.data_bits,
            self.config.parity,
            self.config.stop_bits
        );

        let builder = tokio_serial::new(&self.path, self.config.baud_rate)
            .data_bits(self.config.data_bits)
            .parity(self.config.parity)
            .stop_bits(self.config.stop_bits)
            .timeout(self.config.read_timeout);

        let stream = SerialStream::open(&builder)?;

        debug!("Opened {}", self.path);

        self.stream = Some(stream);
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut stream) = self.stream.take() {
            debug!("Closing {}...", self.path);

            let _ = stream.shutdown().await;
        }

        Ok(())
    }

    fn is_open(&self) -> bool {
        self.stream.is_some()
    }

    async fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        trace!("Sending {} bytes: {:02X?}", data.len(), data);

        timeout(self.config.write_timeout, async {
            stream.write_all(data).await?;
            stream.flush().await?;
            Ok::<(), std::io::Error>(())
        })
        .await
        .map_err(|_| Error::WriteTimeout)??;

        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let stream = self.stream.as_mut().ok_or(Error::NotConnected)?;

        let byte = timeout(self.config.read_timeout, stream.read_u8())
            .await
            .map_err(|_| Error::ReadTimeout)?
            .map_err(|e| match e.kind() {
                ErrorKind::UnexpectedEof => Error::ConnectionClosed,
                ErrorKind::TimedOut => Error::ReadTimeout,
                _ => Error::Io(e),
            })?;

        trace!("Received 0x{:02X}", byte);

        Ok(byte)
    }

    fn discard_input(&mut self) -> Result<()> {
        let stream = self.stream.as_ref().ok_or(Error::NotConnected)?;
        stream.clear(ClearBuffer::Input)?;
        Ok(())
    }

    fn discard_output(&mut self) -> Result<()> {
        let stream = self.stream.as_ref().ok_or(Error::NotConnected)?;
        stream.clear(ClearBuffer::Output)?;
        Ok(())
    }

    fn port_name(&self) -> String {
        self.path.clone()
    }
}

impl Drop for SerialTransport {
    fn drop(&mut self) {
        if self.is_open() {
            warn!("Serial transport dropped while still open");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_line_settings() {
        let config = SerialConfig::default();
        assert_eq!(config.baud_rate, 9600);
        assert_eq!(config.data_bits, DataBits::Eight);
        assert_eq!(config.parity, Parity::Even);
        assert_eq!(config.stop_bits, StopBits::One);
        assert_eq!(config.read_timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_config_builder() {
        let config = SerialConfig::default()
            .with_baud_rate(19200)
            .with_parity(Parity::None)
            .with_read_timeout(Duration::from_secs(2));

        assert_eq!(config.baud_rate, 19200);
        assert_eq!(config.parity, Parity::None);
        assert_eq!(config.read_timeout, Duration::from_secs(2));
        assert_eq!(config.write_timeout, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_serial_transport_create() {
        let transport = SerialTransport::new("/dev/ttyS0");
        assert!(!transport.is_open());
        assert_eq!(transport.port_name(), "/dev/ttyS0");
    }

    #[tokio::test]
    async fn test_serial_transport_not_connected() {
        let mut transport = SerialTransport::new("/dev/ttyS0");

        assert!(matches!(transport.read_byte().await, Err(Error::NotConnected)));
        assert!(matches!(transport.write_bytes(&[0x02]).await, Err(Error::NotConnected)));
        assert!(matches!(transport.discard_input(), Err(Error::NotConnected)));
    }

    #[tokio::test]
    async fn test_serial_transport_invalid_port() {
        let mut transport = SerialTransport::new("/dev/does-not-exist-as511");

        let result = transport.open().await;
        assert!(result.is_err());
        assert!(!transport.is_open());
    }
}
