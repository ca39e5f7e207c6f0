//! Handshake engine
//!
//! Every AS511 exchange is the same choreography of markers around a data
//! phase:
//!
//! ```text
//! host            controller
//! STX        ->
//!            <-   DLE ACK                 open request
//! function   ->                           select function
//!            <-   STX
//! DLE ACK    ->
//!            <-   SYN DLE ETX
//! DLE ACK    ->                           header ready
//! header DLE EOT ->
//!            <-   DLE ACK                 header sent
//!            <-   STX
//! DLE ACK    ->                           data ready
//!            <-   data ... DLE ETX
//! DLE ACK    ->                           data acknowledged
//!            <-   STX
//! DLE ACK    ->
//!            <-   AG_END DLE ETX
//! DLE ACK    ->                           terminated
//! ```
//!
//! Each expected byte is checked; the first mismatch aborts the exchange.

use bytes::Bytes;
use tracing::{debug, trace, warn};

use as511_core::{
    stuff, ControlByte, Error as CoreError, FunctionCode, Pushed, Step, Termination, Unstuffer,
};
use as511_transport::Transport;

use crate::error::{Error, Result};

const DLE_ACK: [u8; 2] = [ControlByte::DLE, ControlByte::ACK];
const DLE_EOT: [u8; 2] = [ControlByte::DLE, ControlByte::EOT];

/// Drives one exchange over a borrowed transport
pub struct Handshake<'a> {
    transport: &'a mut dyn Transport,
}

impl<'a> Handshake<'a> {
    pub fn new(transport: &'a mut dyn Transport) -> Self {
        Self { transport }
    }

    /// Write STX, expect DLE ACK
    pub async fn open_request(&mut self) -> Result<()> {
        debug!("Open request");

        self.send(&[ControlByte::STX]).await?;
        self.expect(Step::OpenRequest, ControlByte::DLE).await?;
        self.expect(Step::OpenRequest, ControlByte::ACK).await
    }

    /// Write the function code
    pub async fn select_function(&mut self, code: FunctionCode) -> Result<()> {
        debug!("Select function {}", code);

        self.send(&[u8::from(code)]).await
    }

    /// Expect STX, acknowledge, expect SYN DLE ETX, acknowledge
    pub async fn await_header_ready(&mut self) -> Result<()> {
        debug!("Await header ready");

        self.expect(Step::AwaitHeaderReady, ControlByte::STX).await?;
        self.send(&DLE_ACK).await?;
        self.expect(Step::AwaitHeaderReady, ControlByte::SYN).await?;
        self.expect(Step::AwaitHeaderReady, ControlByte::DLE).await?;
        self.expect(Step::AwaitHeaderReady, ControlByte::ETX).await?;
        self.send(&DLE_ACK).await
    }

    /// Write header bytes unescaped and close the telegram
    pub async fn send_header(&mut self, header: &[u8]) -> Result<()> {
        debug!("Send header {:02X?}", header);

        self.send_raw(header).await?;
        self.finish_telegram(Step::SendHeader).await
    }

    /// Write bytes verbatim
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<()> {
        self.send(bytes).await
    }

    /// Write a payload with every DLE doubled
    pub async fn send_stuffed(&mut self, payload: &[u8]) -> Result<()> {
        let wire = stuff(payload);
        trace!(wire = %hex::encode(&wire), "Sending data");

        self.send(&wire).await
    }

    /// Write DLE EOT, expect DLE ACK
    pub async fn end_telegram(&mut self) -> Result<()> {
        debug!("End telegram");

        self.finish_telegram(Step::EndTelegram).await
    }

    /// Expect STX, acknowledge
    pub async fn await_data_ready(&mut self) -> Result<()> {
        debug!("Await data ready");

        self.expect(Step::AwaitDataReady, ControlByte::STX).await?;
        self.send(&DLE_ACK).await
    }

    /// Decode the inbound data phase until `termination` holds
    ///
    /// # Errors
    ///
    /// Any transport failure before the frame is complete surfaces as
    /// [`Error::Incomplete`]; a partial frame is never returned. A fixed-size
    /// frame that fills up without its trailer fails with `MissingTrailer`.
    pub async fn receive_frame(&mut self, termination: Termination) -> Result<Bytes> {
        debug!("Receive frame: {}", termination);

        let expected = termination.expected_len();
        let mut unstuffer = Unstuffer::with_capacity(expected);

        loop {
            let byte = match self.transport.read_byte().await {
                Ok(byte) => byte,
                Err(source) => {
                    warn!(
                        received = unstuffer.len(),
                        expected,
                        "Data phase aborted: {}",
                        source
                    );
                    return Err(Error::Incomplete {
                        received: unstuffer.len(),
                        expected,
                        source,
                    });
                }
            };

            if unstuffer.push(byte) != Pushed::Appended {
                continue;
            }

            let decoded = unstuffer.as_bytes();
            if termination.is_complete(decoded) {
                break;
            }

            if termination.is_exhausted(decoded) {
                warn!(frame = %hex::encode(decoded), "Frame full without trailer");
                return Err(CoreError::MissingTrailer {
                    length: decoded.len(),
                }
                .into());
            }
        }

        let frame = unstuffer.into_bytes();
        trace!(len = frame.len(), frame = %hex::encode(&frame), "Received frame");

        Ok(frame)
    }

    /// Acknowledge a received frame
    pub async fn ack_data(&mut self) -> Result<()> {
        debug!("Acknowledge data");

        self.send(&DLE_ACK).await
    }

    /// Expect STX, acknowledge, expect AG_END DLE ETX, acknowledge
    pub async fn terminate(&mut self) -> Result<()> {
        debug!("Terminate");

        self.expect(Step::Terminate, ControlByte::STX).await?;
        self.send(&DLE_ACK).await?;
        self.expect(Step::Terminate, ControlByte::AG_END).await?;
        self.expect(Step::Terminate, ControlByte::DLE).await?;
        self.expect(Step::Terminate, ControlByte::ETX).await?;
        self.send(&DLE_ACK).await
    }

    // Helper methods

    async fn finish_telegram(&mut self, step: Step) -> Result<()> {
        self.send(&DLE_EOT).await?;
        self.expect(step, ControlByte::DLE).await?;
        self.expect(step, ControlByte::ACK).await
    }

    async fn send(&mut self, bytes: &[u8]) -> Result<()> {
        self.transport.write_bytes(bytes).await?;
        Ok(())
    }

    async fn expect(&mut self, step: Step, expected: u8) -> Result<()> {
        let actual = self.transport.read_byte().await?;

        if actual != expected {
            warn!(
                "Unexpected byte during {}: expected 0x{:02X}, got 0x{:02X} ({})",
                step,
                expected,
                actual,
                ControlByte::from_byte(actual).map_or("data", ControlByte::name)
            );
            return Err(CoreError::UnexpectedByte {
                step,
                expected,
                actual,
            }
            .into());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use as511_transport::MemoryTransport;
    use pretty_assertions::assert_eq;

    async fn open(inbound: &[u8]) -> (MemoryTransport, MemoryTransport) {
        let mut transport = MemoryTransport::new().with_inbound(inbound);
        transport.open().await.unwrap();
        let probe = transport.clone();
        (transport, probe)
    }

    #[tokio::test]
    async fn test_open_request() {
        let (mut transport, probe) = open(&[0x10, 0x06]).await;

        Handshake::new(&mut transport).open_request().await.unwrap();

        assert_eq!(&probe.written()[..], &[0x02]);
    }

    #[tokio::test]
    async fn test_open_request_mismatch() {
        let (mut transport, _probe) = open(&[0x10, 0x15]).await;

        let err = Handshake::new(&mut transport).open_request().await.unwrap_err();

        assert_eq!(err.unexpected_byte(), Some((Step::OpenRequest, 0x06, 0x15)));
        assert!(transport.is_open());
    }

    #[tokio::test]
    async fn test_await_header_ready() {
        let (mut transport, probe) = open(&[0x02, 0x16, 0x10, 0x03]).await;

        Handshake::new(&mut transport).await_header_ready().await.unwrap();

        assert_eq!(&probe.written()[..], &[0x10, 0x06, 0x10, 0x06]);
    }

    #[tokio::test]
    async fn test_await_header_ready_stops_at_mismatch() {
        let (mut transport, probe) = open(&[0x02, 0x15, 0x10, 0x03]).await;

        let err = Handshake::new(&mut transport).await_header_ready().await.unwrap_err();

        assert_eq!(err.unexpected_byte(), Some((Step::AwaitHeaderReady, 0x16, 0x15)));
        // only the first acknowledgement went out
        assert_eq!(&probe.written()[..], &[0x10, 0x06]);
        assert_eq!(probe.pending_inbound(), 2);
    }

    #[tokio::test]
    async fn test_send_header_is_not_stuffed() {
        let (mut transport, probe) = open(&[0x10, 0x06]).await;

        Handshake::new(&mut transport).send_header(&[0x10, 0x00]).await.unwrap();

        assert_eq!(&probe.written()[..], &[0x10, 0x00, 0x10, 0x04]);
    }

    #[tokio::test]
    async fn test_send_stuffed() {
        let (mut transport, probe) = open(&[]).await;

        Handshake::new(&mut transport).send_stuffed(&[0x10, 0x20]).await.unwrap();

        assert_eq!(&probe.written()[..], &[0x10, 0x10, 0x20]);
    }

    #[tokio::test]
    async fn test_await_data_ready() {
        let (mut transport, probe) = open(&[0x02]).await;

        Handshake::new(&mut transport).await_data_ready().await.unwrap();

        assert_eq!(&probe.written()[..], &[0x10, 0x06]);
    }

    #[tokio::test]
    async fn test_await_data_ready_mismatch() {
        let (mut transport, probe) = open(&[0x15, 0x02]).await;

        let err = Handshake::new(&mut transport).await_data_ready().await.unwrap_err();

        assert_eq!(err.unexpected_byte(), Some((Step::AwaitDataReady, 0x02, 0x15)));
        assert!(probe.written().is_empty());
        assert_eq!(probe.pending_inbound(), 1);
    }

    #[tokio::test]
    async fn test_end_telegram_mismatch() {
        let (mut transport, _probe) = open(&[0x10, 0x15]).await;

        let err = Handshake::new(&mut transport).end_telegram().await.unwrap_err();

        assert_eq!(err.unexpected_byte(), Some((Step::EndTelegram, 0x06, 0x15)));
    }

    #[tokio::test]
    async fn test_receive_frame_collapses_dle() {
        let mut wire = vec![0x00, 0x00, 0x64];
        wire.extend_from_slice(&[0x10, 0x10, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00]);
        wire.extend_from_slice(&[0x00, 0x0A, 0x10, 0x03]);
        let (mut transport, probe) = open(&wire).await;

        let frame = Handshake::new(&mut transport)
            .receive_frame(Termination::BlockInfo)
            .await
            .unwrap();

        assert_eq!(frame.len(), 15);
        assert_eq!(frame[3], 0x10);
        assert_eq!(frame[4], 0x00);
        assert_eq!(probe.pending_inbound(), 0);
    }

    #[tokio::test]
    async fn test_receive_frame_block_info_without_trailer() {
        let (mut transport, probe) = open(&[0u8; 16]).await;

        let err = Handshake::new(&mut transport)
            .receive_frame(Termination::BlockInfo)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Core(CoreError::MissingTrailer { length: 15 })
        ));
        assert!(err.requires_flush());
        // reading stops at the fixed frame size
        assert_eq!(probe.pending_inbound(), 1);
    }

    #[tokio::test]
    async fn test_receive_frame_stops_at_termination() {
        let mut wire = vec![0u8; 16];
        wire.extend_from_slice(&[0x10, 0x03, 0x02]);
        let (mut transport, probe) = open(&wire).await;

        let frame = Handshake::new(&mut transport)
            .receive_frame(Termination::Read { block_length: 10 })
            .await
            .unwrap();

        assert_eq!(frame.len(), 18);
        // the STX that follows stays for the terminate step
        assert_eq!(probe.pending_inbound(), 1);
    }

    #[tokio::test]
    async fn test_receive_frame_incomplete() {
        let (mut transport, _probe) = open(&[0u8; 17]).await;

        let err = Handshake::new(&mut transport)
            .receive_frame(Termination::Read { block_length: 10 })
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Incomplete {
                received: 17,
                expected: 18,
                source: as511_transport::Error::ReadTimeout
            }
        ));
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_terminate() {
        let (mut transport, probe) = open(&[0x02, 0x12, 0x10, 0x03]).await;

        Handshake::new(&mut transport).terminate().await.unwrap();

        assert_eq!(&probe.written()[..], &[0x10, 0x06, 0x10, 0x06]);
    }

    #[tokio::test]
    async fn test_terminate_requires_ag_end() {
        let (mut transport, _probe) = open(&[0x02, 0x03]).await;

        let err = Handshake::new(&mut transport).terminate().await.unwrap_err();

        assert_eq!(err.unexpected_byte(), Some((Step::Terminate, 0x12, 0x03)));
    }
}
