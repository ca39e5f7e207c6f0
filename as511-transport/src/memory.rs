//! In-memory transport
//!
//! Replays a scripted controller: inbound bytes are queued up front and
//! everything written is recorded. Clones share the same channel, so a test
//! can keep one handle while the other is owned by a `Plc`.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use parking_lot::Mutex;
use tracing::trace;

use crate::{error::*, Transport};

#[derive(Debug, Clone, Default)]
pub struct MemoryTransport {
    inner: Arc<Mutex<MemoryInner>>,
}

#[derive(Debug, Default)]
struct MemoryInner {
    name: String,
    open: bool,

    /// Bytes the controller will send
    inbound: VecDeque<u8>,

    /// Bytes written by the host
    written: BytesMut,

    /// Report `ConnectionClosed` instead of `ReadTimeout` once inbound is empty
    close_when_drained: bool,
}

impl MemoryTransport {
    pub fn new() -> Self {
        Self::named("memory")
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MemoryInner {
                name: name.into(),
                ..MemoryInner::default()
            })),
        }
    }

    /// Queue bytes the controller will answer with
    pub fn with_inbound(self, bytes: &[u8]) -> Self {
        self.push_inbound(bytes);
        self
    }

    /// Treat an exhausted script as a dropped line rather than a silent one
    pub fn closing_when_drained(self) -> Self {
        self.inner.lock().close_when_drained = true;
        self
    }

    pub fn push_inbound(&self, bytes: &[u8]) {
        self.inner.lock().inbound.extend(bytes.iter().copied());
    }

    /// Inbound bytes not consumed yet
    pub fn pending_inbound(&self) -> usize {
        self.inner.lock().inbound.len()
    }

    /// Everything written so far
    pub fn written(&self) -> Bytes {
        Bytes::copy_from_slice(&self.inner.lock().written)
    }

    /// Drain the written bytes
    pub fn take_written(&self) -> Bytes {
        self.inner.lock().written.split().freeze()
    }
}

#[async_trait]
impl Transport for MemoryTransport {
    async fn open(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        if inner.open {
            return Err(Error::AlreadyConnected);
        }
        inner.open = true;
        Ok(())
    }

    async fn close(&mut self) -> Result<()> {
        self.inner.lock().open = false;
        Ok(())
    }

    fn is_open(&self) -> bool {
        self.inner.lock().open
    }

    async fn write_bytes(&mut self, data: &[u8]) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotConnected);
        }

        trace!("Sending {} bytes: {:02X?}", data.len(), data);
        inner.written.extend_from_slice(data);
        Ok(())
    }

    async fn read_byte(&mut self) -> Result<u8> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotConnected);
        }

        match inner.inbound.pop_front() {
            Some(byte) => {
                trace!("Received 0x{:02X}", byte);
                Ok(byte)
            }
            None if inner.close_when_drained => Err(Error::ConnectionClosed),
            None => Err(Error::ReadTimeout),
        }
    }

    fn discard_input(&mut self) -> Result<()> {
        let mut inner = self.inner.lock();
        if !inner.open {
            return Err(Error::NotConnected);
        }
        inner.inbound.clear();
        Ok(())
    }

    fn discard_output(&mut self) -> Result<()> {
        // writes land immediately, nothing is ever queued
        if !self.is_open() {
            return Err(Error::NotConnected);
        }
        Ok(())
    }

    fn port_name(&self) -> String {
        self.inner.lock().name.clone()
    }
}
