//! Handshake step names
//!
//! Every expectation in the handshake is tagged with the step it belongs to,
//! so a mismatch can say where the exchange went wrong.

use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Step {
    OpenRequest,
    AwaitHeaderReady,
    SendHeader,
    AwaitDataReady,
    EndTelegram,
    Terminate,
}

impl Step {
    pub fn name(self) -> &'static str {
        match self {
            Self::OpenRequest => "open request",
            Self::AwaitHeaderReady => "await header ready",
            Self::SendHeader => "send header",
            Self::AwaitDataReady => "await data ready",
            Self::EndTelegram => "end telegram",
            Self::Terminate => "terminate",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
