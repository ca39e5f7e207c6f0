//! High-level error types

use as511_core::Step;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Core protocol error: {0}")]
    Core(#[from] as511_core::Error),
    
    #[error("Transport error: {0}")]
    Transport(#[from] as511_transport::Error),
    
    #[error("Type error: {0}")]
    Types(#[from] as511_types::Error),
    
    #[error("Controller not connected")]
    NotConnected,

    /// Data phase ended before its termination condition was met
    #[error("Incomplete frame: decoded {received} of at least {expected} bytes")]
    Incomplete {
        received: usize,
        expected: usize,
        #[source]
        source: as511_transport::Error,
    },
}

impl Error {
    /// Check if the controller did not answer in time
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout(),
            Self::Incomplete { source, .. } => source.is_timeout(),
            _ => false,
        }
    }

    /// Check if the channel was lost
    pub fn is_closed(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_closed(),
            Self::Incomplete { source, .. } => source.is_closed(),
            Self::NotConnected => true,
            _ => false,
        }
    }

    /// Step at which the controller answered with the wrong byte, if any
    pub fn unexpected_byte(&self) -> Option<(Step, u8, u8)> {
        match self {
            Self::Core(as511_core::Error::UnexpectedByte {
                step,
                expected,
                actual,
            }) => Some((*step, *expected, *actual)),
            _ => None,
        }
    }

    /// Check if the channel must be flushed before the next operation
    ///
    /// Anything that aborted a half-finished exchange leaves stray bytes in
    /// the line buffers.
    pub fn requires_flush(&self) -> bool {
        !matches!(self, Self::NotConnected | Self::Types(_))
    }
}
