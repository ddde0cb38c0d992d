//! Multicall error type.

use chainagg_core::TransportError;
use thiserror::Error;

use crate::mode::MulticallMode;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MulticallError {
    /// The injected transport failed; the error is passed through as-is.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The aggregator response does not have the shape the selected
    /// protocol version promises. Never retried.
    #[error("cannot decode {mode} multicall response: {reason}")]
    Decode { mode: MulticallMode, reason: String },
}

impl MulticallError {
    pub(crate) fn decode(mode: MulticallMode, reason: impl Into<String>) -> Self {
        Self::Decode {
            mode,
            reason: reason.into(),
        }
    }

    /// The transport error, if this failure came from the transport.
    pub fn as_transport(&self) -> Option<&TransportError> {
        match self {
            Self::Transport(e) => Some(e),
            Self::Decode { .. } => None,
        }
    }
}
