//! Error types shared by every chainagg crate.

use thiserror::Error;

/// Errors raised while constructing or reading a [`Bytes`](crate::Bytes) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytesError {
    /// Malformed hex input (odd length or a non-hex character).
    #[error("invalid hex '{input}': {reason}")]
    Format { input: String, reason: String },

    /// A numeric input does not fit the target representation.
    #[error("value out of range: {0}")]
    Range(String),

    /// Out-of-bounds byte access.
    #[error("index {index} out of bounds for length {len}")]
    Index { index: usize, len: usize },
}

/// Errors that can occur while performing a single read-only chain call.
///
/// The batching layer never inspects these; they are handed back to the
/// caller exactly as the transport produced them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, bad status, etc.).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC error object returned by the node.
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized.
    #[error("Deserialization error: {0}")]
    Deserialization(String),

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if this error is retryable (transient).
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Returns `true` if this is a node-side execution error (not retryable).
    pub fn is_execution_error(&self) -> bool {
        matches!(self, Self::Rpc { .. })
    }
}

impl From<serde_json::Error> for TransportError {
    fn from(e: serde_json::Error) -> Self {
        Self::Deserialization(e.to_string())
    }
}

/// Invalid retry / rate-limit configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("calls_per_minute must be greater than zero")]
    ZeroRate,
}
