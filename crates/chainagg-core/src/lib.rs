//! chainagg-core: foundation types for batched chain reads.
//!
//! # Overview
//!
//! - [`Bytes`]: immutable calldata / return-data value with a canonical hex form
//! - [`BlockTag`]: historical block height or `latest`
//! - [`CallTransport`]: the async `eth_call` capability everything else wraps
//! - [`TransportError`] / [`BytesError`]: structured error types
//! - [`policy`] module: exponential retry, rate limiter, transport decorators

pub mod block;
pub mod bytes;
pub mod error;
pub mod policy;
pub mod transport;

pub use alloy_primitives::Address;
pub use block::BlockTag;
pub use bytes::Bytes;
pub use error::{BytesError, PolicyError, TransportError};
pub use transport::{CallParams, CallTransport};
