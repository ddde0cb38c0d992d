//! The `CallTransport` trait: the injected read-only call capability.

use std::sync::Arc;

use alloy_primitives::Address;
use async_trait::async_trait;

use crate::block::BlockTag;
use crate::bytes::Bytes;
use crate::error::TransportError;

/// Parameters of one `eth_call`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallParams {
    pub to: Address,
    pub data: Bytes,
}

impl CallParams {
    pub fn new(to: Address, data: Bytes) -> Self {
        Self { to, data }
    }
}

/// Performs a single read-only contract call against historical chain state.
///
/// Everything above this trait (batching, retry, rate limiting) treats it as
/// opaque: errors are propagated exactly as returned.
///
/// # Object Safety
/// The trait is object-safe and can be stored as `Arc<dyn CallTransport>`.
#[async_trait]
pub trait CallTransport: Send + Sync + 'static {
    /// Execute `params` at `block` and return the raw return data.
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError>;

    /// The transport's identifier (URL or name), used in log fields.
    fn name(&self) -> &str {
        "transport"
    }
}

#[async_trait]
impl<T: CallTransport + ?Sized> CallTransport for Arc<T> {
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError> {
        (**self).call(params, block).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
