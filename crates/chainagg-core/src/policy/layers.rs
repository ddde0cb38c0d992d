//! `CallTransport` decorators that apply the policies around a transport.
//!
//! ```text
//! MulticallClient → [RetryTransport] → [RateLimitedTransport] → [Transport]
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::block::BlockTag;
use crate::bytes::Bytes;
use crate::error::{PolicyError, TransportError};
use crate::policy::rate_limiter::{RateLimiter, RateLimiterConfig};
use crate::policy::retry::{ExponentialRetry, RetryConfig};
use crate::transport::{CallParams, CallTransport};

/// Retries transient (`is_retryable`) transport errors with exponential
/// backoff. Execution errors such as reverts are returned immediately.
pub struct RetryTransport {
    inner: Arc<dyn CallTransport>,
    retry: ExponentialRetry,
}

impl RetryTransport {
    pub fn new(inner: Arc<dyn CallTransport>, config: RetryConfig) -> Self {
        Self {
            inner,
            retry: ExponentialRetry::new(config),
        }
    }
}

#[async_trait]
impl CallTransport for RetryTransport {
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError> {
        self.retry
            .call_when(
                || self.inner.call(params.clone(), block),
                TransportError::is_retryable,
            )
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Routes every call through a shared [`RateLimiter`].
pub struct RateLimitedTransport {
    inner: Arc<dyn CallTransport>,
    limiter: RateLimiter,
}

impl RateLimitedTransport {
    /// Must be called inside a tokio runtime.
    pub fn new(
        inner: Arc<dyn CallTransport>,
        config: RateLimiterConfig,
    ) -> Result<Self, PolicyError> {
        Ok(Self {
            inner,
            limiter: RateLimiter::new(config)?,
        })
    }

    /// Calls waiting for a dispatch slot.
    pub fn pending(&self) -> usize {
        self.limiter.pending()
    }

    /// Drop every call still waiting for a slot. Their futures never
    /// resolve.
    pub fn clear(&self) {
        self.limiter.clear()
    }
}

#[async_trait]
impl CallTransport for RateLimitedTransport {
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError> {
        let inner = self.inner.clone();
        self.limiter
            .call(move || async move { inner.call(params, block).await })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
