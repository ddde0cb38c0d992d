//! Version-aware multicall client.
//!
//! Requests are split into chunks of at most `batch_size`. Each chunk becomes
//! one aggregated `eth_call` (v1 / v2) or, before any aggregator existed,
//! `batch_size` concurrent individual calls. Results come back in request
//! order.
//!
//! The client never retries and never throttles: wrap the transport in
//! [`RetryTransport`](chainagg_core::policy::RetryTransport) /
//! [`RateLimitedTransport`](chainagg_core::policy::RateLimitedTransport)
//! for that.

use std::hash::Hash;
use std::sync::Arc;

use chainagg_core::{Address, BlockTag, Bytes, CallParams, CallTransport};
use futures::future::try_join_all;
use indexmap::IndexMap;

use crate::abi;
use crate::config::MulticallConfig;
use crate::error::MulticallError;
use crate::mode::MulticallMode;
use crate::request::{CallRequest, CallResult};

pub struct MulticallClient {
    transport: Arc<dyn CallTransport>,
    config: MulticallConfig,
}

impl MulticallClient {
    pub fn new(transport: Arc<dyn CallTransport>, config: MulticallConfig) -> Self {
        Self { transport, config }
    }

    /// Client using the Ethereum mainnet aggregator deployments.
    pub fn mainnet(transport: Arc<dyn CallTransport>) -> Self {
        Self::new(transport, MulticallConfig::mainnet())
    }

    pub fn config(&self) -> &MulticallConfig {
        &self.config
    }

    /// The protocol used for calls at `block`.
    pub fn mode(&self, block: BlockTag) -> MulticallMode {
        MulticallMode::for_block(block, &self.config)
    }

    /// Execute `requests` at `block`. The result has the same length and
    /// order as `requests`. Any transport failure fails the whole call.
    pub async fn multicall(
        &self,
        requests: &[CallRequest],
        block: BlockTag,
    ) -> Result<Vec<CallResult>, MulticallError> {
        if requests.is_empty() {
            return Ok(Vec::new());
        }
        let mode = self.mode(block);
        let batch_size = self.config.batch_size.max(1);
        tracing::debug!(
            calls = requests.len(),
            chunks = requests.len().div_ceil(batch_size),
            %mode,
            %block,
            transport = self.transport.name(),
            "multicall"
        );

        let chunks = requests
            .chunks(batch_size)
            .map(|chunk| self.execute_chunk(mode, chunk, block));
        let results = try_join_all(chunks).await?;
        Ok(results.into_iter().flatten().collect())
    }

    /// Named variant of [`multicall`](Self::multicall): results keep the
    /// keys (and key order) of `requests`.
    pub async fn multicall_named<K>(
        &self,
        requests: IndexMap<K, CallRequest>,
        block: BlockTag,
    ) -> Result<IndexMap<K, CallResult>, MulticallError>
    where
        K: Hash + Eq,
    {
        let (names, calls): (Vec<K>, Vec<CallRequest>) = requests.into_iter().unzip();
        let results = self.multicall(&calls, block).await?;
        Ok(names.into_iter().zip(results).collect())
    }

    async fn execute_chunk(
        &self,
        mode: MulticallMode,
        chunk: &[CallRequest],
        block: BlockTag,
    ) -> Result<Vec<CallResult>, MulticallError> {
        match mode {
            MulticallMode::Individual => {
                let calls = chunk
                    .iter()
                    .map(|req| self.transport.call(req.to_params(), block));
                let raw = try_join_all(calls).await?;
                Ok(raw.into_iter().map(CallResult::from_return_data).collect())
            }
            MulticallMode::V1 => {
                let raw = self
                    .aggregate(self.config.v1.address, abi::encode_v1(chunk), block)
                    .await?;
                abi::decode_v1(&raw, chunk.len())
            }
            MulticallMode::V2 => {
                let raw = self
                    .aggregate(self.config.v2.address, abi::encode_v2(chunk), block)
                    .await?;
                abi::decode_v2(&raw, chunk.len())
            }
        }
    }

    async fn aggregate(
        &self,
        aggregator: Address,
        data: Bytes,
        block: BlockTag,
    ) -> Result<Bytes, MulticallError> {
        let raw = self
            .transport
            .call(CallParams::new(aggregator, data), block)
            .await?;
        tracing::trace!(%aggregator, response_len = raw.len(), "aggregate call returned");
        Ok(raw)
    }
}
