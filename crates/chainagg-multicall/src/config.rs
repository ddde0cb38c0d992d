//! Aggregator deployments and batching limits.
//!
//! Thresholds are chain-specific, so each [`MulticallClient`](crate::MulticallClient)
//! owns one `MulticallConfig`. The defaults are the Ethereum mainnet facts.

use alloy_primitives::{address, Address};
use serde::{Deserialize, Serialize};

/// Multicall (v1) on Ethereum mainnet.
pub const MULTICALL_V1_ADDRESS: Address = address!("eefba1e63905ef1d7acba5a8513c70307c1ce441");
/// First mainnet block at which the v1 aggregator exists.
pub const MULTICALL_V1_BLOCK: u64 = 7_929_876;
/// Multicall2 on Ethereum mainnet.
pub const MULTICALL_V2_ADDRESS: Address = address!("5ba1e12693dc8f9c48aad8770482f4739beed696");
/// First mainnet block at which the v2 aggregator exists.
pub const MULTICALL_V2_BLOCK: u64 = 12_336_033;
/// Maximum calls packed into one aggregated invocation.
pub const MULTICALL_BATCH_SIZE: usize = 150;

/// Where an aggregator contract lives and since when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorDeployment {
    pub address: Address,
    pub deploy_block: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticallConfig {
    pub v1: AggregatorDeployment,
    pub v2: AggregatorDeployment,
    /// Maximum calls per aggregated invocation (and per concurrent group in
    /// individual mode).
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
}

fn default_batch_size() -> usize { MULTICALL_BATCH_SIZE }

impl MulticallConfig {
    /// Ethereum mainnet deployments.
    pub fn mainnet() -> Self {
        Self {
            v1: AggregatorDeployment {
                address: MULTICALL_V1_ADDRESS,
                deploy_block: MULTICALL_V1_BLOCK,
            },
            v2: AggregatorDeployment {
                address: MULTICALL_V2_ADDRESS,
                deploy_block: MULTICALL_V2_BLOCK,
            },
            batch_size: MULTICALL_BATCH_SIZE,
        }
    }

    /// Same deployments, different chunk size. Zero is treated as one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}

impl Default for MulticallConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}
