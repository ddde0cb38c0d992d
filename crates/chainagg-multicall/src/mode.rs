//! Protocol selection by block height.

use std::fmt;

use chainagg_core::BlockTag;
use serde::{Deserialize, Serialize};

use crate::config::MulticallConfig;

/// How a chunk of calls is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MulticallMode {
    /// No aggregator deployed yet: one `eth_call` per request.
    Individual,
    /// `aggregate`: no per-call success flag.
    V1,
    /// `tryAggregate(false, ..)`: per-call success flag.
    V2,
}

impl MulticallMode {
    /// Pick the mode for `block`. Thresholds are inclusive toward the newer
    /// mode and `latest` always selects v2.
    pub fn for_block(block: BlockTag, config: &MulticallConfig) -> Self {
        if block >= BlockTag::Number(config.v2.deploy_block) {
            Self::V2
        } else if block >= BlockTag::Number(config.v1.deploy_block) {
            Self::V1
        } else {
            Self::Individual
        }
    }
}

impl fmt::Display for MulticallMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Individual => write!(f, "individual"),
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MULTICALL_V1_BLOCK, MULTICALL_V2_BLOCK};

    fn mode(block: BlockTag) -> MulticallMode {
        MulticallMode::for_block(block, &MulticallConfig::mainnet())
    }

    #[test]
    fn boundaries_are_inclusive_toward_newer_mode() {
        assert_eq!(mode(BlockTag::Number(0)), MulticallMode::Individual);
        assert_eq!(mode(BlockTag::Number(MULTICALL_V1_BLOCK - 1)), MulticallMode::Individual);
        assert_eq!(mode(BlockTag::Number(MULTICALL_V1_BLOCK)), MulticallMode::V1);
        assert_eq!(mode(BlockTag::Number(MULTICALL_V2_BLOCK - 1)), MulticallMode::V1);
        assert_eq!(mode(BlockTag::Number(MULTICALL_V2_BLOCK)), MulticallMode::V2);
        assert_eq!(mode(BlockTag::Number(u64::MAX)), MulticallMode::V2);
    }

    #[test]
    fn latest_uses_v2() {
        assert_eq!(mode(BlockTag::Latest), MulticallMode::V2);
    }

    #[test]
    fn display_names() {
        assert_eq!(MulticallMode::Individual.to_string(), "individual");
        assert_eq!(MulticallMode::V2.to_string(), "v2");
    }
}
