//! CLI configuration file (JSON). Every section is optional.
//!
//! ```json
//! {
//!   "rpc_url": "https://cloudflare-eth.com",
//!   "retry": { "start_timeout_ms": 500, "max_retry_count": 5 },
//!   "rate_limit": { "calls_per_minute": 300 },
//!   "log": { "level": "debug" }
//! }
//! ```

use std::path::Path;

use anyhow::Context;
use chainagg_core::policy::{RateLimiterConfig, RetryConfig};
use chainagg_http::HttpClientConfig;
use chainagg_multicall::MulticallConfig;
use serde::{Deserialize, Serialize};

use crate::logging::LogConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub rpc_url: Option<String>,
    #[serde(default)]
    pub multicall: MulticallConfig,
    /// `None` disables retrying.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    /// `None` disables rate limiting.
    #[serde(default)]
    pub rate_limit: Option<RateLimiterConfig>,
    #[serde(default)]
    pub http: HttpClientConfig,
    #[serde(default)]
    pub log: LogConfig,
}

impl CliConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config: CliConfig = serde_json::from_str("{}").unwrap();
        assert!(config.rpc_url.is_none());
        assert!(config.retry.is_none());
        assert!(config.rate_limit.is_none());
        assert_eq!(config.multicall, MulticallConfig::mainnet());
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn sections_are_parsed() {
        let config: CliConfig = serde_json::from_str(
            r#"{
                "rpc_url": "http://localhost:8545",
                "retry": { "start_timeout_ms": 250, "max_retry_count": null },
                "rate_limit": { "calls_per_minute": 120 },
                "multicall": {
                    "v1": { "address": "0x1111111111111111111111111111111111111111", "deploy_block": 1 },
                    "v2": { "address": "0x2222222222222222222222222222222222222222", "deploy_block": 2 },
                    "batch_size": 50
                }
            }"#,
        )
        .unwrap();
        assert_eq!(config.rpc_url.as_deref(), Some("http://localhost:8545"));
        let retry = config.retry.unwrap();
        assert_eq!(retry.start_timeout_ms, 250);
        assert_eq!(retry.max_retry_count, None);
        assert_eq!(config.rate_limit.unwrap().calls_per_minute, 120);
        assert_eq!(config.multicall.batch_size, 50);
    }
}
