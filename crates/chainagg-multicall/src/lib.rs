//! chainagg-multicall: batch many contract reads into few `eth_call`s.
//!
//! # Overview
//!
//! - [`MulticallClient`]: chunked, order-preserving multicall over any
//!   [`CallTransport`](chainagg_core::CallTransport)
//! - [`MulticallMode`]: individual / v1 / v2, chosen from the block tag
//! - [`MulticallConfig`]: aggregator deployments and batch size per chain
//! - [`abi`]: the fixed `aggregate` / `tryAggregate` encoding
//!
//! ```no_run
//! use std::sync::Arc;
//! use chainagg_core::{Address, BlockTag, Bytes, CallTransport};
//! use chainagg_multicall::{CallRequest, MulticallClient};
//!
//! # async fn run(transport: Arc<dyn CallTransport>) -> Result<(), Box<dyn std::error::Error>> {
//! let client = MulticallClient::mainnet(transport);
//! let results = client
//!     .multicall(
//!         &[CallRequest::new(Address::ZERO, Bytes::from_hex("0x18160ddd")?)],
//!         BlockTag::Latest,
//!     )
//!     .await?;
//! println!("success: {}", results[0].success);
//! # Ok(())
//! # }
//! ```

pub mod abi;
pub mod client;
pub mod config;
pub mod error;
pub mod mode;
pub mod request;

pub use client::MulticallClient;
pub use config::{
    AggregatorDeployment, MulticallConfig, MULTICALL_BATCH_SIZE, MULTICALL_V1_ADDRESS,
    MULTICALL_V1_BLOCK, MULTICALL_V2_ADDRESS, MULTICALL_V2_BLOCK,
};
pub use error::MulticallError;
pub use mode::MulticallMode;
pub use request::{CallRequest, CallResult};
