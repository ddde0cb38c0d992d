//! chainagg-http: `eth_call` over HTTP JSON-RPC.
//!
//! [`EthCallClient`] implements [`CallTransport`](chainagg_core::CallTransport)
//! so it can be handed straight to a multicall client, optionally wrapped in
//! the retry / rate-limit decorators first.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use chainagg_core::policy::{RetryConfig, RetryTransport};
//! use chainagg_http::EthCallClient;
//!
//! let client = Arc::new(EthCallClient::default_for("https://rpc.example.com").unwrap());
//! let transport = RetryTransport::new(client, RetryConfig::default());
//! ```

pub mod client;
pub mod rpc;

pub use client::{parse_call_result, EthCallClient, HttpClientConfig};
pub use rpc::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, RpcId};
