//! HTTP `eth_call` transport backed by `reqwest`.
//!
//! This client does one thing: send a single `eth_call` and hand back the raw
//! return data. Retry and rate limiting are layered on top with the
//! decorators in `chainagg_core::policy`.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use chainagg_core::{BlockTag, Bytes, CallParams, CallTransport, TransportError};

use crate::rpc::{JsonRpcRequest, JsonRpcResponse};

/// Configuration for [`EthCallClient`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpClientConfig {
    /// Timeout per HTTP request, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub request_timeout_ms: u64,
}

fn default_timeout_ms() -> u64 { 30_000 }

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            request_timeout_ms: default_timeout_ms(),
        }
    }
}

/// JSON-RPC `eth_call` client for one endpoint.
pub struct EthCallClient {
    url: String,
    http: reqwest::Client,
    request_timeout: Duration,
    next_id: AtomicU64,
}

impl EthCallClient {
    /// Create a new client for the given JSON-RPC endpoint URL.
    pub fn new(url: impl Into<String>, config: HttpClientConfig) -> Result<Self, TransportError> {
        let request_timeout = Duration::from_millis(config.request_timeout_ms);
        let http = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|e| TransportError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            http,
            request_timeout,
            next_id: AtomicU64::new(1),
        })
    }

    /// Create with default configuration.
    pub fn default_for(url: impl Into<String>) -> Result<Self, TransportError> {
        Self::new(url, HttpClientConfig::default())
    }

    async fn send(&self, req: &JsonRpcRequest) -> Result<JsonRpcResponse, TransportError> {
        let resp = self
            .http
            .post(&self.url)
            .json(req)
            .send()
            .await
            .map_err(|e| self.map_reqwest(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(TransportError::Http(format!("HTTP {status}: {body}")));
        }

        resp.json::<JsonRpcResponse>()
            .await
            .map_err(|e| TransportError::Deserialization(e.to_string()))
    }

    fn map_reqwest(&self, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout {
                ms: self.request_timeout.as_millis() as u64,
            }
        } else {
            TransportError::Http(e.to_string())
        }
    }
}

/// Turn an `eth_call` response into raw return data.
pub fn parse_call_result(resp: JsonRpcResponse) -> Result<Bytes, TransportError> {
    let value = resp.into_result().map_err(|e| TransportError::Rpc {
        code: e.code,
        message: e.message,
    })?;
    match value {
        Value::String(s) => {
            Bytes::from_hex(&s).map_err(|e| TransportError::Deserialization(e.to_string()))
        }
        other => Err(TransportError::Deserialization(format!(
            "expected hex string result, got {other}"
        ))),
    }
}

#[async_trait]
impl CallTransport for EthCallClient {
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let req = JsonRpcRequest::eth_call(id, &params, block);
        tracing::trace!(id, to = %params.to, %block, url = %self.url, "eth_call");

        let resp = self.send(&req).await?;
        parse_call_result(resp)
    }

    fn name(&self) -> &str {
        &self.url
    }
}
