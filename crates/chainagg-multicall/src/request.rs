//! Call requests and their per-call outcomes.

use chainagg_core::{Address, Bytes, CallParams};
use serde::{Deserialize, Serialize};

/// One contract read to include in a multicall.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallRequest {
    pub address: Address,
    pub data: Bytes,
}

impl CallRequest {
    pub fn new(address: Address, data: Bytes) -> Self {
        Self { address, data }
    }

    pub(crate) fn to_params(&self) -> CallParams {
        CallParams::new(self.address, self.data.clone())
    }
}

/// Outcome of one call inside a multicall.
///
/// Empty return data always counts as a failure: a reverted call and a call
/// that returned nothing cannot be told apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CallResult {
    pub success: bool,
    pub data: Bytes,
}

impl CallResult {
    /// Combine a success flag reported by the aggregator with the returned
    /// data.
    pub fn new(reported_success: bool, data: Bytes) -> Self {
        Self {
            success: reported_success && !data.is_empty(),
            data,
        }
    }

    /// Raw return data with no success flag (individual calls and v1).
    pub fn from_return_data(data: Bytes) -> Self {
        Self::new(true, data)
    }
}
