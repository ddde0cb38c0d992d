//! Fixed ABI of the two aggregator versions.
//!
//! - v1: `aggregate((address,bytes)[]) returns (uint256, bytes[])`
//! - v2: `tryAggregate(bool, (address,bytes)[]) returns ((bool,bytes)[])`
//!
//! Besides the call encoders and response decoders the client needs, the
//! inverse directions are public too so fixtures and mock aggregators can be
//! built from the same definitions.

use alloy_primitives::U256;
use alloy_sol_types::{sol, SolCall, SolValue};
use chainagg_core::Bytes;

use crate::error::MulticallError;
use crate::mode::MulticallMode;
use crate::request::{CallRequest, CallResult};

sol! {
    struct Call {
        address target;
        bytes callData;
    }

    struct TryResult {
        bool success;
        bytes returnData;
    }

    function aggregate(Call[] calls) returns (uint256 blockNumber, bytes[] returnData);

    function tryAggregate(bool requireSuccess, Call[] calls) returns (TryResult[] returnData);
}

fn to_calls(requests: &[CallRequest]) -> Vec<Call> {
    requests
        .iter()
        .map(|r| Call {
            target: r.address,
            callData: r.data.clone().into(),
        })
        .collect()
}

fn from_calls(calls: Vec<Call>) -> Vec<CallRequest> {
    calls
        .into_iter()
        .map(|c| CallRequest::new(c.target, c.callData.into()))
        .collect()
}

/// Calldata for `aggregate(calls)`.
pub fn encode_v1(requests: &[CallRequest]) -> Bytes {
    let call = aggregateCall {
        calls: to_calls(requests),
    };
    call.abi_encode().into()
}

/// Calldata for `tryAggregate(false, calls)`.
pub fn encode_v2(requests: &[CallRequest]) -> Bytes {
    let call = tryAggregateCall {
        requireSuccess: false,
        calls: to_calls(requests),
    };
    call.abi_encode().into()
}

/// Decode an `aggregate` response into exactly `expected` results.
pub fn decode_v1(data: &Bytes, expected: usize) -> Result<Vec<CallResult>, MulticallError> {
    let decoded = aggregateCall::abi_decode_returns(data.as_slice(), true)
        .map_err(|e| MulticallError::decode(MulticallMode::V1, e.to_string()))?;
    check_len(MulticallMode::V1, decoded.returnData.len(), expected)?;
    Ok(decoded
        .returnData
        .into_iter()
        .map(|d| CallResult::from_return_data(d.into()))
        .collect())
}

/// Decode a `tryAggregate` response into exactly `expected` results.
pub fn decode_v2(data: &Bytes, expected: usize) -> Result<Vec<CallResult>, MulticallError> {
    let decoded = tryAggregateCall::abi_decode_returns(data.as_slice(), true)
        .map_err(|e| MulticallError::decode(MulticallMode::V2, e.to_string()))?;
    check_len(MulticallMode::V2, decoded.returnData.len(), expected)?;
    Ok(decoded
        .returnData
        .into_iter()
        .map(|r| CallResult::new(r.success, r.returnData.into()))
        .collect())
}

fn check_len(mode: MulticallMode, got: usize, expected: usize) -> Result<(), MulticallError> {
    if got != expected {
        return Err(MulticallError::decode(
            mode,
            format!("expected {expected} results, got {got}"),
        ));
    }
    Ok(())
}

/// Recover the requests packed into `aggregate` calldata.
pub fn decode_v1_calls(data: &Bytes) -> Result<Vec<CallRequest>, MulticallError> {
    aggregateCall::abi_decode(data.as_slice(), true)
        .map(|c| from_calls(c.calls))
        .map_err(|e| MulticallError::decode(MulticallMode::V1, e.to_string()))
}

/// Recover the requests packed into `tryAggregate` calldata.
pub fn decode_v2_calls(data: &Bytes) -> Result<Vec<CallRequest>, MulticallError> {
    tryAggregateCall::abi_decode(data.as_slice(), true)
        .map(|c| from_calls(c.calls))
        .map_err(|e| MulticallError::decode(MulticallMode::V2, e.to_string()))
}

/// Return data an `aggregate` call would produce.
pub fn encode_v1_return(block_number: u64, return_data: &[Bytes]) -> Bytes {
    let data: Vec<alloy_primitives::Bytes> =
        return_data.iter().cloned().map(Into::into).collect();
    (U256::from(block_number), data).abi_encode_params().into()
}

/// Return data a `tryAggregate` call would produce.
pub fn encode_v2_return(results: &[(bool, Bytes)]) -> Bytes {
    let entries: Vec<(bool, alloy_primitives::Bytes)> = results
        .iter()
        .map(|(ok, data)| (*ok, data.clone().into()))
        .collect();
    (entries,).abi_encode_params().into()
}
