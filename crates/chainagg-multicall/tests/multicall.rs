//! End-to-end behaviour of `MulticallClient` against a scripted transport.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use alloy_primitives::U256;
use async_trait::async_trait;
use chainagg_core::policy::{RetryConfig, RetryTransport};
use chainagg_core::{Address, BlockTag, Bytes, CallParams, CallTransport, TransportError};
use chainagg_multicall::{
    abi, AggregatorDeployment, CallRequest, CallResult, MulticallClient, MulticallConfig,
    MulticallError, MulticallMode, MULTICALL_BATCH_SIZE, MULTICALL_V1_ADDRESS, MULTICALL_V1_BLOCK,
    MULTICALL_V2_ADDRESS, MULTICALL_V2_BLOCK,
};
use indexmap::IndexMap;

// ─── Helpers ──────────────────────────────────────────────────────────────────

type Responder = dyn Fn(&CallParams, BlockTag) -> Result<Bytes, TransportError> + Send + Sync;

/// Records every call and answers with a scripted responder.
struct MockTransport {
    calls: Mutex<Vec<(CallParams, BlockTag)>>,
    respond: Box<Responder>,
}

impl MockTransport {
    fn new(
        respond: impl Fn(&CallParams, BlockTag) -> Result<Bytes, TransportError> + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            respond: Box::new(respond),
        })
    }

    fn calls(&self) -> Vec<(CallParams, BlockTag)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CallTransport for MockTransport {
    async fn call(&self, params: CallParams, block: BlockTag) -> Result<Bytes, TransportError> {
        self.calls.lock().unwrap().push((params.clone(), block));
        (self.respond)(&params, block)
    }

    fn name(&self) -> &str {
        "mock"
    }
}

fn hex(s: &str) -> Bytes {
    Bytes::from_hex(s).unwrap()
}

fn address_a() -> Address {
    Address::repeat_byte(0xaa)
}

fn address_b() -> Address {
    Address::repeat_byte(0xbb)
}

fn address_c() -> Address {
    Address::repeat_byte(0xcc)
}

fn three_requests() -> Vec<CallRequest> {
    vec![
        CallRequest::new(address_a(), hex("0x123456")),
        CallRequest::new(address_b(), hex("0x")),
        CallRequest::new(address_c(), hex("0xdeadbeef")),
    ]
}

fn ok(data: &str) -> CallResult {
    CallResult { success: true, data: hex(data) }
}

fn failed(data: &str) -> CallResult {
    CallResult { success: false, data: hex(data) }
}

// ─── Mode selection ───────────────────────────────────────────────────────────

#[tokio::test]
async fn falls_back_to_individual_requests_for_old_blocks() {
    let transport = MockTransport::new(|params, _| Ok(params.data.clone()));
    let client = MulticallClient::mainnet(transport.clone());
    let block = BlockTag::Number(MULTICALL_V1_BLOCK - 1);

    let results = client.multicall(&three_requests(), block).await.unwrap();

    assert_eq!(results, vec![ok("0x123456"), failed("0x"), ok("0xdeadbeef")]);
    let expected: Vec<_> = three_requests()
        .into_iter()
        .map(|r| (CallParams::new(r.address, r.data), block))
        .collect();
    assert_eq!(transport.calls(), expected);
}

#[tokio::test]
async fn uses_v1_for_blocks_without_v2() {
    let transport = MockTransport::new(|_, block| {
        let n = block.number().unwrap_or_default();
        Ok(abi::encode_v1_return(n, &[hex("0x12"), hex("0x0f00"), hex("0x")]))
    });
    let client = MulticallClient::mainnet(transport.clone());
    let block = BlockTag::Number(MULTICALL_V2_BLOCK - 1);

    let results = client.multicall(&three_requests(), block).await.unwrap();

    assert_eq!(results, vec![ok("0x12"), ok("0x0f00"), failed("0x")]);
    assert_eq!(
        transport.calls(),
        vec![(
            CallParams::new(MULTICALL_V1_ADDRESS, abi::encode_v1(&three_requests())),
            block
        )]
    );
}

#[tokio::test]
async fn uses_v2_for_new_blocks() {
    let transport = MockTransport::new(|_, _| {
        Ok(abi::encode_v2_return(&[
            (true, hex("0x12")),
            (false, hex("0x0f00")),
            (true, hex("0x")),
        ]))
    });
    let client = MulticallClient::mainnet(transport.clone());
    let block = BlockTag::Number(MULTICALL_V2_BLOCK + 1);

    let results = client.multicall(&three_requests(), block).await.unwrap();

    assert_eq!(results, vec![ok("0x12"), failed("0x0f00"), failed("0x")]);
    assert_eq!(
        transport.calls(),
        vec![(
            CallParams::new(MULTICALL_V2_ADDRESS, abi::encode_v2(&three_requests())),
            block
        )]
    );
}

#[tokio::test]
async fn latest_uses_v2() {
    let transport = MockTransport::new(|_, _| Ok(abi::encode_v2_return(&[(true, hex("0x01"))])));
    let client = MulticallClient::mainnet(transport.clone());

    assert_eq!(client.mode(BlockTag::Latest), MulticallMode::V2);
    let results = client
        .multicall(&[CallRequest::new(address_a(), hex("0x1234"))], BlockTag::Latest)
        .await
        .unwrap();

    assert_eq!(results, vec![ok("0x01")]);
    assert_eq!(transport.calls()[0].0.to, MULTICALL_V2_ADDRESS);
}

#[tokio::test]
async fn thresholds_come_from_the_instance_config() {
    let config = MulticallConfig {
        v1: AggregatorDeployment { address: Address::repeat_byte(0x01), deploy_block: 100 },
        v2: AggregatorDeployment { address: Address::repeat_byte(0x02), deploy_block: 200 },
        batch_size: 10,
    };
    let transport = MockTransport::new(|_, _| Ok(abi::encode_v1_return(150, &[hex("0xff")])));
    let client = MulticallClient::new(transport.clone(), config);

    let results = client
        .multicall(&[CallRequest::new(address_a(), hex("0x00"))], BlockTag::Number(150))
        .await
        .unwrap();

    assert_eq!(results, vec![ok("0xff")]);
    assert_eq!(transport.calls()[0].0.to, Address::repeat_byte(0x01));
    assert_eq!(client.mode(BlockTag::Number(99)), MulticallMode::Individual);
    assert_eq!(client.mode(BlockTag::Number(200)), MulticallMode::V2);
    assert_eq!(client.config().batch_size, 10);
}

// ─── Chunking ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn batches_calls_in_chunks_of_batch_size() {
    // Echo every packed call's calldata back as its return data so the
    // final ordering can be checked.
    let transport = MockTransport::new(|params, _| {
        let calls = abi::decode_v2_calls(&params.data).expect("v2 calldata");
        let echoed: Vec<_> = calls.into_iter().map(|c| (true, c.data)).collect();
        Ok(abi::encode_v2_return(&echoed))
    });
    let client = MulticallClient::mainnet(transport.clone());
    let block = BlockTag::Number(MULTICALL_V2_BLOCK + 1);

    let count = MULTICALL_BATCH_SIZE * 2 + 1;
    let requests: Vec<_> = (0..count)
        .map(|i| CallRequest::new(address_a(), Bytes::from_number(U256::from(i as u64 + 1))))
        .collect();

    let results = client.multicall(&requests, block).await.unwrap();

    assert_eq!(results.len(), count);
    for (request, result) in requests.iter().zip(&results) {
        assert_eq!(result.data, request.data);
        assert!(result.success);
    }
    let sizes: Vec<usize> = transport
        .calls()
        .iter()
        .map(|(params, _)| abi::decode_v2_calls(&params.data).unwrap().len())
        .collect();
    assert_eq!(sizes, vec![MULTICALL_BATCH_SIZE, MULTICALL_BATCH_SIZE, 1]);
}

#[tokio::test]
async fn short_chunk_is_still_one_call() {
    let transport = MockTransport::new(|_, _| {
        Ok(abi::encode_v1_return(1, &[hex("0x01"), hex("0x02"), hex("0x03")]))
    });
    let client = MulticallClient::mainnet(transport.clone());

    client
        .multicall(&three_requests(), BlockTag::Number(MULTICALL_V1_BLOCK))
        .await
        .unwrap();

    assert_eq!(transport.calls().len(), 1);
}

#[tokio::test]
async fn individual_mode_issues_one_call_per_request_across_chunks() {
    let transport = MockTransport::new(|params, _| Ok(params.data.clone()));
    let client = MulticallClient::new(transport.clone(), MulticallConfig::mainnet().with_batch_size(2));

    let results = client
        .multicall(&three_requests(), BlockTag::Number(0))
        .await
        .unwrap();

    assert_eq!(results, vec![ok("0x123456"), failed("0x"), ok("0xdeadbeef")]);
    assert_eq!(transport.calls().len(), 3);
}

#[tokio::test]
async fn no_requests_means_no_calls() {
    let transport = MockTransport::new(|_, _| panic!("must not be called"));
    let client = MulticallClient::mainnet(transport.clone());

    let results = client.multicall(&[], BlockTag::Latest).await.unwrap();

    assert!(results.is_empty());
    assert!(transport.calls().is_empty());
}

// ─── Named interface ──────────────────────────────────────────────────────────

#[tokio::test]
async fn offers_a_named_interface() {
    let transport = MockTransport::new(|_, _| {
        Ok(abi::encode_v2_return(&[(true, hex("0x1234")), (false, hex("0xdead"))]))
    });
    let client = MulticallClient::mainnet(transport);

    let mut requests = IndexMap::new();
    requests.insert("foo", CallRequest::new(address_a(), hex("0x123456")));
    requests.insert("bar", CallRequest::new(address_b(), hex("0x")));

    let results = client
        .multicall_named(requests, BlockTag::Number(MULTICALL_V2_BLOCK + 1))
        .await
        .unwrap();

    let keys: Vec<_> = results.keys().copied().collect();
    assert_eq!(keys, vec!["foo", "bar"]);
    assert_eq!(results["foo"], ok("0x1234"));
    assert_eq!(results["bar"], failed("0xdead"));
}

// ─── Failures ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn transport_errors_fail_the_whole_call_unchanged() {
    let boom = TransportError::Http("HTTP 503: upstream unavailable".into());
    let expected = boom.clone();
    let transport = MockTransport::new(move |params, _| {
        if params.to == address_b() {
            Err(boom.clone())
        } else {
            Ok(params.data.clone())
        }
    });
    let client = MulticallClient::mainnet(transport);

    let err = client
        .multicall(&three_requests(), BlockTag::Number(1))
        .await
        .unwrap_err();

    assert_eq!(err, MulticallError::Transport(expected.clone()));
    assert_eq!(err.as_transport(), Some(&expected));
}

#[tokio::test]
async fn malformed_aggregator_response_is_a_decode_error() {
    let transport = MockTransport::new(|_, _| Ok(hex("0xdeadbeef")));
    let client = MulticallClient::mainnet(transport);

    let err = client
        .multicall(&three_requests(), BlockTag::Latest)
        .await
        .unwrap_err();

    assert!(matches!(err, MulticallError::Decode { mode: MulticallMode::V2, .. }));
    assert!(err.as_transport().is_none());
}

#[tokio::test]
async fn result_count_mismatch_is_a_decode_error() {
    let transport = MockTransport::new(|_, _| Ok(abi::encode_v1_return(1, &[hex("0x01")])));
    let client = MulticallClient::mainnet(transport);

    let err = client
        .multicall(&three_requests(), BlockTag::Number(MULTICALL_V1_BLOCK))
        .await
        .unwrap_err();

    assert!(matches!(err, MulticallError::Decode { mode: MulticallMode::V1, .. }));
}

// ─── Composition ──────────────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn retry_is_composed_around_the_transport() {
    let attempts = Arc::new(Mutex::new(0u32));
    let counter = attempts.clone();
    let flaky = MockTransport::new(move |_, _| {
        let mut n = counter.lock().unwrap();
        *n += 1;
        if *n < 3 {
            Err(TransportError::Timeout { ms: 1_000 })
        } else {
            Ok(abi::encode_v2_return(&[(true, hex("0xaa")), (true, hex("0xbb")), (true, hex("0xcc"))]))
        }
    });
    let transport = Arc::new(RetryTransport::new(
        flaky,
        RetryConfig::new(Duration::from_millis(100), Some(5)),
    ));
    let client = MulticallClient::mainnet(transport);

    let results = client
        .multicall(&three_requests(), BlockTag::Latest)
        .await
        .unwrap();

    assert_eq!(results, vec![ok("0xaa"), ok("0xbb"), ok("0xcc")]);
    assert_eq!(*attempts.lock().unwrap(), 3);
}
