//! chainagg CLI: batched contract reads from the terminal.
//!
//! Usage:
//! ```bash
//! # Which protocol would be used at a block?
//! chainagg mode --block 12000000
//!
//! # One raw eth_call
//! chainagg call --url https://cloudflare-eth.com --to 0x6b17...1d0f --data 0x18160ddd
//!
//! # Several calls, batched through the multicall aggregator
//! chainagg multicall --url https://cloudflare-eth.com \
//!     --call 0x6b17...1d0f:0x18160ddd --call 0xa0b8...eb48:0x18160ddd --block latest
//! ```

mod config;
mod logging;

use std::env;
use std::path::Path;
use std::process;
use std::sync::Arc;

use anyhow::{anyhow, bail, Context};
use chainagg_core::policy::{RateLimiterConfig, RateLimitedTransport, RetryConfig, RetryTransport};
use chainagg_core::{Address, BlockTag, Bytes, CallParams, CallTransport};
use chainagg_http::EthCallClient;
use chainagg_multicall::{CallRequest, MulticallClient};

use crate::config::CliConfig;

#[tokio::main]
async fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let config = match load_config(&args[2..]) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {e:#}");
            process::exit(1);
        }
    };
    logging::init_tracing(&config.log);

    let result = match args[1].as_str() {
        "mode" => cmd_mode(&args[2..], &config),
        "call" => cmd_call(&args[2..], &config).await,
        "multicall" => cmd_multicall(&args[2..], &config).await,
        "version" | "--version" | "-V" => {
            println!("chainagg {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn print_usage() {
    println!("chainagg {}", env!("CARGO_PKG_VERSION"));
    println!("Batched, rate-limited contract reads over JSON-RPC\n");
    println!("USAGE:");
    println!("    chainagg <COMMAND> [FLAGS]\n");
    println!("COMMANDS:");
    println!("    mode       Print the multicall mode used at a block");
    println!("    call       Send one eth_call");
    println!("    multicall  Send many calls through the multicall aggregator");
    println!("    version    Print version");
    println!("    help       Print this help\n");
    println!("FLAGS:");
    println!("    --config <FILE>            JSON config file");
    println!("    --url <URL>                RPC endpoint URL");
    println!("    --block <TAG>              Block height, 0x quantity or 'latest' [default: latest]");
    println!("    --to <ADDR>                Call target (call)");
    println!("    --data <HEX>               Calldata (call)");
    println!("    --call <ADDR>:<HEX>        One request, repeatable (multicall)");
    println!("    --retries <N>              Retry transient errors up to N times");
    println!("    --calls-per-minute <N>     Throttle outbound calls");
}

fn load_config(args: &[String]) -> anyhow::Result<CliConfig> {
    match parse_flag(args, "--config") {
        Some(path) => CliConfig::load(Path::new(&path)),
        None => Ok(CliConfig::default()),
    }
}

fn cmd_mode(args: &[String], config: &CliConfig) -> anyhow::Result<()> {
    let block = parse_block(args)?;
    let mode = chainagg_multicall::MulticallMode::for_block(block, &config.multicall);
    println!("{block}: {mode}");
    Ok(())
}

async fn cmd_call(args: &[String], config: &CliConfig) -> anyhow::Result<()> {
    let transport = build_transport(args, config)?;
    let to: Address = parse_flag(args, "--to")
        .ok_or_else(|| anyhow!("--to is required"))?
        .parse()
        .context("invalid --to address")?;
    let data = match parse_flag(args, "--data") {
        Some(hex) => Bytes::from_hex(&hex).context("invalid --data")?,
        None => Bytes::EMPTY,
    };
    let block = parse_block(args)?;

    let out = transport.call(CallParams::new(to, data), block).await?;
    println!("{out}");
    Ok(())
}

async fn cmd_multicall(args: &[String], config: &CliConfig) -> anyhow::Result<()> {
    let requests = parse_flags(args, "--call")
        .iter()
        .map(|spec| parse_request(spec))
        .collect::<anyhow::Result<Vec<_>>>()?;
    if requests.is_empty() {
        bail!("at least one --call is required");
    }
    let block = parse_block(args)?;

    let transport = build_transport(args, config)?;
    let client = MulticallClient::new(transport, config.multicall.clone());
    tracing::info!(
        calls = requests.len(),
        batch_size = client.config().batch_size,
        %block,
        mode = %client.mode(block),
        "running multicall"
    );

    let results = client.multicall(&requests, block).await?;
    for (i, result) in results.iter().enumerate() {
        let status = if result.success { "ok" } else { "failed" };
        println!("{i}\t{status}\t{}", result.data);
    }
    Ok(())
}

/// HTTP client, wrapped in rate limiting and then retry when configured, so
/// every attempt (retries included) takes a rate-limit slot.
/// Flags override the config file.
fn build_transport(args: &[String], config: &CliConfig) -> anyhow::Result<Arc<dyn CallTransport>> {
    let url = parse_flag(args, "--url")
        .or_else(|| config.rpc_url.clone())
        .ok_or_else(|| anyhow!("--url is required"))?;
    let mut transport: Arc<dyn CallTransport> =
        Arc::new(EthCallClient::new(url, config.http.clone())?);

    let rate_limit = match parse_flag(args, "--calls-per-minute") {
        Some(n) => Some(RateLimiterConfig {
            calls_per_minute: n.parse().context("invalid --calls-per-minute")?,
        }),
        None => config.rate_limit.clone(),
    };
    if let Some(rate_limit) = rate_limit {
        transport = Arc::new(RateLimitedTransport::new(transport, rate_limit)?);
    }

    let retry = match parse_flag(args, "--retries") {
        Some(n) => Some(RetryConfig {
            max_retry_count: Some(n.parse().context("invalid --retries")?),
            ..config.retry.clone().unwrap_or_default()
        }),
        None => config.retry.clone(),
    };
    if let Some(retry) = retry {
        transport = Arc::new(RetryTransport::new(transport, retry));
    }

    Ok(transport)
}

/// `<ADDR>:<HEX>` → request.
fn parse_request(spec: &str) -> anyhow::Result<CallRequest> {
    let (address, data) = spec
        .split_once(':')
        .ok_or_else(|| anyhow!("--call expects <ADDR>:<HEX>, got '{spec}'"))?;
    let address: Address = address
        .parse()
        .with_context(|| format!("invalid address in '{spec}'"))?;
    let data = Bytes::from_hex(data).with_context(|| format!("invalid calldata in '{spec}'"))?;
    Ok(CallRequest::new(address, data))
}

fn parse_block(args: &[String]) -> anyhow::Result<BlockTag> {
    match parse_flag(args, "--block") {
        Some(tag) => tag.parse().context("invalid --block"),
        None => Ok(BlockTag::Latest),
    }
}

fn parse_flag(args: &[String], flag: &str) -> Option<String> {
    let pos = args.iter().position(|a| a == flag)?;
    args.get(pos + 1).cloned()
}

fn parse_flags(args: &[String], flag: &str) -> Vec<String> {
    args.windows(2)
        .filter(|w| w[0] == flag)
        .map(|w| w[1].clone())
        .collect()
}
