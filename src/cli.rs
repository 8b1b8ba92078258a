use alloy_primitives::Address;
use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the gateway
#[derive(Parser, Debug)]
#[command(name = "ccip-gateway", about = "CCIP-Read storage gateway")]
pub struct Cli {
    /// Chain node JSON-RPC endpoint the gateway reads from.
    /// Can also be set via the GATEWAY_RPC_URL environment variable.
    #[arg(long, env = "GATEWAY_RPC_URL", default_value = "http://127.0.0.1:8545")]
    pub rpc_url: String,

    /// HTTP listen address
    #[arg(long, default_value = "0.0.0.0")]
    pub http_addr: String,

    /// HTTP listen port
    #[arg(long, default_value = "8080")]
    pub http_port: u16,

    /// Records contract whose storage is proven.
    ///
    /// When omitted, a 20-byte verifier context in the request (or the
    /// sender path segment) selects the target per request.
    #[arg(long)]
    pub target: Option<Address>,

    /// Emit a version proof ahead of each data proof.
    ///
    /// Required for versioned-generation targets; the downstream verifier
    /// checks the version proof before trusting the data proof.
    #[arg(long)]
    pub versioned: bool,

    /// Path to a JSON base-slot table overriding the built-in layout.
    ///
    /// Base slot indices follow the target contract's field declaration
    /// order and differ between resolver generations (e.g. texts at 11 or
    /// 14); only the fields that differ need to appear in the file.
    #[arg(long)]
    pub slot_table: Option<PathBuf>,

    /// Enable structured JSON logging instead of human-readable output.
    #[arg(long)]
    pub log_json: bool,
}
