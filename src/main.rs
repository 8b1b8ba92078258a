use ccip_gateway::chain::RpcChainReader;
use ccip_gateway::cli::Cli;
use ccip_gateway::config::{self, GatewayConfig};
use ccip_gateway::gateway::Gateway;
use ccip_gateway::server;
use ccip_gateway::slots::SlotTable;

use clap::Parser;
use eyre::WrapErr;
use std::net::SocketAddr;
use std::sync::Arc;

/// Main entry point for the gateway
#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.log_json);

    let slots = match &cli.slot_table {
        Some(path) => config::load_slot_table(path)?,
        None => SlotTable::default(),
    };

    let config = GatewayConfig {
        target: cli.target,
        slots,
        versioned: cli.versioned,
    };

    let url: url::Url = cli.rpc_url.parse().wrap_err("invalid rpc url")?;
    let reader = RpcChainReader::new(url);

    tracing::info!(
        rpc = %cli.rpc_url,
        target = ?config.target,
        versioned = config.versioned,
        "starting gateway"
    );

    let listen: SocketAddr = format!("{}:{}", cli.http_addr, cli.http_port)
        .parse()
        .wrap_err("invalid listen address")?;
    server::serve(Arc::new(Gateway::new(reader, config)), listen).await
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());
    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
