use std::path::PathBuf;

use alloy::primitives::Address;
use clap::Parser;

use crate::data::contracts::DEFAULT_CONTRACT_NAME;

#[derive(Parser, Debug)]
#[command(
    name = "greeter-tui",
    about = "Terminal front-end for the scaffold-eth greeter contract"
)]
pub struct Config {
    /// RPC endpoint URL. Overrides the chain preset when given.
    #[arg(short, long)]
    pub rpc_url: Option<String>,

    /// WebSocket RPC endpoint URL for new block subscriptions
    #[arg(long)]
    pub ws_url: Option<String>,

    /// Chain preset (localhost, ethereum, sepolia, arbitrum, optimism, base, polygon)
    #[arg(long, default_value = "localhost")]
    pub chain: String,

    /// Deployed contracts file: {"<chain id>": {"<name>": {"address", "abi"}}}
    #[arg(long)]
    pub contracts: Option<PathBuf>,

    /// Contract the page talks to
    #[arg(long, default_value = DEFAULT_CONTRACT_NAME)]
    pub contract_name: String,

    /// Address of the built-in greeter ABI, used when no contracts file is given
    #[arg(long)]
    pub contract_address: Option<Address>,

    /// Hex private key for signing locally. Without it the node's first account is used.
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// First block scanned for event history
    #[arg(long, default_value = "1")]
    pub from_block: u64,

    /// Block range per eth_getLogs request
    #[arg(long, default_value = "500")]
    pub blocks_batch_size: u64,

    /// Block polling interval when no WebSocket URL is set
    #[arg(long, default_value = "4000")]
    pub poll_interval_ms: u64,

    /// Tick rate in milliseconds for UI refresh
    #[arg(long, default_value = "100")]
    pub tick_rate_ms: u64,

    /// Log file path. Defaults to the user cache directory.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Log filter, e.g. "info" or "greeter_tui=debug". RUST_LOG takes precedence.
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Config {
    /// Where tracing output goes.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("greeter-tui")
                .join("greeter-tui.log")
        })
    }
}
