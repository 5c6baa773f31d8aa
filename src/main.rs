mod app;
mod components;
mod config;
mod data;
mod events;
mod logging;
mod theme;
mod utils;

use std::sync::Arc;
use std::time::Duration;

use alloy::signers::local::PrivateKeySigner;
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, eyre};
use tokio::sync::mpsc;

use crate::app::App;
use crate::components::home::GREETING_EVENT;
use crate::config::Config;
use crate::data::DataService;
use crate::data::contracts::ContractRegistry;
use crate::data::provider::EthProvider;
use crate::data::types::HistoryRequest;
use crate::data::watch::BlockWatcher;
use crate::events::AppEvent;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let config = Config::parse();

    let log_path = config.log_path();
    logging::init(&log_path, &config.log_level)?;
    eprintln!("Logging to {}", log_path.display());

    // An explicit --rpc-url wins over the chain preset
    let preset = data::chains::get_chain_config(&config.chain);
    let rpc_url = match (config.rpc_url.clone(), &preset) {
        (Some(url), _) => url,
        (None, Some(preset)) => preset.rpc_url.clone(),
        (None, None) => {
            return Err(eyre!(
                "unknown chain '{}', expected one of: {}",
                config.chain,
                data::chains::supported_chains().join(", ")
            ));
        }
    };

    let signer = config
        .private_key
        .as_deref()
        .map(|key| key.trim().parse::<PrivateKeySigner>())
        .transpose()
        .wrap_err("invalid private key")?;

    eprintln!("Connecting to {rpc_url}...");
    let provider = EthProvider::connect(&rpc_url, signer)
        .await
        .wrap_err_with(|| format!("connecting to {rpc_url}"))?;
    let chain_id = provider.chain_id();
    let session = provider.session();
    tracing::info!(%rpc_url, chain_id, account = ?session.account, mode = %session.mode, "connected");

    let registry = build_registry(&config, chain_id)?;

    let preset = preset.filter(|p| {
        if p.chain_id != chain_id {
            tracing::warn!(
                expected = p.chain_id,
                actual = chain_id,
                "node is not on the {} chain",
                p.name
            );
        }
        p.chain_id == chain_id
    });

    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let _ = event_tx.send(AppEvent::Connected(chain_id));

    if let Err(e) = registry.get(chain_id, &config.contract_name) {
        tracing::warn!("{e}");
        let _ = event_tx.send(AppEvent::Error(format!(
            "{e}; pass --contracts or --contract-address"
        )));
    }

    let provider = Arc::new(provider);
    let data_service = Arc::new(DataService::new(
        Arc::clone(&provider),
        registry,
        event_tx.clone(),
    ));

    let history_request = HistoryRequest {
        contract: config.contract_name.clone(),
        event: GREETING_EVENT.to_string(),
        from_block: config.from_block,
        watch: true,
        block_data: true,
        transaction_data: true,
        receipt_data: true,
        batch_size: config.blocks_batch_size,
    };

    let mut app = App::new(data_service, event_rx, history_request, config.tick_rate_ms);
    if let Some(preset) = preset {
        app.set_chain_info(preset.name, preset.symbol);
    }

    let watcher = BlockWatcher::spawn(
        provider,
        config.ws_url.clone(),
        Duration::from_millis(config.poll_interval_ms),
        event_tx,
    );
    app.set_watcher(watcher);

    let terminal = ratatui::init();
    let result = app.run(terminal).await;
    ratatui::restore();

    result
}

/// Contracts from `--contracts`, plus the built-in greeter ABI when
/// `--contract-address` is given.
fn build_registry(config: &Config, chain_id: u64) -> Result<ContractRegistry> {
    let mut registry = match &config.contracts {
        Some(path) => ContractRegistry::load(path)?,
        None => ContractRegistry::default(),
    };

    if let Some(address) = config.contract_address {
        registry.insert_builtin(chain_id, &config.contract_name, address)?;
    }
    if registry.is_empty() {
        tracing::warn!("no contracts configured");
    }

    Ok(registry)
}
