use std::sync::Arc;
use std::time::Duration;

use alloy::providers::{Provider, ProviderBuilder, WsConnect};
use futures::StreamExt;
use tokio::sync::mpsc;

use crate::data::provider::EthProvider;
use crate::events::AppEvent;

const MAX_BACKOFF: Duration = Duration::from_secs(30);

/// Forwards a block number only when the head moved forward.
#[derive(Debug, Default)]
pub struct HeadTracker {
    last: Option<u64>,
}

impl HeadTracker {
    pub fn observe(&mut self, number: u64) -> Option<u64> {
        match self.last {
            Some(last) if number <= last => None,
            _ => {
                self.last = Some(number);
                Some(number)
            }
        }
    }
}

/// Background task announcing new chain heads as `AppEvent::NewBlock`.
///
/// Uses a `newHeads` subscription when a WebSocket URL is configured and
/// falls back to polling the HTTP provider otherwise.
pub struct BlockWatcher {
    shutdown_tx: Option<mpsc::UnboundedSender<()>>,
}

impl BlockWatcher {
    pub fn spawn(
        provider: Arc<EthProvider>,
        ws_url: Option<String>,
        poll_interval: Duration,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        let (shutdown_tx, shutdown_rx) = mpsc::unbounded_channel::<()>();

        match ws_url {
            Some(url) => {
                tokio::spawn(Self::run_ws(url, event_tx, shutdown_rx));
            }
            None => {
                tokio::spawn(Self::run_polling(
                    provider,
                    poll_interval,
                    event_tx,
                    shutdown_rx,
                ));
            }
        }

        Self {
            shutdown_tx: Some(shutdown_tx),
        }
    }

    async fn run_polling(
        provider: Arc<EthProvider>,
        poll_interval: Duration,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        mut shutdown_rx: mpsc::UnboundedReceiver<()>,
    ) {
        let mut tracker = HeadTracker::default();
        let mut interval = tokio::time::interval(poll_interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    match provider.get_latest_block_number().await {
                        Ok(number) => {
                            if let Some(n) = tracker.observe(number) {
                                if event_tx.send(AppEvent::NewBlock(n)).is_err() {
                                    return;
                                }
                            }
                        }
                        Err(e) => {
                            tracing::warn!("block number poll failed: {e}");
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    return;
                }
            }
        }
    }

    async fn run_ws(
        url: String,
        event_tx: mpsc::UnboundedSender<AppEvent>,
        mut shutdown_rx: mpsc::UnboundedReceiver<()>,
    ) {
        let mut backoff = Duration::from_secs(1);
        let mut tracker = HeadTracker::default();

        loop {
            match Self::subscribe_heads(&url, &event_tx, &mut tracker, &mut shutdown_rx).await {
                Ok(()) => {
                    let _ = event_tx.send(AppEvent::WsDisconnected);
                    return;
                }
                Err(e) => {
                    tracing::warn!(%url, "head subscription dropped: {e}");
                    let _ = event_tx.send(AppEvent::WsDisconnected);
                    tokio::select! {
                        _ = tokio::time::sleep(backoff) => {
                            backoff = (backoff * 2).min(MAX_BACKOFF);
                        }
                        _ = shutdown_rx.recv() => {
                            return;
                        }
                    }
                }
            }
        }
    }

    /// Returns `Ok` only on requested shutdown.
    async fn subscribe_heads(
        url: &str,
        event_tx: &mpsc::UnboundedSender<AppEvent>,
        tracker: &mut HeadTracker,
        shutdown_rx: &mut mpsc::UnboundedReceiver<()>,
    ) -> color_eyre::Result<()> {
        let ws = WsConnect::new(url.to_string());
        let provider = ProviderBuilder::new().on_ws(ws).await?;

        let _ = event_tx.send(AppEvent::WsConnected);
        tracing::info!(%url, "subscribed to new heads");

        let mut heads = provider.subscribe_blocks().await?.into_stream();

        loop {
            tokio::select! {
                header = heads.next() => {
                    let Some(header) = header else {
                        return Err(color_eyre::eyre::eyre!("subscription stream ended"));
                    };
                    if let Some(n) = tracker.observe(header.inner.number) {
                        if event_tx.send(AppEvent::NewBlock(n)).is_err() {
                            return Ok(());
                        }
                    }
                }
                _ = shutdown_rx.recv() => {
                    return Ok(());
                }
            }
        }
    }

    /// Stop the background task.
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for BlockWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}
