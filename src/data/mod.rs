pub mod cache;
pub mod chains;
pub mod contracts;
pub mod history;
pub mod provider;
pub mod types;
pub mod watch;

use std::sync::Arc;

use alloy::consensus::Transaction as ConsensusTransaction;
use alloy::dyn_abi::DynSolValue;
use alloy::primitives::B256;
use alloy::rpc::types::{Filter, Log, TransactionRequest};
use color_eyre::eyre::{Result, eyre};
use tokio::sync::RwLock;
use tokio::sync::mpsc;

use crate::data::cache::MetaCache;
use crate::data::contracts::{
    ContractError, ContractRegistry, decode_event, decode_first_output, encode_read, encode_write,
};
use crate::data::history::block_ranges;
use crate::data::provider::EthProvider;
use crate::data::types::*;
use crate::events::AppEvent;

/// Contract read/write/event bindings. Each call spawns a task and reports
/// back to the app loop through `event_tx`.
pub struct DataService {
    provider: Arc<EthProvider>,
    registry: Arc<ContractRegistry>,
    cache: Arc<RwLock<MetaCache>>,
    event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl DataService {
    pub fn new(
        provider: Arc<EthProvider>,
        registry: ContractRegistry,
        event_tx: mpsc::UnboundedSender<AppEvent>,
    ) -> Self {
        Self {
            provider,
            registry: Arc::new(registry),
            cache: Arc::new(RwLock::new(MetaCache::new())),
            event_tx,
        }
    }

    pub fn session(&self) -> Session {
        self.provider.session()
    }

    /// Call a view function and deliver its first return value.
    ///
    /// Failures of any kind resolve to `None` rather than an error event.
    pub fn read_contract(&self, request: ReadRequest) {
        let provider = Arc::clone(&self.provider);
        let registry = Arc::clone(&self.registry);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let value = match read(&provider, &registry, &request).await {
                Ok(value) => value,
                Err(e) => {
                    tracing::debug!(
                        contract = %request.contract,
                        function = %request.function,
                        "read resolved to nothing: {e}"
                    );
                    None
                }
            };
            let _ = tx.send(AppEvent::ReadResult {
                function: request.function,
                at_block: request.at_block,
                value,
            });
        });
    }

    /// Send a transaction from the session account and wait for its receipt.
    pub fn write_contract(&self, request: WriteRequest) {
        let provider = Arc::clone(&self.provider);
        let registry = Arc::clone(&self.registry);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            if let Err(e) = write(&provider, &registry, &request, &tx).await {
                let _ = tx.send(write_failed(request, &e));
            }
        });
    }

    /// Fetch and decode events in `[from, to]`; `to = None` means the current head.
    pub fn fetch_events(&self, request: HistoryRequest, from: u64, to: Option<u64>) {
        let provider = Arc::clone(&self.provider);
        let registry = Arc::clone(&self.registry);
        let cache = Arc::clone(&self.cache);
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            match fetch_history(&provider, &registry, &cache, &request, from, to).await {
                Ok((records, through_block)) => {
                    tracing::debug!(
                        event = %request.event,
                        from,
                        through_block,
                        count = records.len(),
                        "events fetched"
                    );
                    let _ = tx.send(AppEvent::EventsLoaded {
                        records,
                        through_block,
                    });
                }
                Err(e) => {
                    tracing::warn!(event = %request.event, from, "event fetch failed: {e}");
                    let _ = tx.send(AppEvent::EventsFailed {
                        from,
                        error: e.to_string(),
                    });
                }
            }
        });
    }
}

async fn read(
    provider: &EthProvider,
    registry: &ContractRegistry,
    request: &ReadRequest,
) -> Result<Option<DynSolValue>> {
    let contract = registry.get(provider.chain_id(), &request.contract)?;
    let function =
        contract
            .function(&request.function)
            .ok_or_else(|| ContractError::UnknownFunction {
                contract: request.contract.clone(),
                function: request.function.clone(),
            })?;
    let input = encode_read(function, &request.args)?;
    let output = provider.call(contract.address, input).await?;
    Ok(decode_first_output(function, &output)?)
}

async fn write(
    provider: &EthProvider,
    registry: &ContractRegistry,
    request: &WriteRequest,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> Result<()> {
    let from = provider.session().account.ok_or(ContractError::NoWallet)?;
    let contract = registry.get(provider.chain_id(), &request.contract)?;
    let function =
        contract
            .function(&request.function)
            .ok_or_else(|| ContractError::UnknownFunction {
                contract: request.contract.clone(),
                function: request.function.clone(),
            })?;
    let input = encode_write(function, &request.args)?;

    let mut tx_request = TransactionRequest::default()
        .from(from)
        .to(contract.address)
        .input(input.into());
    if let Some(value) = request.value {
        tx_request = tx_request.value(value);
    }

    let pending = provider.send_transaction(tx_request).await?;
    let hash = *pending.tx_hash();
    tracing::info!(function = %request.function, %hash, "transaction submitted");
    let _ = tx.send(AppEvent::WriteSubmitted {
        function: request.function.clone(),
        hash,
    });

    let receipt = pending.get_receipt().await?;
    confirm(request, hash, receipt.status(), tx)
}

/// Report a mined transaction. A reverted one is still reported as
/// confirmed, then fails the write.
fn confirm(
    request: &WriteRequest,
    hash: B256,
    success: bool,
    tx: &mpsc::UnboundedSender<AppEvent>,
) -> Result<()> {
    tracing::info!(function = %request.function, %hash, success, "transaction mined");
    let _ = tx.send(AppEvent::WriteConfirmed {
        function: request.function.clone(),
        hash,
        success,
    });

    if !success {
        return Err(eyre!("transaction {hash} reverted"));
    }
    Ok(())
}

fn write_failed(request: WriteRequest, error: &color_eyre::eyre::Report) -> AppEvent {
    AppEvent::WriteFailed {
        function: request.function,
        context: request.error_context,
        error: error.to_string(),
    }
}

async fn fetch_history(
    provider: &EthProvider,
    registry: &ContractRegistry,
    cache: &RwLock<MetaCache>,
    request: &HistoryRequest,
    from: u64,
    to: Option<u64>,
) -> Result<(Vec<EventRecord>, u64)> {
    let to = match to {
        Some(to) => to,
        None => provider.get_latest_block_number().await?,
    };

    let contract = registry.get(provider.chain_id(), &request.contract)?;
    let event = contract
        .event(&request.event)
        .ok_or_else(|| ContractError::UnknownEvent {
            contract: request.contract.clone(),
            event: request.event.clone(),
        })?;

    let mut records = Vec::new();
    for (start, end) in block_ranges(from, to, request.batch_size) {
        let filter = Filter::new()
            .address(contract.address)
            .event_signature(event.selector())
            .from_block(start)
            .to_block(end);

        for log in provider.get_logs(&filter).await? {
            let Some(key) = event_key(&log) else {
                continue;
            };
            let args = match decode_event(event, &log.inner.data) {
                Ok(args) => args,
                Err(e) => {
                    tracing::warn!(tx = %key.tx_hash, "skipping undecodable log: {e}");
                    continue;
                }
            };

            let mut record = EventRecord {
                key,
                args,
                block: None,
                transaction: None,
                receipt: None,
            };
            enrich(provider, cache, request, &mut record).await;
            records.push(record);
        }
    }

    Ok((records, to))
}

/// Pending logs have no position yet and are skipped.
fn event_key(log: &Log) -> Option<EventKey> {
    Some(EventKey {
        block_number: log.block_number?,
        log_index: log.log_index?,
        tx_hash: log.transaction_hash?,
    })
}

/// Attach block, transaction and receipt metadata as requested. Lookups that
/// fail leave the field empty.
async fn enrich(
    provider: &EthProvider,
    cache: &RwLock<MetaCache>,
    request: &HistoryRequest,
    record: &mut EventRecord,
) {
    let number = record.key.block_number;
    let hash = record.key.tx_hash;

    if request.block_data {
        record.block = block_meta(provider, cache, number).await;
    }
    if request.transaction_data {
        record.transaction = tx_meta(provider, cache, hash).await;
    }
    if request.receipt_data {
        record.receipt = receipt_meta(provider, cache, hash).await;
    }
}

async fn block_meta(
    provider: &EthProvider,
    cache: &RwLock<MetaCache>,
    number: u64,
) -> Option<BlockMeta> {
    if let Some(cached) = cache.write().await.get_block(number) {
        return Some(cached);
    }
    match provider.get_block_timestamp(number).await {
        Ok(Some(timestamp)) => {
            let meta = BlockMeta { timestamp };
            cache.write().await.put_block(number, meta);
            Some(meta)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(number, "block lookup failed: {e}");
            None
        }
    }
}

async fn tx_meta(provider: &EthProvider, cache: &RwLock<MetaCache>, hash: B256) -> Option<TxMeta> {
    if let Some(cached) = cache.write().await.get_transaction(hash) {
        return Some(cached);
    }
    match provider.get_transaction(hash).await {
        Ok(Some(tx)) => {
            let meta = TxMeta {
                from: tx.inner.signer(),
                value: tx.value(),
            };
            cache.write().await.put_transaction(hash, meta);
            Some(meta)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(%hash, "transaction lookup failed: {e}");
            None
        }
    }
}

async fn receipt_meta(
    provider: &EthProvider,
    cache: &RwLock<MetaCache>,
    hash: B256,
) -> Option<ReceiptMeta> {
    if let Some(cached) = cache.write().await.get_receipt(hash) {
        return Some(cached);
    }
    match provider.get_transaction_receipt(hash).await {
        Ok(Some(receipt)) => {
            let meta = ReceiptMeta {
                success: receipt.status(),
                gas_used: receipt.gas_used,
            };
            cache.write().await.put_receipt(hash, meta);
            Some(meta)
        }
        Ok(None) => None,
        Err(e) => {
            tracing::debug!(%hash, "receipt lookup failed: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, LogData};

    fn rpc_log(block: Option<u64>, index: Option<u64>, hash: Option<B256>) -> Log {
        Log {
            inner: alloy::primitives::Log {
                address: Address::ZERO,
                data: LogData::empty(),
            },
            block_hash: None,
            block_number: block,
            block_timestamp: None,
            transaction_hash: hash,
            transaction_index: None,
            log_index: index,
            removed: false,
        }
    }

    #[test]
    fn test_event_key_from_mined_log() {
        let log = rpc_log(Some(12), Some(3), Some(B256::repeat_byte(0x01)));
        assert_eq!(
            event_key(&log),
            Some(EventKey {
                block_number: 12,
                log_index: 3,
                tx_hash: B256::repeat_byte(0x01),
            })
        );
    }

    fn greeting_request() -> WriteRequest {
        WriteRequest {
            contract: "YourContract".to_string(),
            function: "setGreeting".to_string(),
            args: vec!["hello".to_string()],
            value: None,
            error_context: "Error setting greeting",
        }
    }

    #[test]
    fn test_reverted_receipt_is_confirmed_then_failed() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let request = greeting_request();
        let hash = B256::repeat_byte(0x07);

        let err = confirm(&request, hash, false, &tx).unwrap_err();
        let _ = tx.send(write_failed(request, &err));

        match rx.try_recv().unwrap() {
            AppEvent::WriteConfirmed {
                function,
                hash: confirmed,
                success,
            } => {
                assert_eq!(function, "setGreeting");
                assert_eq!(confirmed, hash);
                assert!(!success);
            }
            other => panic!("expected confirmation, got {other:?}"),
        }
        match rx.try_recv().unwrap() {
            AppEvent::WriteFailed {
                function,
                context,
                error,
            } => {
                assert_eq!(function, "setGreeting");
                assert_eq!(context, "Error setting greeting");
                assert!(error.contains("reverted"));
            }
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_successful_receipt_only_confirms() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        assert!(confirm(&greeting_request(), B256::ZERO, true, &tx).is_ok());
        assert!(matches!(
            rx.try_recv().unwrap(),
            AppEvent::WriteConfirmed { success: true, .. }
        ));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_event_key_skips_pending_log() {
        assert!(event_key(&rpc_log(None, Some(0), Some(B256::ZERO))).is_none());
        assert!(event_key(&rpc_log(Some(1), None, Some(B256::ZERO))).is_none());
        assert!(event_key(&rpc_log(Some(1), Some(0), None)).is_none());
    }
}
