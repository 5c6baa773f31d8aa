use alloy::network::{Ethereum, EthereumWallet};
use alloy::primitives::{Address, Bytes, B256};
use alloy::providers::{PendingTransactionBuilder, Provider, ProviderBuilder};
use alloy::rpc::types::{
    BlockNumberOrTag, Filter, Log, Transaction, TransactionReceipt, TransactionRequest,
};
use alloy::signers::local::PrivateKeySigner;
use color_eyre::eyre::Result;

use crate::data::types::{Session, WalletMode};

/// HTTP JSON-RPC provider plus the wallet session it was built with.
pub struct EthProvider {
    provider: Box<dyn Provider + Send + Sync>,
    chain_id: u64,
    session: Session,
}

impl EthProvider {
    /// Connect to a node. With a signer, transactions are signed locally;
    /// otherwise the first account the node exposes (if any) is used.
    pub async fn connect(rpc_url: &str, signer: Option<PrivateKeySigner>) -> Result<Self> {
        let url = rpc_url.parse()?;

        let (provider, session): (Box<dyn Provider + Send + Sync>, Option<Session>) = match signer
        {
            Some(signer) => {
                let account = signer.address();
                let provider = ProviderBuilder::new()
                    .wallet(EthereumWallet::from(signer))
                    .on_http(url);
                let session = Session {
                    account: Some(account),
                    mode: WalletMode::Local,
                };
                (Box::new(provider), Some(session))
            }
            None => (Box::new(ProviderBuilder::new().on_http(url)), None),
        };

        let chain_id = provider.get_chain_id().await?;

        let session = match session {
            Some(s) => s,
            None => match provider.get_accounts().await {
                Ok(accounts) if !accounts.is_empty() => Session {
                    account: accounts.first().copied(),
                    mode: WalletMode::Unlocked,
                },
                Ok(_) => Session::disconnected(),
                Err(e) => {
                    tracing::debug!("eth_accounts unavailable: {e}");
                    Session::disconnected()
                }
            },
        };

        Ok(Self {
            provider,
            chain_id,
            session,
        })
    }

    /// A provider pointed at an unreachable endpoint, for tests that never
    /// touch the network.
    #[cfg(test)]
    pub fn offline(chain_id: u64, session: Session) -> Self {
        let url = "http://127.0.0.1:9".parse().unwrap();
        Self {
            provider: Box::new(ProviderBuilder::new().on_http(url)),
            chain_id,
            session,
        }
    }

    /// Return the chain ID obtained at connection time.
    pub fn chain_id(&self) -> u64 {
        self.chain_id
    }

    pub fn session(&self) -> Session {
        self.session
    }

    /// Get the latest block number.
    pub async fn get_latest_block_number(&self) -> Result<u64> {
        let number = self.provider.get_block_number().await?;
        Ok(number)
    }

    /// `eth_call` against the latest block.
    pub async fn call(&self, to: Address, input: Bytes) -> Result<Bytes> {
        let request = TransactionRequest::default().to(to).input(input.into());
        let output = self.provider.call(request).await?;
        Ok(output)
    }

    /// Submit a transaction. Resolves once the node accepted it.
    pub async fn send_transaction(
        &self,
        request: TransactionRequest,
    ) -> Result<PendingTransactionBuilder<Ethereum>> {
        let pending = self.provider.send_transaction(request).await?;
        Ok(pending)
    }

    /// Logs matching `filter`.
    pub async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        let logs = self.provider.get_logs(filter).await?;
        Ok(logs)
    }

    /// Timestamp of a block, without its transactions.
    pub async fn get_block_timestamp(&self, number: u64) -> Result<Option<u64>> {
        let block = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(number))
            .await?;
        Ok(block.map(|b| b.header.timestamp))
    }

    /// Get a transaction by its hash.
    pub async fn get_transaction(&self, hash: B256) -> Result<Option<Transaction>> {
        let tx = self.provider.get_transaction_by_hash(hash).await?;
        Ok(tx)
    }

    /// Get a transaction receipt by transaction hash.
    pub async fn get_transaction_receipt(&self, hash: B256) -> Result<Option<TransactionReceipt>> {
        let receipt = self.provider.get_transaction_receipt(hash).await?;
        Ok(receipt)
    }
}
