use alloy::dyn_abi::DynSolValue;
use alloy::primitives::{Address, B256, U256};

/// Chain preset used to pick a default RPC endpoint.
#[derive(Debug, Clone)]
pub struct ChainConfig {
    pub name: String,
    pub chain_id: u64,
    pub rpc_url: String,
    pub symbol: String,
}

/// How the session account signs transactions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletMode {
    /// A local private key; transactions are signed client-side.
    Local,
    /// An account unlocked on the node (anvil/hardhat); `eth_sendTransaction`.
    Unlocked,
    Disconnected,
}

impl std::fmt::Display for WalletMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WalletMode::Local => write!(f, "Local key"),
            WalletMode::Unlocked => write!(f, "Node account"),
            WalletMode::Disconnected => write!(f, "Not connected"),
        }
    }
}

/// The wallet connection as seen by the UI. Built once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub account: Option<Address>,
    pub mode: WalletMode,
}

impl Session {
    pub fn disconnected() -> Self {
        Self {
            account: None,
            mode: WalletMode::Disconnected,
        }
    }
}

/// A contract view call. An argument of `None` stands for a value the UI
/// does not have yet (e.g. no connected account).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub contract: String,
    pub function: String,
    pub args: Vec<Option<DynSolValue>>,
    /// Head block when the read was issued; results echo it back.
    pub at_block: u64,
}

/// A contract transaction built from form text. Arguments stay as strings
/// until the ABI parameter types are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteRequest {
    pub contract: String,
    pub function: String,
    pub args: Vec<String>,
    pub value: Option<U256>,
    /// Prefix used when the call fails and the error is logged.
    pub error_context: &'static str,
}

/// Parameters of an event history subscription.
#[derive(Debug, Clone)]
pub struct HistoryRequest {
    pub contract: String,
    pub event: String,
    pub from_block: u64,
    pub watch: bool,
    pub block_data: bool,
    pub transaction_data: bool,
    pub receipt_data: bool,
    pub batch_size: u64,
}

/// Stable identity of a log within the chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventKey {
    pub block_number: u64,
    pub log_index: u64,
    pub tx_hash: B256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockMeta {
    pub timestamp: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxMeta {
    pub from: Address,
    pub value: U256,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReceiptMeta {
    pub success: bool,
    pub gas_used: u64,
}

/// A decoded contract event plus the metadata requested for it.
#[derive(Debug, Clone, PartialEq)]
pub struct EventRecord {
    pub key: EventKey,
    pub args: Vec<(String, DynSolValue)>,
    pub block: Option<BlockMeta>,
    pub transaction: Option<TxMeta>,
    pub receipt: Option<ReceiptMeta>,
}

impl EventRecord {
    /// Look up a decoded argument by its ABI name.
    pub fn arg(&self, name: &str) -> Option<&DynSolValue> {
        self.args
            .iter()
            .find(|(arg_name, _)| arg_name == name)
            .map(|(_, value)| value)
    }

    pub fn address_arg(&self, name: &str) -> Option<Address> {
        self.arg(name).and_then(DynSolValue::as_address)
    }

    pub fn string_arg(&self, name: &str) -> Option<&str> {
        self.arg(name).and_then(DynSolValue::as_str)
    }
}

/// Lifecycle of a sent transaction, shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxNotice {
    Pending { function: String, hash: B256 },
    Confirmed { function: String, hash: B256, success: bool },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EventRecord {
        EventRecord {
            key: EventKey {
                block_number: 7,
                log_index: 0,
                tx_hash: B256::repeat_byte(0x11),
            },
            args: vec![
                (
                    "greetingSetter".to_string(),
                    DynSolValue::Address(Address::repeat_byte(0xaa)),
                ),
                (
                    "newGreeting".to_string(),
                    DynSolValue::String("hi".to_string()),
                ),
            ],
            block: None,
            transaction: None,
            receipt: None,
        }
    }

    #[test]
    fn test_record_arg_lookup() {
        let r = record();
        assert_eq!(
            r.address_arg("greetingSetter"),
            Some(Address::repeat_byte(0xaa))
        );
        assert_eq!(r.string_arg("newGreeting"), Some("hi"));
        assert!(r.arg("missing").is_none());
    }

    #[test]
    fn test_record_arg_wrong_type() {
        let r = record();
        assert!(r.string_arg("greetingSetter").is_none());
        assert!(r.address_arg("newGreeting").is_none());
    }

    #[test]
    fn test_event_key_orders_by_block_then_index() {
        let a = EventKey {
            block_number: 1,
            log_index: 5,
            tx_hash: B256::repeat_byte(0xff),
        };
        let b = EventKey {
            block_number: 2,
            log_index: 0,
            tx_hash: B256::ZERO,
        };
        assert!(a < b);
    }

    #[test]
    fn test_wallet_mode_display() {
        assert_eq!(WalletMode::Local.to_string(), "Local key");
        assert_eq!(WalletMode::Unlocked.to_string(), "Node account");
        assert_eq!(WalletMode::Disconnected.to_string(), "Not connected");
    }

    #[test]
    fn test_disconnected_session() {
        let s = Session::disconnected();
        assert!(s.account.is_none());
        assert_eq!(s.mode, WalletMode::Disconnected);
    }
}
