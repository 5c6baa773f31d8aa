use alloy::dyn_abi::DynSolValue;
use alloy::primitives::B256;

use crate::data::types::{EventRecord, WriteRequest};

/// Events sent from background data tasks and components to the main app loop
#[derive(Debug)]
pub enum AppEvent {
    // Chain
    Connected(u64), // chain_id
    NewBlock(u64),
    WsConnected,
    WsDisconnected,

    // Contract reads
    ReadResult {
        function: String,
        at_block: u64,
        value: Option<DynSolValue>,
    },

    // Event history
    EventsLoaded {
        records: Vec<EventRecord>,
        through_block: u64,
    },
    EventsFailed {
        from: u64,
        error: String,
    },

    // Contract writes
    Submit(WriteRequest),
    WriteSubmitted {
        function: String,
        hash: B256,
    },
    WriteConfirmed {
        function: String,
        hash: B256,
        success: bool,
    },
    WriteFailed {
        function: String,
        context: &'static str,
        error: String,
    },

    // Status
    Error(String),
}
