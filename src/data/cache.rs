use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use alloy::primitives::B256;
use lru::LruCache;

use crate::data::types::{BlockMeta, ReceiptMeta, TxMeta};

/// Mined data is immutable barring reorgs, so entries live for a long time.
const BLOCK_TTL: Duration = Duration::from_secs(3600);
const TX_TTL: Duration = Duration::from_secs(3600);

const BLOCK_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(500).unwrap();
const TX_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(500).unwrap();
const RECEIPT_CACHE_SIZE: NonZeroUsize = NonZeroUsize::new(500).unwrap();

/// Metadata attached to event records, shared by all history fetches.
pub struct MetaCache {
    blocks: LruCache<u64, (Instant, BlockMeta)>,
    transactions: LruCache<B256, (Instant, TxMeta)>,
    receipts: LruCache<B256, (Instant, ReceiptMeta)>,
}

impl MetaCache {
    pub fn new() -> Self {
        Self {
            blocks: LruCache::new(BLOCK_CACHE_SIZE),
            transactions: LruCache::new(TX_CACHE_SIZE),
            receipts: LruCache::new(RECEIPT_CACHE_SIZE),
        }
    }

    // --- Block ---

    pub fn get_block(&mut self, number: u64) -> Option<BlockMeta> {
        let entry = self.blocks.get(&number)?;
        if entry.0.elapsed() < BLOCK_TTL {
            Some(entry.1)
        } else {
            self.blocks.pop(&number);
            None
        }
    }

    pub fn put_block(&mut self, number: u64, meta: BlockMeta) {
        self.blocks.put(number, (Instant::now(), meta));
    }

    // --- Transaction ---

    pub fn get_transaction(&mut self, hash: B256) -> Option<TxMeta> {
        let entry = self.transactions.get(&hash)?;
        if entry.0.elapsed() < TX_TTL {
            Some(entry.1)
        } else {
            self.transactions.pop(&hash);
            None
        }
    }

    pub fn put_transaction(&mut self, hash: B256, meta: TxMeta) {
        self.transactions.put(hash, (Instant::now(), meta));
    }

    // --- Receipt ---

    pub fn get_receipt(&mut self, hash: B256) -> Option<ReceiptMeta> {
        let entry = self.receipts.get(&hash)?;
        if entry.0.elapsed() < TX_TTL {
            Some(entry.1)
        } else {
            self.receipts.pop(&hash);
            None
        }
    }

    pub fn put_receipt(&mut self, hash: B256, meta: ReceiptMeta) {
        self.receipts.put(hash, (Instant::now(), meta));
    }
}

impl Default for MetaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{Address, U256};

    #[test]
    fn test_block_roundtrip() {
        let mut cache = MetaCache::new();
        assert!(cache.get_block(10).is_none());
        cache.put_block(10, BlockMeta { timestamp: 1_700_000_000 });
        assert_eq!(cache.get_block(10), Some(BlockMeta { timestamp: 1_700_000_000 }));
    }

    #[test]
    fn test_transaction_and_receipt_are_separate() {
        let mut cache = MetaCache::new();
        let hash = B256::repeat_byte(0x01);
        cache.put_transaction(
            hash,
            TxMeta {
                from: Address::repeat_byte(0x02),
                value: U256::from(5),
            },
        );
        assert!(cache.get_transaction(hash).is_some());
        assert!(cache.get_receipt(hash).is_none());

        cache.put_receipt(
            hash,
            ReceiptMeta {
                success: true,
                gas_used: 21_000,
            },
        );
        assert_eq!(cache.get_receipt(hash).map(|r| r.gas_used), Some(21_000));
    }

    #[test]
    fn test_lru_eviction() {
        let mut cache = MetaCache::new();
        for n in 0..=BLOCK_CACHE_SIZE.get() as u64 {
            cache.put_block(n, BlockMeta { timestamp: n });
        }
        // Oldest entry evicted once capacity is exceeded
        assert!(cache.get_block(0).is_none());
        assert!(cache.get_block(BLOCK_CACHE_SIZE.get() as u64).is_some());
    }
}
