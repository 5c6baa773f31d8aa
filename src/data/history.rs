use std::collections::HashSet;

use crate::data::types::{EventKey, EventRecord};

/// What the event panel should show for the current history state.
#[derive(Debug, PartialEq)]
pub enum EventDisplay<'a> {
    Loading,
    Error(&'a str),
    List(&'a [EventRecord]),
}

/// Accumulated event log for one `(contract, event)` subscription.
///
/// Records are kept newest first and deduplicated by `EventKey`, so
/// overlapping range fetches and re-delivered logs are harmless.
#[derive(Debug, Default)]
pub struct EventHistory {
    records: Vec<EventRecord>,
    seen: HashSet<EventKey>,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl EventHistory {
    /// A history whose initial backfill has not arrived yet.
    pub fn loading() -> Self {
        Self {
            is_loading: true,
            ..Self::default()
        }
    }

    /// Merge a fetched batch. Returns how many new records were added.
    pub fn apply(&mut self, batch: Vec<EventRecord>) -> usize {
        let mut added = 0;
        for record in batch {
            if self.seen.insert(record.key) {
                self.records.push(record);
                added += 1;
            }
        }
        if added > 0 {
            self.records.sort_by(|a, b| b.key.cmp(&a.key));
        }

        self.is_loading = false;
        self.error = None;
        added
    }

    pub fn fail(&mut self, error: String) {
        self.is_loading = false;
        self.error = Some(error);
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Loading wins over error, error wins over data.
    pub fn display(&self) -> EventDisplay<'_> {
        if self.is_loading {
            EventDisplay::Loading
        } else if let Some(ref err) = self.error {
            EventDisplay::Error(err)
        } else {
            EventDisplay::List(&self.records)
        }
    }
}

/// Which blocks have been asked for, for a watched event subscription.
///
/// Range fetches may complete in any order. A failed range rewinds the
/// request mark to just before its start, so the next head re-requests it
/// (plus anything after it, which dedup absorbs).
#[derive(Debug)]
pub struct EventSync {
    from_block: u64,
    watch: bool,
    requested_through: Option<u64>,
    initial_pending: bool,
}

impl EventSync {
    pub fn new(from_block: u64, watch: bool) -> Self {
        Self {
            from_block,
            watch,
            requested_through: None,
            initial_pending: false,
        }
    }

    /// Start of the initial scan, which runs up to whatever the head is.
    pub fn start(&mut self) -> u64 {
        self.initial_pending = true;
        self.from_block
    }

    /// Range to fetch now that the head is at `head`, if any. Nothing is
    /// requested while the initial scan is still out.
    pub fn next_range(&mut self, head: u64) -> Option<(u64, u64)> {
        if !self.watch || self.initial_pending {
            return None;
        }
        let from = match self.requested_through {
            Some(through) => through + 1,
            None => self.from_block,
        };
        if from > head {
            return None;
        }
        self.requested_through = Some(head);
        Some((from, head))
    }

    /// A fetch covering blocks up to `through_block` succeeded.
    pub fn loaded(&mut self, through_block: u64) {
        // Only the initial scan learns its end on completion; watch ranges
        // were marked when issued.
        if self.initial_pending {
            self.initial_pending = false;
            self.requested_through = Some(
                self.requested_through
                    .map_or(through_block, |t| t.max(through_block)),
            );
        }
    }

    /// The fetch starting at `from` failed.
    pub fn failed(&mut self, from: u64) {
        self.initial_pending = false;
        let rewind = (from > self.from_block).then(|| from - 1);
        self.requested_through = match (self.requested_through, rewind) {
            (Some(current), Some(rewind)) => Some(current.min(rewind)),
            _ => None,
        };
    }
}

/// Split `[from, to]` into inclusive ranges of at most `batch` blocks.
pub fn block_ranges(from: u64, to: u64, batch: u64) -> Vec<(u64, u64)> {
    let batch = batch.max(1);
    let mut ranges = Vec::new();
    let mut start = from;
    while start <= to {
        let end = start.saturating_add(batch - 1).min(to);
        ranges.push((start, end));
        if end == u64::MAX {
            break;
        }
        start = end + 1;
    }
    ranges
}
