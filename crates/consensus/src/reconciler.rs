//! Merging of blocks received from peers.
//!
//! Every unknown block bumps the local sequence counter. A block whose
//! claimed `number` reaches at least one below the bumped counter becomes
//! the new tip. Anything claiming an earlier position is inserted at that
//! position after shifting every stored block at or past it up by one.
//!
//! No parent, signature or round check happens here. Batches merge block by
//! block, so the same blocks delivered in a different order can end up
//! with different sequence numbers; only re-delivery of a known header is
//! guaranteed to be a no-op.

use roundchain_core::Block;
use roundchain_storage::ChainStore;

/// What happened to a single ingested block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestOutcome {
    /// The header was already known.
    Duplicate,
    /// The block became the tip at this sequence number.
    Appended(u64),
    /// The block was inserted behind the tip at this sequence number.
    Inserted(u64),
}

/// Tally of a batch ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    pub appended: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

impl IngestReport {
    /// Count one outcome.
    pub fn record(&mut self, outcome: IngestOutcome) {
        match outcome {
            IngestOutcome::Duplicate => self.duplicates += 1,
            IngestOutcome::Appended(_) => self.appended += 1,
            IngestOutcome::Inserted(_) => self.inserted += 1,
        }
    }

    /// Number of blocks that were new to the store.
    pub fn accepted(&self) -> usize {
        self.appended + self.inserted
    }
}

/// Positional block merger.
pub struct Reconciler;

impl Reconciler {
    /// Merge one block into the store.
    pub fn ingest_block(store: &mut ChainStore, mut block: Block) -> IngestOutcome {
        if store.contains(&block.header) {
            return IngestOutcome::Duplicate;
        }

        let counter = store.next_sequence();
        let claimed = block.number;

        if claimed >= counter.saturating_sub(1) {
            block.sequence_number = counter;
            let header = block.header.clone();
            store.put_block(block);
            store.set_tip(header);
            return IngestOutcome::Appended(counter);
        }

        store.shift_from(claimed);
        block.sequence_number = claimed;
        store.put_block(block);
        IngestOutcome::Inserted(claimed)
    }

    /// Merge a batch in the order given.
    pub fn ingest(store: &mut ChainStore, blocks: impl IntoIterator<Item = Block>) -> IngestReport {
        let mut report = IngestReport::default();
        for block in blocks {
            report.record(Self::ingest_block(store, block));
        }
        report
    }
}
