//! Block storage and tip tracking.

use roundchain_core::{Block, Header};
use std::collections::HashMap;

/// Holds every known block plus the tip pointer and sequence counter.
///
/// The tip pointer and the sequence counter move independently: ingestion
/// may bump the counter while inserting a block behind the tip, in which
/// case the tip block is renumbered to match the counter.
#[derive(Debug, Default)]
pub struct ChainStore {
    /// Blocks keyed by header.
    blocks: HashMap<Header, Block>,
    /// Header considered latest by this node.
    tip: Option<Header>,
    /// Highest sequence number handed out so far.
    tip_sequence: u64,
}

impl ChainStore {
    /// Create an empty store with no tip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `genesis` as its tip.
    pub fn with_genesis(genesis: Block) -> Self {
        let mut store = Self::new();
        store.tip_sequence = genesis.sequence_number;
        store.tip = Some(genesis.header.clone());
        store.put_block(genesis);
        store
    }

    // =========================================================================
    // Block Storage
    // =========================================================================

    /// Store a block under its header, replacing any previous entry.
    pub fn put_block(&mut self, block: Block) {
        self.blocks.insert(block.header.clone(), block);
    }

    /// Get a block by header.
    pub fn get(&self, header: &Header) -> Option<&Block> {
        self.blocks.get(header)
    }

    /// Check if a block with this header is known.
    pub fn contains(&self, header: &Header) -> bool {
        self.blocks.contains_key(header)
    }

    /// Number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the store holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Shift every block at or after `from` one position up.
    ///
    /// Returns the number of blocks renumbered.
    pub fn shift_from(&mut self, from: u64) -> usize {
        let mut shifted = 0;
        for block in self.blocks.values_mut() {
            if block.sequence_number >= from {
                block.sequence_number += 1;
                shifted += 1;
            }
        }
        shifted
    }

    // =========================================================================
    // Tip Tracking
    // =========================================================================

    /// Get the tip header.
    pub fn tip(&self) -> Option<&Header> {
        self.tip.as_ref()
    }

    /// Get the tip block.
    pub fn tip_block(&self) -> Option<&Block> {
        self.tip.as_ref().and_then(|header| self.blocks.get(header))
    }

    /// Get the current tip sequence number.
    pub fn tip_sequence(&self) -> u64 {
        self.tip_sequence
    }

    /// Advance the sequence counter and return the new value.
    pub fn next_sequence(&mut self) -> u64 {
        self.tip_sequence += 1;
        self.tip_sequence
    }

    /// Point the tip at `header`.
    pub fn set_tip(&mut self, header: Header) {
        self.tip = Some(header);
    }

    // =========================================================================
    // Read Path
    // =========================================================================

    /// Get blocks with `offset <= sequence_number < limit`, in sequence order.
    pub fn blocks_in_range(&self, offset: u64, limit: u64) -> Vec<Block> {
        let mut blocks: Vec<Block> = self
            .blocks
            .values()
            .filter(|block| block.sequence_number >= offset && block.sequence_number < limit)
            .cloned()
            .collect();
        sort_by_sequence(&mut blocks);
        blocks
    }

    /// Get every stored block, in sequence order.
    pub fn snapshot(&self) -> Vec<Block> {
        let mut blocks: Vec<Block> = self.blocks.values().cloned().collect();
        sort_by_sequence(&mut blocks);
        blocks
    }
}

fn sort_by_sequence(blocks: &mut [Block]) {
    blocks.sort_by(|a, b| {
        a.sequence_number
            .cmp(&b.sequence_number)
            .then_with(|| a.header.cmp(&b.header))
    });
}
