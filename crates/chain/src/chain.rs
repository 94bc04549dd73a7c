//! Shared chain state.
//!
//! The store, the tip pointer and the sequence counter sit behind one mutex.
//! Production, ingestion and reads all take that lock, and nothing holds it
//! across an await point.

use parking_lot::Mutex;
use roundchain_consensus::{BlockProducer, ConsensusError, IngestReport, Reconciler};
use roundchain_core::{Block, Header};
use roundchain_storage::ChainStore;
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during chain operations.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("consensus error: {0}")]
    Consensus(#[from] ConsensusError),
}

pub type Result<T> = std::result::Result<T, ChainError>;

/// Cloneable handle to a node's chain.
#[derive(Clone)]
pub struct Chain {
    store: Arc<Mutex<ChainStore>>,
    producer: Arc<BlockProducer>,
}

impl Chain {
    /// Create a chain seeded with the genesis block.
    pub fn new(identity: impl Into<String>) -> Self {
        Self::with_store(ChainStore::with_genesis(Block::genesis()), identity)
    }

    /// Create a chain around an existing store.
    pub fn with_store(store: ChainStore, identity: impl Into<String>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            producer: Arc::new(BlockProducer::new(identity)),
        }
    }

    /// Identity used when producing blocks.
    pub fn identity(&self) -> &str {
        self.producer.identity()
    }

    /// Produce and record a block for `round`.
    pub fn produce(&self, round: u64) -> Result<Block> {
        let mut store = self.store.lock();
        Ok(self.producer.produce(&mut store, round)?)
    }

    /// Merge blocks received from a peer.
    ///
    /// The lock is taken once per block, so concurrent readers can observe
    /// a partially merged batch.
    pub fn ingest(&self, blocks: Vec<Block>) -> IngestReport {
        let received = blocks.len();
        let mut report = IngestReport::default();
        for block in blocks {
            let outcome = Reconciler::ingest_block(&mut self.store.lock(), block);
            report.record(outcome);
        }
        info!(
            received,
            appended = report.appended,
            inserted = report.inserted,
            duplicates = report.duplicates,
            "ingested blocks"
        );
        report
    }

    /// Blocks with `offset <= sequence_number < limit`, in sequence order.
    pub fn get_blocks(&self, offset: u64, limit: u64) -> Vec<Block> {
        self.store.lock().blocks_in_range(offset, limit)
    }

    /// Every known block, in sequence order.
    pub fn snapshot(&self) -> Vec<Block> {
        self.store.lock().snapshot()
    }

    /// Tip header and tip sequence number.
    pub fn tip(&self) -> Option<(Header, u64)> {
        let store = self.store.lock();
        store.tip().cloned().map(|tip| (tip, store.tip_sequence()))
    }

    /// Number of known blocks.
    pub fn len(&self) -> usize {
        self.store.lock().len()
    }

    /// Check if the chain holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.store.lock().is_empty()
    }
}
