//! Round scheduling, block production and reconciliation for roundchain.
//!
//! This crate holds the chain-state logic of a node:
//! - Slot arithmetic and the production/propagation triggers
//! - Block production on top of the local tip
//! - Positional merging of blocks received from peers
//!
//! # Example
//!
//! ```rust
//! use roundchain_consensus::{BlockProducer, Reconciler, SlotConfig, ProductionTrigger};
//! use roundchain_core::Block;
//! use roundchain_storage::ChainStore;
//!
//! let slot = SlotConfig::new(5, 4).unwrap();
//! let mut trigger = ProductionTrigger::new(slot);
//! let mut store = ChainStore::with_genesis(Block::genesis());
//! let producer = BlockProducer::new("divya");
//!
//! // 40 seconds is the first step zero after the start of round 1
//! if let Some(round) = trigger.observe(40) {
//!     producer.produce(&mut store, round).unwrap();
//! }
//! assert_eq!(store.tip_sequence(), 2);
//!
//! let known = store.snapshot();
//! let report = Reconciler::ingest(&mut store, known);
//! assert_eq!(report.duplicates, 2);
//! ```

pub mod producer;
pub mod reconciler;
pub mod slot;

// Re-export commonly used types
pub use producer::BlockProducer;
pub use reconciler::{IngestOutcome, IngestReport, Reconciler};
pub use slot::{
    Clock, ConsensusError, ProductionTrigger, PropagationTrigger, Result, SlotConfig, SystemClock,
};
