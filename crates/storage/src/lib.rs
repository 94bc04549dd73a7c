//! In-memory chain storage for roundchain.
//!
//! The store keeps every known block keyed by its header, together with the
//! tip pointer and the tip sequence counter. Nothing is persisted; the store
//! lives exactly as long as the node process.
//!
//! # Example
//!
//! ```rust
//! use roundchain_core::{Block, Header};
//! use roundchain_storage::ChainStore;
//!
//! let mut store = ChainStore::with_genesis(Block::genesis());
//! assert_eq!(store.tip_sequence(), 1);
//!
//! let seq = store.next_sequence();
//! let parent = store.tip().cloned().unwrap_or_default();
//! let block = Block::new(Header::new("b2"), parent, seq, 1, "divya");
//! store.put_block(block);
//! store.set_tip(Header::new("b2"));
//!
//! assert_eq!(store.len(), 2);
//! assert_eq!(store.blocks_in_range(2, 3).len(), 1);
//! ```

pub mod chain;

pub use chain::ChainStore;
