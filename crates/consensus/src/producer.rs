//! Local block production.

use crate::slot::Result;
use roundchain_core::{Block, Header};
use roundchain_storage::ChainStore;

/// Produces blocks on top of the local tip.
#[derive(Debug, Clone)]
pub struct BlockProducer {
    /// Identity string stamped into every attestation.
    identity: String,
}

impl BlockProducer {
    /// Create a producer signing as `identity`.
    pub fn new(identity: impl Into<String>) -> Self {
        Self {
            identity: identity.into(),
        }
    }

    /// Get the producer's identity.
    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Produce a block for `round`, record it and make it the tip.
    ///
    /// The header is drawn before the store is touched, so an entropy
    /// failure leaves the store unchanged.
    pub fn produce(&self, store: &mut ChainStore, round: u64) -> Result<Block> {
        let header = Header::random()?;
        let parent_header = store.tip().cloned().unwrap_or_default();
        let sequence = store.next_sequence();

        let block = Block::new(header, parent_header, sequence, round, &self.identity);
        store.put_block(block.clone());
        store.set_tip(block.header.clone());

        Ok(block)
    }
}
