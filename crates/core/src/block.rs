//! Block records and the genesis block.

use crate::header::{Header, Signature};
use serde::{Deserialize, Serialize};

/// Header of the hard-coded genesis block.
pub const GENESIS_HEADER: &str = "AAAAAAAAAAAAAAAAAAAAAA==";

/// Local sequence number of the genesis block.
pub const GENESIS_SEQUENCE: u64 = 1;

/// A block as stored locally and exchanged between peers.
///
/// On the wire a block is `{parentHeader, header, signature, number,
/// timestamp}`. `number` is the round in which the producer created the
/// block, and receivers read it as the position the block claims.
/// `sequence_number` is this node's own position for the block and never
/// leaves the process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Header of the block this one extends (empty for genesis).
    #[serde(default)]
    pub parent_header: Header,
    /// Unique identifier of this block.
    pub header: Header,
    /// Producer attestation over the header.
    #[serde(default)]
    pub signature: Signature,
    /// Production round, read by receivers as the claimed position.
    #[serde(default)]
    pub number: u64,
    /// Unix timestamp in seconds.
    #[serde(default)]
    pub timestamp: i64,
    /// Position assigned by the local node.
    #[serde(skip)]
    pub sequence_number: u64,
}

impl Block {
    /// Create a block for `round` extending `parent_header` at
    /// `sequence_number`.
    pub fn new(
        header: Header,
        parent_header: Header,
        sequence_number: u64,
        round: u64,
        identity: &str,
    ) -> Self {
        let signature = Signature::attest(&header, identity);
        Self {
            parent_header,
            header,
            signature,
            number: round,
            timestamp: current_timestamp(),
            sequence_number,
        }
    }

    /// Create the genesis block.
    pub fn genesis() -> Self {
        Self {
            parent_header: Header::empty(),
            header: Header::new(GENESIS_HEADER),
            signature: Signature::default(),
            number: 0,
            timestamp: 0,
            sequence_number: GENESIS_SEQUENCE,
        }
    }

    /// The round the block was produced in.
    pub fn round(&self) -> u64 {
        self.number
    }

    /// Check if this is the genesis block.
    pub fn is_genesis(&self) -> bool {
        self.header.as_str() == GENESIS_HEADER && self.parent_header.is_empty()
    }
}

/// Get the current Unix timestamp in seconds.
pub fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}
