//! Core block primitives for roundchain.
//!
//! This crate provides the fundamental types shared by every other crate:
//! - Block records and the hard-coded genesis block
//! - Opaque block headers backed by OS entropy
//! - Attestation strings binding a header to a node identity

pub mod block;
pub mod header;

// Re-export commonly used types at the crate root
pub use block::{current_timestamp, Block, GENESIS_HEADER, GENESIS_SEQUENCE};
pub use header::{CoreError, Header, Result, Signature, HEADER_ENTROPY_BYTES};
