//! HTTP gossip transport for roundchain.
//!
//! A node pushes its whole chain to every configured peer with
//! `POST http://<peer>/blocks`. There is no retry and no acknowledgement
//! beyond the immediate response.

pub mod gossip;

pub use gossip::{blocks_url, BroadcastPolicy, GossipClient, GossipConfig, GossipError, Result};
