//! Node orchestration for roundchain.
//!
//! This crate wires the pieces of a node together:
//! - **Chain**: the shared chain state behind a single lock
//! - **Scheduler**: the production and propagation loops
//! - **Config**: node settings loaded from TOML and overridden by the CLI
//!
//! # Example
//!
//! ```rust,no_run
//! use roundchain_chain::{scheduler, Chain, NodeConfig};
//! use roundchain_consensus::SystemClock;
//! use roundchain_network::GossipClient;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NodeConfig::default();
//! let chain = Chain::new(config.identity.clone());
//! let gossip = GossipClient::new(config.gossip())?;
//! let slot = config.slot()?;
//!
//! tokio::spawn(scheduler::run_production(
//!     chain.clone(),
//!     slot,
//!     SystemClock,
//!     scheduler::PRODUCTION_POLL,
//! ));
//! tokio::spawn(scheduler::run_propagation(
//!     chain.clone(),
//!     gossip,
//!     slot,
//!     SystemClock,
//!     scheduler::PROPAGATION_POLL,
//! ));
//! # Ok(())
//! # }
//! ```

pub mod chain;
pub mod config;
pub mod scheduler;

// Re-export commonly used types
pub use chain::{Chain, ChainError, Result};
pub use config::{ConfigError, LogFormat, NodeConfig};
