//! Node configuration with TOML file support.

use roundchain_consensus::{ConsensusError, SlotConfig};
use roundchain_network::{BroadcastPolicy, GossipConfig};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Peers contacted when none are configured.
pub const DEFAULT_PEERS: &[&str] = &["localhost", "10.1.1.153:8080", "10.1.0.178:8000"];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid slot timing: {0}")]
    Slot(#[from] ConsensusError),

    #[error("node identity must not be empty")]
    EmptyIdentity,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Human,
    /// Newline-delimited JSON.
    Json,
}

/// Configuration for a node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests). Missing keys take defaults.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Address the HTTP server binds to.
    pub listen: SocketAddr,
    /// Identity stamped into produced block signatures.
    pub identity: String,
    /// Peer addresses receiving broadcasts.
    pub peers: Vec<String>,
    /// Step length in seconds.
    pub step_duration_secs: u64,
    /// Steps per round.
    pub steps_per_round: u64,
    /// Timeout of a single peer push in milliseconds.
    pub gossip_timeout_ms: u64,
    /// Behaviour when a peer push fails.
    pub broadcast_policy: BroadcastPolicy,
    /// Log level filter, overridden by `RUST_LOG`.
    pub log_level: String,
    /// Log output format.
    pub log_format: LogFormat,
}

impl Default for NodeConfig {
    fn default() -> Self {
        let slot = SlotConfig::default();
        Self {
            listen: SocketAddr::from(([0, 0, 0, 0], 29177)),
            identity: "divya".to_owned(),
            peers: DEFAULT_PEERS.iter().map(|peer| peer.to_string()).collect(),
            step_duration_secs: slot.step_duration,
            steps_per_round: slot.steps_per_round,
            gossip_timeout_ms: 5_000,
            broadcast_policy: BroadcastPolicy::default(),
            log_level: "info".to_owned(),
            log_format: LogFormat::default(),
        }
    }
}

impl NodeConfig {
    /// Load a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Check that the configuration can run a node.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.slot()?;
        if self.identity.trim().is_empty() {
            return Err(ConfigError::EmptyIdentity);
        }
        Ok(())
    }

    /// Slot timing derived from this configuration.
    pub fn slot(&self) -> Result<SlotConfig, ConfigError> {
        Ok(SlotConfig::new(
            self.step_duration_secs,
            self.steps_per_round,
        )?)
    }

    /// Gossip client settings derived from this configuration.
    pub fn gossip(&self) -> GossipConfig {
        GossipConfig {
            peers: self.peers.clone(),
            timeout: Duration::from_millis(self.gossip_timeout_ms),
            policy: self.broadcast_policy,
            ..GossipConfig::default()
        }
    }
}
