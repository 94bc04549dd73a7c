//! Block broadcast over HTTP.

use reqwest::header::CONTENT_TYPE;
use roundchain_core::Block;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Default timeout for a single push.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Default connection timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Errors that can occur while broadcasting.
#[derive(Debug, Error)]
pub enum GossipError {
    #[error("failed to encode blocks: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("peer {peer} unreachable: {source}")]
    Unreachable {
        peer: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("peer {peer} answered {status}: {body}")]
    Rejected {
        peer: String,
        status: u16,
        body: String,
    },
}

pub type Result<T> = std::result::Result<T, GossipError>;

/// What to do with the remaining peers after one fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BroadcastPolicy {
    /// Stop at the first failing peer.
    #[default]
    AbortOnError,
    /// Try every peer and report the first failure afterwards.
    ContinueOnError,
}

/// Gossip client configuration.
#[derive(Debug, Clone)]
pub struct GossipConfig {
    /// Peer addresses as `host[:port]`.
    pub peers: Vec<String>,
    /// Timeout for a whole push.
    pub timeout: Duration,
    /// Timeout for establishing a connection.
    pub connect_timeout: Duration,
    /// Failure handling across peers.
    pub policy: BroadcastPolicy,
}

impl Default for GossipConfig {
    fn default() -> Self {
        Self {
            peers: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            policy: BroadcastPolicy::default(),
        }
    }
}

impl GossipConfig {
    pub fn new(peers: Vec<String>) -> Self {
        Self {
            peers,
            ..Self::default()
        }
    }
}

/// Pushes block sets to a fixed list of peers.
#[derive(Debug, Clone)]
pub struct GossipClient {
    /// HTTP client (reusable connection pool).
    http: reqwest::Client,
    peers: Vec<String>,
    policy: BroadcastPolicy,
}

impl GossipClient {
    /// Create a client for the configured peers.
    pub fn new(config: GossipConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(GossipError::Client)?;
        Ok(Self {
            http,
            peers: config.peers,
            policy: config.policy,
        })
    }

    /// Get the peer list.
    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    /// Get the failure policy.
    pub fn policy(&self) -> BroadcastPolicy {
        self.policy
    }

    /// Push `blocks` to every peer in order.
    ///
    /// Returns the number of peers that accepted the payload. Under
    /// [`BroadcastPolicy::AbortOnError`] the first failure is returned
    /// immediately and later peers are not contacted.
    pub async fn broadcast(&self, blocks: &[Block]) -> Result<usize> {
        let payload = serde_json::to_vec(blocks)?;
        let mut delivered = 0;
        let mut first_error = None;

        for peer in &self.peers {
            match self.push(peer, payload.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => match self.policy {
                    BroadcastPolicy::AbortOnError => return Err(e),
                    BroadcastPolicy::ContinueOnError => {
                        warn!(peer = %peer, error = %e, "broadcast to peer failed");
                        first_error.get_or_insert(e);
                    }
                },
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(delivered),
        }
    }

    async fn push(&self, peer: &str, payload: Vec<u8>) -> Result<()> {
        let url = blocks_url(peer);
        debug!(%url, bytes = payload.len(), "pushing blocks");

        let unreachable = |source| GossipError::Unreachable {
            peer: peer.to_owned(),
            source,
        };

        let response = self
            .http
            .post(&url)
            .header(CONTENT_TYPE, "application/json")
            .body(payload)
            .send()
            .await
            .map_err(unreachable)?;

        let status = response.status();
        let body = response.text().await.map_err(unreachable)?;
        info!(peer = %peer, status = status.as_u16(), body = %body, "peer responded");

        if !status.is_success() {
            return Err(GossipError::Rejected {
                peer: peer.to_owned(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// The ingestion endpoint of `peer`.
pub fn blocks_url(peer: &str) -> String {
    let peer = peer.trim_end_matches('/');
    if peer.starts_with("http://") || peer.starts_with("https://") {
        format!("{}/blocks", peer)
    } else {
        format!("http://{}/blocks", peer)
    }
}
