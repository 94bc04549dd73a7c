//! roundchain node entry point.

use anyhow::{Context, Result};
use clap::Parser;
use roundchain_chain::{scheduler, Chain, LogFormat, NodeConfig};
use roundchain_consensus::SystemClock;
use roundchain_network::{BroadcastPolicy, GossipClient};
use roundchain_server::logging;
use std::net::SocketAddr;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "roundchain")]
#[command(about = "Round-based block production and gossip node", long_about = None)]
struct Cli {
    /// Path to a TOML configuration file. CLI flags and env vars override it.
    #[arg(long, env = "ROUNDCHAIN_CONFIG")]
    config: Option<PathBuf>,

    /// Address to serve HTTP on
    #[arg(long, env = "ROUNDCHAIN_LISTEN")]
    listen: Option<SocketAddr>,

    /// Identity stamped into block signatures
    #[arg(long, env = "ROUNDCHAIN_IDENTITY")]
    identity: Option<String>,

    /// Peer addresses (comma-separated host:port)
    #[arg(long, env = "ROUNDCHAIN_PEERS", value_delimiter = ',')]
    peers: Option<Vec<String>>,

    /// Step length in seconds
    #[arg(long, env = "ROUNDCHAIN_STEP_DURATION")]
    step_duration: Option<u64>,

    /// Steps per round
    #[arg(long, env = "ROUNDCHAIN_STEPS_PER_ROUND")]
    steps_per_round: Option<u64>,

    /// Timeout of a single peer push in milliseconds
    #[arg(long, env = "ROUNDCHAIN_GOSSIP_TIMEOUT_MS")]
    gossip_timeout_ms: Option<u64>,

    /// Keep broadcasting to remaining peers after one fails
    #[arg(long, env = "ROUNDCHAIN_CONTINUE_ON_ERROR")]
    continue_on_error: bool,

    /// Log level: "trace", "debug", "info", "warn", "error"
    #[arg(long, env = "ROUNDCHAIN_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json"
    #[arg(long, env = "ROUNDCHAIN_LOG_FORMAT", value_parser = parse_log_format)]
    log_format: Option<LogFormat>,
}

impl Cli {
    /// Overlay command-line values on `config`.
    fn apply(self, config: &mut NodeConfig) {
        if let Some(listen) = self.listen {
            config.listen = listen;
        }
        if let Some(identity) = self.identity {
            config.identity = identity;
        }
        if let Some(peers) = self.peers {
            config.peers = peers;
        }
        if let Some(step_duration) = self.step_duration {
            config.step_duration_secs = step_duration;
        }
        if let Some(steps_per_round) = self.steps_per_round {
            config.steps_per_round = steps_per_round;
        }
        if let Some(timeout) = self.gossip_timeout_ms {
            config.gossip_timeout_ms = timeout;
        }
        if self.continue_on_error {
            config.broadcast_policy = BroadcastPolicy::ContinueOnError;
        }
        if let Some(level) = self.log_level {
            config.log_level = level;
        }
        if let Some(format) = self.log_format {
            config.log_format = format;
        }
    }
}

fn parse_log_format(s: &str) -> std::result::Result<LogFormat, String> {
    match s.to_lowercase().as_str() {
        "human" => Ok(LogFormat::Human),
        "json" => Ok(LogFormat::Json),
        other => Err(format!("unknown log format {:?}", other)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let mut cli = Cli::parse();

    let mut config = match cli.config.take() {
        Some(path) => NodeConfig::from_toml_file(&path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => NodeConfig::default(),
    };
    cli.apply(&mut config);
    config.validate().context("Invalid configuration")?;

    logging::init_logging(config.log_format, &config.log_level)
        .context("Failed to initialise logging")?;

    let slot = config.slot()?;
    let chain = Chain::new(config.identity.clone());
    let gossip = GossipClient::new(config.gossip()).context("Failed to build gossip client")?;

    info!(
        identity = %config.identity,
        peers = ?config.peers,
        step_duration = slot.step_duration,
        steps_per_round = slot.steps_per_round,
        policy = ?gossip.policy(),
        "starting node"
    );

    tokio::spawn(scheduler::run_production(
        chain.clone(),
        slot,
        SystemClock,
        scheduler::PRODUCTION_POLL,
    ));
    tokio::spawn(scheduler::run_propagation(
        chain.clone(),
        gossip,
        slot,
        SystemClock,
        scheduler::PROPAGATION_POLL,
    ));

    roundchain_server::serve(chain, config.listen)
        .await
        .with_context(|| format!("Failed to serve on {}", config.listen))?;
    Ok(())
}
