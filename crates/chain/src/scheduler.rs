//! Production and propagation loops.
//!
//! The two loops never talk to each other. Each polls the clock on its own
//! interval and touches only the shared [`Chain`]. Neither ever returns.

use crate::chain::Chain;
use roundchain_consensus::{Clock, ProductionTrigger, PropagationTrigger, SlotConfig};
use roundchain_network::GossipClient;
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info, warn};

/// Default poll interval of the production loop.
pub const PRODUCTION_POLL: Duration = Duration::from_secs(1);

/// Default poll interval of the propagation loop.
pub const PROPAGATION_POLL: Duration = Duration::from_millis(1);

/// Produce a block each time step zero is first observed.
pub async fn run_production<C: Clock>(chain: Chain, slot: SlotConfig, clock: C, poll: Duration) {
    let mut trigger = ProductionTrigger::new(slot);
    let mut ticker = time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        let Some(round) = trigger.observe(clock.now()) else {
            continue;
        };

        match chain.produce(round) {
            Ok(block) => info!(
                round,
                sequence = block.sequence_number,
                header = ?block.header,
                "produced block"
            ),
            Err(e) => error!(round, error = %e, "block production failed"),
        }
    }
}

/// Broadcast the whole chain on every observed step change.
pub async fn run_propagation<C: Clock>(
    chain: Chain,
    gossip: GossipClient,
    slot: SlotConfig,
    clock: C,
    poll: Duration,
) {
    let mut trigger = PropagationTrigger::new(slot);
    let mut ticker = time::interval(poll);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        ticker.tick().await;
        if !trigger.observe(clock.now()) {
            continue;
        }

        let blocks = chain.snapshot();
        debug!(step = trigger.last_step(), blocks = blocks.len(), "step changed, propagating");
        match gossip.broadcast(&blocks).await {
            Ok(delivered) => debug!(delivered, "propagation finished"),
            Err(e) => warn!(error = %e, "propagation failed"),
        }
    }
}
