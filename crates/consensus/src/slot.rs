//! Wall-clock slot arithmetic and the two round triggers.
//!
//! Time is cut into steps of `step_duration` seconds, and `steps_per_round`
//! consecutive steps make one round:
//!
//! ```text
//! step = (unix_time / step_duration) mod steps_per_round
//! ```
//!
//! The production trigger fires when step zero is first observed; the
//! propagation trigger fires on every observed step change. Both are polled,
//! so a step that begins and ends between two polls is never seen.

use roundchain_core::{current_timestamp, CoreError};
use thiserror::Error;

/// Errors that can occur during consensus operations.
#[derive(Debug, Error)]
pub enum ConsensusError {
    #[error("step duration must be at least one second")]
    ZeroStepDuration,

    #[error("step duration of {0} seconds is out of range")]
    StepDurationTooLarge(u64),

    #[error("a round must contain at least one step")]
    ZeroStepsPerRound,

    #[error("core error: {0}")]
    Core(#[from] CoreError),
}

pub type Result<T> = std::result::Result<T, ConsensusError>;

/// Slot timing configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    /// Length of one step in seconds.
    pub step_duration: u64,
    /// Number of steps in one round.
    pub steps_per_round: u64,
}

impl Default for SlotConfig {
    fn default() -> Self {
        Self {
            step_duration: 5,
            steps_per_round: 4,
        }
    }
}

impl SlotConfig {
    /// Create a validated slot configuration.
    pub fn new(step_duration: u64, steps_per_round: u64) -> Result<Self> {
        if step_duration == 0 {
            return Err(ConsensusError::ZeroStepDuration);
        }
        if i64::try_from(step_duration).is_err() {
            return Err(ConsensusError::StepDurationTooLarge(step_duration));
        }
        if steps_per_round == 0 {
            return Err(ConsensusError::ZeroStepsPerRound);
        }
        Ok(Self {
            step_duration,
            steps_per_round,
        })
    }

    /// The step index at `unix_time`.
    pub fn step_at(&self, unix_time: i64) -> u64 {
        let step_duration = i64::try_from(self.step_duration.max(1)).unwrap_or(i64::MAX);
        let steps_per_round = i64::try_from(self.steps_per_round.max(1)).unwrap_or(i64::MAX);
        unix_time
            .div_euclid(step_duration)
            .rem_euclid(steps_per_round) as u64
    }

    /// Length of one round in seconds.
    pub fn round_duration(&self) -> u64 {
        self.step_duration.saturating_mul(self.steps_per_round)
    }
}

/// Source of wall-clock time in unix seconds.
pub trait Clock: Send + Sync {
    fn now(&self) -> i64;
}

/// The system clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        current_timestamp()
    }
}

/// Decides when to produce a block.
#[derive(Debug, Clone)]
pub struct ProductionTrigger {
    slot: SlotConfig,
    /// Step seen at the previous poll.
    last_step: Option<u64>,
    /// Round number handed to the next production.
    round: u64,
}

impl ProductionTrigger {
    /// Create a trigger whose first production runs in round 1.
    pub fn new(slot: SlotConfig) -> Self {
        Self {
            slot,
            last_step: None,
            round: 1,
        }
    }

    /// Record a poll at `now`.
    ///
    /// Returns the round to produce for when this poll is the first one to
    /// see step zero; the round counter then advances by `steps_per_round`.
    pub fn observe(&mut self, now: i64) -> Option<u64> {
        let step = self.slot.step_at(now);
        let crossed = step == 0 && self.last_step != Some(0);
        self.last_step = Some(step);

        if !crossed {
            return None;
        }
        let round = self.round;
        self.round = self.round.saturating_add(self.slot.steps_per_round);
        Some(round)
    }

    /// Round number the next production will use.
    pub fn round(&self) -> u64 {
        self.round
    }
}

/// Decides when to propagate the chain to peers.
#[derive(Debug, Clone)]
pub struct PropagationTrigger {
    slot: SlotConfig,
    last_step: u64,
}

impl PropagationTrigger {
    pub fn new(slot: SlotConfig) -> Self {
        Self { slot, last_step: 0 }
    }

    /// Record a poll at `now`; true when the step differs from the last one seen.
    pub fn observe(&mut self, now: i64) -> bool {
        let step = self.slot.step_at(now);
        if step == self.last_step {
            return false;
        }
        self.last_step = step;
        true
    }

    pub fn last_step(&self) -> u64 {
        self.last_step
    }
}
