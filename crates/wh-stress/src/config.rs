//! Stress phases and round timing.

use crate::{StressError, StressResult};

/// One load level: the worker and picker count applied to every zone for a
/// round.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Phase {
    pub label:   String,
    pub workers: usize,
    pub pickers: usize,
}

impl Phase {
    pub fn new(label: impl Into<String>, workers: usize, pickers: usize) -> Self {
        Self { label: label.into(), workers, pickers }
    }
}

/// Low 8/10, Medium 8/8, Busy 10/10, High 10/5.
pub fn default_phases() -> Vec<Phase> {
    vec![
        Phase::new("Low", 8, 10),
        Phase::new("Medium", 8, 8),
        Phase::new("Busy", 10, 10),
        Phase::new("High", 10, 5),
    ]
}

/// Timing is in simulated milliseconds: a round of `round_ms` at
/// `tick_interval_ms` lasts `round_ms / tick_interval_ms` ticks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StressConfig {
    pub round_ms:         u64,
    /// Overflow counters are checked this often.
    pub poll_ms:          u64,
    /// A zone fails once its overflow counter reaches this.
    pub overflow_limit:   u64,
    /// Tick interval during the run; the previous one is restored after.
    pub tick_interval_ms: u32,
    pub phases:           Vec<Phase>,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            round_ms:         30_000,
            poll_ms:          250,
            overflow_limit:   100,
            tick_interval_ms: 2,
            phases:           default_phases(),
        }
    }
}

impl StressConfig {
    pub fn validate(&self) -> StressResult<()> {
        if self.phases.is_empty() {
            return Err(StressError::Config("at least one phase is required".into()));
        }
        if self.tick_interval_ms == 0 {
            return Err(StressError::Config("tick_interval_ms must be at least 1".into()));
        }
        if self.round_ms < self.tick_interval_ms as u64 {
            return Err(StressError::Config(format!(
                "round_ms ({}) is shorter than one tick ({} ms)",
                self.round_ms, self.tick_interval_ms
            )));
        }
        if self.poll_ms == 0 || self.poll_ms > self.round_ms {
            return Err(StressError::Config(format!(
                "poll_ms must lie in 1..={}, got {}",
                self.round_ms, self.poll_ms
            )));
        }
        if self.overflow_limit == 0 {
            return Err(StressError::Config("overflow_limit must be at least 1".into()));
        }
        Ok(())
    }

    /// Ticks in one full round.
    pub fn round_ticks(&self) -> u64 {
        self.round_ms / self.tick_interval_ms.max(1) as u64
    }
}
