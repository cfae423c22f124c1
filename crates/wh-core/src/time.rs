//! Simulation time model.
//!
//! # Design
//!
//! Time is a monotonically increasing `Tick` counter.  One tick advances every
//! agent by at most one grid cell (or one commit).  The mapping to wall-clock
//! time is held in `SimClock` and only matters to real-time drivers:
//!
//!   wall_time_ms = tick * tick_interval_ms
//!
//! The engine itself never reads a timer; tests call `Sim::step()` at any
//! cadence they like.

use std::fmt;
use std::time::Duration;

use crate::{WhError, WhResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation tick counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }

    /// Ticks elapsed from `earlier` to `self` (saturating at zero).
    #[inline]
    pub fn since(self, earlier: Tick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// `true` on every `n`-th tick.  Always `false` for `n == 0`.
    #[inline]
    pub fn is_every(self, n: u64) -> bool {
        n > 0 && self.0 % n == 0
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Current tick plus the real-time cadence a driver should tick at.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Milliseconds of wall-clock time between two ticks in real-time mode.
    pub tick_interval_ms: u32,
    /// Advanced by `SimClock::advance()` each step.
    pub current_tick: Tick,
}

impl SimClock {
    pub fn new(tick_interval_ms: u32) -> Self {
        Self {
            tick_interval_ms,
            current_tick: Tick::ZERO,
        }
    }

    /// Advance the clock by one tick and return the new tick.
    #[inline]
    pub fn advance(&mut self) -> Tick {
        self.current_tick = Tick(self.current_tick.0 + 1);
        self.current_tick
    }

    /// Rewind to tick zero, keeping the interval.
    pub fn reset(&mut self) {
        self.current_tick = Tick::ZERO;
    }

    /// The tick interval as a `Duration` (never zero).
    #[inline]
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1) as u64)
    }

    /// Simulated wall-clock milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.current_tick.0 * self.tick_interval_ms as u64
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {} ms/tick", self.current_tick, self.tick_interval_ms)
    }
}

// ── SimConfig ─────────────────────────────────────────────────────────────────

/// Run-level configuration shared by every crate.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SimConfig {
    /// Master RNG seed.  The same seed always produces identical results.
    pub seed: u64,

    /// Real-time cadence in milliseconds.  Irrelevant to `Sim::step()`.
    pub tick_interval_ms: u32,

    /// Ticks executed by `Sim::run`.
    pub total_ticks: u64,

    /// Call `SimObserver::on_snapshot` every N ticks.  0 disables snapshots.
    pub output_interval_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed:                  42,
            tick_interval_ms:      500,
            total_ticks:           2_000,
            output_interval_ticks: 100,
        }
    }
}

impl SimConfig {
    /// The tick at which `Sim::run` stops (inclusive).
    #[inline]
    pub fn end_tick(&self) -> Tick {
        Tick(self.total_ticks)
    }

    /// Construct a `SimClock` pre-configured for this run.
    pub fn make_clock(&self) -> SimClock {
        SimClock::new(self.tick_interval_ms)
    }

    pub fn validate(&self) -> WhResult<()> {
        if self.tick_interval_ms == 0 {
            return Err(WhError::Config("tick_interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}
