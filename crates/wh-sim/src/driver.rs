//! Real-time cadence on top of [`Sim::step`].
//!
//! The simulation itself has no notion of wall-clock time.  A `Driver` is
//! fed elapsed time by whatever loop owns the clock (a UI frame callback, a
//! sleeping thread, a test) and turns it into whole ticks at the sim's
//! current tick interval.  The leftover fraction carries over.

use std::time::Duration;

use tracing::warn;

use wh_grid::Pathfinder;

use crate::{Sim, SimObserver};

/// Default cap on ticks run by a single [`Driver::advance`].
pub const MAX_CATCH_UP: u64 = 1_000;

#[derive(Clone, Debug)]
pub struct Driver {
    running:      bool,
    carry:        Duration,
    max_catch_up: u64,
}

impl Default for Driver {
    fn default() -> Self {
        Self { running: false, carry: Duration::ZERO, max_catch_up: MAX_CATCH_UP }
    }
}

impl Driver {
    pub fn new() -> Self {
        Self::default()
    }

    /// After a stall, drop backlog beyond `n` ticks instead of replaying it.
    pub fn with_max_catch_up(mut self, n: u64) -> Self {
        self.max_catch_up = n.max(1);
        self
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop ticking and forget any partial interval.
    pub fn stop(&mut self) {
        self.running = false;
        self.carry = Duration::ZERO;
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop and reset the simulation.
    pub fn reset<P: Pathfinder>(&mut self, sim: &mut Sim<P>) {
        self.stop();
        sim.reset();
    }

    /// Account for `elapsed` wall-clock time and run the ticks it covers.
    /// Returns the number of ticks run.
    ///
    /// The interval is re-read before every tick, so a staged
    /// `SetTickInterval` takes effect for the remainder of the same call.
    pub fn advance<P: Pathfinder, O: SimObserver>(
        &mut self,
        sim:      &mut Sim<P>,
        elapsed:  Duration,
        observer: &mut O,
    ) -> u64 {
        if !self.running {
            return 0;
        }
        self.carry += elapsed;
        let mut ran = 0;
        loop {
            let interval = sim.clock.interval();
            if self.carry < interval {
                break;
            }
            if ran == self.max_catch_up {
                warn!(backlog_ms = self.carry.as_millis() as u64, "driver fell behind, dropping backlog");
                self.carry = Duration::ZERO;
                break;
            }
            self.carry -= interval;
            sim.step_with(observer);
            ran += 1;
        }
        ran
    }
}
