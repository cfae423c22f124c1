//! Simulation observer trait for progress reporting and data collection.

use wh_core::Tick;

use crate::{Kpis, Snapshot};

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] and
/// [`Sim::run_ticks`][crate::Sim::run_ticks] at tick boundaries.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: overflow watcher
///
/// ```rust,ignore
/// struct OverflowWatch;
///
/// impl SimObserver for OverflowWatch {
///     fn on_tick_end(&mut self, tick: Tick, kpis: &Kpis) {
///         for z in &kpis.zones {
///             if z.overflow > 0 {
///                 println!("{tick}: {} overflow {}", z.zone, z.overflow);
///             }
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before staged commands apply.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called after every agent has stepped, with the freshly computed KPIs.
    fn on_tick_end(&mut self, _tick: Tick, _kpis: &Kpis) {}

    /// Called every `config.sim.output_interval_ticks` ticks with the full
    /// read-only view of the floor.
    fn on_snapshot(&mut self, _tick: Tick, _snapshot: &Snapshot) {}

    /// Called once after the final tick of `run`.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
