//! Everything one zone owns besides its cells.

use wh_agent::{BinIndex, EventLog, Picker, RepairQueue, Worker, ZoneStats};
use wh_alloc::AllocationStrategy;
use wh_catalog::ItemStream;
use wh_core::Zone;

/// Agents, streams, counters and log of one zone.
///
/// The scheduler borrows these fields disjointly, together with the shared
/// grid, to build a `ZoneContext` for the zone's agents.
pub struct ZoneState {
    pub zone:       Zone,
    pub strategy:   Box<dyn AllocationStrategy>,
    pub deliveries: ItemStream,
    pub orders:     ItemStream,
    pub index:      BinIndex,
    /// Repair tickets.  Only the fixed zone's queue is ever filled.
    pub repairs:    RepairQueue,
    pub stats:      ZoneStats,
    pub log:        EventLog,
    pub workers:    Vec<Worker>,
    pub pickers:    Vec<Picker>,
    /// Frozen by the stress controller: agents removed, no stepping.
    pub failed:     bool,
}

impl ZoneState {
    pub(crate) fn new(
        zone:       Zone,
        strategy:   Box<dyn AllocationStrategy>,
        deliveries: ItemStream,
        orders:     ItemStream,
    ) -> Self {
        Self {
            zone,
            strategy,
            deliveries,
            orders,
            index: BinIndex::default(),
            repairs: RepairQueue::default(),
            stats: ZoneStats::default(),
            log: EventLog::default(),
            workers: Vec::new(),
            pickers: Vec::new(),
            failed: false,
        }
    }

    /// Clear counters, log, index and tickets and rewind both item streams.
    /// Agents are left to the caller.
    pub(crate) fn clear(&mut self) {
        self.index.clear();
        self.repairs.clear();
        self.stats.reset();
        self.log.clear();
        self.deliveries.restart();
        self.orders.restart();
        self.failed = false;
    }

    /// Mean over every order duration in the pickers' rolling windows.
    pub fn avg_pick_ticks(&self) -> Option<f64> {
        let (sum, count) = self
            .pickers
            .iter()
            .flat_map(Picker::durations)
            .fold((0u64, 0usize), |(sum, count), d| (sum + d, count + 1));
        (count > 0).then(|| sum as f64 / count as f64)
    }
}
