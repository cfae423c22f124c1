//! Mutable per-zone view handed to every agent step.

use wh_catalog::{Catalog, Item, ItemStream};
use wh_core::{ItemId, Tick, Zone};
use wh_grid::{BfsPathfinder, Grid, Pathfinder, RouteCache};
use wh_alloc::AllocationStrategy;

use crate::{BinIndex, EventLog, RepairQueue, ZoneStats};

/// Everything an agent of `zone` may read or mutate during one tick.
///
/// Built by the scheduler once per zone per tick.  Agents are stepped one at
/// a time, so each step sees every mutation of the steps before it.
pub struct ZoneContext<'a, P: Pathfinder = BfsPathfinder> {
    pub zone:       Zone,
    pub tick:       Tick,
    pub grid:       &'a mut Grid,
    pub routes:     &'a mut RouteCache<P>,
    pub catalog:    &'a Catalog,
    pub strategy:   &'a dyn AllocationStrategy,
    /// Items arriving at the dock.
    pub deliveries: &'a mut ItemStream,
    /// Items requested by orders.
    pub orders:     &'a mut ItemStream,
    pub index:      &'a mut BinIndex,
    pub repairs:    &'a mut RepairQueue,
    pub stats:      &'a mut ZoneStats,
    pub log:        &'a mut EventLog,
}

impl<P: Pathfinder> ZoneContext<'_, P> {
    /// Catalog entry for `id`.  Ids always come from this catalog's streams.
    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.catalog.get(id)
    }

    pub fn item_name(&self, id: ItemId) -> &str {
        self.catalog.name(id)
    }

    /// Append to the zone's event log.
    pub fn note(&mut self, message: impl Into<String>) {
        self.log.push(self.tick, message);
    }
}
