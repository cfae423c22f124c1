//! The `AllocationStrategy` trait.
//!
//! # Contract
//!
//! `allocate` either returns `None` (no qualifying cell: the caller records
//! an overflow) or returns a cell on which it has **already** staked a put
//! hold for `(item, by)`.  The hold is released later by exactly one
//! `Grid::commit_put` or `Grid::rollback_put`.
//!
//! Strategies are stateless; all state lives in the grid ledger.

use wh_catalog::Item;
use wh_core::{AgentId, AgentRng, CellId, Zone};
use wh_grid::Grid;

use crate::{ChaoticSlotting, FixedSlotting, HybridPolicy, HybridSlotting};

/// Pluggable shelf selection for one zone.
pub trait AllocationStrategy: Send + Sync + 'static {
    /// The zone whose cells this strategy hands out.
    fn zone(&self) -> Zone;

    /// Pick a cell for `item` and stake a put hold on it for `by`.
    fn allocate(
        &self,
        grid: &mut Grid,
        item: &Item,
        by:   AgentId,
        rng:  &mut AgentRng,
    ) -> Option<CellId>;

    /// Short label for logs.
    fn name(&self) -> &'static str {
        self.zone().as_str()
    }
}

/// The stock strategy for `zone`.
pub fn strategy_for(zone: Zone, hybrid: &HybridPolicy) -> Box<dyn AllocationStrategy> {
    match zone {
        Zone::Fixed  => Box::new(FixedSlotting),
        Zone::Chaos  => Box::new(ChaoticSlotting),
        Zone::Hybrid => Box::new(HybridSlotting::new(hybrid.clone())),
    }
}

/// Stake the hold and hand back the cell, or `None` if the grid refused.
pub(crate) fn stake(grid: &mut Grid, cell: CellId, item: &Item, by: AgentId) -> Option<CellId> {
    match grid.reserve_put(cell, item.id, by) {
        Ok(()) => Some(cell),
        Err(e) => {
            tracing::warn!(%cell, error = %e, "put reservation refused");
            None
        }
    }
}
