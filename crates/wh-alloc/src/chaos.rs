use wh_catalog::Item;
use wh_core::{AgentId, AgentRng, CellId, Zone};
use wh_grid::Grid;

use crate::strategy::stake;
use crate::AllocationStrategy;

/// Chaotic storage: first shelf with room, farthest column first.
///
/// Columns are scanned from the highest x down; within a column, rows in grid
/// order.  A shelf where the same agent already holds a put for the same item
/// is skipped.  Deterministic: the RNG is not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaoticSlotting;

impl ChaoticSlotting {
    /// Scan order over the zone's cells.
    pub fn scan_order(grid: &Grid) -> Vec<CellId> {
        let mut order = grid.zone_cells(Zone::Chaos).to_vec();
        // Stable: row order survives within a column.
        order.sort_by_key(|&id| std::cmp::Reverse(grid.cell(id).pos.x));
        order
    }
}

impl AllocationStrategy for ChaoticSlotting {
    fn zone(&self) -> Zone {
        Zone::Chaos
    }

    fn allocate(
        &self,
        grid: &mut Grid,
        item: &Item,
        by:   AgentId,
        _rng: &mut AgentRng,
    ) -> Option<CellId> {
        let cell = Self::scan_order(grid).into_iter().find(|&id| {
            let c = grid.cell(id);
            c.free_for_put() > 0 && !c.ledger().has_put(item.id, by)
        })?;
        stake(grid, cell, item, by)
    }
}
