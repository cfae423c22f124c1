use wh_catalog::Item;
use wh_core::{AgentId, AgentRng, CellId, Zone};
use wh_grid::Grid;

use crate::strategy::stake;
use crate::AllocationStrategy;

/// Fixed-slot storage.
///
/// Prefers an idle shelf assigned to the item; otherwise any idle fixed shelf
/// with room (that delivery becomes shadow stock).  "Idle" means no put hold
/// outstanding.  Ties are broken uniformly at random.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSlotting;

impl AllocationStrategy for FixedSlotting {
    fn zone(&self) -> Zone {
        Zone::Fixed
    }

    fn allocate(
        &self,
        grid: &mut Grid,
        item: &Item,
        by:   AgentId,
        rng:  &mut AgentRng,
    ) -> Option<CellId> {
        let idle: Vec<CellId> = grid
            .zone_cells(Zone::Fixed)
            .iter()
            .copied()
            .filter(|&id| {
                let c = grid.cell(id);
                c.free_for_put() > 0 && c.ledger().puts().is_empty()
            })
            .collect();

        let matching: Vec<CellId> = idle
            .iter()
            .copied()
            .filter(|&id| grid.cell(id).fixed_item == Some(item.id))
            .collect();

        let pool = if matching.is_empty() { &idle } else { &matching };
        let cell = *rng.choose(pool)?;
        stake(grid, cell, item, by)
    }
}
