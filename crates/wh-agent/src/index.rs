//! Item → bin locations lookup for chaos and hybrid pickers.
//!
//! Entries are added when a worker commits a put and removed when a picker
//! commits a pick.  Whether a bin is currently claimed is not tracked here;
//! callers ask the grid ledger.

use std::collections::HashMap;

use wh_core::{BinId, CellId, ItemId, Tick};
use wh_grid::Grid;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BinLocation {
    pub cell:    CellId,
    pub bin:     BinId,
    pub arrival: Tick,
}

#[derive(Clone, Debug, Default)]
pub struct BinIndex {
    by_item: HashMap<ItemId, Vec<BinLocation>>,
}

impl BinIndex {
    pub fn insert(&mut self, item: ItemId, loc: BinLocation) {
        self.by_item.entry(item).or_default().push(loc);
    }

    /// Remove the entry for `bin`.  Returns `false` if it was not indexed.
    pub fn remove(&mut self, item: ItemId, bin: BinId) -> bool {
        let Some(locs) = self.by_item.get_mut(&item) else { return false };
        match locs.iter().position(|l| l.bin == bin) {
            Some(i) => {
                locs.remove(i);
                true
            }
            None => false,
        }
    }

    /// All indexed locations of `item`, in insertion order.
    pub fn locations(&self, item: ItemId) -> &[BinLocation] {
        self.by_item.get(&item).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Locations of `item` whose bin is not under a pick or repair hold.
    pub fn available<'a>(
        &'a self,
        item: ItemId,
        grid: &'a Grid,
    ) -> impl Iterator<Item = &'a BinLocation> + 'a {
        self.locations(item)
            .iter()
            .filter(move |l| !grid.cell(l.cell).ledger().holds_bin(l.bin))
    }

    /// Oldest available location of `item` (arrival, then cell id).
    pub fn oldest_available(&self, item: ItemId, grid: &Grid) -> Option<BinLocation> {
        self.available(item, grid)
            .min_by_key(|l| (l.arrival, l.cell))
            .copied()
    }

    pub fn len(&self) -> usize {
        self.by_item.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&mut self) {
        self.by_item.clear();
    }
}
