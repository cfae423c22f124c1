//! The authoritative inventory: cells, bins, and the reservation protocol.
//!
//! Every hold is staked with a `reserve_*` call and released by exactly one
//! `commit_*` or `rollback_*`.  Misuse (releasing a hold that was never
//! staked, staking on a full cell) is reported as a [`GridError`] rather than
//! clamped, and debug builds re-check the touched cell after every mutation.

use wh_core::{AgentId, BinId, CellId, ItemId, Pos, Tick, Zone};

use crate::{Bin, Cell, CellKind, GridError, GridLayout, GridResult, PickHold, PutHold};

pub struct Grid {
    layout:        GridLayout,
    /// Row-major: `CellId(y * cols + x)`.
    cells:         Vec<Cell>,
    /// Storage cells per zone, row-major.
    zone_cells:    [Vec<CellId>; 3],
    /// First road neighbour of each storage cell.
    road_adjacent: Vec<Option<Pos>>,
    next_bin:      u64,
}

impl Grid {
    pub fn new(layout: GridLayout) -> GridResult<Self> {
        layout.validate()?;

        let mut cells = Vec::with_capacity(layout.rows as usize * layout.cols as usize);
        let mut zone_cells: [Vec<CellId>; 3] = Default::default();
        for y in 0..layout.rows {
            for x in 0..layout.cols {
                let pos = Pos::new(x, y);
                let id = CellId(cells.len() as u32);
                let kind = layout.cell_kind(pos);
                if let CellKind::Storage(zone) = kind {
                    zone_cells[zone.index()].push(id);
                }
                cells.push(Cell::new(id, pos, kind, layout.capacity));
            }
        }

        let road_adjacent = cells
            .iter()
            .map(|c: &Cell| {
                if !c.is_storage() {
                    return None;
                }
                c.pos
                    .neighbors(layout.cols, layout.rows)
                    .find(|&n| layout.cell_kind(n).is_road())
            })
            .collect();

        Ok(Self { layout, cells, zone_cells, road_adjacent, next_bin: 0 })
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    #[inline]
    pub fn layout(&self) -> &GridLayout {
        &self.layout
    }

    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Panics on an id from another grid, like indexing a `Vec`.
    #[inline]
    pub fn cell(&self, id: CellId) -> &Cell {
        &self.cells[id.index()]
    }

    #[inline]
    pub fn get(&self, id: CellId) -> Option<&Cell> {
        self.cells.get(id.index())
    }

    pub fn id_at(&self, pos: Pos) -> Option<CellId> {
        self.layout
            .contains(pos)
            .then(|| CellId(pos.y as u32 * self.layout.cols as u32 + pos.x as u32))
    }

    pub fn cell_at(&self, pos: Pos) -> Option<&Cell> {
        self.id_at(pos).map(|id| &self.cells[id.index()])
    }

    #[inline]
    pub fn is_road(&self, pos: Pos) -> bool {
        self.cell_at(pos).is_some_and(|c| c.kind.is_road())
    }

    /// Storage cells of `zone` in row-major order.
    #[inline]
    pub fn zone_cells(&self, zone: Zone) -> &[CellId] {
        &self.zone_cells[zone.index()]
    }

    /// The road cell an agent stands on to serve `id`.
    #[inline]
    pub fn road_adjacent(&self, id: CellId) -> Option<Pos> {
        self.road_adjacent.get(id.index()).copied().flatten()
    }

    pub fn zone_bins(&self, zone: Zone) -> u32 {
        self.zone_cells(zone).iter().map(|&id| self.cell(id).bins()).sum()
    }

    pub fn zone_capacity(&self, zone: Zone) -> u32 {
        self.zone_cells(zone).iter().map(|&id| self.cell(id).capacity).sum()
    }

    /// `bins / capacity` for the zone, 0 for an empty zone.
    pub fn zone_load(&self, zone: Zone) -> f64 {
        let cap = self.zone_capacity(zone);
        if cap == 0 { 0.0 } else { self.zone_bins(zone) as f64 / cap as f64 }
    }

    // ── Fixed slotting ────────────────────────────────────────────────────

    #[inline]
    pub fn fixed_slot_count(&self) -> usize {
        self.zone_cells(Zone::Fixed).len()
    }

    /// Hand fixed cells to `sequence` in column-major order (x, then y).
    /// Returns the number of cells assigned.
    pub fn assign_fixed_slots(&mut self, sequence: &[ItemId]) -> usize {
        let mut order: Vec<CellId> = self.zone_cells(Zone::Fixed).to_vec();
        order.sort_by_key(|&id| {
            let p = self.cells[id.index()].pos;
            (p.x, p.y)
        });
        for &id in &order {
            self.cells[id.index()].fixed_item = None;
        }
        let mut assigned = 0;
        for (&id, &item) in order.iter().zip(sequence) {
            self.cells[id.index()].fixed_item = Some(item);
            assigned += 1;
        }
        for &id in &order {
            let cell = &mut self.cells[id.index()];
            cell.correct_bins = 0;
            cell.wrong_bins = 0;
            let items: Vec<ItemId> = cell.contents.iter().map(|b| b.item).collect();
            for item in items {
                cell.classify(item, true);
            }
        }
        assigned
    }

    // ── Put protocol ──────────────────────────────────────────────────────

    /// Stake a put hold for `item` on behalf of `by`.
    pub fn reserve_put(&mut self, id: CellId, item: ItemId, by: AgentId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        if cell.free_for_put() == 0 {
            return Err(GridError::CellFull(id));
        }
        cell.ledger.puts.push(PutHold { item, by });
        debug_assert!(cell.bins() + cell.ledger.total() <= cell.capacity);
        self.debug_check(id);
        Ok(())
    }

    /// Release the put hold and store the bin.
    ///
    /// The hold is consumed even when the commit fails: a cell that is
    /// physically full at arrival returns `CapacityConflict` and the caller
    /// goes home with the bin.
    pub fn commit_put(
        &mut self,
        id:   CellId,
        item: ItemId,
        by:   AgentId,
        now:  Tick,
    ) -> GridResult<BinId> {
        let bin_id = BinId(self.next_bin);
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_put(item, by) {
            return Err(GridError::NoSuchHold(id));
        }
        if cell.bins() + 1 > cell.capacity {
            return Err(GridError::CapacityConflict(id));
        }
        cell.contents.push(Bin { id: bin_id, item, arrival: now });
        cell.classify(item, true);
        self.next_bin += 1;
        self.debug_check(id);
        Ok(bin_id)
    }

    pub fn rollback_put(&mut self, id: CellId, item: ItemId, by: AgentId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_put(item, by) {
            return Err(GridError::NoSuchHold(id));
        }
        self.debug_check(id);
        Ok(())
    }

    // ── Pick protocol ─────────────────────────────────────────────────────

    /// Claim an existing, unheld bin for `by`.
    pub fn reserve_pick(&mut self, id: CellId, bin: BinId, by: AgentId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        Self::claimable(cell, bin)?;
        cell.ledger.picks.push(PickHold { bin, by });
        self.debug_check(id);
        Ok(())
    }

    /// Release the pick hold and remove the bin.
    pub fn commit_pick(&mut self, id: CellId, bin: BinId, by: AgentId) -> GridResult<Bin> {
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_pick(bin, by) {
            return Err(GridError::NoSuchHold(id));
        }
        let removed = Self::remove_bin(cell, bin)?;
        self.debug_check(id);
        Ok(removed)
    }

    pub fn rollback_pick(&mut self, id: CellId, bin: BinId, by: AgentId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_pick(bin, by) {
            return Err(GridError::NoSuchHold(id));
        }
        self.debug_check(id);
        Ok(())
    }

    /// Drop every pick hold staked by `by`, anywhere.  Returns how many.
    pub fn release_picks_by(&mut self, by: AgentId) -> usize {
        let mut released = 0;
        for cell in &mut self.cells {
            let before = cell.ledger.picks.len();
            cell.ledger.picks.retain(|h| h.by != by);
            released += before - cell.ledger.picks.len();
        }
        released
    }

    // ── Repair protocol ───────────────────────────────────────────────────

    /// Claim a misplaced bin for a surveyor repair ticket.
    pub fn reserve_repair(&mut self, id: CellId, bin: BinId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        Self::claimable(cell, bin)?;
        cell.ledger.repairs.push(bin);
        self.debug_check(id);
        Ok(())
    }

    /// Release the repair hold and remove the bin.
    pub fn commit_repair(&mut self, id: CellId, bin: BinId) -> GridResult<Bin> {
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_repair(bin) {
            return Err(GridError::NoSuchHold(id));
        }
        let removed = Self::remove_bin(cell, bin)?;
        self.debug_check(id);
        Ok(removed)
    }

    pub fn rollback_repair(&mut self, id: CellId, bin: BinId) -> GridResult<()> {
        let cell = self.storage_mut(id)?;
        if !cell.ledger.take_repair(bin) {
            return Err(GridError::NoSuchHold(id));
        }
        self.debug_check(id);
        Ok(())
    }

    // ── Seeding and reset ─────────────────────────────────────────────────

    /// Place a bin directly, bypassing the put gate but not physical capacity.
    /// Outstanding put holds may end up overbooked; their commits then fail
    /// with `CapacityConflict`.
    pub fn place_bin(&mut self, id: CellId, item: ItemId, now: Tick) -> GridResult<BinId> {
        let bin_id = BinId(self.next_bin);
        let cell = self.storage_mut(id)?;
        if cell.bins() >= cell.capacity {
            return Err(GridError::CellFull(id));
        }
        cell.contents.push(Bin { id: bin_id, item, arrival: now });
        cell.classify(item, true);
        self.next_bin += 1;
        Ok(bin_id)
    }

    /// Empty every cell.  Fixed-slot assignments and the layout survive.
    pub fn reset(&mut self) {
        for cell in &mut self.cells {
            cell.clear();
        }
    }

    /// Empty the cells of one zone.
    pub fn reset_zone(&mut self, zone: Zone) {
        for &id in &self.zone_cells[zone.index()] {
            self.cells[id.index()].clear();
        }
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Verify every capacity and ledger invariant on every cell.
    pub fn check_invariants(&self) -> GridResult<()> {
        self.cells.iter().try_for_each(check_cell)
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn storage_mut(&mut self, id: CellId) -> GridResult<&mut Cell> {
        let cell = self.cells.get_mut(id.index()).ok_or(GridError::UnknownCell(id))?;
        if !cell.is_storage() {
            return Err(GridError::NotStorage(id));
        }
        Ok(cell)
    }

    fn claimable(cell: &Cell, bin: BinId) -> GridResult<()> {
        if cell.bin(bin).is_none() {
            return Err(GridError::BinNotFound { cell: cell.id, bin });
        }
        if cell.ledger.holds_bin(bin) {
            return Err(GridError::BinHeld { cell: cell.id, bin });
        }
        Ok(())
    }

    fn remove_bin(cell: &mut Cell, bin: BinId) -> GridResult<Bin> {
        let pos = cell
            .contents
            .iter()
            .position(|b| b.id == bin)
            .ok_or(GridError::BinNotFound { cell: cell.id, bin })?;
        let removed = cell.contents.remove(pos);
        cell.classify(removed.item, false);
        Ok(removed)
    }

    #[inline]
    fn debug_check(&self, id: CellId) {
        if cfg!(debug_assertions) {
            if let Err(e) = check_cell(&self.cells[id.index()]) {
                panic!("grid invariant broken: {e}");
            }
        }
    }
}

fn check_cell(cell: &Cell) -> GridResult<()> {
    let fail = |what: String| Err(GridError::InvariantViolated { cell: cell.id, what });
    let bins = cell.bins();

    if bins > cell.capacity {
        return fail(format!("{bins} bins exceed capacity {}", cell.capacity));
    }

    let mut claimed: Vec<BinId> = cell
        .ledger
        .picks
        .iter()
        .map(|h| h.bin)
        .chain(cell.ledger.repairs.iter().copied())
        .collect();
    if let Some(b) = claimed.iter().find(|&&b| cell.bin(b).is_none()) {
        return fail(format!("hold on missing bin {b}"));
    }
    claimed.sort_unstable();
    if claimed.windows(2).any(|w| w[0] == w[1]) {
        return fail("bin held twice".into());
    }

    if cell.fixed_item.is_some() && cell.correct_bins + cell.wrong_bins != bins {
        return fail(format!(
            "correct {} + wrong {} != bins {bins}",
            cell.correct_bins, cell.wrong_bins
        ));
    }
    if !cell.is_storage() && (bins > 0 || !cell.ledger.is_empty()) {
        return fail("road cell holds inventory".into());
    }
    Ok(())
}
