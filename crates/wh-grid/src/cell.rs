//! Cells, bins, and the per-cell reservation ledger.
//!
//! # Reservation model
//!
//! A hold is a record, not a counter, so every hold can be traced to the
//! agent that staked it and released exactly once:
//!
//! | Hold       | Record          | Staked by                    |
//! |------------|-----------------|------------------------------|
//! | put        | `{item, by}`    | allocation strategy (worker) |
//! | pick       | `{bin, by}`     | picker shelf search          |
//! | repair     | `bin`           | surveyor on lap publication  |
//!
//! Put holds claim free capacity.  Pick and repair holds claim an existing
//! bin; a bin carries at most one of them.  The put gate is conservative and
//! subtracts every outstanding hold from free capacity.

use wh_core::{AgentId, BinId, CellId, ItemId, Pos, Tick, Zone};

use crate::CellKind;

// ── Bin ───────────────────────────────────────────────────────────────────────

/// One physical storage unit.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bin {
    pub id:      BinId,
    pub item:    ItemId,
    pub arrival: Tick,
}

// ── Ledger ────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PutHold {
    pub item: ItemId,
    pub by:   AgentId,
}

#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PickHold {
    pub bin: BinId,
    pub by:  AgentId,
}

/// Outstanding holds on one cell.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ledger {
    pub(crate) puts:    Vec<PutHold>,
    pub(crate) picks:   Vec<PickHold>,
    pub(crate) repairs: Vec<BinId>,
}

impl Ledger {
    #[inline]
    pub fn puts(&self) -> &[PutHold] {
        &self.puts
    }

    #[inline]
    pub fn picks(&self) -> &[PickHold] {
        &self.picks
    }

    #[inline]
    pub fn repairs(&self) -> &[BinId] {
        &self.repairs
    }

    /// Number of outstanding holds of every kind.
    #[inline]
    pub fn total(&self) -> u32 {
        (self.puts.len() + self.picks.len() + self.repairs.len()) as u32
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// `true` if `bin` is under a pick or repair hold.
    pub fn holds_bin(&self, bin: BinId) -> bool {
        self.picks.iter().any(|h| h.bin == bin) || self.repairs.contains(&bin)
    }

    /// `true` if `by` already has a put hold for `item` here.
    pub fn has_put(&self, item: ItemId, by: AgentId) -> bool {
        self.puts.iter().any(|h| h.item == item && h.by == by)
    }

    /// Remove one matching put hold.
    pub(crate) fn take_put(&mut self, item: ItemId, by: AgentId) -> bool {
        match self.puts.iter().position(|h| h.item == item && h.by == by) {
            Some(i) => {
                self.puts.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_pick(&mut self, bin: BinId, by: AgentId) -> bool {
        match self.picks.iter().position(|h| h.bin == bin && h.by == by) {
            Some(i) => {
                self.picks.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn take_repair(&mut self, bin: BinId) -> bool {
        match self.repairs.iter().position(|&b| b == bin) {
            Some(i) => {
                self.repairs.remove(i);
                true
            }
            None => false,
        }
    }

    pub(crate) fn clear(&mut self) {
        self.puts.clear();
        self.picks.clear();
        self.repairs.clear();
    }
}

// ── Cell ──────────────────────────────────────────────────────────────────────

/// One grid cell.  Road cells never hold bins or reservations.
///
/// Fields that take part in the capacity invariant are private; mutate them
/// through the reservation API on [`Grid`](crate::Grid).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cell {
    pub id:         CellId,
    pub pos:        Pos,
    pub kind:       CellKind,
    pub capacity:   u32,
    /// Permitted item of a fixed-zone cell.
    pub fixed_item: Option<ItemId>,
    pub(crate) contents:     Vec<Bin>,
    pub(crate) correct_bins: u32,
    pub(crate) wrong_bins:   u32,
    pub(crate) ledger:       Ledger,
}

impl Cell {
    pub(crate) fn new(id: CellId, pos: Pos, kind: CellKind, capacity: u32) -> Self {
        Self {
            id,
            pos,
            kind,
            capacity: if kind.is_road() { 0 } else { capacity },
            fixed_item: None,
            contents: Vec::new(),
            correct_bins: 0,
            wrong_bins: 0,
            ledger: Ledger::default(),
        }
    }

    #[inline]
    pub fn zone(&self) -> Option<Zone> {
        self.kind.zone()
    }

    #[inline]
    pub fn is_storage(&self) -> bool {
        !self.kind.is_road()
    }

    /// Physical bin count (always `contents().len()`).
    #[inline]
    pub fn bins(&self) -> u32 {
        self.contents.len() as u32
    }

    /// Bins in arrival order.
    #[inline]
    pub fn contents(&self) -> &[Bin] {
        &self.contents
    }

    #[inline]
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    #[inline]
    pub fn correct_bins(&self) -> u32 {
        self.correct_bins
    }

    #[inline]
    pub fn wrong_bins(&self) -> u32 {
        self.wrong_bins
    }

    /// Capacity left for a new put hold.
    #[inline]
    pub fn free_for_put(&self) -> u32 {
        self.capacity
            .saturating_sub(self.bins())
            .saturating_sub(self.ledger.total())
    }

    pub fn bin(&self, id: BinId) -> Option<&Bin> {
        self.contents.iter().find(|b| b.id == id)
    }

    /// Bins with no pick or repair hold, in arrival order.
    pub fn unheld_bins(&self) -> impl Iterator<Item = &Bin> {
        self.contents.iter().filter(|b| !self.ledger.holds_bin(b.id))
    }

    /// Oldest unheld bin of `item`.
    pub fn oldest_unheld(&self, item: ItemId) -> Option<&Bin> {
        self.unheld_bins().find(|b| b.item == item)
    }

    /// `true` if the bin sits in a fixed cell it does not belong to.
    pub fn is_misplaced(&self, bin: &Bin) -> bool {
        matches!(self.fixed_item, Some(fixed) if fixed != bin.item)
    }

    /// Adjust the fixed-zone correctness counters for a bin entering (+) or
    /// leaving (-) the cell.
    pub(crate) fn classify(&mut self, item: ItemId, entering: bool) {
        let Some(fixed) = self.fixed_item else { return };
        let counter = if fixed == item { &mut self.correct_bins } else { &mut self.wrong_bins };
        if entering {
            *counter += 1;
        } else {
            *counter = counter.saturating_sub(1);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.contents.clear();
        self.ledger.clear();
        self.correct_bins = 0;
        self.wrong_bins = 0;
    }
}
