//! Surveyor repair tickets.

use std::collections::VecDeque;

use tracing::warn;

use wh_core::{BinId, CellId, ItemId};
use wh_grid::Grid;

/// A misplaced bin the surveyor wants removed.  The bin is under a repair
/// hold for as long as the ticket is alive.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RepairTicket {
    pub cell: CellId,
    pub bin:  BinId,
    pub item: ItemId,
}

impl RepairTicket {
    /// `true` if the bin is still on the shelf under this ticket's hold.
    pub fn is_live(&self, grid: &Grid) -> bool {
        grid.get(self.cell).is_some_and(|c| {
            c.bin(self.bin).is_some() && c.ledger().repairs().contains(&self.bin)
        })
    }

    /// Roll back the repair hold if the ledger still carries it.  Returns
    /// `true` if a hold was released.
    pub fn release(&self, grid: &mut Grid) -> bool {
        let held = grid.get(self.cell).is_some_and(|c| c.ledger().repairs().contains(&self.bin));
        if !held {
            return false;
        }
        match grid.rollback_repair(self.cell, self.bin) {
            Ok(()) => true,
            Err(e) => {
                warn!(cell = %self.cell, bin = %self.bin, error = %e, "repair hold rollback failed");
                false
            }
        }
    }
}

/// Published, unconsumed tickets in publication order.
#[derive(Clone, Debug, Default)]
pub struct RepairQueue {
    tickets: VecDeque<RepairTicket>,
}

impl RepairQueue {
    pub fn push(&mut self, ticket: RepairTicket) {
        self.tickets.push_back(ticket);
    }

    /// Return a ticket ahead of everything else (used by retiring pickers).
    pub fn push_front(&mut self, ticket: RepairTicket) {
        self.tickets.push_front(ticket);
    }

    pub fn pop(&mut self) -> Option<RepairTicket> {
        self.tickets.pop_front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RepairTicket> {
        self.tickets.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.tickets.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tickets.is_empty()
    }

    /// Drop every ticket and roll back its repair hold.  Returns how many
    /// tickets were dropped.
    pub fn discard_all(&mut self, grid: &mut Grid) -> usize {
        let n = self.tickets.len();
        for t in self.tickets.drain(..) {
            t.release(grid);
        }
        n
    }

    /// Forget every ticket without touching the grid (after a grid reset).
    pub fn clear(&mut self) {
        self.tickets.clear();
    }
}
