//! Fixed-slot quota apportionment.
//!
//! `slots` shelves are split between catalog items proportionally to their
//! base weight using the largest-remainder method:
//!
//! 1. every item gets `floor(share × slots)`;
//! 2. leftover slots go to the largest fractional remainders, ties broken by
//!    ABC class (A first) and then catalog order.
//!
//! The result is ordered by class, then catalog order, which is the order in
//! which the grid hands out fixed cells.

use wh_core::ItemId;

use crate::{AbcClass, Catalog};

/// Number of fixed shelves assigned to one item.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct SlotQuota {
    pub item:  ItemId,
    pub class: AbcClass,
    pub slots: usize,
}

/// Apportion `slots` shelves across `catalog`.  The quotas always sum to
/// `slots` (or to 0 for an empty catalog).
pub fn apportion(catalog: &Catalog, slots: usize) -> Vec<SlotQuota> {
    let total = catalog.total_base_weight();
    if catalog.is_empty() || total <= 0.0 {
        return Vec::new();
    }

    let mut quotas: Vec<SlotQuota> = Vec::with_capacity(catalog.len());
    let mut remainders: Vec<(usize, f64)> = Vec::with_capacity(catalog.len());
    for (i, item) in catalog.iter().enumerate() {
        let exact = item.base_weight / total * slots as f64;
        let floor = exact.floor();
        quotas.push(SlotQuota { item: item.id, class: item.class, slots: floor as usize });
        remainders.push((i, exact - floor));
    }

    let assigned: usize = quotas.iter().map(|q| q.slots).sum();
    let mut leftover = slots.saturating_sub(assigned);

    remainders.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then(quotas[a.0].class.cmp(&quotas[b.0].class))
            .then(a.0.cmp(&b.0))
    });
    for (i, _) in remainders.iter().cycle() {
        if leftover == 0 {
            break;
        }
        quotas[*i].slots += 1;
        leftover -= 1;
    }

    // Stable: catalog order survives within a class.
    quotas.sort_by_key(|q| q.class);
    quotas
}

/// Expand quotas into one item id per slot, in hand-out order.
pub fn slot_sequence(quotas: &[SlotQuota]) -> Vec<ItemId> {
    quotas
        .iter()
        .flat_map(|q| std::iter::repeat_n(q.item, q.slots))
        .collect()
}
