//! Per-zone key performance indicators.

use wh_core::{Tick, Zone};

/// One zone's indicators at the end of a tick.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneKpis {
    pub zone:           Zone,
    /// `bins / capacity` over the zone's storage cells.
    pub load:           f64,
    pub bins:           u32,
    pub capacity:       u32,
    pub picks:          u64,
    pub puts:           u64,
    /// Misplaced bins removed through repair tickets.
    pub repairs:        u64,
    /// Puts that found their shelf full at commit.
    pub put_conflicts:  u64,
    /// Wrong-item bins currently sitting in fixed slots.
    pub misplaced_bins: u32,
    /// `put_conflicts + misplaced_bins`.
    pub shadow_stock:   u64,
    /// Published repair tickets not yet taken by a picker.
    pub audited_shadow: usize,
    pub overflow:       u64,
    /// Mean over the zone's pickers of their rolling order duration.
    pub avg_pick_ticks: Option<f64>,
    pub workers:        usize,
    pub pickers:        usize,
    pub failed:         bool,
}

/// Every zone's indicators, in [`Zone::ALL`] order.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Kpis {
    pub tick:  Tick,
    pub zones: [ZoneKpis; 3],
}

impl Kpis {
    #[inline]
    pub fn zone(&self, zone: Zone) -> &ZoneKpis {
        &self.zones[zone.index()]
    }

    pub fn total_overflow(&self) -> u64 {
        self.zones.iter().map(|z| z.overflow).sum()
    }
}
