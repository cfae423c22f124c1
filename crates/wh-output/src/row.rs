//! Plain data row types written by output backends.

use wh_sim::{CellView, ZoneKpis};

/// One zone's KPIs at the end of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneKpiRow {
    pub tick:           u64,
    pub zone:           &'static str,
    pub load:           f64,
    pub bins:           u32,
    pub capacity:       u32,
    pub picks:          u64,
    pub puts:           u64,
    pub repairs:        u64,
    pub put_conflicts:  u64,
    pub misplaced_bins: u32,
    pub shadow_stock:   u64,
    pub audited_shadow: u32,
    pub overflow:       u64,
    /// `None` until the zone has completed an order.
    pub avg_pick_ticks: Option<f64>,
    pub workers:        u32,
    pub pickers:        u32,
    pub failed:         bool,
}

impl ZoneKpiRow {
    pub fn new(tick: u64, k: &ZoneKpis) -> Self {
        Self {
            tick,
            zone:           k.zone.as_str(),
            load:           k.load,
            bins:           k.bins,
            capacity:       k.capacity,
            picks:          k.picks,
            puts:           k.puts,
            repairs:        k.repairs,
            put_conflicts:  k.put_conflicts,
            misplaced_bins: k.misplaced_bins,
            shadow_stock:   k.shadow_stock,
            audited_shadow: k.audited_shadow as u32,
            overflow:       k.overflow,
            avg_pick_ticks: k.avg_pick_ticks,
            workers:        k.workers as u32,
            pickers:        k.pickers as u32,
            failed:         k.failed,
        }
    }
}

/// Occupancy of one storage cell at a snapshot tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellSnapshotRow {
    pub tick:       u64,
    pub cell_id:    u32,
    pub x:          u16,
    pub y:          u16,
    pub zone:       &'static str,
    pub capacity:   u32,
    pub bins:       u32,
    pub wrong_bins: u32,
    pub incoming:   u32,
    /// Assigned item of a fixed slot; `u16::MAX` when unassigned.
    pub fixed_item: u16,
}

impl CellSnapshotRow {
    /// `None` for road cells.
    pub fn new(tick: u64, c: &CellView) -> Option<Self> {
        let zone = c.kind.zone()?;
        Some(Self {
            tick,
            cell_id:    c.id.0,
            x:          c.pos.x,
            y:          c.pos.y,
            zone:       zone.as_str(),
            capacity:   c.capacity,
            bins:       c.bins.len() as u32,
            wrong_bins: c.bins.iter().filter(|b| b.misplaced).count() as u32,
            incoming:   c.incoming as u32,
            fixed_item: c.fixed_item.map_or(u16::MAX, |i| i.0),
        })
    }
}
