//! Static grid layout.
//!
//! ```text
//!   x →  0 1 2 3 4 5 6 7 8 9
//! y 0    R R R R R R R R R R     road
//!   1    R F F F F F F F F R     fixed
//!   2    R F F F F F F F F R     fixed      ← dock row (fixed)
//!   3    R R R R R R R R R R     road
//!   4    R C C C C C C C C R     chaos
//!   5    R C C C C C C C C R     chaos      ← dock row (chaos)
//!   6    R R R R R R R R R R     road
//!   7    R H H H H H H H H R     hybrid
//!   8    R H H H H H H H H R     hybrid     ← dock row (hybrid)
//!   9    R R R R R R R R R R     road
//! ```
//!
//! Both edge columns are always road.  Pickers live on column 0, worker docks
//! on the last column.

use wh_core::{Pos, Zone};

use crate::{GridError, GridResult};

/// What a cell is for.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellKind {
    Road,
    Storage(Zone),
}

impl CellKind {
    #[inline]
    pub fn is_road(self) -> bool {
        matches!(self, CellKind::Road)
    }

    #[inline]
    pub fn zone(self) -> Option<Zone> {
        match self {
            CellKind::Road       => None,
            CellKind::Storage(z) => Some(z),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CellKind::Road                 => "road",
            CellKind::Storage(Zone::Fixed)  => "zone-fixed",
            CellKind::Storage(Zone::Chaos)  => "zone-chaos",
            CellKind::Storage(Zone::Hybrid) => "zone-hybrid",
        }
    }
}

/// Grid dimensions and zone banding.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridLayout {
    pub rows:        u16,
    pub cols:        u16,
    /// Physical bin capacity of every storage cell.
    pub capacity:    u32,
    /// Full-width road rows.  Edge columns are road regardless.
    pub road_rows:   Vec<u16>,
    /// Last row (inclusive) of the fixed band.
    pub fixed_until: u16,
    /// Last row (inclusive) of the chaos band.  Rows below are hybrid.
    pub chaos_until: u16,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            rows:        10,
            cols:        10,
            capacity:    10,
            road_rows:   vec![0, 3, 6, 9],
            fixed_until: 2,
            chaos_until: 5,
        }
    }
}

impl GridLayout {
    pub fn validate(&self) -> GridResult<()> {
        if self.rows < 3 || self.cols < 3 {
            return Err(GridError::Config(format!(
                "grid must be at least 3×3, got {}×{}",
                self.cols, self.rows
            )));
        }
        if self.capacity == 0 {
            return Err(GridError::Config("cell capacity must be at least 1".into()));
        }
        if let Some(r) = self.road_rows.iter().find(|&&r| r >= self.rows) {
            return Err(GridError::Config(format!("road row {r} outside grid")));
        }
        if !(self.fixed_until < self.chaos_until && self.chaos_until < self.rows) {
            return Err(GridError::Config(format!(
                "zone bands out of order: fixed_until={} chaos_until={} rows={}",
                self.fixed_until, self.chaos_until, self.rows
            )));
        }
        for zone in Zone::ALL {
            if self.dock_row(zone).is_none() {
                return Err(GridError::Config(format!("zone {zone} has no storage row")));
            }
        }
        self.check_access()
    }

    /// Every road cell must be reachable from `(0,0)` over roads and every
    /// shelf must border a road.
    fn check_access(&self) -> GridResult<()> {
        let cols = self.cols as usize;
        let idx = |p: Pos| p.y as usize * cols + p.x as usize;
        let mut seen = vec![false; cols * self.rows as usize];
        let mut stack = vec![Pos::new(0, 0)];
        seen[0] = true;
        while let Some(p) = stack.pop() {
            for n in p.neighbors(self.cols, self.rows) {
                if !seen[idx(n)] && self.cell_kind(n).is_road() {
                    seen[idx(n)] = true;
                    stack.push(n);
                }
            }
        }

        for y in 0..self.rows {
            for x in 0..self.cols {
                let p = Pos::new(x, y);
                match self.cell_kind(p) {
                    CellKind::Road if !seen[idx(p)] => {
                        return Err(GridError::Config(format!("road at {p} is cut off from the road network")));
                    }
                    CellKind::Storage(zone)
                        if !p.neighbors(self.cols, self.rows).any(|n| self.cell_kind(n).is_road()) =>
                    {
                        return Err(GridError::Config(format!("{zone} shelf at {p} has no road access")));
                    }
                    _ => {}
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn contains(&self, pos: Pos) -> bool {
        pos.x < self.cols && pos.y < self.rows
    }

    #[inline]
    pub fn is_road_row(&self, y: u16) -> bool {
        self.road_rows.contains(&y)
    }

    /// Zone band a row belongs to, ignoring roads.
    pub fn band(&self, y: u16) -> Zone {
        if y <= self.fixed_until {
            Zone::Fixed
        } else if y <= self.chaos_until {
            Zone::Chaos
        } else {
            Zone::Hybrid
        }
    }

    pub fn cell_kind(&self, pos: Pos) -> CellKind {
        if self.is_road_row(pos.y) || pos.x == 0 || pos.x + 1 == self.cols {
            CellKind::Road
        } else {
            CellKind::Storage(self.band(pos.y))
        }
    }

    /// Rows of `zone`'s band that hold storage cells, top to bottom.
    pub fn storage_rows(&self, zone: Zone) -> impl Iterator<Item = u16> + '_ {
        (0..self.rows).filter(move |&y| self.band(y) == zone && !self.is_road_row(y))
    }

    /// The zone's start row: last storage row of its band.  Workers dock at
    /// the right end of it, pickers wait at the left end.
    pub fn dock_row(&self, zone: Zone) -> Option<u16> {
        self.storage_rows(zone).last()
    }

    /// Worker dock of `zone` (last column, start row).
    pub fn worker_dock(&self, zone: Zone) -> Pos {
        Pos::new(self.cols - 1, self.dock_row(zone).unwrap_or(0))
    }

    /// Picker home of `zone` (column 0, start row).
    pub fn picker_home(&self, zone: Zone) -> Pos {
        Pos::new(0, self.dock_row(zone).unwrap_or(0))
    }
}
