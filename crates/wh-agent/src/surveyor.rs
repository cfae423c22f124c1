//! Fixed-zone auditor.
//!
//! The surveyor walks a closed loop of road cells around the fixed band.  At
//! every stop it dwells, then inspects the neighbouring fixed shelves for
//! bins that do not match the shelf's assigned item.  Findings are buffered
//! for the whole lap and published as [`RepairTicket`]s only when the lap
//! completes; each published bin gets a repair hold so it is neither picked
//! nor reported twice.

use tracing::{debug, warn};

use wh_core::{BinId, CellId, ItemId, Pos, Tick, Zone};
use wh_grid::{CellKind, Grid, GridLayout};

use crate::{EventLog, RepairQueue, RepairTicket};

/// Surveyor cadence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SurveyConfig {
    /// A dormant surveyor starts a lap on ticks divisible by this.
    pub interval_ticks:   u64,
    /// An active surveyor acts on ticks divisible by this.
    pub step_every_ticks: u64,
    /// Surveyor steps spent at a stop before inspecting it.
    pub dwell_steps:      u32,
}

impl Default for SurveyConfig {
    fn default() -> Self {
        Self { interval_ticks: 100, step_every_ticks: 2, dwell_steps: 2 }
    }
}

#[derive(Clone, Debug)]
pub struct Surveyor {
    config:  SurveyConfig,
    stops:   Vec<Pos>,
    cols:    u16,
    rows:    u16,
    index:   usize,
    stage:   u32,
    active:  bool,
    laps:    u64,
    pending: Vec<(CellId, BinId, ItemId)>,
}

impl Surveyor {
    pub fn new(layout: &GridLayout, config: SurveyConfig) -> Self {
        Self {
            config,
            stops: patrol_loop(layout),
            cols: layout.cols,
            rows: layout.rows,
            index: 0,
            stage: 0,
            active: false,
            laps: 0,
            pending: Vec::new(),
        }
    }

    pub fn config(&self) -> &SurveyConfig {
        &self.config
    }

    /// The patrol loop, starting at the top-left corner.
    pub fn stops(&self) -> &[Pos] {
        &self.stops
    }

    pub fn pos(&self) -> Pos {
        self.stops.get(self.index).copied().unwrap_or_default()
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Completed laps.
    #[inline]
    pub fn laps(&self) -> u64 {
        self.laps
    }

    /// Mismatches found so far in the current lap.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }

    /// Advance the surveyor's own cadence for `tick`.
    pub fn on_tick(
        &mut self,
        tick:    Tick,
        grid:    &mut Grid,
        repairs: &mut RepairQueue,
        log:     &mut EventLog,
    ) {
        if !self.active {
            if tick.is_every(self.config.interval_ticks) && !self.stops.is_empty() {
                self.start_lap(grid, repairs);
            }
            return;
        }
        if !tick.is_every(self.config.step_every_ticks) {
            return;
        }
        if self.stage < self.config.dwell_steps {
            self.stage += 1;
            return;
        }

        self.inspect(grid);
        self.stage = 0;
        self.index += 1;
        if self.index == self.stops.len() {
            self.finish_lap(tick, grid, repairs, log);
        }
    }

    /// Go dormant at the loop start, forgetting any lap in progress.
    pub fn reset(&mut self) {
        self.index = 0;
        self.stage = 0;
        self.active = false;
        self.laps = 0;
        self.pending.clear();
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn start_lap(&mut self, grid: &mut Grid, repairs: &mut RepairQueue) {
        let dropped = repairs.discard_all(grid);
        if dropped > 0 {
            debug!(dropped, "surveyor discarded unconsumed repair tickets");
        }
        self.active = true;
        self.index = 0;
        self.stage = 0;
        self.pending.clear();
    }

    fn inspect(&mut self, grid: &Grid) {
        let here = self.pos();
        for pos in here.neighbors(self.cols, self.rows) {
            let Some(cell) = grid.cell_at(pos) else { continue };
            if cell.kind != CellKind::Storage(Zone::Fixed) {
                continue;
            }
            for bin in cell.contents() {
                if !cell.is_misplaced(bin) || cell.ledger().holds_bin(bin.id) {
                    continue;
                }
                let key = (cell.id, bin.id, bin.item);
                if !self.pending.contains(&key) {
                    self.pending.push(key);
                }
            }
        }
    }

    fn finish_lap(&mut self, tick: Tick, grid: &mut Grid, repairs: &mut RepairQueue, log: &mut EventLog) {
        let mut published = 0;
        for (cell, bin, item) in self.pending.drain(..) {
            // Gone or claimed since it was seen.
            if grid.reserve_repair(cell, bin).is_err() {
                warn!(%cell, %bin, "misplaced bin no longer claimable");
                continue;
            }
            repairs.push(RepairTicket { cell, bin, item });
            published += 1;
        }
        self.laps += 1;
        self.active = false;
        self.index = 0;
        debug!(lap = self.laps, published, "surveyor lap complete");
        log.push(tick, format!("surveyor: lap {} complete, {published} misplaced bin(s) reported", self.laps));
    }
}

/// Clockwise loop around the fixed band: along the road above it, down the
/// right edge, back along the road below it and up the left edge.
fn patrol_loop(layout: &GridLayout) -> Vec<Pos> {
    let first = layout.storage_rows(Zone::Fixed).next().unwrap_or(0);
    let top = layout.road_rows.iter().copied().filter(|&r| r < first).max().unwrap_or(0);
    let bottom = layout
        .road_rows
        .iter()
        .copied()
        .filter(|&r| r > layout.fixed_until)
        .min()
        .unwrap_or(layout.rows - 1);
    let right = layout.cols - 1;

    let mut stops = Vec::new();
    stops.extend((0..layout.cols).map(|x| Pos::new(x, top)));
    stops.extend((top + 1..bottom).map(|y| Pos::new(right, y)));
    stops.extend((0..layout.cols).rev().map(|x| Pos::new(x, bottom)));
    stops.extend((top + 1..bottom).rev().map(|y| Pos::new(0, y)));
    stops
}
