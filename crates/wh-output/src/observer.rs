//! `SimOutputObserver<W>` — bridges `SimObserver` to an `OutputWriter`.

use tracing::debug;

use wh_core::Tick;
use wh_sim::{Kpis, SimObserver, Snapshot};

use crate::row::{CellSnapshotRow, ZoneKpiRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes per-tick zone KPIs and periodic shelf
/// snapshots to any [`OutputWriter`] backend.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    /// KPI rows are written on ticks divisible by this.
    kpi_every:  u64,
    rows:       u64,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    /// Create an observer that writes KPI rows every tick.
    pub fn new(writer: W) -> Self {
        Self { writer, kpi_every: 1, rows: 0, last_error: None }
    }

    /// Thin the KPI series to every `n`th tick.  Stress runs at 2 ms ticks
    /// produce a lot of rows otherwise.
    pub fn with_kpi_every(mut self, n: u64) -> Self {
        self.kpi_every = n.max(1);
        self
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// KPI rows written so far.
    pub fn rows_written(&self) -> u64 {
        self.rows
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, kpis: &Kpis) {
        if !tick.is_every(self.kpi_every) {
            return;
        }
        let rows = kpis.zones.each_ref().map(|z| ZoneKpiRow::new(tick.0, z));
        let result = self.writer.write_zone_kpis(&rows);
        if result.is_ok() {
            self.rows += rows.len() as u64;
        }
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, snapshot: &Snapshot) {
        let rows: Vec<CellSnapshotRow> =
            snapshot.cells.iter().filter_map(|c| CellSnapshotRow::new(tick.0, c)).collect();
        if !rows.is_empty() {
            let result = self.writer.write_cells(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        let result = self.writer.finish();
        debug!(tick = %final_tick, rows = self.rows, ok = result.is_ok(), "output finished");
        self.store_err(result);
    }
}
