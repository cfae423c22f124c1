//! The `OutputWriter` trait implemented by all backend writers.

use crate::{CellSnapshotRow, OutputResult, ZoneKpiRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Errors never reach the tick loop: the observer stores them and they are
/// retrieved with [`SimOutputObserver::take_error`].
///
/// [`SimOutputObserver::take_error`]: crate::SimOutputObserver::take_error
pub trait OutputWriter {
    /// Write the three zone rows of one tick.
    fn write_zone_kpis(&mut self, rows: &[ZoneKpiRow]) -> OutputResult<()>;

    /// Write a batch of cell snapshots.
    fn write_cells(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
