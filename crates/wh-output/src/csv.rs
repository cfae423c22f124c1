//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `zone_kpis.csv`
//! - `cell_snapshots.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{CellSnapshotRow, OutputError, OutputResult, ZoneKpiRow};

const ZONE_KPI_TABLE: &str = "zone_kpis";
const CELL_TABLE:     &str = "cell_snapshots";

pub const ZONE_KPI_HEADER: [&str; 17] = [
    "tick", "zone", "load", "bins", "capacity", "picks", "puts", "repairs", "put_conflicts",
    "misplaced_bins", "shadow_stock", "audited_shadow", "overflow", "avg_pick_ticks", "workers",
    "pickers", "failed",
];

pub const CELL_HEADER: [&str; 10] = [
    "tick", "cell_id", "x", "y", "zone", "capacity", "bins", "wrong_bins", "incoming", "fixed_item",
];

/// Writes simulation output to two CSV files.
pub struct CsvWriter {
    kpis:     Writer<File>,
    cells:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir).map_err(OutputError::create_dir(dir))?;
        let kpis = open(dir, ZONE_KPI_TABLE, &ZONE_KPI_HEADER)?;
        let cells = open(dir, CELL_TABLE, &CELL_HEADER)?;
        Ok(Self { kpis, cells, finished: false })
    }
}

fn open(dir: &Path, table: &'static str, header: &[&str]) -> OutputResult<Writer<File>> {
    let path = dir.join(format!("{table}.csv"));
    let mut w = Writer::from_path(&path).map_err(|source| OutputError::Open { path, source })?;
    w.write_record(header).map_err(|source| OutputError::Write { table, source })?;
    Ok(w)
}

impl OutputWriter for CsvWriter {
    fn write_zone_kpis(&mut self, rows: &[ZoneKpiRow]) -> OutputResult<()> {
        for row in rows {
            self.kpis.write_record(&[
                row.tick.to_string(),
                row.zone.to_owned(),
                format!("{:.4}", row.load),
                row.bins.to_string(),
                row.capacity.to_string(),
                row.picks.to_string(),
                row.puts.to_string(),
                row.repairs.to_string(),
                row.put_conflicts.to_string(),
                row.misplaced_bins.to_string(),
                row.shadow_stock.to_string(),
                row.audited_shadow.to_string(),
                row.overflow.to_string(),
                row.avg_pick_ticks.map_or_else(String::new, |t| format!("{t:.2}")),
                row.workers.to_string(),
                row.pickers.to_string(),
                (row.failed as u8).to_string(),
            ])
            .map_err(|source| OutputError::Write { table: ZONE_KPI_TABLE, source })?;
        }
        Ok(())
    }

    fn write_cells(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.cells.write_record(&[
                row.tick.to_string(),
                row.cell_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.zone.to_owned(),
                row.capacity.to_string(),
                row.bins.to_string(),
                row.wrong_bins.to_string(),
                row.incoming.to_string(),
                row.fixed_item.to_string(),
            ])
            .map_err(|source| OutputError::Write { table: CELL_TABLE, source })?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.kpis.flush().map_err(|source| OutputError::Flush { table: ZONE_KPI_TABLE, source })?;
        self.cells.flush().map_err(|source| OutputError::Flush { table: CELL_TABLE, source })?;
        Ok(())
    }
}
