//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `zone_kpis` and `cell_snapshots`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{CellSnapshotRow, OutputError, OutputResult, ZoneKpiRow};

/// Writes simulation output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir).map_err(OutputError::create_dir(dir))?;
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS zone_kpis (
                 tick           INTEGER NOT NULL,
                 zone           TEXT    NOT NULL,
                 load           REAL    NOT NULL,
                 bins           INTEGER NOT NULL,
                 capacity       INTEGER NOT NULL,
                 picks          INTEGER NOT NULL,
                 puts           INTEGER NOT NULL,
                 repairs        INTEGER NOT NULL,
                 put_conflicts  INTEGER NOT NULL,
                 misplaced_bins INTEGER NOT NULL,
                 shadow_stock   INTEGER NOT NULL,
                 audited_shadow INTEGER NOT NULL,
                 overflow       INTEGER NOT NULL,
                 avg_pick_ticks REAL,
                 workers        INTEGER NOT NULL,
                 pickers        INTEGER NOT NULL,
                 failed         INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS cell_snapshots (
                 tick       INTEGER NOT NULL,
                 cell_id    INTEGER NOT NULL,
                 x          INTEGER NOT NULL,
                 y          INTEGER NOT NULL,
                 zone       TEXT    NOT NULL,
                 capacity   INTEGER NOT NULL,
                 bins       INTEGER NOT NULL,
                 wrong_bins INTEGER NOT NULL,
                 incoming   INTEGER NOT NULL,
                 fixed_item INTEGER
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_zone_kpis(&mut self, rows: &[ZoneKpiRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO zone_kpis \
                 (tick, zone, load, bins, capacity, picks, puts, repairs, put_conflicts, \
                  misplaced_bins, shadow_stock, audited_shadow, overflow, avg_pick_ticks, \
                  workers, pickers, failed) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.zone,
                    row.load,
                    row.bins,
                    row.capacity,
                    row.picks as i64,
                    row.puts as i64,
                    row.repairs as i64,
                    row.put_conflicts as i64,
                    row.misplaced_bins,
                    row.shadow_stock as i64,
                    row.audited_shadow,
                    row.overflow as i64,
                    row.avg_pick_ticks,
                    row.workers,
                    row.pickers,
                    row.failed as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_cells(&mut self, rows: &[CellSnapshotRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO cell_snapshots \
                 (tick, cell_id, x, y, zone, capacity, bins, wrong_bins, incoming, fixed_item) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                let fixed_item = (row.fixed_item != u16::MAX).then_some(row.fixed_item);
                stmt.execute(rusqlite::params![
                    row.tick as i64,
                    row.cell_id,
                    row.x,
                    row.y,
                    row.zone,
                    row.capacity,
                    row.bins,
                    row.wrong_bins,
                    row.incoming,
                    fixed_item,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
