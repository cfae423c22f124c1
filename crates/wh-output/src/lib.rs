//! `wh-output` — simulation output writers for the warehouse simulator.
//!
//! Two backends are provided:
//!
//! | Feature   | Backend | Files created                           |
//! |-----------|---------|-----------------------------------------|
//! | *(none)*  | CSV     | `zone_kpis.csv`, `cell_snapshots.csv`   |
//! | `sqlite`  | SQLite  | `output.db`                             |
//!
//! Both implement [`OutputWriter`] and are driven by [`SimOutputObserver`],
//! which implements `wh_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wh_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run(&mut obs);
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{CellSnapshotRow, ZoneKpiRow};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
