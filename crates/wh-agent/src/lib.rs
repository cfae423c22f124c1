//! `wh-agent` — the actors on the warehouse floor.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`walk`]     | `Walk`: one cell per tick along a `Route`                  |
//! | [`context`]  | `ZoneContext`: the per-zone state an agent step may touch  |
//! | [`worker`]   | `Worker` put-away state machine                            |
//! | [`picker`]   | `Picker` order state machine, `PickTask`, `Claim`          |
//! | [`surveyor`] | `Surveyor` fixed-zone audit loop, `SurveyConfig`           |
//! | [`repair`]   | `RepairTicket`, `RepairQueue`                              |
//! | [`index`]    | `BinIndex`: item → bin locations for chaos / hybrid        |
//! | [`stats`]    | `ZoneStats` counters, bounded `EventLog`                   |
//!
//! Agents never return errors from a step.  Recoverable failures become
//! counter increments and event-log lines; layout bugs are reported through
//! `tracing` and the step is skipped.

pub mod context;
pub mod index;
pub mod picker;
pub mod repair;
pub mod stats;
pub mod surveyor;
pub mod walk;
pub mod worker;

#[cfg(test)]
mod tests;

pub use context::ZoneContext;
pub use index::{BinIndex, BinLocation};
pub use picker::{Claim, DURATION_WINDOW, PickTask, Picker, PickerPhase};
pub use repair::{RepairQueue, RepairTicket};
pub use stats::{DEFAULT_LOG_CAPACITY, EventLog, LogEntry, ZoneStats};
pub use surveyor::{SurveyConfig, Surveyor};
pub use walk::Walk;
pub use worker::{PutTarget, Worker, WorkerPhase};
