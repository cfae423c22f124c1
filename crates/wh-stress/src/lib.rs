//! `wh-stress` — drives the warehouse engine to failure under escalating load.
//!
//! A run walks through [`Phase`]s, one round each.  A round applies the
//! phase's worker and picker count to every zone, then polls the zones'
//! overflow counters; a zone that reaches the limit is frozen via
//! `Sim::fail_zone` and reported.  The round ends when its time runs out or
//! every zone has failed.  Survivors are reported as completed and the next
//! phase starts on freshly reset zones.
//!
//! | Module         | Contents                                         |
//! |----------------|--------------------------------------------------|
//! | [`config`]     | `Phase`, `StressConfig`, default phases          |
//! | [`controller`] | `StressController`, `ZoneStatus`                 |
//! | [`report`]     | `ZoneReport`, `RoundReport`, `StressEvent`       |
//! | [`runner`]     | `StressRunner`: headless, simulated-time runs    |

pub mod config;
pub mod controller;
pub mod error;
pub mod report;
pub mod runner;

#[cfg(test)]
mod tests;

pub use config::{Phase, StressConfig, default_phases};
pub use controller::{StressController, ZoneStatus};
pub use error::{StressError, StressResult};
pub use report::{RoundReport, StressEvent, ZoneOutcome, ZoneReport};
pub use runner::{StressRunner, StressSummary};
