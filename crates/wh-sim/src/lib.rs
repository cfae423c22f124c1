//! `wh-sim` — tick scheduler for the warehouse simulator.
//!
//! # Tick order
//!
//! ```text
//! step():
//!   ① Commands  — staged SetWorkers / SetPickers / SetTickInterval /
//!                 ResetZone / Reset, applied in submission order.
//!   ② Surveyor  — activates every `survey.interval_ticks`, then moves and
//!                 audits every `survey.step_every_ticks`.
//!   ③ Zones     — Fixed, Chaos, Hybrid (skipping failed zones): every
//!                 worker, then every picker, once each.
//!   ④ KPIs      — computed, returned, clock advanced.
//! ```
//!
//! # Crate layout
//!
//! | Module       | Contents                                                |
//! |--------------|---------------------------------------------------------|
//! | [`config`]   | `WarehouseConfig`, `Staffing`                           |
//! | [`builder`]  | `SimBuilder`                                            |
//! | [`sim`]      | `Sim`: tick loop, lifecycle, seeding, invariant checks  |
//! | [`zone`]     | `ZoneState`: agents, streams, counters, log             |
//! | [`command`]  | `Command`                                               |
//! | [`kpi`]      | `Kpis`, `ZoneKpis`                                      |
//! | [`snapshot`] | `Snapshot` and its cell / agent / zone views            |
//! | [`observer`] | `SimObserver`, `NoopObserver`                           |
//! | [`driver`]   | `Driver`: wall-clock time → ticks                       |
//! | [`error`]    | `SimError`, `SimResult<T>`                              |
//!
//! # Cargo features
//!
//! | Feature   | Effect                                                   |
//! |-----------|----------------------------------------------------------|
//! | `serde`   | `Serialize`/`Deserialize` on config, KPIs and snapshots. |
//! | `fx-hash` | FxHash for the route memo.                               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wh_sim::{NoopObserver, SimBuilder, WarehouseConfig};
//!
//! let mut sim = SimBuilder::new(WarehouseConfig::default()).build()?;
//! sim.run(&mut NoopObserver);
//! println!("{:?}", sim.kpis());
//! ```

pub mod builder;
pub mod command;
pub mod config;
pub mod driver;
pub mod error;
pub mod kpi;
pub mod observer;
pub mod sim;
pub mod snapshot;
pub mod zone;


pub use builder::SimBuilder;
pub use command::Command;
pub use config::{Staffing, WarehouseConfig};
pub use driver::{Driver, MAX_CATCH_UP};
pub use error::{SimError, SimResult};
pub use kpi::{Kpis, ZoneKpis};
pub use observer::{NoopObserver, SimObserver};
pub use sim::Sim;
pub use snapshot::{AgentView, BinView, CellView, Snapshot, SurveyorView, ZoneView};
pub use zone::ZoneState;
