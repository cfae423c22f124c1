//! `wh-core` — shared primitives for the warehouse strategy simulator.
//!
//! Every other `wh-*` crate depends on this one.  It has no `wh-*`
//! dependencies and only `rand` and `thiserror` externally (plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                           |
//! |------------|----------------------------------------------------|
//! | [`ids`]    | `CellId`, `ItemId`, `AgentId`, `BinId`             |
//! | [`pos`]    | `Pos`, neighbour offsets                           |
//! | [`zone`]   | `Zone` (fixed / chaos / hybrid)                    |
//! | [`time`]   | `Tick`, `SimClock`, `SimConfig`                    |
//! | [`rng`]    | `AgentRng` (per-agent), `SimRng` (shared streams)  |
//! | [`error`]  | `WhError`, `WhResult`                              |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                              |
//! |---------|-----------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types. |

pub mod error;
pub mod ids;
pub mod pos;
pub mod rng;
pub mod time;
pub mod zone;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{WhError, WhResult};
pub use ids::{AgentId, BinId, CellId, ItemId};
pub use pos::{NEIGHBOR_OFFSETS, Pos};
pub use rng::{AgentRng, SimRng, mix_seed};
pub use time::{SimClock, SimConfig, Tick};
pub use zone::Zone;
