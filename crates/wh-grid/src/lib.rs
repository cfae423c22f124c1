//! `wh-grid` — the warehouse floor.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                     |
//! |------------|--------------------------------------------------------------|
//! | [`layout`] | `GridLayout`, `CellKind`                                     |
//! | [`cell`]   | `Cell`, `Bin`, `Ledger`, `PutHold`, `PickHold`               |
//! | [`grid`]   | `Grid`: lookup, reservation protocol, invariant checks       |
//! | [`router`] | `Pathfinder` trait, `Route`, `BfsPathfinder`                 |
//! | [`cache`]  | `RouteCache` (memoised by `(from, to)`)                      |
//! | [`error`]  | `GridError`, `GridResult<T>`                                 |
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                     |
//! |-----------|------------------------------------------------------------|
//! | `fx-hash` | Uses `FxHashMap` for the route memo.                       |
//! | `serde`   | Derives `Serialize`/`Deserialize` on public types.         |

pub mod cache;
pub mod cell;
pub mod error;
pub mod grid;
pub mod layout;
pub mod router;

#[cfg(test)]
mod tests;

pub use cache::RouteCache;
pub use cell::{Bin, Cell, Ledger, PickHold, PutHold};
pub use error::{GridError, GridResult};
pub use grid::Grid;
pub use layout::{CellKind, GridLayout};
pub use router::{BfsPathfinder, Pathfinder, Route};
