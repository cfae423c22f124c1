//! `wh-catalog` — what the warehouse stores and how often it moves.
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`item`]    | `AbcClass`, `Item`, `Catalog`                         |
//! | [`sampler`] | weighted, jittered `Sampler` and `ItemStream`         |
//! | [`quota`]   | largest-remainder fixed-slot apportionment            |
//! | [`loader`]  | CSV catalog loader                                    |
//!
//! The catalog is built once per run and never mutated; everything else
//! refers to items by `ItemId`.

pub mod error;
pub mod item;
pub mod loader;
pub mod quota;
pub mod sampler;


pub use error::{CatalogError, CatalogResult};
pub use item::{AbcClass, Catalog, Item};
pub use loader::{load_catalog_csv, load_catalog_reader};
pub use quota::{SlotQuota, apportion, slot_sequence};
pub use sampler::{ItemStream, Sampler};
