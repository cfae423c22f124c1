//! `wh-alloc` — where does an incoming bin go?
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`strategy`] | `AllocationStrategy` trait, `strategy_for`             |
//! | [`fixed`]    | `FixedSlotting`                                        |
//! | [`chaos`]    | `ChaoticSlotting`                                      |
//! | [`hybrid`]   | `HybridSlotting`, `HybridPolicy`                       |
//! | [`error`]    | `AllocError`, `AllocResult<T>`                         |
//!
//! Every strategy is a pre-commit reservation protocol: the put hold is staked
//! inside `allocate`, before the worker starts walking.

pub mod chaos;
pub mod error;
pub mod fixed;
pub mod hybrid;
pub mod strategy;


pub use chaos::ChaoticSlotting;
pub use error::{AllocError, AllocResult};
pub use fixed::FixedSlotting;
pub use hybrid::{HybridPolicy, HybridSlotting};
pub use strategy::{AllocationStrategy, strategy_for};
