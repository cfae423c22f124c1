//! Changes requested from outside the tick loop.
//!
//! Commands are queued with [`Sim::submit`](crate::Sim::submit) and applied,
//! in submission order, at the start of the next tick.  No external change
//! ever lands in the middle of a tick.

use wh_core::Zone;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Command {
    SetWorkers { zone: Zone, count: usize },
    SetPickers { zone: Zone, count: usize },
    /// Real-time cadence for the [`Driver`](crate::Driver).
    SetTickInterval { ms: u32 },
    ResetZone(Zone),
    Reset,
}
