//! Read-only views of the floor for renderers and output writers.
//!
//! A [`Snapshot`] owns its data: holding one never borrows the `Sim`.

use wh_agent::LogEntry;
use wh_core::{AgentId, BinId, CellId, ItemId, Pos, Tick};
use wh_grid::CellKind;

use crate::Kpis;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BinView {
    pub id:        BinId,
    pub item:      ItemId,
    pub label:     String,
    pub arrival:   Tick,
    /// Wrong item for this fixed slot.
    pub misplaced: bool,
    /// Under a pick or repair hold.
    pub held:      bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellView {
    pub id:         CellId,
    pub pos:        Pos,
    pub kind:       CellKind,
    pub capacity:   u32,
    pub fixed_item: Option<ItemId>,
    pub bins:       Vec<BinView>,
    /// Put holds outstanding.
    pub incoming:   usize,
}

impl CellView {
    #[inline]
    pub fn occupancy(&self) -> usize {
        self.bins.len()
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct AgentView {
    pub id:    AgentId,
    pub name:  String,
    pub pos:   Pos,
    pub phase: &'static str,
}

#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct SurveyorView {
    pub pos:    Pos,
    pub active: bool,
    pub laps:   u64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ZoneView {
    pub workers: Vec<AgentView>,
    pub pickers: Vec<AgentView>,
    /// Oldest first.
    pub log:     Vec<LogEntry>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Snapshot {
    pub tick:     Tick,
    pub cells:    Vec<CellView>,
    pub zones:    [ZoneView; 3],
    pub surveyor: SurveyorView,
    pub kpis:     Kpis,
}
