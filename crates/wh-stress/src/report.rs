//! What a round leaves behind.

use std::fmt;

use wh_core::{Tick, Zone};
use wh_sim::ZoneKpis;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ZoneOutcome {
    /// Overflow reached the limit during the round.
    Failed,
    /// Survived until the round ended.
    Completed,
}

impl ZoneOutcome {
    pub fn as_str(self) -> &'static str {
        match self {
            ZoneOutcome::Failed    => "failed",
            ZoneOutcome::Completed => "completed",
        }
    }
}

/// A zone's figures at the moment it failed or its round ended.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ZoneReport {
    pub zone:           Zone,
    pub round:          usize,
    pub phase:          String,
    /// Staffing of the phase, not of the (possibly frozen) zone.
    pub workers:        usize,
    pub pickers:        usize,
    pub avg_pick_ticks: Option<f64>,
    pub shadow_stock:   u64,
    pub picks:          u64,
    pub puts:           u64,
    pub overflow:       u64,
    pub outcome:        ZoneOutcome,
    /// Simulated time into the round.
    pub elapsed_ms:     u64,
    pub tick:           Tick,
}

impl ZoneReport {
    pub(crate) fn from_kpis(
        kpis:       &ZoneKpis,
        round:      usize,
        phase:      &crate::Phase,
        outcome:    ZoneOutcome,
        elapsed_ms: u64,
        tick:       Tick,
    ) -> Self {
        Self {
            zone: kpis.zone,
            round,
            phase: phase.label.clone(),
            workers: phase.workers,
            pickers: phase.pickers,
            avg_pick_ticks: kpis.avg_pick_ticks,
            shadow_stock: kpis.shadow_stock,
            picks: kpis.picks,
            puts: kpis.puts,
            overflow: kpis.overflow,
            outcome,
            elapsed_ms,
            tick,
        }
    }
}

impl fmt::Display for ZoneReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}: {}w/{}p] {} after {:.1}s: picks {}, puts {}, overflow {}, shadow stock {}",
            self.zone,
            self.phase,
            self.workers,
            self.pickers,
            self.outcome.as_str(),
            self.elapsed_ms as f64 / 1000.0,
            self.picks,
            self.puts,
            self.overflow,
            self.shadow_stock,
        )?;
        match self.avg_pick_ticks {
            Some(t) => write!(f, ", avg pick {t:.1} ticks"),
            None    => f.write_str(", no completed orders"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundReport {
    pub round: usize,
    pub phase: String,
    /// Indexed by [`Zone::index`].
    pub zones: [ZoneReport; 3],
}

impl RoundReport {
    pub fn zone(&self, zone: Zone) -> &ZoneReport {
        &self.zones[zone.index()]
    }

    pub fn all_failed(&self) -> bool {
        self.zones.iter().all(|z| z.outcome == ZoneOutcome::Failed)
    }
}

/// Controller output, in the order it happened.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StressEvent {
    RoundStarted { round: usize, phase: String, workers: usize, pickers: usize },
    ZoneFailed(ZoneReport),
    RoundEnded(RoundReport),
    /// The run is over and the simulation has been reset.
    Finished { rounds: usize, all_failed: bool },
}
