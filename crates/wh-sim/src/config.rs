//! Run configuration bundle.

use wh_agent::SurveyConfig;
use wh_alloc::HybridPolicy;
use wh_core::{SimConfig, Zone};
use wh_grid::GridLayout;

use crate::{SimError, SimResult};

/// Per-zone agent counts.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Staffing {
    /// Indexed by [`Zone::index`].
    pub workers: [usize; 3],
    pub pickers: [usize; 3],
}

impl Default for Staffing {
    fn default() -> Self {
        Self::uniform(1, 1)
    }
}

impl Staffing {
    /// The same counts in every zone.
    pub fn uniform(workers: usize, pickers: usize) -> Self {
        Self { workers: [workers; 3], pickers: [pickers; 3] }
    }

    #[inline]
    pub fn workers(&self, zone: Zone) -> usize {
        self.workers[zone.index()]
    }

    #[inline]
    pub fn pickers(&self, zone: Zone) -> usize {
        self.pickers[zone.index()]
    }
}

/// Everything needed to build a [`Sim`](crate::Sim).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct WarehouseConfig {
    pub sim:      SimConfig,
    pub layout:   GridLayout,
    pub hybrid:   HybridPolicy,
    pub survey:   SurveyConfig,
    pub staffing: Staffing,
}

impl WarehouseConfig {
    pub fn validate(&self) -> SimResult<()> {
        self.sim.validate()?;
        self.layout.validate()?;
        self.hybrid.validate()?;
        if self.survey.interval_ticks == 0 || self.survey.step_every_ticks == 0 {
            return Err(SimError::Config("survey cadence must be at least 1 tick".into()));
        }
        Ok(())
    }
}
