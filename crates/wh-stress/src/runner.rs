//! Headless driver: steps the engine and feeds the controller simulated
//! time, one tick interval per step.

use wh_grid::Pathfinder;
use wh_sim::{Sim, SimObserver};

use crate::{RoundReport, StressConfig, StressController, StressEvent, StressResult};

#[derive(Clone, Debug, Default)]
pub struct StressSummary {
    pub rounds:     Vec<RoundReport>,
    pub events:     Vec<StressEvent>,
    pub ticks:      u64,
    pub all_failed: bool,
}

pub struct StressRunner {
    controller: StressController,
}

impl StressRunner {
    pub fn new(config: StressConfig) -> StressResult<Self> {
        Ok(Self { controller: StressController::new(config)? })
    }

    pub fn controller(&self) -> &StressController {
        &self.controller
    }

    /// Run every phase to completion.  The simulation is reset afterwards,
    /// with its staffing and tick interval restored.
    pub fn run<P: Pathfinder, O: SimObserver>(
        &mut self,
        sim:      &mut Sim<P>,
        observer: &mut O,
    ) -> StressResult<StressSummary> {
        let mut summary = StressSummary::default();
        summary.events.extend(self.controller.start(sim)?);
        while self.controller.is_running() {
            sim.step_with(observer);
            summary.ticks += 1;
            let elapsed = sim.clock.tick_interval_ms as u64;
            summary.events.extend(self.controller.advance(sim, elapsed)?);
        }
        observer.on_sim_end(sim.now());
        summary.rounds = self.controller.rounds().to_vec();
        summary.all_failed = summary.rounds.last().is_some_and(RoundReport::all_failed);
        Ok(summary)
    }
}
