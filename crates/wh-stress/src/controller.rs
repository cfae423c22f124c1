//! Round and phase state machine.
//!
//! ```text
//!   start ─▶ round 0 ─poll─▶ … ─round_ms or all failed─▶ round end ─┬─ more phases ─▶ round n+1
//!                                                                  └─ done ────────▶ reset, finished
//! ```
//!
//! The controller owns no clock.  The caller steps the simulation and then
//! reports how much simulated time passed through [`StressController::advance`].

use tracing::{info, warn};

use wh_core::Zone;
use wh_grid::Pathfinder;
use wh_sim::{Sim, Staffing};

use crate::{
    Phase, RoundReport, StressConfig, StressError, StressEvent, StressResult, ZoneOutcome,
    ZoneReport,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ZoneStatus {
    #[default]
    Running,
    Failed,
    Completed,
}

/// What the simulation looked like before the run started.
#[derive(Clone, Debug)]
struct Saved {
    staffing:         Staffing,
    tick_interval_ms: u32,
}

pub struct StressController {
    config:       StressConfig,
    running:      bool,
    phase:        usize,
    round_ms:     u64,
    since_poll:   u64,
    status:       [ZoneStatus; 3],
    failures:     [Option<ZoneReport>; 3],
    rounds:       Vec<RoundReport>,
    saved:        Option<Saved>,
}

impl StressController {
    pub fn new(config: StressConfig) -> StressResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            running: false,
            phase: 0,
            round_ms: 0,
            since_poll: 0,
            status: [ZoneStatus::Running; 3],
            failures: Default::default(),
            rounds: Vec::new(),
            saved: None,
        })
    }

    pub fn config(&self) -> &StressConfig {
        &self.config
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// The phase of the current round.
    pub fn phase(&self) -> Option<&Phase> {
        self.running.then(|| &self.config.phases[self.phase])
    }

    /// Simulated time left in the current round.
    pub fn remaining_ms(&self) -> u64 {
        if self.running { self.config.round_ms.saturating_sub(self.round_ms) } else { 0 }
    }

    pub fn zone_status(&self, zone: Zone) -> ZoneStatus {
        self.status[zone.index()]
    }

    /// Reports of every finished round of the current or last run.
    pub fn rounds(&self) -> &[RoundReport] {
        &self.rounds
    }

    /// Switch to the stress tick interval and start round 0.
    pub fn start<P: Pathfinder>(&mut self, sim: &mut Sim<P>) -> StressResult<Vec<StressEvent>> {
        if self.running {
            return Err(StressError::AlreadyRunning);
        }
        self.saved = Some(Saved {
            staffing:         sim.config.staffing,
            tick_interval_ms: sim.clock.tick_interval_ms,
        });
        set_tick_interval(sim, self.config.tick_interval_ms);
        self.rounds.clear();
        self.running = true;
        info!(phases = self.config.phases.len(), round_ms = self.config.round_ms, "stress run started");

        let mut events = Vec::new();
        self.start_round(sim, 0, &mut events);
        Ok(events)
    }

    /// Account for `elapsed_ms` of simulated time since the last call: poll
    /// the overflow counters when due and close the round when its time is
    /// up or every zone has failed.
    pub fn advance<P: Pathfinder>(
        &mut self,
        sim:        &mut Sim<P>,
        elapsed_ms: u64,
    ) -> StressResult<Vec<StressEvent>> {
        let mut events = Vec::new();
        if !self.running {
            return Ok(events);
        }
        self.round_ms += elapsed_ms;
        self.since_poll += elapsed_ms;
        if self.since_poll >= self.config.poll_ms {
            self.since_poll %= self.config.poll_ms;
            self.poll(sim, &mut events);
        }

        let all_failed = self.status.iter().all(|&s| s == ZoneStatus::Failed);
        if self.round_ms >= self.config.round_ms || all_failed {
            sim.check_invariants()?;
            self.end_round(sim, &mut events);
        }
        Ok(events)
    }

    /// Abort the run: restore staffing and tick interval and reset the sim.
    pub fn stop<P: Pathfinder>(&mut self, sim: &mut Sim<P>) {
        if !self.running {
            return;
        }
        warn!(round = self.rounds.len(), "stress run aborted");
        self.finish(sim);
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn start_round<P: Pathfinder>(&mut self, sim: &mut Sim<P>, phase: usize, events: &mut Vec<StressEvent>) {
        self.phase = phase;
        self.round_ms = 0;
        self.since_poll = 0;
        self.status = [ZoneStatus::Running; 3];
        self.failures = Default::default();

        let Phase { label, workers, pickers } = self.config.phases[phase].clone();
        for zone in Zone::ALL {
            sim.reset_zone(zone);
            sim.set_staffing(zone, workers, pickers);
        }
        info!(round = phase, phase = %label, workers, pickers, "stress round started");
        events.push(StressEvent::RoundStarted { round: phase, phase: label, workers, pickers });
    }

    fn poll<P: Pathfinder>(&mut self, sim: &mut Sim<P>, events: &mut Vec<StressEvent>) {
        let kpis = sim.kpis();
        for zone in Zone::ALL {
            let z = kpis.zone(zone);
            if self.status[zone.index()] != ZoneStatus::Running || z.overflow < self.config.overflow_limit {
                continue;
            }
            let report = self.report(z, ZoneOutcome::Failed, sim);
            sim.fail_zone(zone);
            self.status[zone.index()] = ZoneStatus::Failed;
            warn!(%zone, overflow = z.overflow, elapsed_ms = self.round_ms, "zone overloaded");
            self.failures[zone.index()] = Some(report.clone());
            events.push(StressEvent::ZoneFailed(report));
        }
    }

    fn end_round<P: Pathfinder>(&mut self, sim: &mut Sim<P>, events: &mut Vec<StressEvent>) {
        let kpis = sim.kpis();
        for zone in Zone::ALL {
            if self.failures[zone.index()].is_none() {
                self.status[zone.index()] = ZoneStatus::Completed;
            }
        }
        let zones = Zone::ALL.map(|zone| match &self.failures[zone.index()] {
            Some(report) => report.clone(),
            None => self.report(kpis.zone(zone), ZoneOutcome::Completed, sim),
        });
        self.failures = Default::default();
        let round = RoundReport {
            round: self.phase,
            phase: self.config.phases[self.phase].label.clone(),
            zones,
        };
        for z in &round.zones {
            info!("{z}");
        }
        let all_failed = round.all_failed();
        self.rounds.push(round.clone());
        events.push(StressEvent::RoundEnded(round));

        let next = self.phase + 1;
        if next >= self.config.phases.len() || all_failed {
            let rounds = self.rounds.len();
            self.finish(sim);
            info!(rounds, all_failed, "stress run finished");
            events.push(StressEvent::Finished { rounds, all_failed });
        } else {
            self.start_round(sim, next, events);
        }
    }

    fn finish<P: Pathfinder>(&mut self, sim: &mut Sim<P>) {
        if let Some(saved) = self.saved.take() {
            sim.config.staffing = saved.staffing;
            set_tick_interval(sim, saved.tick_interval_ms);
        }
        sim.reset();
        self.running = false;
        self.status = [ZoneStatus::Running; 3];
        self.failures = Default::default();
    }

    fn report<P: Pathfinder>(&self, kpis: &wh_sim::ZoneKpis, outcome: ZoneOutcome, sim: &Sim<P>) -> ZoneReport {
        ZoneReport::from_kpis(
            kpis,
            self.phase,
            &self.config.phases[self.phase],
            outcome,
            self.round_ms,
            sim.now(),
        )
    }
}

fn set_tick_interval<P: Pathfinder>(sim: &mut Sim<P>, ms: u32) {
    sim.clock.tick_interval_ms = ms;
    sim.config.sim.tick_interval_ms = ms;
}
