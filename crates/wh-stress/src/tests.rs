//! Unit and scenario tests for wh-stress.

use wh_core::Zone;
use wh_sim::{NoopObserver, Sim, SimBuilder, WarehouseConfig};

use crate::{Phase, StressConfig, StressEvent};

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One-bin shelves: a zone fills after 16 deliveries.
fn cramped_sim() -> Sim {
    let mut config = WarehouseConfig::default();
    config.layout.capacity = 1;
    SimBuilder::new(config).build().unwrap()
}

/// 500 ticks per round, polled every 10 ticks.
fn short_rounds(phases: Vec<Phase>) -> StressConfig {
    StressConfig {
        round_ms:         1_000,
        poll_ms:          20,
        overflow_limit:   100,
        tick_interval_ms: 2,
        phases,
    }
}

fn failures_of(events: &[StressEvent], zone: Zone) -> usize {
    events
        .iter()
        .filter(|e| matches!(e, StressEvent::ZoneFailed(r) if r.zone == zone))
        .count()
}

// ── Config ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod config_tests {
    use super::*;
    use crate::{StressController, StressError, default_phases};

    #[test]
    fn default_phases_escalate() {
        let p = default_phases();
        let counts: Vec<_> = p.iter().map(|p| (p.label.as_str(), p.workers, p.pickers)).collect();
        assert_eq!(
            counts,
            vec![("Low", 8, 10), ("Medium", 8, 8), ("Busy", 10, 10), ("High", 10, 5)]
        );
    }

    #[test]
    fn default_round_is_fifteen_thousand_ticks() {
        let c = StressConfig::default();
        c.validate().unwrap();
        assert_eq!(c.round_ticks(), 15_000);
    }

    #[test]
    fn rejects_empty_phase_list() {
        let c = StressConfig { phases: Vec::new(), ..StressConfig::default() };
        assert!(matches!(c.validate(), Err(StressError::Config(_))));
    }

    #[test]
    fn rejects_bad_poll() {
        let c = StressConfig { poll_ms: 0, ..StressConfig::default() };
        assert!(c.validate().is_err());
        let c = StressConfig { poll_ms: 40_000, ..StressConfig::default() };
        assert!(c.validate().is_err());
    }

    #[test]
    fn start_twice_is_an_error() {
        let mut sim = cramped_sim();
        let mut ctl = StressController::new(short_rounds(vec![Phase::new("A", 1, 1)])).unwrap();
        ctl.start(&mut sim).unwrap();
        assert!(matches!(ctl.start(&mut sim), Err(StressError::AlreadyRunning)));
    }
}

// ── Runs ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod run_tests {
    use super::*;
    use crate::{StressRunner, ZoneOutcome};

    #[test]
    fn overloaded_zones_fail_and_end_the_run() {
        let mut sim = cramped_sim();
        let mut runner =
            StressRunner::new(short_rounds(vec![Phase::new("Heavy", 4, 0), Phase::new("Unused", 1, 1)]))
                .unwrap();
        let summary = runner.run(&mut sim, &mut NoopObserver).unwrap();

        assert!(summary.all_failed);
        assert_eq!(summary.rounds.len(), 1);
        assert!(summary.ticks < 500, "all zones failed, round should end early");
        for zone in Zone::ALL {
            assert_eq!(failures_of(&summary.events, zone), 1);
            let r = summary.rounds[0].zone(zone);
            assert_eq!(r.outcome, ZoneOutcome::Failed);
            assert!(r.overflow >= 100);
            assert_eq!((r.workers, r.pickers), (4, 0));
        }
        assert_eq!(summary.events.last(), Some(&StressEvent::Finished { rounds: 1, all_failed: true }));

        // The simulation is back to its pre-run state.
        assert_eq!(sim.now().0, 0);
        assert_eq!(sim.clock.tick_interval_ms, 500);
        for zone in Zone::ALL {
            assert!(!sim.zone(zone).failed);
            assert_eq!(sim.zone(zone).workers.len(), 1);
            assert_eq!(sim.zone(zone).pickers.len(), 1);
        }
    }

    #[test]
    fn light_load_completes_every_phase() {
        let mut sim = SimBuilder::new(WarehouseConfig::default()).build().unwrap();
        let config = StressConfig {
            round_ms: 200,
            ..short_rounds(vec![Phase::new("A", 1, 1), Phase::new("B", 2, 1)])
        };
        let mut runner = StressRunner::new(config).unwrap();
        let summary = runner.run(&mut sim, &mut NoopObserver).unwrap();

        assert!(!summary.all_failed);
        assert_eq!(summary.ticks, 200);
        assert_eq!(summary.rounds.len(), 2);
        for round in &summary.rounds {
            assert!(round.zones.iter().all(|z| z.outcome == ZoneOutcome::Completed));
        }
        assert_eq!(summary.rounds[1].zone(Zone::Hybrid).workers, 2);

        let kinds: Vec<&str> = summary
            .events
            .iter()
            .map(|e| match e {
                StressEvent::RoundStarted { .. } => "start",
                StressEvent::ZoneFailed(_)       => "failed",
                StressEvent::RoundEnded(_)       => "end",
                StressEvent::Finished { .. }     => "finished",
            })
            .collect();
        assert_eq!(kinds, vec!["start", "end", "start", "end", "finished"]);
    }
}

// ── Controller ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod controller_tests {
    use super::*;
    use crate::{StressController, ZoneOutcome, ZoneStatus};

    #[test]
    fn failed_zone_is_frozen_until_next_round() {
        let mut sim = cramped_sim();
        let mut ctl =
            StressController::new(short_rounds(vec![Phase::new("Chaos only", 4, 0), Phase::new("Next", 1, 0)]))
                .unwrap();
        let mut events = ctl.start(&mut sim).unwrap();
        // Load chaos alone.
        sim.set_staffing(Zone::Fixed, 0, 0);
        sim.set_staffing(Zone::Hybrid, 0, 0);

        let mut frozen_puts = None;
        for _ in 0..500 {
            sim.step();
            let new = ctl.advance(&mut sim, 2).unwrap();
            let round_over = new.iter().any(|e| matches!(e, StressEvent::RoundEnded(_)));
            events.extend(new);
            if round_over {
                break;
            }
            if ctl.zone_status(Zone::Chaos) == ZoneStatus::Failed {
                let k = sim.kpis();
                let chaos = k.zone(Zone::Chaos);
                assert!(chaos.failed);
                assert_eq!(chaos.workers, 0);
                let puts = *frozen_puts.get_or_insert(chaos.puts);
                assert_eq!(chaos.puts, puts);
            }
        }

        assert!(frozen_puts.is_some(), "chaos never failed");
        assert_eq!(failures_of(&events, Zone::Chaos), 1);
        assert_eq!(failures_of(&events, Zone::Fixed), 0);
        assert_eq!(failures_of(&events, Zone::Hybrid), 0);

        let round = &ctl.rounds()[0];
        assert_eq!(round.zone(Zone::Chaos).outcome, ZoneOutcome::Failed);
        assert_eq!(round.zone(Zone::Fixed).outcome, ZoneOutcome::Completed);
        assert_eq!(round.zone(Zone::Hybrid).outcome, ZoneOutcome::Completed);

        // Round two revived the zone.
        assert!(ctl.is_running());
        assert_eq!(ctl.phase().map(|p| p.label.as_str()), Some("Next"));
        assert_eq!(ctl.zone_status(Zone::Chaos), ZoneStatus::Running);
        let chaos = sim.kpis().zone(Zone::Chaos).clone();
        assert!(!chaos.failed);
        assert_eq!((chaos.workers, chaos.puts, chaos.overflow, chaos.bins), (1, 0, 0, 0));

        ctl.stop(&mut sim);
        assert!(!ctl.is_running());
        assert_eq!(sim.now().0, 0);
    }

    #[test]
    fn countdown_tracks_simulated_time() {
        let mut sim = cramped_sim();
        let mut ctl = StressController::new(short_rounds(vec![Phase::new("A", 1, 1)])).unwrap();
        assert_eq!(ctl.remaining_ms(), 0);
        ctl.start(&mut sim).unwrap();
        assert_eq!(sim.clock.tick_interval_ms, 2);
        assert_eq!(ctl.remaining_ms(), 1_000);
        for _ in 0..100 {
            sim.step();
            ctl.advance(&mut sim, 2).unwrap();
        }
        assert_eq!(ctl.remaining_ms(), 800);
    }

    #[test]
    fn idle_controller_ignores_time() {
        let mut sim = cramped_sim();
        let mut ctl = StressController::new(StressConfig::default()).unwrap();
        assert!(ctl.advance(&mut sim, 60_000).unwrap().is_empty());
        assert!(ctl.phase().is_none());
    }
}
