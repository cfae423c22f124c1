//! The `Sim` struct and its tick loop.

use tracing::{debug, info, warn};

use wh_agent::{BinLocation, PickTask, Picker, Surveyor, Worker, ZoneContext};
use wh_catalog::Catalog;
use wh_core::{AgentId, BinId, CellId, ItemId, Pos, SimClock, Tick, Zone};
use wh_grid::{BfsPathfinder, Grid, Pathfinder, RouteCache};

use crate::snapshot::{AgentView, BinView, CellView, SurveyorView, ZoneView};
use crate::{
    Command, Kpis, SimError, SimObserver, SimResult, Snapshot, WarehouseConfig, ZoneKpis,
    ZoneState,
};

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The simulation context: grid, catalog, route memo, the three zones and
/// the surveyor, plus the clock and staged commands.
///
/// Each [`step`](Sim::step):
///
/// 1. applies staged [`Command`]s in submission order;
/// 2. advances the surveyor on its own cadence;
/// 3. for every zone not marked failed, steps every worker then every
///    picker once, in zone order and then insertion order;
/// 4. computes [`Kpis`] and advances the clock.
///
/// Everything is sequential.  Two agents contending for a cell in the same
/// tick are resolved by that order, through the grid's reservation ledger.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<P: Pathfinder = BfsPathfinder> {
    /// The configuration the sim was built with, kept in sync with applied
    /// staffing and tick-interval commands.
    pub config: WarehouseConfig,

    /// Current tick and real-time cadence.
    pub clock: SimClock,

    pub(crate) catalog:    Catalog,
    pub(crate) grid:       Grid,
    pub(crate) routes:     RouteCache<P>,
    /// Indexed by [`Zone::index`].
    pub(crate) zones:      [ZoneState; 3],
    pub(crate) surveyor:   Surveyor,
    pub(crate) pending:    Vec<Command>,
    pub(crate) next_agent: u32,
}

impl<P: Pathfinder> Sim<P> {
    // ── Commands ──────────────────────────────────────────────────────────

    /// Queue a command for the start of the next tick.
    pub fn submit(&mut self, command: Command) {
        self.pending.push(command);
    }

    /// Commands waiting for the next tick.
    pub fn pending(&self) -> &[Command] {
        &self.pending
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance one tick and return the KPIs at its end.
    pub fn step(&mut self) -> Kpis {
        for command in std::mem::take(&mut self.pending) {
            self.apply(command);
        }
        let now = self.clock.current_tick;

        {
            let Self { grid, zones, surveyor, .. } = self;
            let fixed = &mut zones[Zone::Fixed.index()];
            surveyor.on_tick(now, grid, &mut fixed.repairs, &mut fixed.log);
        }
        for zone in Zone::ALL {
            self.step_zone(zone, now);
        }

        let kpis = self.kpis_at(now);
        self.clock.advance();
        kpis
    }

    /// [`step`](Sim::step) with observer callbacks.
    pub fn step_with<O: SimObserver>(&mut self, observer: &mut O) -> Kpis {
        observer.on_tick_start(self.clock.current_tick);
        let kpis = self.step();
        observer.on_tick_end(kpis.tick, &kpis);
        let every = self.config.sim.output_interval_ticks;
        if every > 0 && kpis.tick.is_every(every) {
            let snapshot = self.build_snapshot(kpis.clone());
            observer.on_snapshot(kpis.tick, &snapshot);
        }
        kpis
    }

    /// Run from the current tick to `config.sim.end_tick()`.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) {
        while self.clock.current_tick < self.config.sim.end_tick() {
            self.step_with(observer);
        }
        observer.on_sim_end(self.clock.current_tick);
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) {
        for _ in 0..n {
            self.step_with(observer);
        }
    }

    fn step_zone(&mut self, zone: Zone, now: Tick) {
        let Self { grid, routes, catalog, zones, .. } = self;
        let state = &mut zones[zone.index()];
        if state.failed {
            return;
        }
        let ZoneState {
            strategy, deliveries, orders, index, repairs, stats, log, workers, pickers, ..
        } = state;

        let mut ctx = ZoneContext {
            zone,
            tick: now,
            grid,
            routes,
            catalog,
            strategy: &**strategy,
            deliveries,
            orders,
            index,
            repairs,
            stats,
            log,
        };
        for worker in workers.iter_mut() {
            worker.step(&mut ctx);
        }
        for picker in pickers.iter_mut() {
            picker.step(&mut ctx);
        }
    }

    fn apply(&mut self, command: Command) {
        debug!(?command, tick = %self.clock.current_tick, "applying command");
        match command {
            Command::SetWorkers { zone, count } => {
                self.config.staffing.workers[zone.index()] = count;
                self.staff_zone(zone);
            }
            Command::SetPickers { zone, count } => {
                self.config.staffing.pickers[zone.index()] = count;
                self.staff_zone(zone);
            }
            Command::SetTickInterval { ms } => {
                let ms = ms.max(1);
                self.clock.tick_interval_ms = ms;
                self.config.sim.tick_interval_ms = ms;
            }
            Command::ResetZone(zone) => self.reset_zone(zone),
            Command::Reset => self.reset(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// Empty the floor, zero every counter and log, rewind the clock and the
    /// item streams, and respawn agents per the current staffing.  Replaying
    /// after a reset reproduces the original run.
    pub fn reset(&mut self) {
        self.grid.reset();
        self.routes.clear();
        self.surveyor.reset();
        self.clock.reset();
        self.next_agent = 0;
        for state in &mut self.zones {
            state.workers.clear();
            state.pickers.clear();
            state.clear();
        }
        for zone in Zone::ALL {
            self.staff_zone(zone);
        }
        info!("simulation reset");
    }

    /// Reset one zone: its cells, index, tickets, counters and log.  A failed
    /// zone is revived and restaffed.
    pub fn reset_zone(&mut self, zone: Zone) {
        let state = &mut self.zones[zone.index()];
        // The grid reset below drops every hold these agents own.
        state.workers.clear();
        state.pickers.clear();
        state.clear();
        self.grid.reset_zone(zone);
        if zone == Zone::Fixed {
            self.surveyor.reset();
        }
        self.staff_zone(zone);
        debug!(%zone, "zone reset");
    }

    /// Freeze `zone`: retire its agents and stop stepping it until the next
    /// reset.  Returns `false` if it had already failed.
    pub fn fail_zone(&mut self, zone: Zone) -> bool {
        let Self { grid, zones, clock, .. } = self;
        let state = &mut zones[zone.index()];
        if state.failed {
            return false;
        }
        for mut worker in state.workers.drain(..) {
            worker.retire(grid);
        }
        for mut picker in state.pickers.drain(..) {
            picker.retire(grid, &mut state.repairs);
        }
        state.failed = true;
        state.log.push(clock.current_tick, format!("{zone} zone failed"));
        warn!(%zone, overflow = state.stats.overflow, "zone failed");
        true
    }

    /// Set both agent counts of `zone` immediately.  Call between ticks
    /// only; from outside the loop prefer [`submit`](Sim::submit).
    pub fn set_staffing(&mut self, zone: Zone, workers: usize, pickers: usize) {
        self.config.staffing.workers[zone.index()] = workers;
        self.config.staffing.pickers[zone.index()] = pickers;
        self.staff_zone(zone);
    }

    /// Spawn or retire agents until `zone` matches its configured staffing.
    /// Agents retire from the end of the list.
    fn staff_zone(&mut self, zone: Zone) {
        let want_workers = self.config.staffing.workers(zone);
        let want_pickers = self.config.staffing.pickers(zone);
        let dock = self.grid.layout().worker_dock(zone);
        let home = self.grid.layout().picker_home(zone);
        let seed = self.config.sim.seed;

        let Self { grid, zones, next_agent, .. } = self;
        let state = &mut zones[zone.index()];
        if state.failed {
            return;
        }

        if state.workers.len() > want_workers {
            for mut worker in state.workers.split_off(want_workers).into_iter().rev() {
                worker.retire(grid);
            }
        }
        while state.workers.len() < want_workers {
            let id = take_id(next_agent);
            state.workers.push(Worker::new(id, zone, dock, seed));
        }

        if state.pickers.len() > want_pickers {
            for mut picker in state.pickers.split_off(want_pickers).into_iter().rev() {
                picker.retire(grid, &mut state.repairs);
            }
        }
        while state.pickers.len() < want_pickers {
            let id = take_id(next_agent);
            state.pickers.push(Picker::new(id, zone, home, seed));
        }
    }

    // ── Seeding ───────────────────────────────────────────────────────────

    /// Put a bin of `item` on the shelf at `pos` without a reservation.
    /// Chaos and hybrid bins are indexed so pickers can find them.
    pub fn place_bin(&mut self, pos: Pos, item: ItemId) -> SimResult<BinId> {
        let cell = self.grid.id_at(pos).ok_or(SimError::NoCell(pos))?;
        let now = self.clock.current_tick;
        let bin = self.grid.place_bin(cell, item, now)?;
        if let Some(zone) = self.grid.cell(cell).zone() {
            if zone != Zone::Fixed {
                self.zones[zone.index()].index.insert(item, BinLocation { cell, bin, arrival: now });
            }
        }
        Ok(bin)
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.clock.current_tick
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn routes(&self) -> &RouteCache<P> {
        &self.routes
    }

    pub fn surveyor(&self) -> &Surveyor {
        &self.surveyor
    }

    pub fn zone(&self, zone: Zone) -> &ZoneState {
        &self.zones[zone.index()]
    }

    /// KPIs stamped with the current clock tick.
    pub fn kpis(&self) -> Kpis {
        self.kpis_at(self.clock.current_tick)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.build_snapshot(self.kpis())
    }

    fn kpis_at(&self, tick: Tick) -> Kpis {
        Kpis { tick, zones: Zone::ALL.map(|zone| self.zone_kpis(zone)) }
    }

    fn zone_kpis(&self, zone: Zone) -> ZoneKpis {
        let state = &self.zones[zone.index()];
        let stats = &state.stats;
        let misplaced_bins: u32 = self
            .grid
            .zone_cells(zone)
            .iter()
            .map(|&c| self.grid.cell(c).wrong_bins())
            .sum();
        ZoneKpis {
            zone,
            load:           self.grid.zone_load(zone),
            bins:           self.grid.zone_bins(zone),
            capacity:       self.grid.zone_capacity(zone),
            picks:          stats.picks,
            puts:           stats.puts,
            repairs:        stats.repairs,
            put_conflicts:  stats.put_conflicts,
            misplaced_bins,
            shadow_stock:   stats.put_conflicts + misplaced_bins as u64,
            audited_shadow: state.repairs.len(),
            overflow:       stats.overflow,
            avg_pick_ticks: state.avg_pick_ticks(),
            workers:        state.workers.len(),
            pickers:        state.pickers.len(),
            failed:         state.failed,
        }
    }

    fn build_snapshot(&self, kpis: Kpis) -> Snapshot {
        let cells = self
            .grid
            .cells()
            .iter()
            .map(|c| CellView {
                id:         c.id,
                pos:        c.pos,
                kind:       c.kind,
                capacity:   c.capacity,
                fixed_item: c.fixed_item,
                bins:       c
                    .contents()
                    .iter()
                    .map(|b| BinView {
                        id:        b.id,
                        item:      b.item,
                        label:     self.catalog.name(b.item).to_owned(),
                        arrival:   b.arrival,
                        misplaced: c.is_misplaced(b),
                        held:      c.ledger().holds_bin(b.id),
                    })
                    .collect(),
                incoming:   c.ledger().puts().len(),
            })
            .collect();

        let zones = Zone::ALL.map(|zone| {
            let state = &self.zones[zone.index()];
            ZoneView {
                workers: state
                    .workers
                    .iter()
                    .map(|w| AgentView { id: w.id, name: w.name.clone(), pos: w.pos, phase: w.phase.as_str() })
                    .collect(),
                pickers: state
                    .pickers
                    .iter()
                    .map(|p| AgentView { id: p.id, name: p.name.clone(), pos: p.pos, phase: p.phase.as_str() })
                    .collect(),
                log: state.log.entries().cloned().collect(),
            }
        });

        Snapshot {
            tick: kpis.tick,
            cells,
            zones,
            surveyor: SurveyorView {
                pos:    self.surveyor.pos(),
                active: self.surveyor.is_active(),
                laps:   self.surveyor.laps(),
            },
            kpis,
        }
    }

    // ── Invariants ────────────────────────────────────────────────────────

    /// Grid invariants plus hold ownership: every put hold belongs to a
    /// worker heading for that cell, every pick hold to a picker's claim, and
    /// every repair hold to a queued ticket or a picker's repair task.
    pub fn check_invariants(&self) -> SimResult<()> {
        self.grid.check_invariants()?;
        for cell in self.grid.cells() {
            let Some(zone) = cell.zone() else { continue };
            let state = &self.zones[zone.index()];
            let leak = |what: String| Err(SimError::LeakedHold { cell: cell.id, what });

            for hold in cell.ledger().puts() {
                let owned = state.workers.iter().any(|w| {
                    w.id == hold.by
                        && w.phase.target().is_some_and(|t| t.cell == cell.id && t.item == hold.item)
                });
                if !owned {
                    return leak(format!("put of {} by {}", hold.item, hold.by));
                }
            }
            for hold in cell.ledger().picks() {
                let owned = state.pickers.iter().any(|p| {
                    p.id == hold.by
                        && p.claims().iter().any(|c| c.cell == cell.id && c.bin == hold.bin && !c.repair)
                });
                if !owned {
                    return leak(format!("pick of {} by {}", hold.bin, hold.by));
                }
            }
            for &bin in cell.ledger().repairs() {
                let queued = state.repairs.iter().any(|t| t.cell == cell.id && t.bin == bin);
                let taken = state
                    .pickers
                    .iter()
                    .any(|p| p.tasks().any(|t| is_repair_of(t, cell.id, bin)));
                if !(queued || taken) {
                    return leak(format!("repair of {bin}"));
                }
            }
        }
        Ok(())
    }
}

fn is_repair_of(task: &PickTask, cell: CellId, bin: BinId) -> bool {
    matches!(task, PickTask::Repair(t) if t.cell == cell && t.bin == bin)
}

fn take_id(next: &mut u32) -> AgentId {
    let id = AgentId(*next);
    *next += 1;
    id
}
