//! Unit tests for wh-agent.

// ── Helpers ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod bench {
    use std::sync::atomic::{AtomicBool, Ordering};

    use wh_alloc::{AllocationStrategy, HybridPolicy, strategy_for};
    use wh_catalog::{AbcClass, Catalog, ItemStream, Sampler, apportion, slot_sequence};
    use wh_core::{CellId, ItemId, Pos, Tick, Zone};
    use wh_grid::{BfsPathfinder, Grid, GridError, GridLayout, GridResult, Pathfinder, Route, RouteCache};

    use crate::{BinIndex, BinLocation, EventLog, RepairQueue, ZoneContext, ZoneStats};

    pub const WIDGET: ItemId = ItemId(0);
    pub const GADGET: ItemId = ItemId(1);

    /// Breadth-first search, except that routes to `goal` fail while
    /// `blocked` is set.
    pub struct Roadblock {
        pub goal:    Pos,
        pub blocked: AtomicBool,
    }

    impl Roadblock {
        pub fn new(goal: Pos) -> Self {
            Self { goal, blocked: AtomicBool::new(true) }
        }

        pub fn lift(&self) {
            self.blocked.store(false, Ordering::Relaxed);
        }
    }

    impl Pathfinder for Roadblock {
        fn find(&self, grid: &Grid, from: Pos, to: Pos) -> GridResult<Route> {
            if to == self.goal && self.blocked.load(Ordering::Relaxed) {
                return Err(GridError::NoRoute { from, to });
            }
            BfsPathfinder.find(grid, from, to)
        }
    }

    /// One zone's worth of state, owned, so tests can hand out a context.
    pub struct Bench {
        pub zone:       Zone,
        pub tick:       Tick,
        pub grid:       Grid,
        pub routes:     RouteCache,
        pub catalog:    Catalog,
        pub strategy:   Box<dyn AllocationStrategy>,
        pub deliveries: ItemStream,
        pub orders:     ItemStream,
        pub index:      BinIndex,
        pub repairs:    RepairQueue,
        pub stats:      ZoneStats,
        pub log:        EventLog,
    }

    impl Bench {
        /// Deliveries and orders only ever draw `WIDGET`.
        pub fn new(zone: Zone) -> Self {
            let catalog = Catalog::new([("Widget", AbcClass::A, 1.0)]).unwrap();
            let mut grid = Grid::new(GridLayout::default()).unwrap();
            let quotas = apportion(&catalog, grid.fixed_slot_count());
            grid.assign_fixed_slots(&slot_sequence(&quotas));
            let sampler = Sampler::new(&catalog);
            Self {
                zone,
                tick: Tick::ZERO,
                grid,
                routes: RouteCache::default(),
                strategy: strategy_for(zone, &HybridPolicy::default()),
                deliveries: sampler.stream(1),
                orders: sampler.stream(2),
                catalog,
                index: BinIndex::default(),
                repairs: RepairQueue::default(),
                stats: ZoneStats::default(),
                log: EventLog::default(),
            }
        }

        pub fn ctx(&mut self) -> ZoneContext<'_> {
            ZoneContext {
                zone:       self.zone,
                tick:       self.tick,
                grid:       &mut self.grid,
                routes:     &mut self.routes,
                catalog:    &self.catalog,
                strategy:   self.strategy.as_ref(),
                deliveries: &mut self.deliveries,
                orders:     &mut self.orders,
                index:      &mut self.index,
                repairs:    &mut self.repairs,
                stats:      &mut self.stats,
                log:        &mut self.log,
            }
        }

        /// Like [`Bench::ctx`], routing through `routes` instead.
        pub fn ctx_via<'a, P: Pathfinder>(&'a mut self, routes: &'a mut RouteCache<P>) -> ZoneContext<'a, P> {
            ZoneContext {
                zone:       self.zone,
                tick:       self.tick,
                grid:       &mut self.grid,
                routes,
                catalog:    &self.catalog,
                strategy:   self.strategy.as_ref(),
                deliveries: &mut self.deliveries,
                orders:     &mut self.orders,
                index:      &mut self.index,
                repairs:    &mut self.repairs,
                stats:      &mut self.stats,
                log:        &mut self.log,
            }
        }

        pub fn at(&self, x: u16, y: u16) -> CellId {
            self.grid.id_at(Pos::new(x, y)).unwrap()
        }

        /// Seed a bin and index it like a committed put.
        pub fn stock(&mut self, cell: CellId, item: ItemId) {
            let bin = self.grid.place_bin(cell, item, self.tick).unwrap();
            if self.zone != Zone::Fixed {
                self.index.insert(item, BinLocation { cell, bin, arrival: self.tick });
            }
        }

        pub fn logged(&self, needle: &str) -> bool {
            self.log.entries().any(|e| e.message.contains(needle))
        }
    }
}

// ── Walk ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod walk {
    use crate::Walk;
    use wh_core::Pos;
    use wh_grid::Route;

    #[test]
    fn empty_route_is_done_immediately() {
        let mut pos = Pos::new(3, 3);
        let mut w = Walk::new(Route::default());
        assert!(w.step(&mut pos));
        assert_eq!(pos, Pos::new(3, 3));
    }

    #[test]
    fn one_cell_per_step() {
        let mut pos = Pos::new(0, 0);
        let route = Route { steps: vec![Pos::new(1, 0), Pos::new(2, 0)] };
        let mut w = Walk::new(route);
        assert_eq!(w.remaining(), 2);
        assert!(!w.step(&mut pos));
        assert_eq!(pos, Pos::new(1, 0));
        assert!(w.step(&mut pos));
        assert_eq!(pos, Pos::new(2, 0));
        assert_eq!(w.remaining(), 0);
        assert_eq!(w.destination(), Some(Pos::new(2, 0)));
    }
}

// ── Stats and log ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats {
    use crate::{EventLog, ZoneStats};
    use wh_core::Tick;

    #[test]
    fn log_evicts_oldest() {
        let mut log = EventLog::with_capacity(3);
        for i in 0..5 {
            log.push(Tick(i), format!("event {i}"));
        }
        assert_eq!(log.len(), 3);
        assert_eq!(log.total(), 5);
        assert_eq!(log.entries().next().unwrap().message, "event 2");
        assert_eq!(log.last().unwrap().tick, Tick(4));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.total(), 0);
    }

    #[test]
    fn stats_reset() {
        let mut s = ZoneStats { picks: 3, overflow: 2, ..ZoneStats::default() };
        s.reset();
        assert_eq!(s, ZoneStats::default());
    }
}

// ── Bin index and repair queue ────────────────────────────────────────────────

#[cfg(test)]
mod index {
    use super::bench::*;
    use crate::{BinIndex, RepairQueue, RepairTicket};
    use wh_core::{AgentId, Tick, Zone};

    #[test]
    fn oldest_available_skips_held_bins() {
        let mut b = Bench::new(Zone::Chaos);
        let near = b.at(2, 4);
        let far = b.at(7, 5);
        b.tick = Tick(5);
        b.stock(far, WIDGET);
        b.tick = Tick(9);
        b.stock(near, WIDGET);

        let oldest = b.index.oldest_available(WIDGET, &b.grid).unwrap();
        assert_eq!(oldest.cell, far);
        assert_eq!(oldest.arrival, Tick(5));

        b.grid.reserve_pick(far, oldest.bin, AgentId(1)).unwrap();
        assert_eq!(b.index.oldest_available(WIDGET, &b.grid).unwrap().cell, near);
        assert_eq!(b.index.available(WIDGET, &b.grid).count(), 1);
        assert_eq!(b.index.locations(WIDGET).len(), 2);
    }

    #[test]
    fn remove_unknown_is_false() {
        let mut b = Bench::new(Zone::Chaos);
        let c = b.at(4, 4);
        b.stock(c, WIDGET);
        let bin = b.index.locations(WIDGET)[0].bin;
        assert!(!b.index.remove(GADGET, bin));
        assert!(b.index.remove(WIDGET, bin));
        assert!(!b.index.remove(WIDGET, bin));
        assert!(b.index.is_empty());
    }

    #[test]
    fn empty_index_has_no_locations() {
        let idx = BinIndex::default();
        assert!(idx.locations(WIDGET).is_empty());
        assert!(idx.oldest_available(WIDGET, &Bench::new(Zone::Chaos).grid).is_none());
    }

    #[test]
    fn discard_all_rolls_back_holds() {
        let mut b = Bench::new(Zone::Fixed);
        let c = b.at(4, 1);
        let bin = b.grid.place_bin(c, GADGET, Tick(0)).unwrap();
        b.grid.reserve_repair(c, bin).unwrap();
        let ticket = RepairTicket { cell: c, bin, item: GADGET };
        assert!(ticket.is_live(&b.grid));

        let mut q = RepairQueue::default();
        q.push(ticket);
        assert_eq!(q.discard_all(&mut b.grid), 1);
        assert!(q.is_empty());
        assert!(b.grid.cell(c).ledger().is_empty());
        assert!(!ticket.is_live(&b.grid));
    }

    #[test]
    fn release_only_touches_live_holds() {
        let mut b = Bench::new(Zone::Fixed);
        let c = b.at(4, 1);
        let bin = b.grid.place_bin(c, GADGET, Tick(0)).unwrap();
        let ticket = RepairTicket { cell: c, bin, item: GADGET };
        assert!(!ticket.release(&mut b.grid));

        b.grid.reserve_repair(c, bin).unwrap();
        assert!(ticket.release(&mut b.grid));
        assert!(b.grid.cell(c).ledger().is_empty());
        assert!(!ticket.release(&mut b.grid));
        b.grid.check_invariants().unwrap();
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod worker {
    use super::bench::*;
    use crate::{Worker, WorkerPhase};
    use wh_core::{AgentId, Tick, Zone};
    use wh_grid::RouteCache;

    fn chaos_worker(b: &Bench) -> Worker {
        Worker::new(AgentId(1), Zone::Chaos, b.grid.layout().worker_dock(Zone::Chaos), 42)
    }

    #[test]
    fn delivers_to_farthest_chaos_shelf() {
        let mut b = Bench::new(Zone::Chaos);
        let mut w = chaos_worker(&b);
        let shelf = b.at(8, 4);

        w.step(&mut b.ctx());
        let target = *w.phase.target().unwrap();
        assert_eq!(target.cell, shelf);
        assert_eq!(b.grid.cell(shelf).ledger().puts().len(), 1);

        // Dock (9,5) → access (9,4) is one step.
        w.step(&mut b.ctx());
        assert!(matches!(w.phase, WorkerPhase::Delivering { .. }));
        w.step(&mut b.ctx());
        assert_eq!(b.stats.puts, 1);
        assert_eq!(b.grid.cell(shelf).bins(), 1);
        assert_eq!(b.index.len(), 1);
        assert!(b.logged("stored Widget"));
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn retire_rolls_back_put_hold() {
        let mut b = Bench::new(Zone::Chaos);
        let mut w = chaos_worker(&b);
        w.step(&mut b.ctx());
        let shelf = w.phase.target().unwrap().cell;
        w.retire(&mut b.grid);
        assert!(b.grid.cell(shelf).ledger().is_empty());
        assert_eq!(w.phase, WorkerPhase::Idle);
    }

    #[test]
    fn full_zone_counts_overflow() {
        let mut b = Bench::new(Zone::Chaos);
        for c in b.grid.zone_cells(Zone::Chaos).to_vec() {
            for _ in 0..10 {
                b.grid.place_bin(c, WIDGET, Tick(0)).unwrap();
            }
        }
        let mut w = chaos_worker(&b);
        w.step(&mut b.ctx());
        assert_eq!(b.stats.overflow, 1);
        assert_eq!(b.stats.puts, 0);
        assert!(b.logged("overflow"));
        assert!(w.phase.target().is_none());
    }

    #[test]
    fn shelf_filled_underneath_is_a_conflict() {
        let mut b = Bench::new(Zone::Chaos);
        let mut w = chaos_worker(&b);
        w.step(&mut b.ctx());
        let shelf = w.phase.target().unwrap().cell;
        // Seeding bypasses the put gate and overbooks the hold.
        for _ in 0..10 {
            b.grid.place_bin(shelf, WIDGET, Tick(0)).unwrap();
        }
        w.step(&mut b.ctx());
        w.step(&mut b.ctx());
        assert_eq!(b.stats.put_conflicts, 1);
        assert_eq!(b.stats.overflow, 1);
        assert_eq!(b.stats.puts, 0);
        assert!(b.grid.cell(shelf).ledger().is_empty());
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn stranded_worker_waits_for_a_route_home() {
        let mut b = Bench::new(Zone::Chaos);
        let dock = b.grid.layout().worker_dock(Zone::Chaos);
        let mut routes = RouteCache::new(Roadblock::new(dock));
        let mut w = chaos_worker(&b);

        // Allocate, walk, deliver: the way back is blocked.
        for _ in 0..3 {
            w.step(&mut b.ctx_via(&mut routes));
        }
        assert_eq!(b.stats.puts, 1);
        assert_eq!(w.phase, WorkerPhase::Idle);
        assert!(b.logged("no route to dock"));
        let stranded = w.pos;
        assert_ne!(stranded, dock);

        for _ in 0..5 {
            w.step(&mut b.ctx_via(&mut routes));
        }
        assert_eq!(w.pos, stranded);
        assert_eq!(b.stats.puts, 1);
        assert_eq!(b.stats.overflow, 0);
        assert!(b.grid.zone_cells(Zone::Chaos).iter().all(|&c| b.grid.cell(c).ledger().is_empty()));

        routes.finder().lift();
        w.step(&mut b.ctx_via(&mut routes));
        assert!(matches!(w.phase, WorkerPhase::Home { .. }));
        w.step(&mut b.ctx_via(&mut routes));
        assert_eq!(w.pos, dock);
        assert!(w.phase.target().is_some());
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn fixed_worker_uses_assigned_slot() {
        let mut b = Bench::new(Zone::Fixed);
        let dock = b.grid.layout().worker_dock(Zone::Fixed);
        let mut w = Worker::new(AgentId(3), Zone::Fixed, dock, 7);
        for _ in 0..60 {
            w.step(&mut b.ctx());
            b.tick = b.tick + 1;
        }
        assert!(b.stats.puts > 0);
        // Single-item catalog: every fixed slot belongs to Widget.
        let wrong: u32 = b.grid.zone_cells(Zone::Fixed).iter().map(|&c| b.grid.cell(c).wrong_bins()).sum();
        assert_eq!(wrong, 0);
        assert!(b.index.is_empty());
    }
}

// ── Picker ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod picker {
    use super::bench::*;
    use crate::{PickTask, Picker, PickerPhase, RepairTicket};
    use wh_core::{AgentId, Tick, Zone};
    use wh_grid::RouteCache;

    fn picker(b: &Bench, zone: Zone) -> Picker {
        Picker::new(AgentId(10), zone, b.grid.layout().picker_home(zone), 42)
    }

    fn run_until(b: &mut Bench, p: &mut Picker, max: u32, done: impl Fn(&Bench, &Picker) -> bool) {
        for _ in 0..max {
            if done(b, p) {
                return;
            }
            p.step(&mut b.ctx());
            b.tick = b.tick + 1;
        }
    }

    #[test]
    fn batches_items_from_one_shelf() {
        let mut b = Bench::new(Zone::Chaos);
        let shelf = b.at(8, 4);
        for _ in 0..3 {
            b.stock(shelf, WIDGET);
        }
        let mut p = picker(&b, Zone::Chaos);

        p.step(&mut b.ctx());
        assert!(matches!(p.phase, PickerPhase::ToShelf { cell, .. } if cell == shelf));
        assert!(p.claims().len() >= 2);
        assert!(p.tasks().count() >= 2);

        run_until(&mut b, &mut p, 40, |b, _| b.stats.picks > 0);
        assert!(b.stats.picks >= 2);
        assert_eq!(b.grid.cell(shelf).bins() as u64, 3 - b.stats.picks);
        assert_eq!(b.index.len() as u64, 3 - b.stats.picks);
        b.grid.check_invariants().unwrap();

        run_until(&mut b, &mut p, 40, |_, p| p.durations().count() > 0);
        assert!(p.avg_order_ticks().unwrap() > 0.0);
    }

    #[test]
    fn missing_stock_abandons_order() {
        let mut b = Bench::new(Zone::Hybrid);
        let mut p = picker(&b, Zone::Hybrid);
        p.step(&mut b.ctx());
        assert!(b.logged("no stock of Widget"));
        assert!(p.claims().is_empty());
        assert_eq!(p.tasks().count(), 0);
        assert_eq!(b.stats.picks, 0);
    }

    #[test]
    fn fixed_picker_serves_repair_first() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(4, 1);
        let bin = b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        assert_eq!(b.grid.cell(shelf).wrong_bins(), 1);
        b.grid.reserve_repair(shelf, bin).unwrap();
        b.repairs.push(RepairTicket { cell: shelf, bin, item: GADGET });

        let mut p = picker(&b, Zone::Fixed);
        p.step(&mut b.ctx());
        assert!(matches!(p.tasks().next(), Some(PickTask::Repair(_))));
        assert!(b.repairs.is_empty());

        run_until(&mut b, &mut p, 40, |b, _| b.stats.repairs > 0);
        assert_eq!(b.stats.repairs, 1);
        assert_eq!(b.stats.picks, 0);
        assert_eq!(b.grid.cell(shelf).wrong_bins(), 0);
        assert_eq!(b.grid.cell(shelf).bins(), 0);
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn stale_ticket_is_dropped() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(4, 1);
        let bin = b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        b.grid.reserve_repair(shelf, bin).unwrap();
        b.grid.commit_repair(shelf, bin).unwrap();
        b.repairs.push(RepairTicket { cell: shelf, bin, item: GADGET });

        let mut p = picker(&b, Zone::Fixed);
        p.step(&mut b.ctx());
        assert!(b.logged("stale"));
        assert!(p.tasks().all(|t| !matches!(t, PickTask::Repair(_))));
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn retire_returns_repair_ticket() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(4, 1);
        let bin = b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        b.grid.reserve_repair(shelf, bin).unwrap();
        let ticket = RepairTicket { cell: shelf, bin, item: GADGET };
        b.repairs.push(ticket);

        let mut p = picker(&b, Zone::Fixed);
        p.step(&mut b.ctx());
        assert!(matches!(p.phase, PickerPhase::ToShelf { .. }));
        p.retire(&mut b.grid, &mut b.repairs);
        assert_eq!(b.repairs.pop(), Some(ticket));
        assert!(ticket.is_live(&b.grid));
        assert_eq!(p.phase, PickerPhase::Idle);
    }

    #[test]
    fn fixed_picker_takes_oldest_bin() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(1, 1);
        b.tick = Tick(3);
        let old = b.grid.place_bin(shelf, WIDGET, b.tick).unwrap();
        b.tick = Tick(8);
        b.grid.place_bin(shelf, WIDGET, b.tick).unwrap();

        let mut p = picker(&b, Zone::Fixed);
        p.step(&mut b.ctx());
        let claim = p.claims()[0];
        assert_eq!((claim.cell, claim.bin), (shelf, old));
        assert!(!claim.repair);
    }

    #[test]
    fn single_items_fall_back_to_oldest_bin() {
        let mut b = Bench::new(Zone::Chaos);
        let widget_shelf = b.at(2, 4);
        let gadget_shelf = b.at(7, 5);
        b.tick = Tick(0);
        b.stock(gadget_shelf, GADGET);
        b.tick = Tick(1);
        b.stock(widget_shelf, WIDGET);

        let mut p = picker(&b, Zone::Chaos);
        p.assign(&[WIDGET, GADGET]);
        p.step(&mut b.ctx());

        // The gadget shelf ranks first on age but serves one item only, so
        // the trip goes to the oldest bin of the first task instead.
        assert!(matches!(p.phase, PickerPhase::ToShelf { cell, .. } if cell == widget_shelf));
        assert_eq!(p.claims().len(), 1);
        assert_eq!((p.claims()[0].cell, p.claims()[0].item), (widget_shelf, WIDGET));
        assert!(b.grid.cell(gadget_shelf).ledger().is_empty());
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn equal_shelves_go_to_the_older_stock() {
        let mut b = Bench::new(Zone::Chaos);
        let newer = b.at(2, 4);
        let older = b.at(7, 5);
        b.tick = Tick(3);
        b.stock(older, WIDGET);
        b.stock(older, GADGET);
        b.tick = Tick(7);
        b.stock(newer, WIDGET);
        b.stock(newer, GADGET);

        let mut p = picker(&b, Zone::Chaos);
        p.assign(&[WIDGET, GADGET]);
        p.step(&mut b.ctx());

        // `newer` has the lower cell id; age decides first.
        assert!(newer < older);
        assert!(matches!(p.phase, PickerPhase::ToShelf { cell, .. } if cell == older));
        assert_eq!(p.claims().len(), 2);
        assert!(p.claims().iter().all(|c| c.cell == older));
        assert!(b.grid.cell(newer).ledger().is_empty());
    }

    fn stock_every_fixed_shelf(b: &mut Bench) {
        for c in b.grid.zone_cells(Zone::Fixed).to_vec() {
            for _ in 0..5 {
                b.stock(c, WIDGET);
            }
        }
    }

    #[test]
    fn fixed_orders_ask_for_two_to_four_items() {
        for seed in 0..10 {
            let mut b = Bench::new(Zone::Fixed);
            stock_every_fixed_shelf(&mut b);
            let home = b.grid.layout().picker_home(Zone::Fixed);
            let mut p = Picker::new(AgentId(10), Zone::Fixed, home, seed);
            p.step(&mut b.ctx());
            let n = p.tasks().count();
            assert!((2..=4).contains(&n), "seed {seed}: {n} items");
            // One shelf per trip.
            assert_eq!(p.claims().len(), 1);
        }
    }

    #[test]
    fn fixed_order_heads_home_after_last_item() {
        let mut b = Bench::new(Zone::Fixed);
        stock_every_fixed_shelf(&mut b);
        let mut p = picker(&b, Zone::Fixed);
        p.step(&mut b.ctx());
        let items = p.tasks().count() as u64;

        for _ in 0..400 {
            if p.durations().count() > 0 {
                break;
            }
            p.step(&mut b.ctx());
            b.tick = b.tick + 1;
            if matches!(p.phase, PickerPhase::Home { .. }) {
                assert_eq!(b.stats.picks, items, "headed home with items left");
            }
        }
        assert_eq!(p.durations().count(), 1);
        assert_eq!(b.stats.picks, items);
        b.grid.check_invariants().unwrap();
    }

    #[test]
    fn stranded_picker_waits_for_a_route_home() {
        let mut b = Bench::new(Zone::Chaos);
        let shelf = b.at(8, 4);
        for _ in 0..3 {
            b.stock(shelf, WIDGET);
        }
        let home = b.grid.layout().picker_home(Zone::Chaos);
        let mut routes = RouteCache::new(Roadblock::new(home));
        let mut p = picker(&b, Zone::Chaos);

        for _ in 0..60 {
            p.step(&mut b.ctx_via(&mut routes));
            b.tick = b.tick + 1;
        }
        assert!(b.stats.picks >= 2);
        assert_eq!(p.phase, PickerPhase::Idle);
        assert!(p.claims().is_empty());
        assert_eq!(p.durations().count(), 0);
        assert!(b.logged("no route home"));
        let stranded = p.pos;
        assert_ne!(stranded, home);

        let picks = b.stats.picks;
        for _ in 0..5 {
            p.step(&mut b.ctx_via(&mut routes));
            b.tick = b.tick + 1;
        }
        assert_eq!(p.pos, stranded);
        assert_eq!(b.stats.picks, picks);

        routes.finder().lift();
        for _ in 0..60 {
            if p.durations().count() > 0 {
                break;
            }
            p.step(&mut b.ctx_via(&mut routes));
            b.tick = b.tick + 1;
        }
        assert_eq!(p.durations().count(), 1);
        assert_eq!(p.pos, home);
        b.grid.check_invariants().unwrap();
    }
}

// ── Surveyor ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod surveyor {
    use super::bench::*;
    use crate::{SurveyConfig, Surveyor};
    use wh_core::{AgentId, Pos, Tick, Zone};
    use wh_grid::GridLayout;

    fn surveyor() -> Surveyor {
        Surveyor::new(&GridLayout::default(), SurveyConfig::default())
    }

    fn run(s: &mut Surveyor, b: &mut Bench, ticks: std::ops::RangeInclusive<u64>) {
        for t in ticks {
            s.on_tick(Tick(t), &mut b.grid, &mut b.repairs, &mut b.log);
        }
    }

    #[test]
    fn loop_encloses_fixed_band() {
        let s = surveyor();
        let stops = s.stops();
        assert_eq!(stops.len(), 24);
        assert_eq!(stops[0], Pos::new(0, 0));
        for pair in stops.windows(2) {
            assert!(pair[0].is_adjacent(pair[1]), "{} → {}", pair[0], pair[1]);
        }
        assert!(stops[23].is_adjacent(stops[0]));
        assert!(stops.contains(&Pos::new(9, 2)));
        assert!(stops.contains(&Pos::new(5, 3)));
    }

    #[test]
    fn lap_publishes_one_ticket_per_misplaced_bin() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(4, 1);
        let bin = b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        let mut s = surveyor();

        run(&mut s, &mut b, 0..=0);
        assert!(s.is_active());
        // 24 stops × 3 steps × every 2nd tick.
        run(&mut s, &mut b, 1..=143);
        assert!(s.is_active());
        assert!(b.repairs.is_empty());
        run(&mut s, &mut b, 144..=144);
        assert!(!s.is_active());
        assert_eq!(s.laps(), 1);
        assert_eq!(b.repairs.len(), 1);
        let ticket = *b.repairs.iter().next().unwrap();
        assert_eq!((ticket.cell, ticket.bin, ticket.item), (shelf, bin, GADGET));
        assert!(ticket.is_live(&b.grid));
        assert!(b.logged("lap 1 complete"));
    }

    #[test]
    fn new_lap_discards_and_republishes() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(5, 2);
        b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        let mut s = surveyor();

        run(&mut s, &mut b, 0..=199);
        assert_eq!(b.repairs.len(), 1);
        run(&mut s, &mut b, 200..=200);
        assert!(b.repairs.is_empty());
        assert!(b.grid.cell(shelf).ledger().is_empty());
        run(&mut s, &mut b, 201..=399);
        assert_eq!(s.laps(), 2);
        assert_eq!(b.repairs.len(), 1);
    }

    #[test]
    fn held_bins_are_not_reported() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(2, 1);
        let bin = b.grid.place_bin(shelf, GADGET, Tick(0)).unwrap();
        b.grid.reserve_pick(shelf, bin, AgentId(9)).unwrap();
        let mut s = surveyor();
        run(&mut s, &mut b, 0..=150);
        assert_eq!(s.laps(), 1);
        assert!(b.repairs.is_empty());
    }

    #[test]
    fn correct_bins_are_ignored() {
        let mut b = Bench::new(Zone::Fixed);
        let shelf = b.at(3, 1);
        b.grid.place_bin(shelf, WIDGET, Tick(0)).unwrap();
        let mut s = surveyor();
        run(&mut s, &mut b, 0..=150);
        assert_eq!(s.laps(), 1);
        assert!(b.repairs.is_empty());
        assert_eq!(s.buffered(), 0);
    }
}
