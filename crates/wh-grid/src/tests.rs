//! Unit tests for wh-grid.

#[cfg(test)]
mod layout {
    use crate::{CellKind, GridError, GridLayout};
    use wh_core::{Pos, Zone};

    #[test]
    fn default_banding() {
        let l = GridLayout::default();
        assert!(l.validate().is_ok());
        assert_eq!(l.cell_kind(Pos::new(0, 1)), CellKind::Road);
        assert_eq!(l.cell_kind(Pos::new(9, 4)), CellKind::Road);
        assert_eq!(l.cell_kind(Pos::new(4, 3)), CellKind::Road);
        assert_eq!(l.cell_kind(Pos::new(1, 1)), CellKind::Storage(Zone::Fixed));
        assert_eq!(l.cell_kind(Pos::new(5, 5)), CellKind::Storage(Zone::Chaos));
        assert_eq!(l.cell_kind(Pos::new(8, 8)), CellKind::Storage(Zone::Hybrid));
    }

    #[test]
    fn docks() {
        let l = GridLayout::default();
        assert_eq!(l.dock_row(Zone::Fixed), Some(2));
        assert_eq!(l.dock_row(Zone::Chaos), Some(5));
        assert_eq!(l.dock_row(Zone::Hybrid), Some(8));
        assert_eq!(l.worker_dock(Zone::Chaos), Pos::new(9, 5));
        assert_eq!(l.picker_home(Zone::Hybrid), Pos::new(0, 8));
    }

    #[test]
    fn rejects_bad_layouts() {
        let no_cap = GridLayout { capacity: 0, ..GridLayout::default() };
        assert!(no_cap.validate().is_err());
        let swapped = GridLayout { fixed_until: 5, chaos_until: 2, ..GridLayout::default() };
        assert!(swapped.validate().is_err());
        // Chaos band made entirely of road.
        let roads = GridLayout { road_rows: vec![0, 3, 4, 5, 6, 9], ..GridLayout::default() };
        assert!(roads.validate().is_err());
    }

    #[test]
    fn rejects_shelves_without_road_access() {
        // Three chaos rows between roads: the middle one touches no road.
        let deep = GridLayout { road_rows: vec![0, 9], ..GridLayout::default() };
        let err = deep.validate().unwrap_err();
        assert!(matches!(&err, GridError::Config(m) if m.contains("no road access")), "{err}");
    }

    #[test]
    fn rejects_disconnected_roads() {
        // Without road rows the two edge columns never meet.
        let split = GridLayout { road_rows: Vec::new(), ..GridLayout::default() };
        let err = split.validate().unwrap_err();
        assert!(matches!(&err, GridError::Config(m) if m.contains("cut off")), "{err}");
    }
}

#[cfg(test)]
mod grid {
    use crate::{Grid, GridError, GridLayout};
    use wh_core::{AgentId, CellId, ItemId, Pos, Tick, Zone};

    // ── Helpers ───────────────────────────────────────────────────────────

    const BOLT: ItemId = ItemId(0);
    const NUT: ItemId = ItemId(1);

    fn grid() -> Grid {
        Grid::new(GridLayout::default()).unwrap()
    }

    fn shelf(g: &Grid, x: u16, y: u16) -> CellId {
        g.id_at(Pos::new(x, y)).unwrap()
    }

    const W: AgentId = AgentId(1);
    const P: AgentId = AgentId(2);

    #[test]
    fn zone_sizes() {
        let g = grid();
        for zone in Zone::ALL {
            assert_eq!(g.zone_cells(zone).len(), 16);
            assert_eq!(g.zone_capacity(zone), 160);
        }
        assert_eq!(g.fixed_slot_count(), 16);
    }

    #[test]
    fn road_adjacency_order() {
        let g = grid();
        // (1,1): right is storage, left (0,1) is road.
        assert_eq!(g.road_adjacent(shelf(&g, 1, 1)), Some(Pos::new(0, 1)));
        // (4,2): below is road row 3.
        assert_eq!(g.road_adjacent(shelf(&g, 4, 2)), Some(Pos::new(4, 3)));
        assert_eq!(g.road_adjacent(shelf(&g, 0, 0)), None);
    }

    #[test]
    fn put_cycle() {
        let mut g = grid();
        let c = shelf(&g, 4, 4);
        g.reserve_put(c, BOLT, W).unwrap();
        assert_eq!(g.cell(c).free_for_put(), 9);
        let bin = g.commit_put(c, BOLT, W, Tick(5)).unwrap();
        let cell = g.cell(c);
        assert_eq!(cell.bins(), 1);
        assert_eq!(cell.contents()[0].id, bin);
        assert_eq!(cell.contents()[0].arrival, Tick(5));
        assert!(cell.ledger().is_empty());
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn put_gate_counts_holds() {
        let mut g = grid();
        let c = shelf(&g, 4, 4);
        for i in 0..10 {
            g.reserve_put(c, BOLT, AgentId(i)).unwrap();
        }
        assert_eq!(g.reserve_put(c, BOLT, AgentId(99)), Err(GridError::CellFull(c)));
        g.rollback_put(c, BOLT, AgentId(3)).unwrap();
        assert!(g.reserve_put(c, BOLT, AgentId(99)).is_ok());
    }

    #[test]
    fn release_without_hold_is_error() {
        let mut g = grid();
        let c = shelf(&g, 4, 4);
        assert_eq!(g.rollback_put(c, BOLT, W), Err(GridError::NoSuchHold(c)));
        assert_eq!(g.commit_put(c, BOLT, W, Tick(0)), Err(GridError::NoSuchHold(c)));
    }

    #[test]
    fn road_is_not_storage() {
        let mut g = grid();
        let road = shelf(&g, 0, 0);
        assert_eq!(g.reserve_put(road, BOLT, W), Err(GridError::NotStorage(road)));
    }

    #[test]
    fn commit_conflict_consumes_hold() {
        let mut g = grid();
        let c = shelf(&g, 2, 5);
        g.reserve_put(c, BOLT, W).unwrap();
        // Seeding ignores the put gate but not physical capacity.
        for _ in 0..10 {
            g.place_bin(c, NUT, Tick(0)).unwrap();
        }
        assert_eq!(g.commit_put(c, BOLT, W, Tick(1)), Err(GridError::CapacityConflict(c)));
        assert!(g.cell(c).ledger().is_empty());
        assert_eq!(g.cell(c).bins(), 10);
        assert_eq!(g.place_bin(c, NUT, Tick(1)), Err(GridError::CellFull(c)));
    }

    #[test]
    fn pick_cycle() {
        let mut g = grid();
        let c = shelf(&g, 3, 7);
        let old = g.place_bin(c, BOLT, Tick(1)).unwrap();
        let new = g.place_bin(c, BOLT, Tick(2)).unwrap();
        assert_eq!(g.cell(c).oldest_unheld(BOLT).map(|b| b.id), Some(old));

        g.reserve_pick(c, old, P).unwrap();
        assert_eq!(g.cell(c).oldest_unheld(BOLT).map(|b| b.id), Some(new));
        assert!(matches!(g.reserve_pick(c, old, W), Err(GridError::BinHeld { .. })));
        assert!(matches!(g.reserve_repair(c, old), Err(GridError::BinHeld { .. })));

        let bin = g.commit_pick(c, old, P).unwrap();
        assert_eq!(bin.id, old);
        assert_eq!(g.cell(c).bins(), 1);
        assert!(matches!(g.reserve_pick(c, old, P), Err(GridError::BinNotFound { .. })));
    }

    #[test]
    fn release_picks_by_agent() {
        let mut g = grid();
        let a = shelf(&g, 3, 7);
        let b = shelf(&g, 4, 7);
        let x = g.place_bin(a, BOLT, Tick(0)).unwrap();
        let y = g.place_bin(b, NUT, Tick(0)).unwrap();
        g.reserve_pick(a, x, P).unwrap();
        g.reserve_pick(b, y, P).unwrap();
        assert_eq!(g.release_picks_by(W), 0);
        assert_eq!(g.release_picks_by(P), 2);
        assert!(g.cell(a).ledger().is_empty());
    }

    #[test]
    fn fixed_classification() {
        let mut g = grid();
        g.assign_fixed_slots(&[BOLT; 16]);
        let c = shelf(&g, 1, 1);
        assert_eq!(g.cell(c).fixed_item, Some(BOLT));

        g.place_bin(c, BOLT, Tick(0)).unwrap();
        let wrong = g.place_bin(c, NUT, Tick(0)).unwrap();
        assert_eq!(g.cell(c).correct_bins(), 1);
        assert_eq!(g.cell(c).wrong_bins(), 1);

        g.reserve_repair(c, wrong).unwrap();
        assert_eq!(g.cell(c).free_for_put(), 7);
        g.commit_repair(c, wrong).unwrap();
        assert_eq!(g.cell(c).wrong_bins(), 0);
        assert!(g.check_invariants().is_ok());
    }

    #[test]
    fn fixed_slots_column_major() {
        let mut g = grid();
        let seq: Vec<ItemId> = (0..16).map(ItemId).collect();
        assert_eq!(g.assign_fixed_slots(&seq), 16);
        assert_eq!(g.cell(shelf(&g, 1, 1)).fixed_item, Some(ItemId(0)));
        assert_eq!(g.cell(shelf(&g, 1, 2)).fixed_item, Some(ItemId(1)));
        assert_eq!(g.cell(shelf(&g, 2, 1)).fixed_item, Some(ItemId(2)));
        assert_eq!(g.cell(shelf(&g, 8, 2)).fixed_item, Some(ItemId(15)));
    }

    #[test]
    fn reset_clears_inventory_not_slots() {
        let mut g = grid();
        g.assign_fixed_slots(&[NUT; 16]);
        let f = shelf(&g, 1, 1);
        let h = shelf(&g, 1, 7);
        g.place_bin(f, NUT, Tick(0)).unwrap();
        g.place_bin(h, NUT, Tick(0)).unwrap();
        g.reserve_put(h, NUT, W).unwrap();

        g.reset_zone(Zone::Hybrid);
        assert_eq!(g.cell(h).bins(), 0);
        assert!(g.cell(h).ledger().is_empty());
        assert_eq!(g.cell(f).bins(), 1);

        g.reset();
        assert_eq!(g.zone_bins(Zone::Fixed), 0);
        assert_eq!(g.cell(f).fixed_item, Some(NUT));
        assert_eq!(g.zone_load(Zone::Fixed), 0.0);
    }

    #[test]
    fn zone_load_ratio() {
        let mut g = grid();
        let c = shelf(&g, 4, 4);
        for _ in 0..8 {
            g.place_bin(c, BOLT, Tick(0)).unwrap();
        }
        assert!((g.zone_load(Zone::Chaos) - 0.05).abs() < 1e-9);
    }
}

#[cfg(test)]
mod router {
    use crate::{BfsPathfinder, Grid, GridError, GridLayout, Pathfinder, RouteCache};
    use wh_core::Pos;

    fn grid() -> Grid {
        Grid::new(GridLayout::default()).unwrap()
    }

    #[test]
    fn same_point_is_empty() {
        let g = grid();
        let r = BfsPathfinder.find(&g, Pos::new(0, 0), Pos::new(0, 0)).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn shortest_over_roads() {
        let g = grid();
        // Dock (9,5) to the road below shelf (4,5): up/down to row 6 then left.
        let r = BfsPathfinder.find(&g, Pos::new(9, 5), Pos::new(4, 6)).unwrap();
        assert_eq!(r.len(), 6);
        assert_eq!(r.destination(), Some(Pos::new(4, 6)));
        for w in r.steps.windows(2) {
            assert!(w[0].is_adjacent(w[1]));
        }
        for p in &r.steps {
            assert!(g.is_road(*p));
        }
    }

    #[test]
    fn destination_shelf_is_enterable() {
        let g = grid();
        let r = BfsPathfinder.find(&g, Pos::new(0, 0), Pos::new(1, 1)).unwrap();
        assert_eq!(r.len(), 2);
        assert_eq!(r.destination(), Some(Pos::new(1, 1)));
    }

    #[test]
    fn storage_is_not_walkable() {
        let g = grid();
        // Row 4 is shelving, so the route detours over road row 3.
        let r = BfsPathfinder.find(&g, Pos::new(0, 4), Pos::new(5, 4)).unwrap();
        assert_eq!(r.len(), 7);
        assert!(r.steps[..r.len() - 1].iter().all(|p| g.is_road(*p)));
    }

    #[test]
    fn out_of_bounds() {
        let g = grid();
        let err = BfsPathfinder.find(&g, Pos::new(0, 0), Pos::new(20, 0)).unwrap_err();
        assert_eq!(err, GridError::OutOfBounds(Pos::new(20, 0)));
    }

    #[test]
    fn cache_is_idempotent() {
        let g = grid();
        let mut cache = RouteCache::default();
        let a = cache.route(&g, Pos::new(9, 2), Pos::new(0, 2)).unwrap();
        let b = cache.route(&g, Pos::new(9, 2), Pos::new(0, 2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 11);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
        cache.clear();
        assert!(cache.is_empty());
    }
}
