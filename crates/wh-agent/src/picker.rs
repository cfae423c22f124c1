//! Order picker.
//!
//! ```text
//!   Idle ─order─▶ Routing ─claim─▶ ToShelf ─arrive─▶ Picking ─┬─ tasks left ─▶ Routing
//!                    │                                        └─ done ───────▶ Home ─▶ Idle
//!                    └── nothing claimable ──▶ Home
//! ```
//!
//! Every order asks for 2–4 items.  Fixed-zone pickers serve surveyor repair
//! tickets first and fetch one item per shelf visit from the item's assigned
//! shelves.  Chaos and hybrid pickers batch every item a shelf can serve and
//! look bins up in the zone's [`BinIndex`](crate::BinIndex).
//!
//! Every bin is claimed with a pick (or the surveyor's repair) hold before
//! the picker walks; holds are committed at the shelf or released when the
//! picker retires.

use std::collections::VecDeque;

use tracing::{debug, error, warn};

use wh_core::{AgentId, AgentRng, BinId, CellId, ItemId, Pos, Tick, Zone};
use wh_grid::{Grid, Pathfinder};

use crate::{RepairQueue, RepairTicket, Walk, ZoneContext};

/// Order durations kept for the rolling average.
pub const DURATION_WINDOW: usize = 50;

// ── Tasks ─────────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PickTask {
    /// Fetch one bin of `item` for an order.
    Order { item: ItemId },
    /// Remove a misplaced bin reported by the surveyor.
    Repair(RepairTicket),
}

impl PickTask {
    pub fn item(&self) -> ItemId {
        match self {
            PickTask::Order { item } => *item,
            PickTask::Repair(t)      => t.item,
        }
    }
}

/// A bin held for the current trip.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    pub cell:   CellId,
    pub bin:    BinId,
    pub item:   ItemId,
    pub repair: bool,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum PickerPhase {
    #[default]
    Idle,
    Routing,
    ToShelf { cell: CellId, walk: Walk },
    Picking { cell: CellId },
    Home { walk: Walk },
}

impl PickerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            PickerPhase::Idle            => "idle",
            PickerPhase::Routing         => "routing",
            PickerPhase::ToShelf { .. }  => "walking-to-shelf",
            PickerPhase::Picking { .. }  => "picking",
            PickerPhase::Home { .. }     => "walking-home",
        }
    }
}

// ── Picker ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Picker {
    pub id:        AgentId,
    pub name:      String,
    pub zone:      Zone,
    pub pos:       Pos,
    pub home:      Pos,
    pub phase:     PickerPhase,
    tasks:         VecDeque<PickTask>,
    claims:        Vec<Claim>,
    order_started: Tick,
    picked:        u32,
    durations:     VecDeque<u64>,
    rng:           AgentRng,
}

impl Picker {
    pub fn new(id: AgentId, zone: Zone, home: Pos, seed: u64) -> Self {
        Self {
            id,
            name: format!("{zone}-picker-{}", id.0),
            zone,
            pos: home,
            home,
            phase: PickerPhase::Idle,
            tasks: VecDeque::new(),
            claims: Vec::new(),
            order_started: Tick::ZERO,
            picked: 0,
            durations: VecDeque::with_capacity(DURATION_WINDOW),
            rng: AgentRng::new(seed, id),
        }
    }

    pub fn tasks(&self) -> impl Iterator<Item = &PickTask> {
        self.tasks.iter()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    /// Completed order durations, oldest first (at most [`DURATION_WINDOW`]).
    pub fn durations(&self) -> impl Iterator<Item = u64> + '_ {
        self.durations.iter().copied()
    }

    /// Mean order duration over the window, in ticks.
    pub fn avg_order_ticks(&self) -> Option<f64> {
        if self.durations.is_empty() {
            return None;
        }
        Some(self.durations.iter().sum::<u64>() as f64 / self.durations.len() as f64)
    }

    /// Advance one tick.
    pub fn step<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        match std::mem::take(&mut self.phase) {
            // Stranded away from home: retry the way back first.
            PickerPhase::Idle if self.pos != self.home => self.head_home(ctx),
            PickerPhase::Idle => {
                self.start_order(ctx);
                self.plan_trip(ctx);
            }
            PickerPhase::Routing => self.plan_trip(ctx),
            PickerPhase::ToShelf { cell, mut walk } => {
                self.phase = if walk.step(&mut self.pos) {
                    PickerPhase::Picking { cell }
                } else {
                    PickerPhase::ToShelf { cell, walk }
                };
            }
            PickerPhase::Picking { cell } => self.pick(cell, ctx),
            PickerPhase::Home { mut walk } => {
                if !walk.step(&mut self.pos) {
                    self.phase = PickerPhase::Home { walk };
                    return;
                }
                self.finish_order(ctx.tick);
                self.start_order(ctx);
                self.plan_trip(ctx);
            }
        }
    }

    /// Release pick holds and hand unserved repair tickets back to the
    /// queue.  Called before the picker is removed.
    pub fn retire(&mut self, grid: &mut Grid, repairs: &mut RepairQueue) {
        grid.release_picks_by(self.id);
        let tickets: Vec<RepairTicket> = self
            .tasks
            .iter()
            .filter_map(|t| match t {
                PickTask::Repair(ticket) => Some(*ticket),
                PickTask::Order { .. }   => None,
            })
            .collect();
        for ticket in tickets.into_iter().rev() {
            repairs.push_front(ticket);
        }
        self.tasks.clear();
        self.claims.clear();
        self.phase = PickerPhase::Idle;
    }

    /// Replace the current order with `items`, ready to plan a trip.
    #[cfg(test)]
    pub(crate) fn assign(&mut self, items: &[ItemId]) {
        self.tasks = items.iter().map(|&item| PickTask::Order { item }).collect();
        self.claims.clear();
        self.phase = PickerPhase::Routing;
    }

    // ── Order lifecycle ───────────────────────────────────────────────────

    fn start_order<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        self.tasks.clear();
        self.claims.clear();
        self.order_started = ctx.tick;
        self.picked = 0;

        if self.zone == Zone::Fixed {
            if let Some(ticket) = ctx.repairs.pop() {
                self.tasks.push_back(PickTask::Repair(ticket));
                return;
            }
        }
        let size = self.rng.gen_range(2..=4);
        self.tasks
            .extend(ctx.orders.take_batch(size).into_iter().map(|item| PickTask::Order { item }));
    }

    fn finish_order(&mut self, now: Tick) {
        if self.picked == 0 {
            return;
        }
        if self.durations.len() == DURATION_WINDOW {
            self.durations.pop_front();
        }
        self.durations.push_back(now.since(self.order_started));
        self.picked = 0;
    }

    // ── Trip planning ─────────────────────────────────────────────────────

    fn plan_trip<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        let cell = match self.zone {
            Zone::Fixed => self.claim_fixed(ctx),
            Zone::Chaos | Zone::Hybrid => self.claim_indexed(ctx),
        };
        let Some(cell) = cell else {
            self.head_home(ctx);
            return;
        };

        let route = match ctx.grid.road_adjacent(cell) {
            Some(access) => ctx.routes.route(ctx.grid, self.pos, access).map_err(|e| e.to_string()),
            None => Err(format!("shelf {} has no road access", ctx.grid.cell(cell).pos)),
        };
        match route {
            Ok(route) => self.phase = PickerPhase::ToShelf { cell, walk: Walk::new(route) },
            Err(reason) => {
                error!(picker = %self.name, %cell, "{reason}");
                ctx.note(format!("{}: error, {reason}; order abandoned", self.name));
                self.abandon_claims(ctx);
                self.tasks.clear();
                self.head_home(ctx);
            }
        }
    }

    /// Fixed zone: serve the next task from its assigned shelves.
    fn claim_fixed<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) -> Option<CellId> {
        // Repair tickets jump the queue.
        if !matches!(self.tasks.front(), Some(PickTask::Repair(_))) {
            if let Some(ticket) = ctx.repairs.pop() {
                self.tasks.push_front(PickTask::Repair(ticket));
            }
        }

        while let Some(&task) = self.tasks.front() {
            match task {
                PickTask::Repair(ticket) => {
                    if ticket.is_live(ctx.grid) && ctx.grid.road_adjacent(ticket.cell).is_some() {
                        self.claims.push(Claim {
                            cell:   ticket.cell,
                            bin:    ticket.bin,
                            item:   ticket.item,
                            repair: true,
                        });
                        return Some(ticket.cell);
                    }
                    // The hold may survive a stale bin reference; release it.
                    ticket.release(ctx.grid);
                    warn!(picker = %self.name, cell = %ticket.cell, bin = %ticket.bin, "stale repair ticket");
                    ctx.note(format!(
                        "{}: repair ticket for {} at {} is stale, dropped",
                        self.name,
                        ctx.item_name(ticket.item),
                        ctx.grid.cell(ticket.cell).pos,
                    ));
                    self.tasks.pop_front();
                }
                PickTask::Order { item } => {
                    if let Some(cell) = self.claim_fixed_order(ctx, item) {
                        return Some(cell);
                    }
                    ctx.note(format!(
                        "{}: no reachable stock of {}, task abandoned",
                        self.name,
                        ctx.item_name(item)
                    ));
                    self.tasks.pop_front();
                }
            }
        }
        None
    }

    fn claim_fixed_order<P: Pathfinder>(
        &mut self,
        ctx:  &mut ZoneContext<'_, P>,
        item: ItemId,
    ) -> Option<CellId> {
        let mut shelves: Vec<CellId> = ctx
            .grid
            .zone_cells(Zone::Fixed)
            .iter()
            .copied()
            .filter(|&id| ctx.grid.cell(id).fixed_item == Some(item))
            .collect();
        self.rng.shuffle(&mut shelves);

        for cell in shelves {
            if ctx.grid.road_adjacent(cell).is_none() {
                continue;
            }
            let Some(bin) = ctx.grid.cell(cell).oldest_unheld(item).map(|b| b.id) else {
                continue;
            };
            if ctx.grid.reserve_pick(cell, bin, self.id).is_ok() {
                self.claims.push(Claim { cell, bin, item, repair: false });
                return Some(cell);
            }
        }
        None
    }

    /// Chaos / hybrid: claim every requested item available on the best
    /// shelf, or the single oldest bin of the first serviceable task.
    fn claim_indexed<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) -> Option<CellId> {
        // Drop tasks with nothing left to pick.
        let mut kept = VecDeque::with_capacity(self.tasks.len());
        for task in self.tasks.drain(..) {
            let item = task.item();
            if ctx.index.available(item, ctx.grid).next().is_some() {
                kept.push_back(task);
            } else {
                let msg = format!("{}: no stock of {}, task abandoned", self.name, ctx.item_name(item));
                ctx.note(msg);
            }
        }
        self.tasks = kept;
        if self.tasks.is_empty() {
            return None;
        }

        let cell = self.best_shelf(ctx);
        let claimed = self.claim_on_shelf(ctx, cell);
        if claimed >= 2 {
            return Some(cell);
        }
        // Not worth a multi-item stop: fall back to the oldest single bin.
        self.abandon_claims(ctx);

        let (item, loc) = self
            .tasks
            .iter()
            .find_map(|t| ctx.index.oldest_available(t.item(), ctx.grid).map(|l| (t.item(), l)))?;
        match ctx.grid.reserve_pick(loc.cell, loc.bin, self.id) {
            Ok(()) => {
                self.claims.push(Claim { cell: loc.cell, bin: loc.bin, item, repair: false });
                Some(loc.cell)
            }
            Err(e) => {
                error!(picker = %self.name, error = %e, "indexed bin could not be claimed");
                None
            }
        }
    }

    /// Shelf covering the most distinct requested items; ties go to the
    /// oldest bin, then the lowest cell id.
    fn best_shelf<P: Pathfinder>(&self, ctx: &ZoneContext<'_, P>) -> CellId {
        // (cell, distinct items, oldest arrival)
        let mut shelves: Vec<(CellId, Vec<ItemId>, Tick)> = Vec::new();
        for task in &self.tasks {
            let item = task.item();
            for loc in ctx.index.available(item, ctx.grid) {
                match shelves.iter_mut().find(|s| s.0 == loc.cell) {
                    Some(s) => {
                        if !s.1.contains(&item) {
                            s.1.push(item);
                        }
                        s.2 = s.2.min(loc.arrival);
                    }
                    None => shelves.push((loc.cell, vec![item], loc.arrival)),
                }
            }
        }
        shelves
            .into_iter()
            .min_by(|a, b| {
                b.1.len()
                    .cmp(&a.1.len())
                    .then(a.2.cmp(&b.2))
                    .then(a.0.cmp(&b.0))
            })
            .map_or(CellId::INVALID, |s| s.0)
    }

    /// Hold one bin on `cell` for every task it can serve.  Returns the
    /// number of bins claimed.
    fn claim_on_shelf<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>, cell: CellId) -> usize {
        if ctx.grid.get(cell).is_none() {
            return 0;
        }
        let items: Vec<ItemId> = self.tasks.iter().map(PickTask::item).collect();
        let mut claimed = 0;
        for item in items {
            let Some(bin) = ctx.grid.cell(cell).oldest_unheld(item).map(|b| b.id) else { continue };
            if ctx.grid.reserve_pick(cell, bin, self.id).is_ok() {
                self.claims.push(Claim { cell, bin, item, repair: false });
                claimed += 1;
            }
        }
        claimed
    }

    /// Drop the trip's claims.  Pick holds are rolled back; a repair claim
    /// discards its ticket and the surveyor's hold with it.
    fn abandon_claims<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        for c in self.claims.drain(..) {
            let released = if c.repair {
                ctx.grid.rollback_repair(c.cell, c.bin)
            } else {
                ctx.grid.rollback_pick(c.cell, c.bin, self.id)
            };
            if let Err(e) = released {
                error!(picker = %self.name, error = %e, "claim rollback failed");
            }
        }
    }

    // ── At the shelf ──────────────────────────────────────────────────────

    fn pick<P: Pathfinder>(&mut self, cell: CellId, ctx: &mut ZoneContext<'_, P>) {
        let shelf = ctx.grid.cell(cell).pos;
        let claims: Vec<Claim> = self.claims.drain(..).collect();
        for claim in claims {
            let result = if claim.repair {
                ctx.grid.commit_repair(claim.cell, claim.bin)
            } else {
                ctx.grid.commit_pick(claim.cell, claim.bin, self.id)
            };
            let name = ctx.item_name(claim.item).to_owned();
            self.remove_task(|t| match t {
                PickTask::Repair(r)      => claim.repair && r.bin == claim.bin,
                PickTask::Order { item } => !claim.repair && *item == claim.item,
            });
            match result {
                Ok(_) if claim.repair => {
                    ctx.stats.repairs += 1;
                    debug!(picker = %self.name, item = %name, %shelf, "repair pick");
                    ctx.note(format!("{}: removed misplaced {name} from {shelf}", self.name));
                    self.picked += 1;
                }
                Ok(_) => {
                    ctx.stats.picks += 1;
                    ctx.index.remove(claim.item, claim.bin);
                    debug!(picker = %self.name, item = %name, %shelf, "pick");
                    ctx.note(format!("{}: picked {name} at {shelf}", self.name));
                    self.picked += 1;
                }
                Err(e) => {
                    warn!(picker = %self.name, error = %e, "pick commit failed");
                    ctx.note(format!("{}: could not pick {name} at {shelf}: {e}", self.name));
                }
            }
        }

        if self.tasks.is_empty() {
            self.head_home(ctx);
        } else {
            self.phase = PickerPhase::Routing;
        }
    }

    fn remove_task(&mut self, pred: impl Fn(&PickTask) -> bool) {
        if let Some(i) = self.tasks.iter().position(pred) {
            self.tasks.remove(i);
        }
    }

    fn head_home<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        match ctx.routes.route(ctx.grid, self.pos, self.home) {
            Ok(route) => self.phase = PickerPhase::Home { walk: Walk::new(route) },
            Err(e) => {
                error!(picker = %self.name, error = %e, "no route home");
                ctx.note(format!("{}: no route home, waiting at {}", self.name, self.pos));
                self.abandon_claims(ctx);
                self.tasks.clear();
                self.phase = PickerPhase::Idle;
            }
        }
    }
}
