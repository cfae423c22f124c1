//! Put-away worker.
//!
//! ```text
//!   Idle ──allocate──▶ ToShelf ──arrive──▶ Delivering ──commit──▶ Home ──arrive──▶ Idle
//!     │                                                            ▲
//!     └────────────── no shelf (overflow) ─────────────────────────┘
//! ```
//!
//! A worker always walks to the road cell next to its shelf and commits on
//! the tick after arrival.  Reaching the dock starts the next delivery in the
//! same tick.  A worker with no route back idles where it stands, holding
//! nothing, and retries every tick.

use tracing::{debug, error, warn};

use wh_core::{AgentId, AgentRng, CellId, ItemId, Pos, Zone};
use wh_grid::{GridError, Pathfinder};

use crate::{BinLocation, Walk, ZoneContext};

/// A staked put: the worker holds a put hold for `(item, self)` on `cell`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct PutTarget {
    pub cell:   CellId,
    /// Road cell the worker stands on to serve `cell`.
    pub access: Pos,
    pub item:   ItemId,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum WorkerPhase {
    #[default]
    Idle,
    ToShelf { target: PutTarget, walk: Walk },
    Delivering { target: PutTarget },
    Home { walk: Walk },
}

impl WorkerPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            WorkerPhase::Idle           => "idle",
            WorkerPhase::ToShelf { .. } => "walking-to-shelf",
            WorkerPhase::Delivering { .. } => "delivering",
            WorkerPhase::Home { .. }    => "walking-home",
        }
    }

    /// The outstanding put hold, if any.
    pub fn target(&self) -> Option<&PutTarget> {
        match self {
            WorkerPhase::ToShelf { target, .. } | WorkerPhase::Delivering { target } => Some(target),
            _ => None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Worker {
    pub id:    AgentId,
    pub name:  String,
    pub zone:  Zone,
    pub pos:   Pos,
    pub dock:  Pos,
    pub phase: WorkerPhase,
    rng:       AgentRng,
}

impl Worker {
    pub fn new(id: AgentId, zone: Zone, dock: Pos, seed: u64) -> Self {
        Self {
            id,
            name: format!("{zone}-worker-{}", id.0),
            zone,
            pos: dock,
            dock,
            phase: WorkerPhase::Idle,
            rng: AgentRng::new(seed, id),
        }
    }

    /// Advance one tick.
    pub fn step<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        match std::mem::take(&mut self.phase) {
            // Stranded away from the dock: retry the way back first.
            WorkerPhase::Idle if self.pos != self.dock => self.head_home(ctx),
            WorkerPhase::Idle => self.start_delivery(ctx),
            WorkerPhase::ToShelf { target, mut walk } => {
                self.phase = if walk.step(&mut self.pos) {
                    WorkerPhase::Delivering { target }
                } else {
                    WorkerPhase::ToShelf { target, walk }
                };
            }
            WorkerPhase::Delivering { target } => {
                self.deliver(target, ctx);
                self.head_home(ctx);
            }
            WorkerPhase::Home { mut walk } => {
                if walk.step(&mut self.pos) {
                    self.start_delivery(ctx);
                } else {
                    self.phase = WorkerPhase::Home { walk };
                }
            }
        }
    }

    /// Release any put hold.  Called before the worker is removed.
    pub fn retire(&mut self, grid: &mut wh_grid::Grid) {
        if let Some(t) = self.phase.target().copied() {
            if let Err(e) = grid.rollback_put(t.cell, t.item, self.id) {
                warn!(worker = %self.name, error = %e, "retire: put hold already gone");
            }
        }
        self.phase = WorkerPhase::Idle;
    }

    // ── Internals ─────────────────────────────────────────────────────────

    fn start_delivery<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        let Some(item_id) = ctx.deliveries.next() else { return };
        let Some(item) = ctx.catalog.get(item_id) else {
            error!(worker = %self.name, item = %item_id, "delivery stream produced unknown item");
            return;
        };

        let Some(cell) = ctx.strategy.allocate(ctx.grid, item, self.id, &mut self.rng) else {
            ctx.stats.overflow += 1;
            let msg = format!("{}: no shelf for {}, overflow", self.name, item.name);
            debug!(zone = %self.zone, "{msg}");
            ctx.note(msg);
            self.head_home(ctx);
            return;
        };

        let Some(access) = ctx.grid.road_adjacent(cell) else {
            error!(worker = %self.name, %cell, "allocated shelf has no road access");
            ctx.note(format!("{}: error, shelf {} has no road access", self.name, ctx.grid.cell(cell).pos));
            self.release(ctx, cell, item_id);
            return;
        };

        match ctx.routes.route(ctx.grid, self.pos, access) {
            Ok(route) => {
                let target = PutTarget { cell, access, item: item_id };
                self.phase = WorkerPhase::ToShelf { target, walk: Walk::new(route) };
            }
            Err(e) => {
                error!(worker = %self.name, error = %e, "no route to shelf");
                ctx.note(format!("{}: error, {e}", self.name));
                self.release(ctx, cell, item_id);
            }
        }
    }

    fn deliver<P: Pathfinder>(&mut self, target: PutTarget, ctx: &mut ZoneContext<'_, P>) {
        let name = ctx.item_name(target.item).to_owned();
        let shelf = ctx.grid.cell(target.cell).pos;
        match ctx.grid.commit_put(target.cell, target.item, self.id, ctx.tick) {
            Ok(bin) => {
                ctx.stats.puts += 1;
                if self.zone != Zone::Fixed {
                    ctx.index.insert(target.item, BinLocation { cell: target.cell, bin, arrival: ctx.tick });
                }
                let misplaced = ctx.grid.cell(target.cell).fixed_item.is_some_and(|f| f != target.item);
                debug!(worker = %self.name, item = %name, %shelf, misplaced, "put");
                ctx.note(if misplaced {
                    format!("{}: stored {name} at {shelf} (wrong slot)", self.name)
                } else {
                    format!("{}: stored {name} at {shelf}", self.name)
                });
            }
            Err(GridError::CapacityConflict(_)) => {
                ctx.stats.put_conflicts += 1;
                ctx.stats.overflow += 1;
                warn!(worker = %self.name, %shelf, "shelf full at commit");
                ctx.note(format!("{}: shelf {shelf} full on arrival, returning with {name}", self.name));
            }
            Err(e) => {
                error!(worker = %self.name, error = %e, "put commit failed");
                ctx.note(format!("{}: error, {e}", self.name));
            }
        }
    }

    fn head_home<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>) {
        match ctx.routes.route(ctx.grid, self.pos, self.dock) {
            Ok(route) => self.phase = WorkerPhase::Home { walk: Walk::new(route) },
            Err(e) => {
                error!(worker = %self.name, error = %e, "no route to dock");
                ctx.note(format!("{}: no route to dock, waiting at {}", self.name, self.pos));
                self.phase = WorkerPhase::Idle;
            }
        }
    }

    fn release<P: Pathfinder>(&mut self, ctx: &mut ZoneContext<'_, P>, cell: CellId, item: ItemId) {
        if let Err(e) = ctx.grid.rollback_put(cell, item, self.id) {
            error!(worker = %self.name, error = %e, "rollback failed");
        }
        self.phase = WorkerPhase::Idle;
    }
}
