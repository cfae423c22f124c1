//! Fluent builder for constructing a [`Sim`].

use tracing::{debug, info};

use wh_agent::Surveyor;
use wh_alloc::strategy_for;
use wh_catalog::{Catalog, Sampler, apportion, slot_sequence};
use wh_core::{Zone, mix_seed};
use wh_grid::{BfsPathfinder, Grid, Pathfinder, RouteCache};

use crate::{Sim, SimError, SimResult, WarehouseConfig, ZoneState};

/// Seed tags of the per-zone item streams.
const DELIVERY_STREAM: u64 = 0xd000;
const ORDER_STREAM:    u64 = 0x0d00;

/// Fluent builder for [`Sim<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method            | Default                   |
/// |-------------------|---------------------------|
/// | `.catalog(c)`     | [`Catalog::standard()`]   |
/// | `.pathfinder(p)`  | [`BfsPathfinder`]         |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(WarehouseConfig::default())
///     .catalog(load_catalog_csv(path)?)
///     .build()?;
/// sim.run(&mut NoopObserver);
/// ```
pub struct SimBuilder<P: Pathfinder = BfsPathfinder> {
    config:     WarehouseConfig,
    catalog:    Option<Catalog>,
    pathfinder: P,
}

impl SimBuilder<BfsPathfinder> {
    pub fn new(config: WarehouseConfig) -> Self {
        Self { config, catalog: None, pathfinder: BfsPathfinder }
    }
}

impl<P: Pathfinder> SimBuilder<P> {
    pub fn catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    /// Swap the route search.  Results are still memoised per `(from, to)`.
    pub fn pathfinder<Q: Pathfinder>(self, pathfinder: Q) -> SimBuilder<Q> {
        SimBuilder { config: self.config, catalog: self.catalog, pathfinder }
    }

    /// Validate the configuration, lay out the grid, assign fixed slots and
    /// spawn the configured agents.
    pub fn build(self) -> SimResult<Sim<P>> {
        self.config.validate()?;
        let catalog = self.catalog.unwrap_or_else(Catalog::standard);

        let mut grid = Grid::new(self.config.layout.clone())?;
        let quotas = apportion(&catalog, grid.fixed_slot_count());
        let assigned = grid.assign_fixed_slots(&slot_sequence(&quotas));
        if assigned != grid.fixed_slot_count() {
            return Err(SimError::Config(format!(
                "assigned {assigned} of {} fixed slots",
                grid.fixed_slot_count()
            )));
        }
        for q in &quotas {
            debug!(item = catalog.name(q.item), class = q.class.as_str(), slots = q.slots, "fixed quota");
        }

        let seed = self.config.sim.seed;
        let sampler = Sampler::new(&catalog);
        let zones = Zone::ALL.map(|zone| {
            let tag = zone.index() as u64;
            ZoneState::new(
                zone,
                strategy_for(zone, &self.config.hybrid),
                sampler.stream(mix_seed(seed, DELIVERY_STREAM | tag)),
                sampler.stream(mix_seed(seed, ORDER_STREAM | tag)),
            )
        });
        let surveyor = Surveyor::new(grid.layout(), self.config.survey);

        let mut sim = Sim {
            clock:      self.config.sim.make_clock(),
            config:     self.config,
            catalog,
            grid,
            routes:     RouteCache::new(self.pathfinder),
            zones,
            surveyor,
            pending:    Vec::new(),
            next_agent: 0,
        };
        for zone in Zone::ALL {
            sim.set_staffing(zone, sim.config.staffing.workers(zone), sim.config.staffing.pickers(zone));
        }
        info!(
            seed,
            cells = sim.grid.cells().len(),
            items = sim.catalog.len(),
            "warehouse simulation built"
        );
        Ok(sim)
    }
}
