//! Route memoisation keyed by the exact `(from, to)` pair.
//!
//! Road topology never changes during a run, so entries stay valid until
//! [`RouteCache::clear`] on a full reset.  Only successful searches are
//! cached.

use wh_core::Pos;

use crate::{BfsPathfinder, Grid, GridResult, Pathfinder, Route};

#[cfg(feature = "fx-hash")]
type RouteMap = rustc_hash::FxHashMap<(Pos, Pos), Route>;
#[cfg(not(feature = "fx-hash"))]
type RouteMap = std::collections::HashMap<(Pos, Pos), Route>;

pub struct RouteCache<P: Pathfinder = BfsPathfinder> {
    finder: P,
    memo:   RouteMap,
    hits:   u64,
    misses: u64,
}

impl Default for RouteCache<BfsPathfinder> {
    fn default() -> Self {
        Self::new(BfsPathfinder)
    }
}

impl<P: Pathfinder> RouteCache<P> {
    pub fn new(finder: P) -> Self {
        Self { finder, memo: RouteMap::default(), hits: 0, misses: 0 }
    }

    /// Memoised route from `from` to `to`.
    pub fn route(&mut self, grid: &Grid, from: Pos, to: Pos) -> GridResult<Route> {
        if let Some(route) = self.memo.get(&(from, to)) {
            self.hits += 1;
            return Ok(route.clone());
        }
        self.misses += 1;
        let route = self.finder.find(grid, from, to)?;
        self.memo.insert((from, to), route.clone());
        Ok(route)
    }

    pub fn clear(&mut self) {
        self.memo.clear();
        self.hits = 0;
        self.misses = 0;
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.memo.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.memo.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    pub fn finder(&self) -> &P {
        &self.finder
    }
}
