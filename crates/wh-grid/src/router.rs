//! Pathfinding over road cells.
//!
//! # Pluggability
//!
//! Agents route through the [`Pathfinder`] trait, memoised by
//! [`RouteCache`](crate::RouteCache).  The default [`BfsPathfinder`] is an
//! unweighted breadth-first search, which yields a shortest path on the grid.
//!
//! # Traversability
//!
//! Only road cells are walkable, except that the destination itself is always
//! enterable so a route can end on a shelf.

use std::collections::VecDeque;

use wh_core::Pos;

use crate::{Grid, GridError, GridResult};

// ── Route ─────────────────────────────────────────────────────────────────────

/// Positions to step through, excluding the start and including the goal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Route {
    pub steps: Vec<Pos>,
}

impl Route {
    /// Number of one-cell moves.
    #[inline]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn destination(&self) -> Option<Pos> {
        self.steps.last().copied()
    }
}

// ── Pathfinder trait ──────────────────────────────────────────────────────────

/// Pluggable path search.
pub trait Pathfinder: Send + Sync {
    /// Shortest route from `from` to `to`.
    ///
    /// `from == to` yields an empty route.  A disconnected goal is
    /// `Err(NoRoute)`; callers treat it as "cannot proceed".
    fn find(&self, grid: &Grid, from: Pos, to: Pos) -> GridResult<Route>;
}

// ── BfsPathfinder ─────────────────────────────────────────────────────────────

/// FIFO breadth-first search.  Neighbours are expanded in
/// [`wh_core::NEIGHBOR_OFFSETS`] order, which fixes tie-breaking between
/// equal-length paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsPathfinder;

impl Pathfinder for BfsPathfinder {
    fn find(&self, grid: &Grid, from: Pos, to: Pos) -> GridResult<Route> {
        bfs(grid, from, to)
    }
}

fn bfs(grid: &Grid, from: Pos, to: Pos) -> GridResult<Route> {
    let layout = grid.layout();
    for p in [from, to] {
        if !layout.contains(p) {
            return Err(GridError::OutOfBounds(p));
        }
    }
    if from == to {
        return Ok(Route::default());
    }

    let cols = layout.cols;
    let rows = layout.rows;
    let idx = |p: Pos| p.y as usize * cols as usize + p.x as usize;

    // prev[i] = cell we reached i from; `None` for unvisited.
    let mut prev: Vec<Option<Pos>> = vec![None; cols as usize * rows as usize];
    let mut visited = vec![false; prev.len()];
    let mut frontier = VecDeque::new();
    visited[idx(from)] = true;
    frontier.push_back(from);

    while let Some(cur) = frontier.pop_front() {
        if cur == to {
            return Ok(reconstruct(&prev, idx, from, to));
        }
        for next in cur.neighbors(cols, rows) {
            if visited[idx(next)] || !(next == to || grid.is_road(next)) {
                continue;
            }
            visited[idx(next)] = true;
            prev[idx(next)] = Some(cur);
            frontier.push_back(next);
        }
    }

    Err(GridError::NoRoute { from, to })
}

fn reconstruct(prev: &[Option<Pos>], idx: impl Fn(Pos) -> usize, from: Pos, to: Pos) -> Route {
    let mut steps = Vec::new();
    let mut cur = to;
    while cur != from {
        steps.push(cur);
        match prev[idx(cur)] {
            Some(p) => cur = p,
            None => break,
        }
    }
    steps.reverse();
    Route { steps }
}
