//! One-cell-per-tick movement along a precomputed route.

use wh_core::Pos;
use wh_grid::Route;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Walk {
    route:  Route,
    cursor: usize,
}

impl Walk {
    pub fn new(route: Route) -> Self {
        Self { route, cursor: 0 }
    }

    /// Move `pos` one cell along the route.  Returns `true` once the
    /// destination has been reached (immediately for an empty route).
    pub fn step(&mut self, pos: &mut Pos) -> bool {
        if let Some(&next) = self.route.steps.get(self.cursor) {
            *pos = next;
            self.cursor += 1;
        }
        self.is_done()
    }

    #[inline]
    pub fn is_done(&self) -> bool {
        self.cursor >= self.route.len()
    }

    #[inline]
    pub fn remaining(&self) -> usize {
        self.route.len().saturating_sub(self.cursor)
    }

    pub fn destination(&self) -> Option<Pos> {
        self.route.destination()
    }
}
