//! Grid coordinates.
//!
//! `x` grows to the right (columns), `y` grows downwards (rows).  Column 0 is
//! the picker side of the warehouse, the last column is the inbound dock.

use std::fmt;

/// The four orthogonal neighbour offsets, in the order the pathfinder and the
/// road-adjacency lookup probe them.
pub const NEIGHBOR_OFFSETS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// A cell coordinate on the warehouse grid.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Pos {
    pub x: u16,
    pub y: u16,
}

impl Pos {
    #[inline]
    pub const fn new(x: u16, y: u16) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to `other`.
    #[inline]
    pub fn manhattan(self, other: Pos) -> u32 {
        (self.x as i32 - other.x as i32).unsigned_abs()
            + (self.y as i32 - other.y as i32).unsigned_abs()
    }

    /// `true` if `other` shares an edge with `self`.
    #[inline]
    pub fn is_adjacent(self, other: Pos) -> bool {
        self.manhattan(other) == 1
    }

    /// Shift by `(dx, dy)`, returning `None` when the result leaves a
    /// `cols × rows` grid.
    pub fn offset(self, dx: i32, dy: i32, cols: u16, rows: u16) -> Option<Pos> {
        let x = self.x as i32 + dx;
        let y = self.y as i32 + dy;
        if x < 0 || y < 0 || x >= cols as i32 || y >= rows as i32 {
            return None;
        }
        Some(Pos::new(x as u16, y as u16))
    }

    /// In-bounds orthogonal neighbours in [`NEIGHBOR_OFFSETS`] order.
    pub fn neighbors(self, cols: u16, rows: u16) -> impl Iterator<Item = Pos> {
        NEIGHBOR_OFFSETS
            .into_iter()
            .filter_map(move |(dx, dy)| self.offset(dx, dy, cols, rows))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.x, self.y)
    }
}
