//! Typed identifiers.
//!
//! Tasks, bin-index entries and reservations refer to cells by `CellId`
//! rather than by reference, so resetting the grid never leaves a dangling
//! alias behind.

use std::fmt;

/// Newtype over an integer id with a `kind#n` display form.
macro_rules! id_type {
    ($(#[$attr:meta])* $name:ident($inner:ty), $tag:literal) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub $inner);

        impl $name {
            /// Position in the owning `Vec`.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($tag, "#{}"), self.0)
            }
        }
    };
}

id_type! {
    /// Row-major index of a grid cell.
    CellId(u32), "cell"
}

id_type! {
    /// Position of an item in the catalog.
    ItemId(u16), "item"
}

id_type! {
    /// A worker or picker.  Allocated monotonically per run and never reused.
    AgentId(u32), "agent"
}

id_type! {
    /// One physical bin.  Unique for the lifetime of a grid.
    BinId(u64), "bin"
}

impl CellId {
    /// No cell; returned when a search over shelves comes up empty.
    pub const INVALID: CellId = CellId(u32::MAX);
}

impl ItemId {
    /// No item; the sampler's answer for an empty catalog.
    pub const INVALID: ItemId = ItemId(u16::MAX);
}

impl TryFrom<usize> for ItemId {
    type Error = std::num::TryFromIntError;

    /// Catalog position to id, failing past `u16::MAX` entries.
    fn try_from(n: usize) -> Result<Self, Self::Error> {
        u16::try_from(n).map(ItemId)
    }
}
