//! The three storage strategies being compared.
//!
//! Each zone occupies one contiguous band of grid rows.  Iteration order
//! (`Zone::ALL`) is also the order in which the scheduler steps zones, so it is
//! part of the determinism contract.

/// A storage zone, named after the slotting strategy it runs.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Zone {
    /// Fixed-slot storage: every shelf has one permitted item.
    Fixed,
    /// Chaotic storage: any item goes to the first shelf with room.
    Chaos,
    /// Hybrid storage: class-based slotting that degrades under load.
    Hybrid,
}

impl Zone {
    /// All zones in scheduler order (nearest the entry first).
    pub const ALL: [Zone; 3] = [Zone::Fixed, Zone::Chaos, Zone::Hybrid];

    /// Position in [`Zone::ALL`]; used to index per-zone arrays.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Zone::Fixed  => 0,
            Zone::Chaos  => 1,
            Zone::Hybrid => 2,
        }
    }

    /// Human-readable label, useful for CSV column values and agent names.
    pub fn as_str(self) -> &'static str {
        match self {
            Zone::Fixed  => "fixed",
            Zone::Chaos  => "chaos",
            Zone::Hybrid => "hybrid",
        }
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Zone {
    type Err = crate::WhError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "fixed"  => Ok(Zone::Fixed),
            "chaos"  => Ok(Zone::Chaos),
            "hybrid" => Ok(Zone::Hybrid),
            other    => Err(crate::WhError::Parse(format!(
                "unknown zone {other:?}: expected \"fixed\", \"chaos\" or \"hybrid\""
            ))),
        }
    }
}
