//! Hybrid (class-based) slotting.
//!
//! Below the load threshold the leftmost share of free shelves is split into
//! three contiguous class segments and an item is placed uniformly inside its
//! class's segment:
//!
//! ```text
//!   free shelves sorted by x ─────────────────────────────────▶
//!   |◀──────────── primary (75 %) ────────────▶|  overflow   |
//!   |◀──── A (62.5 %) ────▶|◀─ B (31.25 %) ─▶|C|             |
//! ```
//!
//! At or above the threshold every free shelf is fair game.

use wh_catalog::{AbcClass, Item};
use wh_core::{AgentId, AgentRng, CellId, Zone};
use wh_grid::Grid;

use crate::strategy::stake;
use crate::{AllocError, AllocResult, AllocationStrategy};

// ── HybridPolicy ──────────────────────────────────────────────────────────────

/// Tunables of the hybrid strategy.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HybridPolicy {
    /// Zone load at or above which class slotting is abandoned.
    pub fallback_load: f64,
    /// Share of free shelves (leftmost first) used for class slotting.
    pub primary_share: f64,
    /// Share of the primary set reserved for class A.
    pub class_a_share: f64,
    /// Share of the primary set reserved for class B.  C gets the rest.
    pub class_b_share: f64,
}

impl Default for HybridPolicy {
    fn default() -> Self {
        Self {
            fallback_load: 0.5,
            primary_share: 0.75,
            class_a_share: 0.625,
            class_b_share: 0.3125,
        }
    }
}

impl HybridPolicy {
    pub fn validate(&self) -> AllocResult<()> {
        let unit = |name: &str, v: f64| {
            if (0.0..=1.0).contains(&v) {
                Ok(())
            } else {
                Err(AllocError::InvalidPolicy(format!("{name} must lie in [0, 1], got {v}")))
            }
        };
        unit("fallback_load", self.fallback_load)?;
        unit("primary_share", self.primary_share)?;
        unit("class_a_share", self.class_a_share)?;
        unit("class_b_share", self.class_b_share)?;
        if self.class_a_share + self.class_b_share > 1.0 {
            return Err(AllocError::InvalidPolicy(format!(
                "class shares exceed 1: A {} + B {}",
                self.class_a_share, self.class_b_share
            )));
        }
        Ok(())
    }

    /// Segment sizes `[A, B, C]` for a primary set of `total` shelves.
    pub fn segment_sizes(&self, total: usize) -> [usize; 3] {
        let a = (total as f64 * self.class_a_share).floor() as usize;
        let b = (total as f64 * self.class_b_share).floor() as usize;
        let a = a.min(total);
        let b = b.min(total - a);
        [a, b, total - a - b]
    }
}

// ── HybridSlotting ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct HybridSlotting {
    policy: HybridPolicy,
}

impl HybridSlotting {
    pub fn new(policy: HybridPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &HybridPolicy {
        &self.policy
    }

    /// Candidate shelves for `class` under the current load, most specific
    /// non-empty set first.
    pub fn candidates(&self, grid: &Grid, class: AbcClass) -> Vec<CellId> {
        let mut free: Vec<CellId> = grid
            .zone_cells(Zone::Hybrid)
            .iter()
            .copied()
            .filter(|&id| grid.cell(id).free_for_put() > 0)
            .collect();

        if grid.zone_load(Zone::Hybrid) >= self.policy.fallback_load {
            return free;
        }

        free.sort_by_key(|&id| grid.cell(id).pos.x);
        let primary_len = (free.len() as f64 * self.policy.primary_share).floor() as usize;
        let primary = &free[..primary_len.min(free.len())];

        let [a, b, _] = self.policy.segment_sizes(primary.len());
        let segment = match class {
            AbcClass::A => &primary[..a],
            AbcClass::B => &primary[a..a + b],
            AbcClass::C => &primary[a + b..],
        };

        if !segment.is_empty() {
            segment.to_vec()
        } else if !primary.is_empty() {
            primary.to_vec()
        } else {
            free
        }
    }
}

impl AllocationStrategy for HybridSlotting {
    fn zone(&self) -> Zone {
        Zone::Hybrid
    }

    fn allocate(
        &self,
        grid: &mut Grid,
        item: &Item,
        by:   AgentId,
        rng:  &mut AgentRng,
    ) -> Option<CellId> {
        let pool = self.candidates(grid, item.class);
        let cell = *rng.choose(&pool)?;
        stake(grid, cell, item, by)
    }
}
