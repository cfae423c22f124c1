//! Weighted item sampling.
//!
//! Each draw re-jitters every class weight by a uniform multiplicative factor
//! in `[1 - jitter, 1 + jitter]` before normalising.  Short runs therefore
//! wobble around the class-weighted distribution while long runs converge on
//! it.

use rand::Rng;

use wh_core::{ItemId, SimRng};

use crate::Catalog;

/// Default multiplicative jitter (±20 %).
pub const DEFAULT_JITTER: f64 = 0.2;

/// Stream tag mixed into the run seed for the shared delivery/order stream.
pub const ITEM_STREAM_TAG: u64 = 0x17e3;

/// Catalog-derived weighted sampler.  Cheap to clone.
#[derive(Clone, Debug)]
pub struct Sampler {
    ids:     Vec<ItemId>,
    weights: Vec<f64>,
    jitter:  f64,
}

impl Sampler {
    pub fn new(catalog: &Catalog) -> Self {
        Self::with_jitter(catalog, DEFAULT_JITTER)
    }

    /// `jitter` is clamped to `[0, 0.99]`.
    pub fn with_jitter(catalog: &Catalog, jitter: f64) -> Self {
        Self {
            ids:     catalog.iter().map(|item| item.id).collect(),
            weights: catalog.iter().map(|item| item.class_weight()).collect(),
            jitter:  jitter.clamp(0.0, 0.99),
        }
    }

    /// Un-jittered selection probability of `item` (0 if unknown).
    pub fn probability(&self, item: ItemId) -> f64 {
        let total: f64 = self.weights.iter().sum();
        self.ids
            .iter()
            .position(|&id| id == item)
            .map_or(0.0, |i| self.weights[i] / total)
    }

    /// One weighted draw.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ItemId {
        let jittered: Vec<f64> = self
            .weights
            .iter()
            .map(|w| {
                if self.jitter > 0.0 {
                    w * rng.gen_range(1.0 - self.jitter..=1.0 + self.jitter)
                } else {
                    *w
                }
            })
            .collect();
        let total: f64 = jittered.iter().sum();
        let mut r = rng.r#gen::<f64>() * total;
        for (i, w) in jittered.iter().enumerate() {
            if r < *w {
                return self.ids[i];
            }
            r -= w;
        }
        // Float slop on the last bucket.
        *self.ids.last().unwrap_or(&ItemId::INVALID)
    }

    /// `n` independent draws.
    pub fn sample_n<R: Rng + ?Sized>(&self, rng: &mut R, n: usize) -> Vec<ItemId> {
        (0..n).map(|_| self.sample(rng)).collect()
    }

    /// An infinite, restartable stream seeded from `seed`.
    pub fn stream(&self, seed: u64) -> ItemStream {
        ItemStream {
            sampler: self.clone(),
            seed,
            rng: SimRng::stream(seed, ITEM_STREAM_TAG),
            drawn: 0,
        }
    }
}

// ── ItemStream ────────────────────────────────────────────────────────────────

/// Lazy infinite sequence of sampled items.
///
/// `restart()` rewinds to the first draw, so the same seed always replays the
/// same sequence.
#[derive(Clone, Debug)]
pub struct ItemStream {
    sampler: Sampler,
    seed:    u64,
    rng:     SimRng,
    drawn:   u64,
}

impl ItemStream {
    /// Rewind to the beginning of the sequence.
    pub fn restart(&mut self) {
        self.rng = SimRng::stream(self.seed, ITEM_STREAM_TAG);
        self.drawn = 0;
    }

    /// Draw the next `n` items.
    pub fn take_batch(&mut self, n: usize) -> Vec<ItemId> {
        self.by_ref().take(n).collect()
    }

    /// Number of items drawn since the last restart.
    pub fn drawn(&self) -> u64 {
        self.drawn
    }
}

impl Iterator for ItemStream {
    type Item = ItemId;

    fn next(&mut self) -> Option<ItemId> {
        self.drawn += 1;
        Some(self.sampler.sample(self.rng.inner()))
    }
}
