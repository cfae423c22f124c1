//! Catalog entries and ABC classification.

use std::fmt;
use std::str::FromStr;

use wh_core::ItemId;

use crate::{CatalogError, CatalogResult};

// ── AbcClass ──────────────────────────────────────────────────────────────────

/// Turnover class.  `A` moves fastest.  Ordering is `A < B < C`.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AbcClass {
    A,
    B,
    C,
}

impl AbcClass {
    pub const ALL: [AbcClass; 3] = [AbcClass::A, AbcClass::B, AbcClass::C];

    /// Sampling multiplier applied on top of an item's base weight.
    #[inline]
    pub fn multiplier(self) -> f64 {
        match self {
            AbcClass::A => 10.0,
            AbcClass::B => 3.0,
            AbcClass::C => 1.0,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AbcClass::A => "A",
            AbcClass::B => "B",
            AbcClass::C => "C",
        }
    }
}

impl fmt::Display for AbcClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AbcClass {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "A" | "a" => Ok(AbcClass::A),
            "B" | "b" => Ok(AbcClass::B),
            "C" | "c" => Ok(AbcClass::C),
            other => Err(CatalogError::Parse(format!(
                "invalid ABC class {other:?}: expected A, B or C"
            ))),
        }
    }
}

// ── Item ──────────────────────────────────────────────────────────────────────

/// One immutable catalog entry.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id:          ItemId,
    pub name:        String,
    pub class:       AbcClass,
    pub base_weight: f64,
}

impl Item {
    /// Weight used by the sampler before jitter.
    #[inline]
    pub fn class_weight(&self) -> f64 {
        self.base_weight * self.class.multiplier()
    }
}

// ── Catalog ───────────────────────────────────────────────────────────────────

/// The read-only item universe of a run.  `ItemId(i)` is the `i`-th entry.
#[derive(Clone, Debug)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Build from `(name, class, base_weight)` triples, assigning ids in order.
    pub fn new<S: Into<String>>(
        entries: impl IntoIterator<Item = (S, AbcClass, f64)>,
    ) -> CatalogResult<Self> {
        let mut items = Vec::new();
        for (i, (name, class, base_weight)) in entries.into_iter().enumerate() {
            let id = ItemId::try_from(i)
                .map_err(|_| CatalogError::Parse(format!("too many items ({i})")))?;
            items.push(Item { id, name: name.into(), class, base_weight });
        }
        let catalog = Catalog { items };
        catalog.validate()?;
        Ok(catalog)
    }

    /// The six-item catalog the warehouse is modelled on.
    pub fn standard() -> Self {
        let entries = [
            ("HaWa",        AbcClass::A, 10.0),
            ("Halbleiter",  AbcClass::B, 3.0),
            ("Lichtgitter", AbcClass::C, 1.0),
            ("PNOZ",        AbcClass::A, 6.0),
            ("PSENbolt",    AbcClass::B, 2.0),
            ("ROH",         AbcClass::C, 3.0),
        ];
        let items = entries
            .into_iter()
            .enumerate()
            .map(|(i, (name, class, base_weight))| Item {
                id: ItemId(i as u16),
                name: name.to_owned(),
                class,
                base_weight,
            })
            .collect();
        Catalog { items }
    }

    fn validate(&self) -> CatalogResult<()> {
        if self.items.is_empty() {
            return Err(CatalogError::Empty);
        }
        for (i, item) in self.items.iter().enumerate() {
            if !(item.base_weight.is_finite() && item.base_weight > 0.0) {
                return Err(CatalogError::InvalidWeight {
                    name:   item.name.clone(),
                    weight: item.base_weight,
                });
            }
            if self.items[..i].iter().any(|other| other.name == item.name) {
                return Err(CatalogError::DuplicateName(item.name.clone()));
            }
        }
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[inline]
    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    /// Look up by name.
    pub fn find(&self, name: &str) -> Option<&Item> {
        self.items.iter().find(|item| item.name == name)
    }

    /// Item name, or `"?"` for an id outside the catalog.
    pub fn name(&self, id: ItemId) -> &str {
        self.get(id).map_or("?", |item| item.name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Sum of base weights (the denominator of quota shares).
    pub fn total_base_weight(&self) -> f64 {
        self.items.iter().map(|item| item.base_weight).sum()
    }
}
