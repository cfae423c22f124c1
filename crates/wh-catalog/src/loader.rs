//! CSV catalog loader.
//!
//! # CSV format
//!
//! ```csv
//! name,class,weight
//! HaWa,A,10
//! Halbleiter,B,3
//! Lichtgitter,C,1
//! ```
//!
//! Ids are assigned in row order.

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use crate::{AbcClass, Catalog, CatalogError, CatalogResult};

#[derive(Deserialize)]
struct ItemRecord {
    name:   String,
    class:  String,
    weight: f64,
}

/// Load a catalog from a CSV file.
pub fn load_catalog_csv(path: &Path) -> CatalogResult<Catalog> {
    let file = std::fs::File::open(path)?;
    load_catalog_reader(file)
}

/// Like [`load_catalog_csv`] but accepts any `Read` source.
pub fn load_catalog_reader<R: Read>(reader: R) -> CatalogResult<Catalog> {
    let mut csv_reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut entries: Vec<(String, AbcClass, f64)> = Vec::new();

    for result in csv_reader.deserialize::<ItemRecord>() {
        let row = result.map_err(|e| CatalogError::Parse(e.to_string()))?;
        let class: AbcClass = row.class.parse()?;
        entries.push((row.name, class, row.weight));
    }

    Catalog::new(entries)
}
