use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog is empty")]
    Empty,

    #[error("item {name:?} has invalid base weight {weight}")]
    InvalidWeight { name: String, weight: f64 },

    #[error("duplicate item name {0:?}")]
    DuplicateName(String),

    #[error("catalog parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type CatalogResult<T> = Result<T, CatalogError>;
