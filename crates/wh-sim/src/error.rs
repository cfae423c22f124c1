use thiserror::Error;

use wh_alloc::AllocError;
use wh_core::{CellId, Pos, WhError};
use wh_grid::GridError;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("simulation configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] WhError),

    #[error("grid error: {0}")]
    Grid(#[from] GridError),

    #[error("allocation policy error: {0}")]
    Alloc(#[from] AllocError),

    #[error("no cell at {0}")]
    NoCell(Pos),

    /// A ledger hold whose owner no longer accounts for it.
    #[error("leaked hold on {cell}: {what}")]
    LeakedHold { cell: CellId, what: String },
}

pub type SimResult<T> = Result<T, SimError>;
