//! Grid-subsystem error type.

use thiserror::Error;

use wh_core::{BinId, CellId, Pos};

/// Errors produced by `wh-grid`.
#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("cell {0} has no free capacity")]
    CellFull(CellId),

    #[error("cell {0} is not a storage cell")]
    NotStorage(CellId),

    #[error("cell {0} does not exist")]
    UnknownCell(CellId),

    #[error("no matching hold on cell {0}")]
    NoSuchHold(CellId),

    #[error("bin {bin} not found in cell {cell}")]
    BinNotFound { cell: CellId, bin: BinId },

    #[error("bin {bin} in cell {cell} is already held")]
    BinHeld { cell: CellId, bin: BinId },

    #[error("cell {0} is physically full at commit")]
    CapacityConflict(CellId),

    #[error("no route from {from} to {to}")]
    NoRoute { from: Pos, to: Pos },

    #[error("position {0} is outside the grid")]
    OutOfBounds(Pos),

    #[error("cell {0} has no adjacent road")]
    NoRoadAccess(CellId),

    #[error("invariant violated at cell {cell}: {what}")]
    InvariantViolated { cell: CellId, what: String },

    #[error("configuration error: {0}")]
    Config(String),
}

pub type GridResult<T> = Result<T, GridError>;
