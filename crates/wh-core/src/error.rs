//! Base error type.
//!
//! Each `wh-*` crate defines its own error enum for its own failure modes and
//! wraps `WhError` as one variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WhError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Shorthand result type for `wh-core`.
pub type WhResult<T> = Result<T, WhError>;
