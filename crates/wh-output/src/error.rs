//! Error types for wh-output.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Why a writer gave up.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("cannot create output directory {}: {source}", .path.display())]
    CreateDir {
        path:   PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path:   PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A row was rejected by the CSV encoder or the file underneath it.
    #[error("writing {table} failed: {source}")]
    Write {
        table:  &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("flushing {table} failed: {source}")]
    Flush {
        table:  &'static str,
        #[source]
        source: io::Error,
    },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

impl OutputError {
    pub(crate) fn create_dir(path: &std::path::Path) -> impl FnOnce(io::Error) -> Self + '_ {
        move |source| OutputError::CreateDir { path: path.to_path_buf(), source }
    }
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
