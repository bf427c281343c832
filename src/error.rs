//! Fatal errors of the transform-and-load pipeline.
//!
//! Non-fatal conditions (coercion fallbacks, silently dropped rows, index
//! failures) are not errors: they travel as counters in the stage reports.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EtlError {
    #[error("Source file not found: {0:?}")]
    SourceNotFound(PathBuf),

    #[error("Source format error: {0}")]
    SourceFormat(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to open warehouse at {path:?}: {source}")]
    WarehouseOpen {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Failed to write warehouse table {table}: {source}")]
    WarehouseWrite {
        table: &'static str,
        #[source]
        source: rusqlite::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type EtlResult<T> = Result<T, EtlError>;
