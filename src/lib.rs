//! Fragrance Warehouse Library
//!
//! Loads the cleaned fragrance catalog into a SQLite star schema. The
//! pipeline modules are exposed for testing and reuse.

pub mod config;
pub mod error;
pub mod filter;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod source;
pub mod sqlite_persistence;
pub mod star;
pub mod table;
pub mod warehouse;

// Re-export commonly used types for convenience
pub use config::{AppConfig, CliConfig, FileConfig};
pub use error::{EtlError, EtlResult};
pub use ingest::SourceOptions;
pub use pipeline::{run, run_pipeline, transform, RunSummary};
pub use star::StarSchema;
pub use warehouse::Warehouse;
