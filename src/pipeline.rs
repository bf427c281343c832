//! End-to-end run: acquire, ingest, normalize, filter, assemble, load.
//!
//! Each stage fully materializes its output before the next one starts.
//! The warehouse connection is only opened once the star schema is ready.

use crate::config::AppConfig;
use crate::error::EtlResult;
use crate::filter::{deduplicate_and_filter, FilterStats};
use crate::ingest::{read_source, IngestReport, SourceOptions};
use crate::normalize::{normalize, CoercionStats};
use crate::star::{assemble, build_dimensions, AssemblyStats, StarSchema};
use crate::table::Table;
use crate::warehouse::{Warehouse, WriteReport};
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// Everything a run counted, from ingestion to the last index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub ingest: IngestReport,
    pub coercion: CoercionStats,
    pub filter: FilterStats,
    pub assembly: AssemblyStats,
    pub write: WriteReport,
}

/// Counters of the transform phase, before anything is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    pub coercion: CoercionStats,
    pub filter: FilterStats,
    pub assembly: AssemblyStats,
}

impl RunSummary {
    pub fn log(&self) {
        info!("");
        info!("Load Summary");
        info!("============");
        info!("Rows read: {}", self.ingest.rows_read);
        info!("Duplicate rows removed: {}", self.filter.duplicates_removed);
        info!(
            "Rows missing required fields removed: {}",
            self.filter.missing_required_removed
        );
        for table in &self.write.tables {
            info!("  {}: {} rows", table.table, table.rows);
        }
        if self.ingest.malformed_rows_skipped > 0 {
            warn!("Malformed rows skipped: {}", self.ingest.malformed_rows_skipped);
        }
        if self.coercion.warnings() > 0 {
            warn!("Values coerced: {}", self.coercion.warnings());
        }
        if self.assembly.perfumes_dropped > 0 || self.assembly.bridge_rows_dropped > 0 {
            warn!(
                "Dropped by unresolved joins: {} perfumes, {} bridge rows",
                self.assembly.perfumes_dropped, self.assembly.bridge_rows_dropped
            );
        }
        if !self.write.index_failures.is_empty() {
            warn!("Index failures: {}", self.write.index_failures.len());
        }
    }

    /// Writes the summary as pretty JSON.
    pub fn write_json(&self, path: &Path) -> EtlResult<()> {
        let json = serde_json::to_string_pretty(self).map_err(std::io::Error::from)?;
        std::fs::write(path, json)?;
        info!("Wrote run summary to {:?}", path);
        Ok(())
    }
}

/// Runs the transform phase on an ingested table.
pub fn transform(mut table: Table) -> (StarSchema, TransformStats) {
    let coercion = normalize(&mut table);
    let (table, filter) = deduplicate_and_filter(table);
    let dimensions = build_dimensions(&table);
    let (schema, assembly) = assemble(&table, dimensions);
    (
        schema,
        TransformStats {
            coercion,
            filter,
            assembly,
        },
    )
}

/// Reads `source`, transforms it, and replaces the warehouse at `warehouse`.
pub fn run_pipeline(
    source: &Path,
    options: &SourceOptions,
    warehouse: &Path,
) -> EtlResult<RunSummary> {
    let (table, ingest) = read_source(source, options)?;
    let (schema, stats) = transform(table);

    let write = {
        let mut warehouse = Warehouse::open(warehouse)?;
        warehouse.load(&schema)?
    };

    Ok(RunSummary {
        ingest,
        coercion: stats.coercion,
        filter: stats.filter,
        assembly: stats.assembly,
        write,
    })
}

/// Runs the whole pipeline as configured.
pub fn run(config: &AppConfig) -> EtlResult<RunSummary> {
    let source = config.source.acquire()?;
    let summary = run_pipeline(&source, &config.source_options, &config.warehouse)?;
    summary.log();
    if let Some(path) = &config.summary_json {
        summary.write_json(path)?;
    }
    Ok(summary)
}
