use super::schema::*;
use crate::error::{EtlError, EtlResult};
use crate::sqlite_persistence::Table;
use crate::star::{Perfume, PerfumeAccord, PerfumeNote, PerfumePerfumer, StarSchema};
use rusqlite::{params, Connection, Statement};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A row that knows how to bind itself to its table's insert statement.
trait InsertRow {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize>;
}

impl<T: InsertRow + ?Sized> InsertRow for &T {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        (**self).insert(stmt)
    }
}

/// Dimension rows: `(key, name)`.
impl InsertRow for (i64, &str) {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.0, self.1])
    }
}

impl InsertRow for Perfume {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![
            self.perfume_id,
            self.name,
            self.brand_id,
            self.country_id,
            self.gender_id,
            self.rating_value,
            self.rating_count,
            self.year,
            self.url,
        ])
    }
}

impl InsertRow for PerfumeAccord {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.perfume_id, self.accord_id, self.accord_rank])
    }
}

impl InsertRow for PerfumeNote {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.perfume_id, self.note_id, self.note_type])
    }
}

impl InsertRow for PerfumePerfumer {
    fn insert(&self, stmt: &mut Statement<'_>) -> rusqlite::Result<usize> {
        stmt.execute(params![self.perfume_id, self.perfumer_id])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableWrite {
    pub table: &'static str,
    pub rows: usize,
}

/// An index statement that failed. Never fatal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexFailure {
    pub index: &'static str,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WriteReport {
    pub tables: Vec<TableWrite>,
    pub index_failures: Vec<IndexFailure>,
}

impl WriteReport {
    pub fn rows_written(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}

/// A single warehouse session. The connection is released when the value
/// is dropped.
pub struct Warehouse {
    conn: Connection,
}

impl Warehouse {
    pub fn open(path: &Path) -> EtlResult<Self> {
        let conn = Connection::open(path).map_err(|source| EtlError::WarehouseOpen {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Opened warehouse at {:?}", path);
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> EtlResult<Self> {
        let conn = Connection::open_in_memory().map_err(|source| EtlError::WarehouseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Replaces every warehouse table with the contents of `schema`, then
    /// creates the join indexes.
    ///
    /// A failed table write aborts the load; tables written before it keep
    /// their new contents. Index failures are only logged and reported.
    pub fn load(&mut self, schema: &StarSchema) -> EtlResult<WriteReport> {
        let dims = &schema.dimensions;
        let mut report = WriteReport::default();

        let mut record = |table: &'static Table, rows: usize| {
            report.tables.push(TableWrite {
                table: table.name,
                rows,
            })
        };
        record(
            &BRANDS_TABLE,
            replace_table(&mut self.conn, &BRANDS_TABLE, dims.brands.iter())?,
        );
        record(
            &COUNTRIES_TABLE,
            replace_table(&mut self.conn, &COUNTRIES_TABLE, dims.countries.iter())?,
        );
        record(
            &GENDERS_TABLE,
            replace_table(&mut self.conn, &GENDERS_TABLE, dims.genders.iter())?,
        );
        record(
            &PERFUMES_TABLE,
            replace_table(&mut self.conn, &PERFUMES_TABLE, &schema.perfumes)?,
        );
        record(
            &ACCORDS_TABLE,
            replace_table(&mut self.conn, &ACCORDS_TABLE, dims.accords.iter())?,
        );
        record(
            &PERFUME_ACCORDS_TABLE,
            replace_table(&mut self.conn, &PERFUME_ACCORDS_TABLE, &schema.perfume_accords)?,
        );
        record(
            &NOTES_TABLE,
            replace_table(&mut self.conn, &NOTES_TABLE, dims.notes.iter())?,
        );
        record(
            &PERFUME_NOTES_TABLE,
            replace_table(&mut self.conn, &PERFUME_NOTES_TABLE, &schema.perfume_notes)?,
        );
        record(
            &PERFUMERS_TABLE,
            replace_table(&mut self.conn, &PERFUMERS_TABLE, dims.perfumers.iter())?,
        );
        record(
            &PERFUME_PERFUMERS_TABLE,
            replace_table(
                &mut self.conn,
                &PERFUME_PERFUMERS_TABLE,
                &schema.perfume_perfumers,
            )?,
        );

        report.index_failures = self.create_indices();
        Ok(report)
    }

    /// Creates every join index that does not exist yet.
    pub fn create_indices(&self) -> Vec<IndexFailure> {
        let mut failures = Vec::new();
        for index in WAREHOUSE_INDICES {
            if let Err(e) = index.create_if_missing(&self.conn) {
                warn!("Failed to create index {}: {}", index.name, e);
                failures.push(IndexFailure {
                    index: index.name,
                    message: e.to_string(),
                });
            }
        }
        if failures.is_empty() {
            info!("Created {} indexes", WAREHOUSE_INDICES.len());
        }
        failures
    }
}

/// Drops and recreates `table`, then inserts `rows` in one transaction.
fn replace_table<R: InsertRow>(
    conn: &mut Connection,
    table: &'static Table,
    rows: impl IntoIterator<Item = R>,
) -> EtlResult<usize> {
    let write_error = |source| EtlError::WarehouseWrite {
        table: table.name,
        source,
    };

    let tx = conn.transaction().map_err(write_error)?;
    table.replace(&tx).map_err(write_error)?;
    let mut count = 0;
    {
        let mut stmt = tx.prepare(&table.insert_sql()).map_err(write_error)?;
        for row in rows {
            row.insert(&mut stmt).map_err(write_error)?;
            count += 1;
        }
    }
    tx.commit().map_err(write_error)?;

    info!("Wrote {} rows to {}", count, table.name);
    Ok(count)
}
