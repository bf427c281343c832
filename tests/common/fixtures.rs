//! Fixture files for the pipeline: Latin-1 CSVs and zip archives.

use super::constants::*;
use anyhow::Result;
use encoding_rs::WINDOWS_1252;
use rusqlite::Connection;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

/// A temporary directory holding the source file and the warehouse.
pub struct TestWorkspace {
    pub dir: TempDir,
    pub source_path: PathBuf,
    pub warehouse_path: PathBuf,
}

impl TestWorkspace {
    /// Full fixture: duplicates, an unrated row and a malformed line included.
    pub fn with_full_dataset() -> Result<Self> {
        Self::with_lines(&[
            AVENTUS_LINE,
            AVENTUS_LINE,
            EGOISTE_LINE,
            MALFORMED_LINE,
            POUR_HOMME_LINE,
            UNRATED_LINE,
        ])
    }

    pub fn with_lines(lines: &[&str]) -> Result<Self> {
        let dir = TempDir::new()?;
        let source_path = dir.path().join("fra_cleaned.csv");
        write_latin1_source(&source_path, lines)?;
        let warehouse_path = dir.path().join("warehouse.db");
        Ok(Self {
            dir,
            source_path,
            warehouse_path,
        })
    }

    pub fn connection(&self) -> Connection {
        Connection::open(&self.warehouse_path).unwrap()
    }
}

/// Writes the header plus `lines` encoded as windows-1252.
pub fn write_latin1_source(path: &Path, lines: &[&str]) -> Result<()> {
    let mut text = String::from(SOURCE_HEADER);
    for line in lines {
        text.push('\n');
        text.push_str(line);
    }
    text.push('\n');
    let (bytes, _, had_errors) = WINDOWS_1252.encode(&text);
    anyhow::ensure!(!had_errors, "fixture text is not representable in Latin-1");
    fs::write(path, bytes)?;
    Ok(())
}

/// Packs the file at `source` into a zip archive under `entry_name`.
pub fn write_archive(archive_path: &Path, entry_name: &str, source: &Path) -> Result<()> {
    let mut writer = zip::ZipWriter::new(File::create(archive_path)?);
    writer.start_file(entry_name, SimpleFileOptions::default())?;
    writer.write_all(&fs::read(source)?)?;
    writer.finish()?;
    Ok(())
}

pub fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {}", table), [], |r| r.get(0))
        .unwrap()
}
