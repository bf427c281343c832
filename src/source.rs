//! Source acquisition.
//!
//! The dataset is published as a zip archive. Downloading it is left to the
//! operator; this module only locates the CSV, extracting it from the
//! archive first when one is given.

use crate::error::{EtlError, EtlResult};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Name of the CSV inside the published archive.
pub const DEFAULT_SOURCE_FILE_NAME: &str = "fra_cleaned.csv";

/// Where the source table comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A CSV file already on disk.
    File(PathBuf),
    /// A CSV entry inside a zip archive, extracted into `work_dir`.
    Archive {
        archive: PathBuf,
        entry_name: String,
        work_dir: PathBuf,
    },
}

impl SourceLocation {
    /// Returns the path of a readable CSV, extracting it if needed.
    pub fn acquire(&self) -> EtlResult<PathBuf> {
        match self {
            SourceLocation::File(path) => {
                if !path.is_file() {
                    return Err(EtlError::SourceNotFound(path.clone()));
                }
                Ok(path.clone())
            }
            SourceLocation::Archive {
                archive,
                entry_name,
                work_dir,
            } => extract_entry(archive, entry_name, work_dir),
        }
    }
}

/// Extracts the entry whose file name is `entry_name` (in any directory of
/// the archive) into `dest_dir`.
pub fn extract_entry(archive_path: &Path, entry_name: &str, dest_dir: &Path) -> EtlResult<PathBuf> {
    if !archive_path.is_file() {
        return Err(EtlError::SourceNotFound(archive_path.to_path_buf()));
    }
    info!("Extracting {} from {:?}", entry_name, archive_path);

    let file = File::open(archive_path)?;
    let mut archive =
        zip::ZipArchive::new(file).map_err(|e| EtlError::Archive(e.to_string()))?;

    let output_path = dest_dir.join(entry_name);
    for i in 0..archive.len() {
        let mut entry = archive
            .by_index(i)
            .map_err(|e| EtlError::Archive(e.to_string()))?;
        if entry.is_dir() {
            continue;
        }
        let matches = Path::new(entry.name())
            .file_name()
            .map(|name| name == entry_name)
            .unwrap_or(false);
        if !matches {
            continue;
        }

        fs::create_dir_all(dest_dir)?;
        let mut output = File::create(&output_path)?;
        let bytes = io::copy(&mut entry, &mut output)?;
        info!("Extracted {} bytes to {:?}", bytes, output_path);
        return Ok(output_path);
    }

    Err(EtlError::SourceNotFound(output_path))
}
