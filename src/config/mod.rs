mod file_config;

pub use file_config::FileConfig;

use crate::error::{EtlError, EtlResult};
use crate::ingest::SourceOptions;
use crate::source::{SourceLocation, DEFAULT_SOURCE_FILE_NAME};
use encoding_rs::Encoding;
use std::path::PathBuf;

pub const DEFAULT_DELIMITER: char = ';';
pub const DEFAULT_ENCODING: &str = "latin1";

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub source: Option<PathBuf>,
    pub archive: Option<PathBuf>,
    pub archive_entry: Option<String>,
    pub work_dir: Option<PathBuf>,
    pub warehouse: Option<PathBuf>,
    pub delimiter: char,
    pub encoding: String,
    pub summary_json: Option<PathBuf>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            source: None,
            archive: None,
            archive_entry: None,
            work_dir: None,
            warehouse: None,
            delimiter: DEFAULT_DELIMITER,
            encoding: DEFAULT_ENCODING.to_string(),
            summary_json: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub source: SourceLocation,
    pub source_options: SourceOptions,
    pub warehouse: PathBuf,
    pub summary_json: Option<PathBuf>,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> EtlResult<Self> {
        let file = file_config.unwrap_or_default();

        let warehouse = file
            .warehouse
            .map(PathBuf::from)
            .or_else(|| cli.warehouse.clone())
            .ok_or_else(|| {
                EtlError::Config(
                    "warehouse must be specified via --warehouse or in config file".to_string(),
                )
            })?;

        let archive = file.archive.map(PathBuf::from).or_else(|| cli.archive.clone());
        let source_path = file.source.map(PathBuf::from).or_else(|| cli.source.clone());
        let source = match (archive, source_path) {
            (Some(archive), _) => {
                let entry_name = file
                    .archive_entry
                    .or_else(|| cli.archive_entry.clone())
                    .unwrap_or_else(|| DEFAULT_SOURCE_FILE_NAME.to_string());
                let work_dir = file
                    .work_dir
                    .map(PathBuf::from)
                    .or_else(|| cli.work_dir.clone())
                    .or_else(|| archive.parent().map(|p| p.to_path_buf()))
                    .unwrap_or_else(|| PathBuf::from("."));
                SourceLocation::Archive {
                    archive,
                    entry_name,
                    work_dir,
                }
            }
            (None, Some(path)) => SourceLocation::File(path),
            (None, None) => {
                return Err(EtlError::Config(
                    "a source must be specified via --source or --archive".to_string(),
                ))
            }
        };

        let delimiter = match file.delimiter {
            Some(s) => parse_delimiter(&s)?,
            None => parse_delimiter(&cli.delimiter.to_string())?,
        };
        let encoding_label = file.encoding.unwrap_or_else(|| cli.encoding.clone());
        let encoding = parse_encoding(&encoding_label)?;

        let summary_json = file
            .summary_json
            .map(PathBuf::from)
            .or_else(|| cli.summary_json.clone());

        Ok(Self {
            source,
            source_options: SourceOptions {
                delimiter,
                encoding,
            },
            warehouse,
            summary_json,
        })
    }
}

/// Delimiters are a single ASCII character.
pub fn parse_delimiter(s: &str) -> EtlResult<u8> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii() => Ok(c as u8),
        _ => Err(EtlError::Config(format!(
            "delimiter must be a single ASCII character, got {:?}",
            s
        ))),
    }
}

/// Resolves a WHATWG encoding label. `latin1` maps to windows-1252.
pub fn parse_encoding(label: &str) -> EtlResult<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| EtlError::Config(format!("unknown encoding {:?}", label)))
}
