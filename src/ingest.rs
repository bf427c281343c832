//! Raw record ingestion.
//!
//! Reads the delimited source file into a [`Table`]. Lines with the wrong
//! number of fields, or with bytes the configured encoding cannot decode,
//! are skipped and counted rather than failing the run.

use crate::error::{EtlError, EtlResult};
use crate::table::{Cell, Row, Table};
use csv::ByteRecord;
use encoding_rs::{Encoding, WINDOWS_1252};
use serde::Serialize;
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};

/// Field values the source reader treats as "no value".
pub const MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];

#[derive(Debug, Clone, Copy)]
pub struct SourceOptions {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            delimiter: b';',
            encoding: WINDOWS_1252,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestReport {
    pub rows_read: usize,
    pub malformed_rows_skipped: usize,
}

/// Reads the source file at `path`.
pub fn read_source(path: &Path, options: &SourceOptions) -> EtlResult<(Table, IngestReport)> {
    if !path.is_file() {
        return Err(EtlError::SourceNotFound(path.to_path_buf()));
    }
    info!("Reading source file {:?}", path);
    let file = File::open(path)?;
    read_table(BufReader::new(file), options)
}

/// Reads a delimited table from any byte stream.
pub fn read_table<R: Read>(reader: R, options: &SourceOptions) -> EtlResult<(Table, IngestReport)> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        // Column counts are checked here so malformed lines can be skipped.
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut record = ByteRecord::new();
    let has_header = csv_reader
        .read_byte_record(&mut record)
        .map_err(|e| EtlError::SourceFormat(format!("unreadable header: {}", e)))?;
    if !has_header {
        return Err(EtlError::SourceFormat("input has no header line".to_string()));
    }
    let headers = decode_header(&record, options.encoding)?;
    let width = headers.len();
    debug!("Source columns: {:?}", headers);

    let mut report = IngestReport::default();
    let mut rows: Vec<Row> = Vec::new();
    loop {
        match csv_reader.read_byte_record(&mut record) {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                let line = err.position().map(|p| p.line());
                match err.into_kind() {
                    csv::ErrorKind::Io(e) => return Err(EtlError::Io(e)),
                    kind => {
                        debug!("Skipping unreadable line {:?}: {:?}", line, kind);
                        report.malformed_rows_skipped += 1;
                        continue;
                    }
                }
            }
        }

        if record.len() != width {
            debug!(
                "Skipping line {:?}: {} fields, expected {}",
                record.position().map(|p| p.line()),
                record.len(),
                width
            );
            report.malformed_rows_skipped += 1;
            continue;
        }

        match decode_row(&record, options.encoding) {
            Some(row) => rows.push(row),
            None => {
                debug!(
                    "Skipping line {:?}: undecodable bytes",
                    record.position().map(|p| p.line())
                );
                report.malformed_rows_skipped += 1;
            }
        }
    }

    report.rows_read = rows.len();
    if report.malformed_rows_skipped > 0 {
        warn!(
            "Skipped {} malformed source lines",
            report.malformed_rows_skipped
        );
    }
    info!("Read {} source rows", report.rows_read);

    let table = Table::new(headers, rows)?;
    Ok((table, report))
}

fn decode_header(record: &ByteRecord, encoding: &'static Encoding) -> EtlResult<Vec<String>> {
    let mut headers = Vec::with_capacity(record.len());
    for (idx, field) in record.iter().enumerate() {
        let field = if idx == 0 {
            field.strip_prefix(UTF8_BOM).unwrap_or(field)
        } else {
            field
        };
        let name = decode_field(field, encoding).ok_or_else(|| {
            EtlError::SourceFormat(format!("header column {} is not decodable", idx + 1))
        })?;
        headers.push(name.trim().to_string());
    }
    if headers.iter().all(|h| h.is_empty()) {
        return Err(EtlError::SourceFormat(
            "header has no usable columns".to_string(),
        ));
    }
    Ok(headers)
}

fn decode_row(record: &ByteRecord, encoding: &'static Encoding) -> Option<Row> {
    record
        .iter()
        .map(|field| decode_field(field, encoding).map(into_cell))
        .collect()
}

fn decode_field<'a>(field: &'a [u8], encoding: &'static Encoding) -> Option<Cow<'a, str>> {
    encoding.decode_without_bom_handling_and_without_replacement(field)
}

fn into_cell(value: Cow<'_, str>) -> Cell {
    if is_missing_token(&value) {
        None
    } else {
        Some(value.into_owned())
    }
}

pub fn is_missing_token(value: &str) -> bool {
    MISSING_TOKENS.contains(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::SourceColumn;
    use encoding_rs::UTF_8;
    use std::io::Cursor;
    use tempfile::TempDir;

    const HEADER: &str = "url;Perfume;Brand;Country;Gender;Rating Value;Rating Count;Year;Top;Middle;Base;Perfumer1;Perfumer2;mainaccord1;mainaccord2;mainaccord3;mainaccord4;mainaccord5";

    fn read(input: &[u8]) -> EtlResult<(Table, IngestReport)> {
        read_table(Cursor::new(input.to_vec()), &SourceOptions::default())
    }

    #[test]
    fn test_reads_rows_and_maps_missing_tokens() {
        let input = format!(
            "{}\nhttp://x;Aventus;Creed;France;Men;4,5;2000;2010;Bergamot;Birch;Musk;Olivier Creed;;fruity;NaN;;;\n",
            HEADER
        );
        let (table, report) = read(input.as_bytes()).unwrap();
        assert_eq!(report.rows_read, 1);
        assert_eq!(report.malformed_rows_skipped, 0);
        let row = &table.rows[0];
        assert_eq!(table.value(row, SourceColumn::Perfume), Some("Aventus"));
        assert_eq!(table.value(row, SourceColumn::RatingValue), Some("4,5"));
        assert_eq!(table.value(row, SourceColumn::MainAccord2), None);
        assert_eq!(table.value(row, SourceColumn::Perfumer2), None);
    }

    #[test]
    fn test_header_names_are_trimmed() {
        let header = HEADER.replace("Rating Value", "  Rating Value ").replace("Brand", "Brand\t");
        let input = format!("{}\n", header);
        let (table, _) = read(input.as_bytes()).unwrap();
        assert!(table.headers.contains(&"Rating Value".to_string()));
        assert!(table.headers.contains(&"Brand".to_string()));
        assert!(table.is_empty());
    }

    #[test]
    fn test_skips_lines_with_wrong_field_count() {
        let input = format!(
            "{}\na;b;c\nhttp://x;P;B;C;G;4;1;2000;t;m;b;p1;p2;a1;a2;a3;a4;a5;extra\nhttp://x;P;B;C;G;4;1;2000;t;m;b;p1;p2;a1;a2;a3;a4;a5\n",
            HEADER
        );
        let (table, report) = read(input.as_bytes()).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report.rows_read, 1);
        assert_eq!(report.malformed_rows_skipped, 2);
    }

    #[test]
    fn test_decodes_latin1_bytes() {
        let mut input = format!("{}\nhttp://x;", HEADER).into_bytes();
        input.extend_from_slice(b"Eau de Gu\xe9rande;B;C;G;4;1;2000;t;m;b;p1;p2;a1;a2;a3;a4;a5\n");
        let (table, _) = read(&input).unwrap();
        assert_eq!(
            table.value(&table.rows[0], SourceColumn::Perfume),
            Some("Eau de Guérande")
        );
    }

    #[test]
    fn test_utf8_skips_undecodable_rows() {
        let mut input = format!("{}\nhttp://x;", HEADER).into_bytes();
        input.extend_from_slice(b"Bad \xff name;B;C;G;4;1;2000;t;m;b;p1;p2;a1;a2;a3;a4;a5\n");
        input.extend_from_slice(b"http://y;Good;B;C;G;4;1;2000;t;m;b;p1;p2;a1;a2;a3;a4;a5\n");
        let options = SourceOptions {
            delimiter: b';',
            encoding: UTF_8,
        };
        let (table, report) = read_table(Cursor::new(input), &options).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(report.malformed_rows_skipped, 1);
    }

    #[test]
    fn test_strips_utf8_bom_from_first_header() {
        let mut input = UTF8_BOM.to_vec();
        input.extend_from_slice(format!("{}\n", HEADER).as_bytes());
        let (table, _) = read(&input).unwrap();
        assert_eq!(table.headers[0], "url");
    }

    #[test]
    fn test_empty_input_is_a_format_error() {
        let err = read(b"").unwrap_err();
        assert!(matches!(err, EtlError::SourceFormat(_)));
    }

    #[test]
    fn test_missing_required_column_is_a_format_error() {
        let header = HEADER.replace(";Rating Value", "");
        let err = read(format!("{}\n", header).as_bytes()).unwrap_err();
        assert!(matches!(err, EtlError::SourceFormat(_)));
        assert!(err.to_string().contains("Rating Value"));
    }

    #[test]
    fn test_missing_file_is_source_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fra_cleaned.csv");
        let err = read_source(&path, &SourceOptions::default()).unwrap_err();
        assert!(matches!(err, EtlError::SourceNotFound(p) if p == path));
    }
}
