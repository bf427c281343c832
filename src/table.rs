//! In-memory tabular model shared by the ingest, normalize and filter stages.
//!
//! The source layout is fixed: a set of required columns identified by their
//! trimmed header names, plus any number of extra columns that are carried
//! along untouched (they still take part in exact-duplicate detection).

use crate::error::{EtlError, EtlResult};

/// A single cell. `None` means the value is missing.
pub type Cell = Option<String>;

/// A row, aligned with [`Table::headers`].
pub type Row = Vec<Cell>;

/// The columns the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceColumn {
    Perfume,
    Brand,
    Country,
    Gender,
    RatingValue,
    RatingCount,
    Year,
    Url,
    Perfumer1,
    Perfumer2,
    MainAccord1,
    MainAccord2,
    MainAccord3,
    MainAccord4,
    MainAccord5,
    Top,
    Middle,
    Base,
}

impl SourceColumn {
    pub const ALL: [SourceColumn; 18] = [
        SourceColumn::Perfume,
        SourceColumn::Brand,
        SourceColumn::Country,
        SourceColumn::Gender,
        SourceColumn::RatingValue,
        SourceColumn::RatingCount,
        SourceColumn::Year,
        SourceColumn::Url,
        SourceColumn::Perfumer1,
        SourceColumn::Perfumer2,
        SourceColumn::MainAccord1,
        SourceColumn::MainAccord2,
        SourceColumn::MainAccord3,
        SourceColumn::MainAccord4,
        SourceColumn::MainAccord5,
        SourceColumn::Top,
        SourceColumn::Middle,
        SourceColumn::Base,
    ];

    pub const ACCORDS: [SourceColumn; 5] = [
        SourceColumn::MainAccord1,
        SourceColumn::MainAccord2,
        SourceColumn::MainAccord3,
        SourceColumn::MainAccord4,
        SourceColumn::MainAccord5,
    ];

    pub const NOTES: [SourceColumn; 3] =
        [SourceColumn::Top, SourceColumn::Middle, SourceColumn::Base];

    pub const PERFUMERS: [SourceColumn; 2] = [SourceColumn::Perfumer1, SourceColumn::Perfumer2];

    /// Header name in the source file, after whitespace trimming.
    pub fn header(&self) -> &'static str {
        match self {
            SourceColumn::Perfume => "Perfume",
            SourceColumn::Brand => "Brand",
            SourceColumn::Country => "Country",
            SourceColumn::Gender => "Gender",
            SourceColumn::RatingValue => "Rating Value",
            SourceColumn::RatingCount => "Rating Count",
            SourceColumn::Year => "Year",
            SourceColumn::Url => "url",
            SourceColumn::Perfumer1 => "Perfumer1",
            SourceColumn::Perfumer2 => "Perfumer2",
            SourceColumn::MainAccord1 => "mainaccord1",
            SourceColumn::MainAccord2 => "mainaccord2",
            SourceColumn::MainAccord3 => "mainaccord3",
            SourceColumn::MainAccord4 => "mainaccord4",
            SourceColumn::MainAccord5 => "mainaccord5",
            SourceColumn::Top => "Top",
            SourceColumn::Middle => "Middle",
            SourceColumn::Base => "Base",
        }
    }

    // Declaration order matches ALL.
    fn ordinal(&self) -> usize {
        *self as usize
    }
}

/// Position of every [`SourceColumn`] inside a concrete header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    positions: [usize; 18],
}

impl ColumnLayout {
    /// Resolves the required columns against `headers`.
    ///
    /// When a header name is repeated, the first occurrence wins.
    pub fn resolve(headers: &[String]) -> EtlResult<Self> {
        let mut positions = [0usize; 18];
        let mut missing = Vec::new();
        for (slot, column) in SourceColumn::ALL.iter().enumerate() {
            match headers.iter().position(|h| h == column.header()) {
                Some(position) => positions[slot] = position,
                None => missing.push(column.header()),
            }
        }
        if !missing.is_empty() {
            return Err(EtlError::SourceFormat(format!(
                "missing required columns: {}",
                missing.join(", ")
            )));
        }
        Ok(Self { positions })
    }

    pub fn position(&self, column: SourceColumn) -> usize {
        self.positions[column.ordinal()]
    }

    pub fn cell_mut<'a>(&self, row: &'a mut Row, column: SourceColumn) -> &'a mut Cell {
        &mut row[self.position(column)]
    }
}

/// A fully materialized table of source rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub layout: ColumnLayout,
    pub rows: Vec<Row>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> EtlResult<Self> {
        let layout = ColumnLayout::resolve(&headers)?;
        Ok(Self {
            headers,
            layout,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Value of `column` in `row`, `None` when missing.
    pub fn value<'a>(&self, row: &'a Row, column: SourceColumn) -> Option<&'a str> {
        row.get(self.layout.position(column))
            .and_then(|cell| cell.as_deref())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_resolves_shuffled_headers() {
        let mut headers = test_support::headers();
        headers.reverse();
        headers.push("extra".to_string());
        let layout = ColumnLayout::resolve(&headers).unwrap();
        assert_eq!(layout.position(SourceColumn::Base), 0);
        assert_eq!(layout.position(SourceColumn::Perfume), 17);
    }

    #[test]
    fn test_layout_reports_all_missing_columns() {
        let headers: Vec<String> = test_support::headers()
            .into_iter()
            .filter(|h| h != "Brand" && h != "Top")
            .collect();
        let err = ColumnLayout::resolve(&headers).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Brand"));
        assert!(msg.contains("Top"));
        assert!(!msg.contains("Perfume,"));
    }

    #[test]
    fn test_value_treats_none_as_missing() {
        let table = test_support::table(vec![test_support::row(&[(
            SourceColumn::Perfume,
            "Aventus",
        )])]);
        let row = &table.rows[0];
        assert_eq!(table.value(row, SourceColumn::Perfume), Some("Aventus"));
        assert_eq!(table.value(row, SourceColumn::Brand), None);
    }
}
