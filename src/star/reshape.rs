//! Wide-to-long reshaping of the multi-valued column families.

use crate::table::{SourceColumn, Table};
use std::collections::HashSet;

/// The three column families that hold several values per perfume.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultiValuedFamily {
    Accord,
    Note,
    Perfumer,
}

impl MultiValuedFamily {
    pub fn columns(&self) -> &'static [SourceColumn] {
        match self {
            MultiValuedFamily::Accord => &SourceColumn::ACCORDS,
            MultiValuedFamily::Note => &SourceColumn::NOTES,
            MultiValuedFamily::Perfumer => &SourceColumn::PERFUMERS,
        }
    }

    /// Role label for a value taken from `column`.
    pub fn role(&self, column: SourceColumn) -> &'static str {
        column.header()
    }
}

/// One value of a multi-valued family, tagged with its row and source role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoleValue<'a> {
    /// Index of the source row in the filtered table.
    pub row: usize,
    pub role: &'static str,
    pub value: &'a str,
}

/// Result of [`reshape`].
#[derive(Debug, Default)]
pub struct Reshaped<'a> {
    pub triples: Vec<RoleValue<'a>>,
    pub missing_dropped: usize,
    pub duplicates_dropped: usize,
}

/// Projects the family's columns into `(row, role, value)` triples.
///
/// Triples are produced column by column (all rows of the first column,
/// then all rows of the second, ...). Missing values are dropped, then
/// identical triples are collapsed keeping the first.
pub fn reshape<'a>(table: &'a Table, family: MultiValuedFamily) -> Reshaped<'a> {
    let mut reshaped = Reshaped::default();
    let mut seen = HashSet::new();
    for &column in family.columns() {
        let role = family.role(column);
        for (row_index, row) in table.rows.iter().enumerate() {
            let Some(value) = table.value(row, column) else {
                reshaped.missing_dropped += 1;
                continue;
            };
            let triple = RoleValue {
                row: row_index,
                role,
                value,
            };
            if seen.insert(triple) {
                reshaped.triples.push(triple);
            } else {
                reshaped.duplicates_dropped += 1;
            }
        }
    }
    reshaped
}
