//! Field normalization.
//!
//! Repairs field values in place without ever removing a row. Every
//! transform maps its own output to itself, so normalizing twice is the
//! same as normalizing once.

use crate::table::{ColumnLayout, Row, SourceColumn, Table};
use serde::Serialize;
use tracing::{info, warn};

/// Stands in for a missing categorical value.
pub const UNKNOWN: &str = "Unknown";

/// Stands in for a missing or unusable release year.
pub const NOT_SPECIFIED: &str = "Not Specified";

/// Columns whose gaps are filled with [`UNKNOWN`].
pub const FILLABLE_COLUMNS: [SourceColumn; 10] = [
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

/// Counts of values that had to be replaced or discarded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CoercionStats {
    pub rating_value_unparseable: usize,
    pub rating_count_unparseable: usize,
    pub year_unparseable: usize,
    pub year_missing: usize,
    pub unknown_filled: usize,
}

impl CoercionStats {
    pub fn warnings(&self) -> usize {
        self.rating_value_unparseable + self.rating_count_unparseable + self.year_unparseable
    }
}

pub fn normalize(table: &mut Table) -> CoercionStats {
    let layout = table.layout.clone();
    let mut stats = CoercionStats::default();
    for row in table.rows.iter_mut() {
        normalize_row(&layout, row, &mut stats);
    }

    if stats.warnings() > 0 {
        warn!(
            "Coerced unparseable values: {} rating values, {} rating counts, {} years",
            stats.rating_value_unparseable, stats.rating_count_unparseable, stats.year_unparseable
        );
    }
    info!(
        "Normalized {} rows ({} gaps filled with {:?}, {} years not specified)",
        table.len(),
        stats.unknown_filled,
        UNKNOWN,
        stats.year_missing + stats.year_unparseable
    );
    stats
}

fn normalize_row(layout: &ColumnLayout, row: &mut Row, stats: &mut CoercionStats) {
    let rating_value = layout.cell_mut(row, SourceColumn::RatingValue);
    if !normalize_decimal(rating_value) {
        stats.rating_value_unparseable += 1;
    }

    let rating_count = layout.cell_mut(row, SourceColumn::RatingCount);
    if !normalize_decimal(rating_count) {
        stats.rating_count_unparseable += 1;
    }

    let year = layout.cell_mut(row, SourceColumn::Year);
    match year.as_deref() {
        None => {
            stats.year_missing += 1;
            *year = Some(NOT_SPECIFIED.to_string());
        }
        Some(NOT_SPECIFIED) => {}
        Some(value) => match year_token(value) {
            Some(token) => *year = Some(token),
            None => {
                stats.year_unparseable += 1;
                *year = Some(NOT_SPECIFIED.to_string());
            }
        },
    }

    for column in FILLABLE_COLUMNS {
        let cell = layout.cell_mut(row, column);
        if cell.is_none() {
            *cell = Some(UNKNOWN.to_string());
            stats.unknown_filled += 1;
        }
    }
}

/// Rewrites a decimal cell into its canonical text form.
///
/// Returns `false` when a present value could not be parsed; the cell is
/// then left missing.
fn normalize_decimal(cell: &mut Option<String>) -> bool {
    let Some(raw) = cell.as_deref() else {
        return true;
    };
    match parse_decimal(raw) {
        Some(value) => {
            *cell = Some(value.to_string());
            true
        }
        None => {
            *cell = None;
            false
        }
    }
}

/// Parses a number that may use a comma as decimal separator ("4,5").
pub fn parse_decimal(raw: &str) -> Option<f64> {
    raw.trim()
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn year_token(raw: &str) -> Option<String> {
    let value = raw.trim().parse::<f64>().ok()?;
    if value.is_finite() && value.fract() == 0.0 {
        Some(format!("{}", value as i64))
    } else {
        None
    }
}
