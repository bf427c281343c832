//! Exact-duplicate removal and required-field filtering.

use crate::table::{SourceColumn, Table};
use serde::Serialize;
use std::collections::HashSet;
use tracing::info;

/// A row without any of these never reaches the warehouse.
pub const REQUIRED_COLUMNS: [SourceColumn; 3] = [
    SourceColumn::Perfume,
    SourceColumn::Brand,
    SourceColumn::RatingValue,
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterStats {
    pub duplicates_removed: usize,
    pub missing_required_removed: usize,
    pub rows_kept: usize,
}

/// Drops exact duplicates (first occurrence wins), then rows missing a
/// required field. Surviving rows keep their relative order.
pub fn deduplicate_and_filter(mut table: Table) -> (Table, FilterStats) {
    let mut stats = FilterStats::default();
    let before = table.len();

    let first_seen: Vec<bool> = {
        let mut seen = HashSet::with_capacity(table.len());
        table.rows.iter().map(|row| seen.insert(row)).collect()
    };
    let mut first_seen = first_seen.into_iter();
    table.rows.retain(|_| first_seen.next().unwrap_or(false));
    stats.duplicates_removed = before - table.len();

    let deduplicated = table.len();
    let layout = table.layout.clone();
    table.rows.retain(|row| {
        REQUIRED_COLUMNS
            .iter()
            .all(|column| matches!(row.get(layout.position(*column)), Some(Some(_))))
    });
    stats.missing_required_removed = deduplicated - table.len();
    stats.rows_kept = table.len();

    info!(
        "Filtered {} rows down to {} ({} duplicates, {} missing name/brand/rating)",
        before, stats.rows_kept, stats.duplicates_removed, stats.missing_required_removed
    );
    (table, stats)
}
