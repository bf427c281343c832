//! Fact and bridge table assembly.
//!
//! Every reference is resolved with inner-join semantics: a row whose
//! brand, country, gender, or multi-valued value has no dimension key is
//! dropped. Drops are counted in [`AssemblyStats`] and reported as totals.

use super::dimensions::{Dimension, Dimensions};
use super::models::{Perfume, PerfumeAccord, PerfumeNote, PerfumePerfumer};
use super::reshape::{reshape, MultiValuedFamily, RoleValue};
use crate::normalize::{parse_decimal, NOT_SPECIFIED};
use crate::table::{SourceColumn, Table};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// The complete output of the transform phase.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StarSchema {
    pub dimensions: Dimensions,
    pub perfumes: Vec<Perfume>,
    pub perfume_accords: Vec<PerfumeAccord>,
    pub perfume_notes: Vec<PerfumeNote>,
    pub perfume_perfumers: Vec<PerfumePerfumer>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssemblyStats {
    /// Records left out of the fact table by an unresolved join.
    pub perfumes_dropped: usize,
    /// Bridge triples whose value or perfume could not be resolved.
    pub bridge_rows_dropped: usize,
    /// Bridge triples dropped because the value was missing.
    pub bridge_missing_values: usize,
    /// Perfumer links that became identical once the slot was discarded.
    pub perfumer_links_collapsed: usize,
}

/// Joins the filtered table against `dimensions`.
pub fn assemble(table: &Table, dimensions: Dimensions) -> (StarSchema, AssemblyStats) {
    let mut stats = AssemblyStats::default();
    let (perfumes, perfume_ids) = build_perfumes(table, &dimensions, &mut stats);

    let perfume_accords = resolve_bridge(
        table,
        MultiValuedFamily::Accord,
        &dimensions,
        &perfume_ids,
        &mut stats,
    )
    .into_iter()
    .map(|(perfume_id, accord_id, role)| PerfumeAccord {
        perfume_id,
        accord_id,
        accord_rank: role.to_string(),
    })
    .collect();

    let perfume_notes = resolve_bridge(
        table,
        MultiValuedFamily::Note,
        &dimensions,
        &perfume_ids,
        &mut stats,
    )
    .into_iter()
    .map(|(perfume_id, note_id, role)| PerfumeNote {
        perfume_id,
        note_id,
        note_type: role.to_string(),
    })
    .collect();

    let perfumer_links = resolve_bridge(
        table,
        MultiValuedFamily::Perfumer,
        &dimensions,
        &perfume_ids,
        &mut stats,
    );
    let linked = perfumer_links.len();
    let mut seen = HashSet::with_capacity(linked);
    let perfume_perfumers: Vec<PerfumePerfumer> = perfumer_links
        .into_iter()
        .map(|(perfume_id, perfumer_id, _slot)| PerfumePerfumer {
            perfume_id,
            perfumer_id,
        })
        .filter(|link| seen.insert(*link))
        .collect();
    stats.perfumer_links_collapsed = linked - perfume_perfumers.len();

    if stats.perfumes_dropped > 0 || stats.bridge_rows_dropped > 0 {
        warn!(
            "Unresolved dimension references: {} perfumes and {} bridge rows dropped",
            stats.perfumes_dropped, stats.bridge_rows_dropped
        );
    }

    let schema = StarSchema {
        dimensions,
        perfumes,
        perfume_accords,
        perfume_notes,
        perfume_perfumers,
    };
    info!(
        "Assembled {} perfumes, {} accord links, {} note links, {} perfumer links",
        schema.perfumes.len(),
        schema.perfume_accords.len(),
        schema.perfume_notes.len(),
        schema.perfume_perfumers.len()
    );
    (schema, stats)
}

/// Builds the fact table. Returns the rows and the map from filtered-table
/// row index to `perfume_id`.
fn build_perfumes(
    table: &Table,
    dimensions: &Dimensions,
    stats: &mut AssemblyStats,
) -> (Vec<Perfume>, HashMap<usize, i64>) {
    let mut perfumes = Vec::with_capacity(table.len());
    let mut perfume_ids = HashMap::with_capacity(table.len());

    for (row_index, row) in table.rows.iter().enumerate() {
        let lookup = |column: SourceColumn, dimension: &Dimension| {
            table
                .value(row, column)
                .and_then(|value| dimension.key_of(value))
        };
        let resolved = (
            table.value(row, SourceColumn::Perfume),
            lookup(SourceColumn::Brand, &dimensions.brands),
            lookup(SourceColumn::Country, &dimensions.countries),
            lookup(SourceColumn::Gender, &dimensions.genders),
            table
                .value(row, SourceColumn::RatingValue)
                .and_then(parse_decimal),
        );
        let (Some(name), Some(brand_id), Some(country_id), Some(gender_id), Some(rating_value)) =
            resolved
        else {
            debug!("Dropping row {} from perfumes: unresolved reference", row_index);
            stats.perfumes_dropped += 1;
            continue;
        };

        let perfume_id = perfumes.len() as i64 + 1;
        perfume_ids.insert(row_index, perfume_id);
        perfumes.push(Perfume {
            perfume_id,
            name: name.to_string(),
            brand_id,
            country_id,
            gender_id,
            rating_value,
            rating_count: table
                .value(row, SourceColumn::RatingCount)
                .and_then(parse_decimal),
            year: table
                .value(row, SourceColumn::Year)
                .unwrap_or(NOT_SPECIFIED)
                .to_string(),
            url: table.value(row, SourceColumn::Url).map(str::to_string),
        });
    }
    (perfumes, perfume_ids)
}

/// Reshapes one family and resolves each triple to
/// `(perfume_id, dimension key, role)`.
fn resolve_bridge(
    table: &Table,
    family: MultiValuedFamily,
    dimensions: &Dimensions,
    perfume_ids: &HashMap<usize, i64>,
    stats: &mut AssemblyStats,
) -> Vec<(i64, i64, &'static str)> {
    let reshaped = reshape(table, family);
    stats.bridge_missing_values += reshaped.missing_dropped;

    let dimension = dimensions.multi_valued(family);
    let mut resolved = Vec::with_capacity(reshaped.triples.len());
    for RoleValue { row, role, value } in reshaped.triples {
        match (perfume_ids.get(&row), dimension.key_of(value)) {
            (Some(perfume_id), Some(key)) => resolved.push((*perfume_id, key, role)),
            _ => stats.bridge_rows_dropped += 1,
        }
    }
    resolved
}
