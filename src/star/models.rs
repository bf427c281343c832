//! Row types of the star schema.

use serde::Serialize;

/// Fact row: one per surviving source record.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Perfume {
    pub perfume_id: i64,
    pub name: String,
    pub brand_id: i64,
    pub country_id: i64,
    pub gender_id: i64,
    pub rating_value: f64,
    pub rating_count: Option<f64>,
    /// Release year token, or "Not Specified".
    pub year: String,
    pub url: Option<String>,
}

/// Perfume <-> Accord, with the rank column the accord came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PerfumeAccord {
    pub perfume_id: i64,
    pub accord_id: i64,
    pub accord_rank: String,
}

/// Perfume <-> Note, with the pyramid level ("Top", "Middle", "Base").
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PerfumeNote {
    pub perfume_id: i64,
    pub note_id: i64,
    pub note_type: String,
}

/// Perfume <-> Perfumer. The source slot is not kept.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PerfumePerfumer {
    pub perfume_id: i64,
    pub perfumer_id: i64,
}
