//! Star schema of the fragrance warehouse.
//!
//! Dimension tables carry a dense integer key and a name. The fact table
//! references dimensions by key; bridge tables resolve the many-to-many
//! relations and keep the role of the source column where it matters.
//! No foreign key constraints are declared: every table is dropped and
//! recreated independently on each load.

use crate::sqlite_column;
use crate::sqlite_persistence::{Column, Index, SqlType, Table};

// =============================================================================
// Dimension Tables
// =============================================================================

pub const BRANDS_TABLE: Table = Table {
    name: "brands",
    columns: &[
        sqlite_column!("brand_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("brand_name", &SqlType::Text, non_null = true),
    ],
};

pub const COUNTRIES_TABLE: Table = Table {
    name: "countries",
    columns: &[
        sqlite_column!("country_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("country_name", &SqlType::Text, non_null = true),
    ],
};

pub const GENDERS_TABLE: Table = Table {
    name: "genders",
    columns: &[
        sqlite_column!("gender_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("gender_name", &SqlType::Text, non_null = true),
    ],
};

pub const ACCORDS_TABLE: Table = Table {
    name: "accords",
    columns: &[
        sqlite_column!("accord_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("accord_name", &SqlType::Text, non_null = true),
    ],
};

pub const NOTES_TABLE: Table = Table {
    name: "notes",
    columns: &[
        sqlite_column!("note_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("note_name", &SqlType::Text, non_null = true),
    ],
};

pub const PERFUMERS_TABLE: Table = Table {
    name: "perfumers",
    columns: &[
        sqlite_column!("perfumer_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("perfumer_name", &SqlType::Text, non_null = true),
    ],
};

// =============================================================================
// Fact Table
// =============================================================================

pub const PERFUMES_TABLE: Table = Table {
    name: "perfumes",
    columns: &[
        sqlite_column!("perfume_id", &SqlType::Integer, is_primary_key = true),
        sqlite_column!("name", &SqlType::Text, non_null = true),
        sqlite_column!("brand_id", &SqlType::Integer, non_null = true),
        sqlite_column!("country_id", &SqlType::Integer, non_null = true),
        sqlite_column!("gender_id", &SqlType::Integer, non_null = true),
        sqlite_column!("rating_value", &SqlType::Real, non_null = true),
        sqlite_column!("rating_count", &SqlType::Real),
        sqlite_column!("year", &SqlType::Text, non_null = true), // '2010' or 'Not Specified'
        sqlite_column!("url", &SqlType::Text),
    ],
};

// =============================================================================
// Bridge Tables
// =============================================================================

pub const PERFUME_ACCORDS_TABLE: Table = Table {
    name: "perfume_accords",
    columns: &[
        sqlite_column!("perfume_id", &SqlType::Integer, non_null = true),
        sqlite_column!("accord_id", &SqlType::Integer, non_null = true),
        sqlite_column!("accord_rank", &SqlType::Text, non_null = true), // 'mainaccord1'..'mainaccord5'
    ],
};

pub const PERFUME_NOTES_TABLE: Table = Table {
    name: "perfume_notes",
    columns: &[
        sqlite_column!("perfume_id", &SqlType::Integer, non_null = true),
        sqlite_column!("note_id", &SqlType::Integer, non_null = true),
        sqlite_column!("note_type", &SqlType::Text, non_null = true), // 'Top', 'Middle', 'Base'
    ],
};

pub const PERFUME_PERFUMERS_TABLE: Table = Table {
    name: "perfume_perfumers",
    columns: &[
        sqlite_column!("perfume_id", &SqlType::Integer, non_null = true),
        sqlite_column!("perfumer_id", &SqlType::Integer, non_null = true),
    ],
};

/// Every warehouse table, in write order.
pub const WAREHOUSE_TABLES: &[&Table] = &[
    &BRANDS_TABLE,
    &COUNTRIES_TABLE,
    &GENDERS_TABLE,
    &PERFUMES_TABLE,
    &ACCORDS_TABLE,
    &PERFUME_ACCORDS_TABLE,
    &NOTES_TABLE,
    &PERFUME_NOTES_TABLE,
    &PERFUMERS_TABLE,
    &PERFUME_PERFUMERS_TABLE,
];

// =============================================================================
// Join Indexes
// =============================================================================

/// Indexes on the foreign key columns used by analytical joins.
pub const WAREHOUSE_INDICES: &[Index] = &[
    Index {
        name: "idx_brand_id",
        table: "perfumes",
        column: "brand_id",
    },
    Index {
        name: "idx_country_id",
        table: "perfumes",
        column: "country_id",
    },
    Index {
        name: "idx_gender_id",
        table: "perfumes",
        column: "gender_id",
    },
    Index {
        name: "idx_perfume_id_notes",
        table: "perfume_notes",
        column: "perfume_id",
    },
    Index {
        name: "idx_perfume_id_accords",
        table: "perfume_accords",
        column: "perfume_id",
    },
    Index {
        name: "idx_perfume_id_perfumers",
        table: "perfume_perfumers",
        column: "perfume_id",
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    #[test]
    fn test_schema_creates_successfully() {
        let conn = Connection::open_in_memory().unwrap();
        for table in WAREHOUSE_TABLES {
            table.replace(&conn).unwrap();
            table.validate(&conn).unwrap();
        }
        for index in WAREHOUSE_INDICES {
            index.create_if_missing(&conn).unwrap();
            assert!(index.exists(&conn).unwrap());
        }
    }

    #[test]
    fn test_every_index_targets_a_declared_column() {
        for index in WAREHOUSE_INDICES {
            let table = WAREHOUSE_TABLES
                .iter()
                .find(|t| t.name == index.table)
                .unwrap_or_else(|| panic!("no table for index {}", index.name));
            assert!(table.columns.iter().any(|c| c.name == index.column));
        }
    }

    #[test]
    fn test_insert_perfume_and_accord_link() {
        let conn = Connection::open_in_memory().unwrap();
        PERFUMES_TABLE.replace(&conn).unwrap();
        PERFUME_ACCORDS_TABLE.replace(&conn).unwrap();

        conn.execute(
            &PERFUMES_TABLE.insert_sql(),
            rusqlite::params![1, "Aventus", 1, 1, 1, 4.5, 2000.0, "2010", None::<String>],
        )
        .unwrap();
        conn.execute(
            &PERFUME_ACCORDS_TABLE.insert_sql(),
            rusqlite::params![1, 1, "mainaccord1"],
        )
        .unwrap();

        let (name, rating): (String, f64) = conn
            .query_row(
                "SELECT p.name, p.rating_value FROM perfumes p
                 JOIN perfume_accords pa ON pa.perfume_id = p.perfume_id",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(name, "Aventus");
        assert_eq!(rating, 4.5);
    }
}
