//! Shared constants for end-to-end tests
//!
//! When the fixture dataset changes, update only this file.

/// Header line in the column order of the published dataset.
pub const SOURCE_HEADER: &str = "url;Perfume;Brand;Country;Gender;Rating Value;Rating Count;Year;Top;Middle;Base;Perfumer1;Perfumer2;mainaccord1;mainaccord2;mainaccord3;mainaccord4;mainaccord5";

pub const AVENTUS_LINE: &str = "https://www.fragrantica.com/perfume/Creed/Aventus-9828.html;Aventus;Creed;France;men;4,33;2000;2010;bergamot;birch;musk;Olivier Creed;Erwin Creed;fruity;sweet;leather;woody;smoky";

/// Non-ASCII name, only representable in the source file as Latin-1.
pub const EGOISTE_LINE: &str = "https://www.fragrantica.com/perfume/Chanel/Egoiste-38.html;Égoïste;Chanel;France;men;4,2;3000;1990;rosewood;sandalwood;vanilla;Jacques Polge;;woody;warm spicy;sweet;vanilla;fruity";

/// No rating count, no year, three accords and the second perfumer missing.
pub const POUR_HOMME_LINE: &str = "https://www.fragrantica.com/perfume/Bvlgari/Pour-Homme-28.html;Pour Homme;Bvlgari;Italy;men;3,9;;;bergamot;tea;musk;Jacques Cavallier;;tea;citrus;;;";

/// Missing rating value, removed before assembly.
pub const UNRATED_LINE: &str = "https://example.org/mystery;Mystery;Nobody;Italy;unisex;;10;2001;amber;iris;oud;Someone;;amber;;;;";

/// Too few fields, skipped at ingestion.
pub const MALFORMED_LINE: &str = "https://example.org/broken;Broken;Brand";

// ============================================================================
// Expected warehouse contents for the full fixture
// ============================================================================

pub const EXPECTED_ROWS_READ: usize = 5;
pub const EXPECTED_PERFUMES: i64 = 3;
pub const EXPECTED_BRANDS: i64 = 3;
pub const EXPECTED_COUNTRIES: i64 = 2;
pub const EXPECTED_GENDERS: i64 = 1;
pub const EXPECTED_ACCORDS: i64 = 10;
pub const EXPECTED_NOTES: i64 = 7;
pub const EXPECTED_PERFUMERS: i64 = 5;
pub const EXPECTED_PERFUME_ACCORDS: i64 = 15;
pub const EXPECTED_PERFUME_NOTES: i64 = 9;
pub const EXPECTED_PERFUME_PERFUMERS: i64 = 6;
