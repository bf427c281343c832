//! Dimension extraction and surrogate key assignment.

use super::reshape::{reshape, MultiValuedFamily};
use crate::table::{SourceColumn, Table};
use std::collections::HashMap;
use tracing::info;

/// Distinct values of one categorical attribute with dense 1-based keys,
/// assigned in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimension {
    values: Vec<String>,
    keys: HashMap<String, i64>,
}

impl Dimension {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the key of `value`, assigning the next one if it is new.
    pub fn insert(&mut self, value: &str) -> i64 {
        if let Some(key) = self.keys.get(value) {
            return *key;
        }
        self.values.push(value.to_string());
        let key = self.values.len() as i64;
        self.keys.insert(value.to_string(), key);
        key
    }

    pub fn key_of(&self, value: &str) -> Option<i64> {
        self.keys.get(value).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (i64, &str)> {
        self.values
            .iter()
            .enumerate()
            .map(|(idx, value)| (idx as i64 + 1, value.as_str()))
    }
}

impl<'a> FromIterator<&'a str> for Dimension {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut dimension = Dimension::new();
        for value in iter {
            dimension.insert(value);
        }
        dimension
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dimensions {
    pub brands: Dimension,
    pub countries: Dimension,
    pub genders: Dimension,
    pub accords: Dimension,
    pub notes: Dimension,
    pub perfumers: Dimension,
}

impl Dimensions {
    pub fn multi_valued(&self, family: MultiValuedFamily) -> &Dimension {
        match family {
            MultiValuedFamily::Accord => &self.accords,
            MultiValuedFamily::Note => &self.notes,
            MultiValuedFamily::Perfumer => &self.perfumers,
        }
    }
}

/// Builds every dimension from the filtered table.
pub fn build_dimensions(table: &Table) -> Dimensions {
    let single = |column: SourceColumn| -> Dimension {
        table
            .rows
            .iter()
            .filter_map(|row| table.value(row, column))
            .collect()
    };
    let multi = |family: MultiValuedFamily| -> Dimension {
        reshape(table, family)
            .triples
            .iter()
            .map(|triple| triple.value)
            .collect()
    };

    let dimensions = Dimensions {
        brands: single(SourceColumn::Brand),
        countries: single(SourceColumn::Country),
        genders: single(SourceColumn::Gender),
        accords: multi(MultiValuedFamily::Accord),
        notes: multi(MultiValuedFamily::Note),
        perfumers: multi(MultiValuedFamily::Perfumer),
    };
    info!(
        "Built dimensions: {} brands, {} countries, {} genders, {} accords, {} notes, {} perfumers",
        dimensions.brands.len(),
        dimensions.countries.len(),
        dimensions.genders.len(),
        dimensions.accords.len(),
        dimensions.notes.len(),
        dimensions.perfumers.len()
    );
    dimensions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_support::{row, table};
    use std::collections::HashSet;
    use SourceColumn::*;

    #[test]
    fn test_keys_are_dense_and_first_seen() {
        let dim: Dimension = ["b", "a", "b", "c", "a"].into_iter().collect();
        let pairs: Vec<_> = dim.iter().collect();
        assert_eq!(pairs, vec![(1, "b"), (2, "a"), (3, "c")]);
        assert_eq!(dim.key_of("c"), Some(3));
        assert_eq!(dim.key_of("z"), None);
    }

    #[test]
    fn test_single_valued_dimensions_skip_missing() {
        let t = table(vec![
            row(&[(Brand, "Creed"), (Country, "France"), (Gender, "Men")]),
            row(&[(Brand, "Chanel"), (Gender, "Women")]),
            row(&[(Brand, "Creed"), (Country, "France"), (Gender, "Men")]),
        ]);
        let dims = build_dimensions(&t);
        assert_eq!(dims.brands.iter().collect::<Vec<_>>(), vec![(1, "Creed"), (2, "Chanel")]);
        assert_eq!(dims.countries.iter().collect::<Vec<_>>(), vec![(1, "France")]);
        assert_eq!(dims.genders.len(), 2);
    }

    #[test]
    fn test_multi_valued_union_maps_each_value_once() {
        let t = table(vec![
            row(&[(MainAccord1, "woody"), (MainAccord2, "citrus")]),
            row(&[(MainAccord1, "citrus"), (MainAccord5, "woody")]),
            row(&[(Perfumer1, "Olivier Creed"), (Perfumer2, "Olivier Creed")]),
        ]);
        let dims = build_dimensions(&t);
        assert_eq!(
            dims.accords.iter().collect::<Vec<_>>(),
            vec![(1, "woody"), (2, "citrus")]
        );
        assert_eq!(dims.perfumers.len(), 1);
        assert!(dims.notes.is_empty());
    }

    #[test]
    fn test_every_observed_value_is_present_exactly_once() {
        let t = table(vec![
            row(&[(Top, "Bergamot"), (Middle, "Rose"), (Base, "Musk")]),
            row(&[(Top, "Musk"), (Middle, "Bergamot"), (Base, "Amber")]),
        ]);
        let dims = build_dimensions(&t);
        let observed: HashSet<&str> = t
            .rows
            .iter()
            .flat_map(|r| SourceColumn::NOTES.iter().filter_map(|c| t.value(r, *c)))
            .collect();
        assert_eq!(dims.notes.len(), observed.len());
        for value in observed {
            assert_eq!(dims.notes.iter().filter(|(_, v)| *v == value).count(), 1);
        }
    }
}
