//! Frequency tables for categorical, identifier, and boolean columns.

use std::collections::HashMap;

use crate::dataset::DataSlice;
use crate::error::{EngineError, Result};
use crate::types::{ColumnKind, FrequencyEntry, FrequencyTable};
use crate::utils::string_values;

/// Count the distinct non-null values of a column.
///
/// Entries come back sorted by count descending; ties keep first-seen row
/// order. Declared-numeric columns are rejected with `ColumnType` since a
/// frequency table over measurements is rarely what the caller meant.
pub fn value_counts(slice: &DataSlice<'_>, column: &str) -> Result<FrequencyTable> {
    let descriptor = slice.descriptor(column)?;
    if descriptor.kind == ColumnKind::Numeric {
        return Err(EngineError::ColumnType {
            column: column.to_string(),
            kind: descriptor.kind,
            operation: "value_counts",
        });
    }

    let series = slice.series(column)?;
    let rendered = string_values(&series)?;

    let mut index: HashMap<String, usize> = HashMap::new();
    let mut entries: Vec<FrequencyEntry> = Vec::new();
    for value in rendered.into_iter().flatten() {
        match index.get(&value) {
            Some(&i) => entries[i].count += 1,
            None => {
                index.insert(value.clone(), entries.len());
                entries.push(FrequencyEntry { value, count: 1 });
            }
        }
    }

    // Stable sort keeps first-seen order among equal counts.
    entries.sort_by(|a, b| b.count.cmp(&a.count));

    let total = entries.iter().map(|e| e.count).sum();
    Ok(FrequencyTable {
        column: column.to_string(),
        entries,
        total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    fn dataset() -> Dataset {
        Dataset::from_frame(
            df![
                "field" => [Some("math"), Some("cs"), Some("math"), None, Some("bio"), Some("cs")],
                "score" => [1.0f64, 2.0, 3.0, 4.0, 5.0, 6.0],
            ]
            .unwrap(),
        )
    }

    #[test]
    fn test_value_counts_sorted_by_count() {
        let dataset = dataset();
        let table = value_counts(&dataset.slice(), "field").unwrap();
        assert_eq!(table.total, 5);
        assert_eq!(table.entries[0].count, 2);
        assert_eq!(table.entries[2], FrequencyEntry {
            value: "bio".to_string(),
            count: 1,
        });
    }

    #[test]
    fn test_value_counts_ties_keep_first_seen_order() {
        let dataset = dataset();
        let table = value_counts(&dataset.slice(), "field").unwrap();
        // math and cs both appear twice; math was seen first.
        assert_eq!(table.entries[0].value, "math");
        assert_eq!(table.entries[1].value, "cs");
    }

    #[test]
    fn test_value_counts_skips_nulls() {
        let dataset = dataset();
        let table = value_counts(&dataset.slice(), "field").unwrap();
        let counted: usize = table.entries.iter().map(|e| e.count).sum();
        assert_eq!(counted, 5);
    }

    #[test]
    fn test_value_counts_rejects_numeric() {
        let dataset = dataset();
        let err = value_counts(&dataset.slice(), "score").unwrap_err();
        assert!(matches!(err, EngineError::ColumnType { .. }));
    }

    #[test]
    fn test_value_counts_unknown_column() {
        let dataset = dataset();
        let err = value_counts(&dataset.slice(), "nope").unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotFound(_)));
    }

    #[test]
    fn test_value_counts_on_subset() {
        let dataset = Dataset::from_frame(
            df![
                "course_id" => ["C-1", "C-1", "C-2"],
                "field" => ["math", "math", "cs"],
            ]
            .unwrap(),
        );
        let subset = dataset.filter_by("course_id", "C-1").unwrap();
        let table = value_counts(&subset.slice(), "field").unwrap();
        assert_eq!(table.entries.len(), 1);
        assert_eq!(table.entries[0].count, 2);
    }
}
