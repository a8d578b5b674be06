//! Dataset accessor: CSV loading, column descriptors, and key filtering.
//!
//! A [`Dataset`] wraps a polars `DataFrame` together with per-column
//! descriptors inferred at load time. All downstream aggregation and scoring
//! goes through a [`DataSlice`], which views either the whole dataset or the
//! rows selected by a key filter, so every operation behaves identically on
//! full data and on subsets.

use std::path::Path;

use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::error::{EngineError, Result};
use crate::types::{ColumnDescriptor, ColumnKind};
use crate::utils::{dtype_kind, string_values};

/// Name tokens that mark a column as an identifier regardless of its dtype.
const IDENTIFIER_TOKENS: &[&str] = &["id", "uuid", "key", "code"];

/// An immutable tabular dataset with typed column descriptors.
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
    descriptors: Vec<ColumnDescriptor>,
}

impl Dataset {
    /// Load a dataset from a CSV file with header row.
    ///
    /// Tries strict schema inference first, then widens the inference window,
    /// and finally skips malformed rows. Failures at every level produce a
    /// `DataLoad` error naming the path.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading dataset from {}", path.display());

        let frame = read_csv_with_fallbacks(path)?;
        let dataset = Self::from_frame(frame);
        debug!(
            "Loaded {} rows x {} columns",
            dataset.row_count(),
            dataset.descriptors.len()
        );
        Ok(dataset)
    }

    /// Wrap an in-memory frame, inferring a descriptor for every column.
    pub fn from_frame(frame: DataFrame) -> Self {
        let descriptors = frame
            .get_columns()
            .iter()
            .map(|col| {
                let name = col.name().to_string();
                let kind = if is_identifier_name(&name) {
                    ColumnKind::Identifier
                } else {
                    dtype_kind(col.dtype())
                };
                ColumnDescriptor {
                    name,
                    kind,
                    nullable: col.null_count() > 0,
                }
            })
            .collect();
        Self { frame, descriptors }
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.frame.height()
    }

    /// Descriptors for all columns, in frame order.
    pub fn descriptors(&self) -> &[ColumnDescriptor] {
        &self.descriptors
    }

    /// Descriptor for a single column.
    pub fn descriptor(&self, name: &str) -> Result<&ColumnDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name == name)
            .ok_or_else(|| EngineError::ColumnNotFound(name.to_string()))
    }

    /// Override the inferred kind of a column. Inference is a heuristic; a
    /// caller that knows better (e.g. an encoded categorical stored as int)
    /// can correct it here.
    pub fn set_kind(&mut self, name: &str, kind: ColumnKind) -> Result<()> {
        let descriptor = self
            .descriptors
            .iter_mut()
            .find(|d| d.name == name)
            .ok_or_else(|| EngineError::ColumnNotFound(name.to_string()))?;
        descriptor.kind = kind;
        Ok(())
    }

    /// The underlying frame.
    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// A column by name as a materialized series.
    pub fn series(&self, name: &str) -> Result<&Series> {
        self.frame
            .column(name)
            .map(|c| c.as_materialized_series())
            .map_err(|_| EngineError::ColumnNotFound(name.to_string()))
    }

    /// Distinct non-null values of a column, rendered as strings, in
    /// first-seen row order.
    pub fn unique_values(&self, column: &str) -> Result<Vec<String>> {
        let series = self.series(column)?;
        let rendered = string_values(series)?;
        let mut seen = std::collections::HashSet::new();
        let mut values = Vec::new();
        for value in rendered.into_iter().flatten() {
            if seen.insert(value.clone()) {
                values.push(value);
            }
        }
        Ok(values)
    }

    /// A slice over all rows of this dataset.
    pub fn slice(&self) -> DataSlice<'_> {
        DataSlice {
            dataset: self,
            mask: None,
        }
    }

    /// Filter to the rows whose rendered value in `column` equals `key`.
    ///
    /// Matching zero rows is an error: keys are enumerated from the data via
    /// [`Dataset::unique_values`], so a miss means the selection went stale.
    pub fn filter_by(&self, column: &str, key: &str) -> Result<Subset<'_>> {
        let series = self.series(column)?;
        let rendered = string_values(series)?;
        let bools: Vec<bool> = rendered
            .iter()
            .map(|v| v.as_deref() == Some(key))
            .collect();
        let matched = bools.iter().filter(|&&b| b).count();
        if matched == 0 {
            warn!("Key '{}' matched no rows in column '{}'", key, column);
            return Err(EngineError::KeyNotFound {
                column: column.to_string(),
                key: key.to_string(),
            });
        }
        debug!("Key '{}' matched {} rows in '{}'", key, matched, column);
        Ok(Subset {
            dataset: self,
            mask: BooleanChunked::from_slice("mask".into(), &bools),
            matched,
        })
    }
}

/// Rows of a [`Dataset`] matching a single group key.
#[derive(Debug, Clone)]
pub struct Subset<'a> {
    dataset: &'a Dataset,
    mask: BooleanChunked,
    matched: usize,
}

impl<'a> Subset<'a> {
    /// Number of rows in the subset.
    pub fn row_count(&self) -> usize {
        self.matched
    }

    /// The parent dataset.
    pub fn dataset(&self) -> &'a Dataset {
        self.dataset
    }

    /// A slice restricted to the subset rows.
    pub fn slice(&self) -> DataSlice<'_> {
        DataSlice {
            dataset: self.dataset,
            mask: Some(&self.mask),
        }
    }

    /// Materialize the subset rows as a standalone frame.
    pub fn to_frame(&self) -> Result<DataFrame> {
        Ok(self.dataset.frame.filter(&self.mask)?)
    }
}

/// A view over either a full dataset or a filtered subset of its rows.
///
/// Aggregations take a `DataSlice`, never a `Dataset` or `Subset` directly.
#[derive(Debug, Clone, Copy)]
pub struct DataSlice<'a> {
    dataset: &'a Dataset,
    mask: Option<&'a BooleanChunked>,
}

impl<'a> DataSlice<'a> {
    /// Descriptor for a column.
    pub fn descriptor(&self, name: &str) -> Result<&'a ColumnDescriptor> {
        self.dataset.descriptor(name)
    }

    /// Descriptors for all columns.
    pub fn descriptors(&self) -> &'a [ColumnDescriptor] {
        self.dataset.descriptors()
    }

    /// Number of rows visible through this slice.
    pub fn row_count(&self) -> usize {
        match self.mask {
            Some(mask) => mask.sum().unwrap_or(0) as usize,
            None => self.dataset.row_count(),
        }
    }

    /// The visible rows of a column as an owned series.
    pub fn series(&self, name: &str) -> Result<Series> {
        let series = self.dataset.series(name)?;
        match self.mask {
            Some(mask) => Ok(series.filter(mask)?),
            None => Ok(series.clone()),
        }
    }

    /// The visible rows of a column, requiring a numeric or boolean kind.
    /// Returns `ColumnType` naming `operation` otherwise.
    pub fn numeric_series(&self, name: &str, operation: &'static str) -> Result<Series> {
        let descriptor = self.descriptor(name)?;
        match descriptor.kind {
            ColumnKind::Numeric | ColumnKind::Boolean => self.series(name),
            kind => Err(EngineError::ColumnType {
                column: name.to_string(),
                kind,
                operation,
            }),
        }
    }
}

/// True if the column name marks a grouping key (`course_id`, `user_key`).
fn is_identifier_name(name: &str) -> bool {
    name.to_lowercase()
        .split('_')
        .any(|token| IDENTIFIER_TOKENS.contains(&token))
}

/// Read a CSV with progressively looser parsing.
fn read_csv_with_fallbacks(path: &Path) -> Result<DataFrame> {
    if !path.exists() {
        return Err(EngineError::DataLoad {
            path: path.display().to_string(),
            reason: "file not found".to_string(),
        });
    }

    // Strict pass: infer schema from a prefix of the file.
    match read_csv(path, Some(100), false) {
        Ok(frame) => return Ok(frame),
        Err(e) => debug!("Strict CSV parse failed, widening inference: {}", e),
    }

    // Second pass: infer the schema from the whole file.
    match read_csv(path, None, false) {
        Ok(frame) => return Ok(frame),
        Err(e) => warn!("Full-file schema inference failed, skipping bad rows: {}", e),
    }

    // Last resort: skip rows that do not parse.
    read_csv(path, None, true).map_err(|e| EngineError::DataLoad {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

fn read_csv(
    path: &Path,
    infer_schema_length: Option<usize>,
    ignore_errors: bool,
) -> PolarsResult<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_ignore_errors(ignore_errors)
        .try_into_reader_with_file_path(Some(path.into()))?
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample_frame() -> DataFrame {
        df![
            "course_id" => ["C-1", "C-1", "C-2", "C-3"],
            "field" => [Some("math"), Some("cs"), None, Some("math")],
            "video_completion" => [Some(0.9f64), Some(0.4), None, Some(0.7)],
            "num_videos" => [10i64, 10, 5, 8],
        ]
        .unwrap()
    }

    // ==================== descriptor inference tests ====================

    #[test]
    fn test_identifier_detected_by_name() {
        let dataset = Dataset::from_frame(sample_frame());
        assert_eq!(
            dataset.descriptor("course_id").unwrap().kind,
            ColumnKind::Identifier
        );
        assert_eq!(
            dataset.descriptor("num_videos").unwrap().kind,
            ColumnKind::Numeric
        );
        assert_eq!(
            dataset.descriptor("field").unwrap().kind,
            ColumnKind::Categorical
        );
    }

    #[test]
    fn test_nullable_flag() {
        let dataset = Dataset::from_frame(sample_frame());
        assert!(dataset.descriptor("field").unwrap().nullable);
        assert!(!dataset.descriptor("num_videos").unwrap().nullable);
    }

    #[test]
    fn test_set_kind_override() {
        let mut dataset = Dataset::from_frame(sample_frame());
        dataset
            .set_kind("num_videos", ColumnKind::Categorical)
            .unwrap();
        assert_eq!(
            dataset.descriptor("num_videos").unwrap().kind,
            ColumnKind::Categorical
        );
        assert!(dataset.set_kind("missing", ColumnKind::Numeric).is_err());
    }

    #[test]
    fn test_descriptor_missing_column() {
        let dataset = Dataset::from_frame(sample_frame());
        let err = dataset.descriptor("nope").unwrap_err();
        assert!(matches!(err, EngineError::ColumnNotFound(_)));
    }

    // ==================== unique values tests ====================

    #[test]
    fn test_unique_values_first_seen_order() {
        let dataset = Dataset::from_frame(sample_frame());
        let values = dataset.unique_values("course_id").unwrap();
        assert_eq!(values, vec!["C-1", "C-2", "C-3"]);
    }

    #[test]
    fn test_unique_values_skip_nulls() {
        let dataset = Dataset::from_frame(sample_frame());
        let values = dataset.unique_values("field").unwrap();
        assert_eq!(values, vec!["math", "cs"]);
    }

    // ==================== filtering tests ====================

    #[test]
    fn test_filter_by_matches_rows() {
        let dataset = Dataset::from_frame(sample_frame());
        let subset = dataset.filter_by("course_id", "C-1").unwrap();
        assert_eq!(subset.row_count(), 2);
        let frame = subset.to_frame().unwrap();
        assert_eq!(frame.height(), 2);
    }

    #[test]
    fn test_filter_by_unknown_key() {
        let dataset = Dataset::from_frame(sample_frame());
        let err = dataset.filter_by("course_id", "C-404").unwrap_err();
        match err {
            EngineError::KeyNotFound { column, key } => {
                assert_eq!(column, "course_id");
                assert_eq!(key, "C-404");
            }
            other => panic!("Expected KeyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_filter_by_does_not_match_nulls() {
        let dataset = Dataset::from_frame(sample_frame());
        assert!(dataset.filter_by("field", "").is_err());
        let subset = dataset.filter_by("field", "math").unwrap();
        assert_eq!(subset.row_count(), 2);
    }

    // ==================== slice tests ====================

    #[test]
    fn test_slice_full_and_subset_rows() {
        let dataset = Dataset::from_frame(sample_frame());
        assert_eq!(dataset.slice().row_count(), 4);

        let subset = dataset.filter_by("course_id", "C-1").unwrap();
        let slice = subset.slice();
        assert_eq!(slice.row_count(), 2);

        let series = slice.series("num_videos").unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_numeric_series_rejects_categorical() {
        let dataset = Dataset::from_frame(sample_frame());
        let err = dataset
            .slice()
            .numeric_series("field", "describe")
            .unwrap_err();
        assert!(matches!(err, EngineError::ColumnType { .. }));
    }

    #[test]
    fn test_numeric_series_rejects_identifier() {
        let dataset = Dataset::from_frame(sample_frame());
        let err = dataset
            .slice()
            .numeric_series("course_id", "correlation")
            .unwrap_err();
        match err {
            EngineError::ColumnType { kind, operation, .. } => {
                assert_eq!(kind, ColumnKind::Identifier);
                assert_eq!(operation, "correlation");
            }
            other => panic!("Expected ColumnType, got {:?}", other),
        }
    }
}
