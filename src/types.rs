use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared kind of a column, used to decide which aggregations apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Integer or floating point measurements.
    Numeric,
    /// Free or low-cardinality text.
    Categorical,
    /// Grouping key (course id, user id, ...).
    Identifier,
    /// True/false flags.
    Boolean,
}

impl fmt::Display for ColumnKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Numeric => "numeric",
            Self::Categorical => "categorical",
            Self::Identifier => "identifier",
            Self::Boolean => "boolean",
        };
        write!(f, "{}", name)
    }
}

/// Descriptor of a single column: name, declared kind, and nullability.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub kind: ColumnKind,
    pub nullable: bool,
}

/// Descriptive statistics for one numeric column.
///
/// `count` covers non-null rows only; `std` uses the sample (n-1) formula and
/// is `NaN` when fewer than two values are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnStats {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// One row of a describe table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeRow {
    pub column: String,
    pub stats: ColumnStats,
}

/// Output of `describe`: per-column descriptive statistics, in the order the
/// columns were requested.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DescribeTable {
    pub rows: Vec<DescribeRow>,
}

/// A single value/count pair in a frequency table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyEntry {
    pub value: String,
    pub count: usize,
}

/// Output of `value_counts`: entries sorted by count descending, ties broken
/// by first-seen order. `total` is the number of non-null rows counted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrequencyTable {
    pub column: String,
    pub entries: Vec<FrequencyEntry>,
    pub total: usize,
}

/// Null count for one column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MissingCount {
    pub column: String,
    pub nulls: usize,
}

/// Output of `missing_report`: per-column null counts in column order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingReport {
    pub counts: Vec<MissingCount>,
}

impl MissingReport {
    /// Null count for a column, if it appears in the report.
    pub fn nulls(&self, column: &str) -> Option<usize> {
        self.counts
            .iter()
            .find(|c| c.column == column)
            .map(|c| c.nulls)
    }

    /// Total nulls across all columns.
    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.nulls).sum()
    }
}

/// Symmetric Pearson correlation matrix over a set of numeric columns.
///
/// `values[i][j]` is the correlation between `columns[i]` and `columns[j]`;
/// entries are `NaN` where either column has zero variance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub columns: Vec<String>,
    pub values: Vec<Vec<f64>>,
}

impl CorrelationMatrix {
    /// Correlation between two columns by name.
    pub fn get(&self, a: &str, b: &str) -> Option<f64> {
        let i = self.columns.iter().position(|c| c == a)?;
        let j = self.columns.iter().position(|c| c == b)?;
        Some(self.values[i][j])
    }
}

/// Aggregation applied by `group_metric` over the rows of a subset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MetricOp {
    /// Mean of the non-null values.
    Mean,
    /// Sum of the non-null values.
    Sum,
    /// Number of non-null values.
    Count,
    /// Fraction of non-null values that are truthy/nonzero.
    Ratio,
}

impl fmt::Display for MetricOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Mean => "mean",
            Self::Sum => "sum",
            Self::Count => "count",
            Self::Ratio => "ratio",
        };
        write!(f, "{}", name)
    }
}

/// One computed metric inside a [`GroupOverview`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricValue {
    pub column: String,
    pub op: MetricOp,
    pub value: f64,
}

/// Convenience bundle of per-group metrics for a single group key, the shape
/// a dashboard screen consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupOverview {
    pub group_column: String,
    pub group_key: String,
    pub row_count: usize,
    pub metrics: Vec<MetricValue>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_kind_display() {
        assert_eq!(ColumnKind::Numeric.to_string(), "numeric");
        assert_eq!(ColumnKind::Identifier.to_string(), "identifier");
    }

    #[test]
    fn test_metric_op_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&MetricOp::Mean).unwrap(), "\"mean\"");
        assert_eq!(
            serde_json::to_string(&MetricOp::Ratio).unwrap(),
            "\"ratio\""
        );
    }

    #[test]
    fn test_missing_report_lookup() {
        let report = MissingReport {
            counts: vec![
                MissingCount {
                    column: "x".to_string(),
                    nulls: 1,
                },
                MissingCount {
                    column: "y".to_string(),
                    nulls: 0,
                },
            ],
        };
        assert_eq!(report.nulls("x"), Some(1));
        assert_eq!(report.nulls("z"), None);
        assert_eq!(report.total(), 1);
    }

    #[test]
    fn test_correlation_matrix_lookup() {
        let matrix = CorrelationMatrix {
            columns: vec!["a".to_string(), "b".to_string()],
            values: vec![vec![1.0, 0.5], vec![0.5, 1.0]],
        };
        assert_eq!(matrix.get("a", "b"), Some(0.5));
        assert_eq!(matrix.get("a", "a"), Some(1.0));
        assert_eq!(matrix.get("a", "missing"), None);
    }

    #[test]
    fn test_frequency_table_serialization() {
        let table = FrequencyTable {
            column: "field".to_string(),
            entries: vec![FrequencyEntry {
                value: "math".to_string(),
                count: 3,
            }],
            total: 3,
        };
        let json = serde_json::to_string(&table).unwrap();
        assert!(json.contains("math"));
        let back: FrequencyTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, table.entries);
    }
}
