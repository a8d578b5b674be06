//! Per-group metrics: a single aggregate over the rows matching a group key.

use tracing::debug;

use crate::dataset::{DataSlice, Dataset};
use crate::error::Result;
use crate::types::{GroupOverview, MetricOp, MetricValue};
use crate::utils::non_null_f64s;

/// Apply a metric op over the non-null values of a column in a slice.
///
/// `Mean` and `Ratio` are `NaN` when the column has no non-null values;
/// `Sum` is 0.0 and `Count` is 0. `Ratio` is the fraction of non-null
/// values that are nonzero, so boolean flags and 0/1 encodings both work.
pub fn metric(slice: &DataSlice<'_>, column: &str, op: MetricOp) -> Result<f64> {
    let series = slice.numeric_series(column, "group_metric")?;
    let values = non_null_f64s(&series)?;
    let n = values.len();

    let value = match op {
        MetricOp::Count => n as f64,
        MetricOp::Sum => values.iter().sum(),
        MetricOp::Mean => {
            if n == 0 {
                f64::NAN
            } else {
                values.iter().sum::<f64>() / n as f64
            }
        }
        MetricOp::Ratio => {
            if n == 0 {
                f64::NAN
            } else {
                let truthy = values.iter().filter(|&&v| v != 0.0).count();
                truthy as f64 / n as f64
            }
        }
    };
    Ok(value)
}

/// Filter to the rows matching `group_key` and apply one metric op.
///
/// An absent key is a `KeyNotFound` error, never an empty result.
pub fn group_metric(
    dataset: &Dataset,
    group_column: &str,
    group_key: &str,
    metric_column: &str,
    op: MetricOp,
) -> Result<f64> {
    let subset = dataset.filter_by(group_column, group_key)?;
    debug!(
        "group_metric {}({}) over {} rows of {}='{}'",
        op,
        metric_column,
        subset.row_count(),
        group_column,
        group_key
    );
    metric(&subset.slice(), metric_column, op)
}

/// Compute several metrics over one group in a single pass, the bundle a
/// per-course or per-student screen renders.
pub fn group_overview(
    dataset: &Dataset,
    group_column: &str,
    group_key: &str,
    metrics: &[(&str, MetricOp)],
) -> Result<GroupOverview> {
    let subset = dataset.filter_by(group_column, group_key)?;
    let slice = subset.slice();
    let mut computed = Vec::with_capacity(metrics.len());
    for &(column, op) in metrics {
        computed.push(MetricValue {
            column: column.to_string(),
            op,
            value: metric(&slice, column, op)?,
        });
    }
    Ok(GroupOverview {
        group_column: group_column.to_string(),
        group_key: group_key.to_string(),
        row_count: subset.row_count(),
        metrics: computed,
    })
}
