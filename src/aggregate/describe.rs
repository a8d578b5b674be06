//! Descriptive statistics over numeric columns.
//!
//! Matches the classic describe table: non-null count, mean, sample standard
//! deviation, min, quartiles with linear interpolation, max. Statistics are
//! computed per value rather than delegated, so the exact semantics (n-1
//! variance, NaN below two observations) hold on every platform.

use crate::dataset::DataSlice;
use crate::error::Result;
use crate::types::{ColumnStats, DescribeRow, DescribeTable};
use crate::utils::non_null_f64s;

/// Describe the given numeric columns of a slice, in request order.
///
/// Non-numeric columns produce a `ColumnType` error; unknown columns a
/// `ColumnNotFound` error. A column with no non-null values yields count 0
/// and `NaN` statistics.
pub fn describe(slice: &DataSlice<'_>, columns: &[&str]) -> Result<DescribeTable> {
    let mut rows = Vec::with_capacity(columns.len());
    for &column in columns {
        let series = slice.numeric_series(column, "describe")?;
        let values = non_null_f64s(&series)?;
        rows.push(DescribeRow {
            column: column.to_string(),
            stats: column_stats(&values),
        });
    }
    Ok(DescribeTable { rows })
}

fn column_stats(values: &[f64]) -> ColumnStats {
    let count = values.len();
    if count == 0 {
        return ColumnStats {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;

    // Sample standard deviation; undefined below two observations.
    let std = if count > 1 {
        let variance = values
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / (count - 1) as f64;
        variance.sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

    ColumnStats {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        median: quantile(&sorted, 0.5),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Quantile of a sorted slice with linear interpolation between ranks.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }
    let pos = q * (n - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        let weight = pos - lo as f64;
        sorted[lo] * (1.0 - weight) + sorted[hi] * weight
    }
}
