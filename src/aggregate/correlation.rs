//! Pearson correlation matrix over numeric columns.

use polars::prelude::*;

use crate::dataset::DataSlice;
use crate::error::Result;
use crate::types::CorrelationMatrix;

/// Pearson correlation between each pair of the given numeric columns.
///
/// Each pair uses its pairwise-complete rows (rows where both values are
/// non-null). The matrix is symmetric with a diagonal of exactly 1.0; any
/// entry involving a zero-variance column is `NaN`. Non-numeric columns are
/// rejected with `ColumnType`.
pub fn correlation_matrix(slice: &DataSlice<'_>, columns: &[&str]) -> Result<CorrelationMatrix> {
    let mut data: Vec<Vec<Option<f64>>> = Vec::with_capacity(columns.len());
    for &column in columns {
        let series = slice.numeric_series(column, "correlation")?;
        let float_series = series.cast(&DataType::Float64)?;
        data.push(float_series.f64()?.into_iter().collect());
    }

    let n = columns.len();
    let mut values = vec![vec![f64::NAN; n]; n];
    for i in 0..n {
        values[i][i] = if has_variance(&data[i]) { 1.0 } else { f64::NAN };
        for j in (i + 1)..n {
            let r = pairwise_pearson(&data[i], &data[j]);
            values[i][j] = r;
            values[j][i] = r;
        }
    }

    Ok(CorrelationMatrix {
        columns: columns.iter().map(|c| c.to_string()).collect(),
        values,
    })
}

fn has_variance(values: &[Option<f64>]) -> bool {
    let mut first = None;
    for v in values.iter().flatten() {
        match first {
            None => first = Some(*v),
            Some(f) if (f - v).abs() > 0.0 => return true,
            Some(_) => {}
        }
    }
    false
}

/// Pearson r over the rows where both columns are non-null.
fn pairwise_pearson(a: &[Option<f64>], b: &[Option<f64>]) -> f64 {
    let pairs: Vec<(f64, f64)> = a
        .iter()
        .zip(b.iter())
        .filter_map(|(x, y)| Some(((*x)?, (*y)?)))
        .collect();
    if pairs.len() < 2 {
        return f64::NAN;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in &pairs {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    if var_x == 0.0 || var_y == 0.0 {
        return f64::NAN;
    }
    cov / (var_x.sqrt() * var_y.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use crate::error::EngineError;

    fn dataset() -> Dataset {
        Dataset::from_frame(
            df![
                "x" => [1.0f64, 2.0, 3.0, 4.0],
                "y" => [2.0f64, 4.0, 6.0, 8.0],
                "inv" => [4.0f64, 3.0, 2.0, 1.0],
                "flat" => [5.0f64, 5.0, 5.0, 5.0],
                "gappy" => [Some(1.0f64), None, Some(3.0), Some(4.0)],
                "label" => ["a", "b", "c", "d"],
            ]
            .unwrap(),
        )
    }

    // ==================== correlation tests ====================

    #[test]
    fn test_perfect_positive_and_negative_correlation() {
        let dataset = dataset();
        let matrix = correlation_matrix(&dataset.slice(), &["x", "y", "inv"]).unwrap();
        assert!((matrix.get("x", "y").unwrap() - 1.0).abs() < 1e-12);
        assert!((matrix.get("x", "inv").unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_diagonal_is_exactly_one() {
        let dataset = dataset();
        let matrix = correlation_matrix(&dataset.slice(), &["x", "y"]).unwrap();
        assert_eq!(matrix.get("x", "x").unwrap(), 1.0);
        assert_eq!(matrix.get("y", "y").unwrap(), 1.0);
    }

    #[test]
    fn test_zero_variance_column_is_nan() {
        let dataset = dataset();
        let matrix = correlation_matrix(&dataset.slice(), &["x", "flat"]).unwrap();
        assert!(matrix.get("x", "flat").unwrap().is_nan());
        assert!(matrix.get("flat", "flat").unwrap().is_nan());
        assert_eq!(matrix.get("x", "x").unwrap(), 1.0);
    }

    #[test]
    fn test_pairwise_complete_rows() {
        let dataset = dataset();
        let matrix = correlation_matrix(&dataset.slice(), &["x", "gappy"]).unwrap();
        // Rows 0, 2, 3 are complete; x and gappy are identical there.
        assert!((matrix.get("x", "gappy").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let dataset = dataset();
        let matrix = correlation_matrix(&dataset.slice(), &["x", "gappy", "inv"]).unwrap();
        for i in 0..3 {
            for j in 0..3 {
                let a = matrix.values[i][j];
                let b = matrix.values[j][i];
                assert!(a == b || (a.is_nan() && b.is_nan()));
            }
        }
    }

    #[test]
    fn test_rejects_non_numeric_column() {
        let dataset = dataset();
        let err = correlation_matrix(&dataset.slice(), &["x", "label"]).unwrap_err();
        assert!(matches!(err, EngineError::ColumnType { .. }));
    }

    #[test]
    fn test_too_few_complete_pairs_is_nan() {
        let dataset = Dataset::from_frame(
            df![
                "a" => [Some(1.0f64), None, Some(3.0)],
                "b" => [None, Some(2.0f64), Some(4.0)],
            ]
            .unwrap(),
        );
        let matrix = correlation_matrix(&dataset.slice(), &["a", "b"]).unwrap();
        assert!(matrix.get("a", "b").unwrap().is_nan());
    }
}
