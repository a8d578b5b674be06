//! Shared utilities for the summary engine.
//!
//! Common helpers for dtype classification, null handling, and value
//! rendering, used across the accessor, aggregation, and scoring modules.

use polars::prelude::*;

use crate::config::FillPolicy;
use crate::error::Result;
use crate::types::ColumnKind;

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Check if a DataType is boolean.
#[inline]
pub fn is_boolean_dtype(dtype: &DataType) -> bool {
    matches!(dtype, DataType::Boolean)
}

/// Map a polars dtype onto a declared column kind. Identifier detection is
/// name-based and handled by the dataset accessor; here everything non-numeric
/// and non-boolean is categorical.
pub fn dtype_kind(dtype: &DataType) -> ColumnKind {
    if is_numeric_dtype(dtype) {
        ColumnKind::Numeric
    } else if is_boolean_dtype(dtype) {
        ColumnKind::Boolean
    } else {
        ColumnKind::Categorical
    }
}

/// Collect the non-null values of a numeric (or boolean) series as f64.
pub fn non_null_f64s(series: &Series) -> Result<Vec<f64>> {
    let non_null = series.drop_nulls();
    if non_null.is_empty() {
        return Ok(Vec::new());
    }
    let float_series = non_null.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    Ok(ca.into_iter().flatten().collect())
}

/// Render every cell of a series as an optional string, nulls preserved.
///
/// Values are rendered via a cast to the string dtype, so `1i64` renders as
/// `"1"` and `true` as `"true"`, without the quoting AnyValue's Display adds.
pub fn string_values(series: &Series) -> Result<Vec<Option<String>>> {
    let str_series = series.cast(&DataType::String)?;
    let ca = str_series.str()?;
    Ok(ca
        .into_iter()
        .map(|v| v.map(|s| s.to_string()))
        .collect())
}

/// The substitute value a fill policy produces for a given series.
///
/// `Mean`/`Median` fall back to 0.0 when the column has no non-null values.
pub fn fill_value(series: &Series, policy: FillPolicy) -> f64 {
    match policy {
        FillPolicy::Zero => 0.0,
        FillPolicy::Mean => series.mean().unwrap_or(0.0),
        FillPolicy::Median => series.median().unwrap_or(0.0),
    }
}

/// Extract a numeric series as f64 values with nulls replaced by `fill`.
pub fn f64s_with_fill(series: &Series, fill: f64) -> Result<Vec<f64>> {
    let float_series = series.cast(&DataType::Float64)?;
    let ca = float_series.f64()?;
    Ok(ca.into_iter().map(|v| v.unwrap_or(fill)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_numeric_dtype() {
        assert!(is_numeric_dtype(&DataType::Int64));
        assert!(is_numeric_dtype(&DataType::Float64));
        assert!(!is_numeric_dtype(&DataType::String));
        assert!(!is_numeric_dtype(&DataType::Boolean));
    }

    #[test]
    fn test_dtype_kind() {
        assert_eq!(dtype_kind(&DataType::Float32), ColumnKind::Numeric);
        assert_eq!(dtype_kind(&DataType::Boolean), ColumnKind::Boolean);
        assert_eq!(dtype_kind(&DataType::String), ColumnKind::Categorical);
    }

    #[test]
    fn test_non_null_f64s_excludes_nulls() {
        let series = Series::new("x".into(), &[Some(1.0f64), None, Some(3.0)]);
        let values = non_null_f64s(&series).unwrap();
        assert_eq!(values, vec![1.0, 3.0]);
    }

    #[test]
    fn test_non_null_f64s_empty_series() {
        let series: Series = Series::new("x".into(), Vec::<f64>::new());
        assert!(non_null_f64s(&series).unwrap().is_empty());
    }

    #[test]
    fn test_string_values_render_without_quotes() {
        let series = Series::new("id".into(), &[Some("C-1"), None, Some("C-2")]);
        let values = string_values(&series).unwrap();
        assert_eq!(
            values,
            vec![Some("C-1".to_string()), None, Some("C-2".to_string())]
        );
    }

    #[test]
    fn test_string_values_from_integers() {
        let series = Series::new("id".into(), &[1i64, 2, 2]);
        let values = string_values(&series).unwrap();
        assert_eq!(values[0], Some("1".to_string()));
        assert_eq!(values[2], Some("2".to_string()));
    }

    #[test]
    fn test_fill_value_policies() {
        let series = Series::new("x".into(), &[Some(1.0f64), None, Some(3.0)]);
        assert_eq!(fill_value(&series, FillPolicy::Zero), 0.0);
        assert_eq!(fill_value(&series, FillPolicy::Mean), 2.0);
        assert_eq!(fill_value(&series, FillPolicy::Median), 2.0);
    }

    #[test]
    fn test_fill_value_all_null_falls_back_to_zero() {
        let series = Series::new("x".into(), &[Option::<f64>::None, None]);
        assert_eq!(fill_value(&series, FillPolicy::Mean), 0.0);
    }

    #[test]
    fn test_f64s_with_fill() {
        let series = Series::new("x".into(), &[Some(1.0f64), None, Some(3.0)]);
        let values = f64s_with_fill(&series, 0.0).unwrap();
        assert_eq!(values, vec![1.0, 0.0, 3.0]);
    }
}
