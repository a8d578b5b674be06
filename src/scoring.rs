//! Scoring adapter: batch prediction over feature columns.
//!
//! The adapter owns no model. It assembles a row-aligned feature matrix from
//! the dataset, hands it to an external [`Predictor`] in exactly one batched
//! call, and attaches the predictions as a derived column on a new dataset.
//! The input dataset is never mutated.

use polars::prelude::*;
use tracing::{debug, info};

use crate::config::{DuplicatePolicy, ScoringConfig};
use crate::dataset::Dataset;
use crate::error::{EngineError, Result};
use crate::types::ColumnKind;
use crate::utils::{f64s_with_fill, fill_value};

/// Row-major matrix of feature values, one row per dataset row, one column
/// per configured feature, in configuration order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    columns: Vec<String>,
    rows: usize,
    values: Vec<f64>,
}

impl FeatureMatrix {
    /// Feature column names, in matrix column order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// One row of feature values.
    pub fn row(&self, i: usize) -> &[f64] {
        let width = self.columns.len();
        &self.values[i * width..(i + 1) * width]
    }

    /// All values, row-major.
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// An external model the adapter can score with.
///
/// `predict` receives the whole feature matrix at once and must return one
/// prediction per row. The adapter calls it exactly once per scoring run.
pub trait Predictor {
    fn predict(&self, features: &FeatureMatrix) -> Result<Vec<f64>>;
}

/// Applies a [`Predictor`] to a dataset according to a [`ScoringConfig`].
#[derive(Debug, Clone)]
pub struct ScoringAdapter {
    config: ScoringConfig,
}

impl ScoringAdapter {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score a dataset, returning a new dataset with the derived column
    /// `predicted_<target>` appended.
    ///
    /// Every feature column must exist (`MissingFeatureColumn`) and be
    /// numeric or boolean (`ColumnType`). Nulls in feature columns are
    /// substituted per the configured fill policy; the dataset itself keeps
    /// its nulls. If the derived column already exists it is overwritten or
    /// rejected per the duplicate policy.
    pub fn score(&self, dataset: &Dataset, predictor: &dyn Predictor) -> Result<Dataset> {
        let derived = self.config.derived_column();
        if dataset.descriptor(&derived).is_ok()
            && self.config.duplicate_policy == DuplicatePolicy::Reject
        {
            return Err(EngineError::DuplicateColumn(derived));
        }

        let matrix = self.feature_matrix(dataset)?;
        info!(
            "Scoring {} rows with {} features into '{}'",
            matrix.rows(),
            matrix.columns().len(),
            derived
        );

        let predictions = predictor.predict(&matrix)?;
        if predictions.len() != matrix.rows() {
            return Err(EngineError::PredictionFailed(format!(
                "predictor returned {} values for {} rows",
                predictions.len(),
                matrix.rows()
            )));
        }

        let mut frame = dataset.frame().clone();
        frame.with_column(Series::new(derived.as_str().into(), predictions))?;
        Ok(Dataset::from_frame(frame))
    }

    /// Assemble the row-aligned feature matrix, applying the fill policy.
    pub fn feature_matrix(&self, dataset: &Dataset) -> Result<FeatureMatrix> {
        let rows = dataset.row_count();
        let width = self.config.feature_columns.len();
        let mut column_values: Vec<Vec<f64>> = Vec::with_capacity(width);

        for name in &self.config.feature_columns {
            let descriptor = dataset
                .descriptor(name)
                .map_err(|_| EngineError::MissingFeatureColumn(name.clone()))?;
            if !matches!(descriptor.kind, ColumnKind::Numeric | ColumnKind::Boolean) {
                return Err(EngineError::ColumnType {
                    column: name.clone(),
                    kind: descriptor.kind,
                    operation: "scoring",
                });
            }
            let series = dataset.series(name)?;
            let fill = fill_value(series, self.config.fill_policy);
            if series.null_count() > 0 {
                debug!(
                    "Filling {} nulls in feature '{}' with {}",
                    series.null_count(),
                    name,
                    fill
                );
            }
            column_values.push(f64s_with_fill(series, fill)?);
        }

        let mut values = Vec::with_capacity(rows * width);
        for row in 0..rows {
            for column in &column_values {
                values.push(column[row]);
            }
        }

        Ok(FeatureMatrix {
            columns: self.config.feature_columns.clone(),
            rows,
            values,
        })
    }
}
