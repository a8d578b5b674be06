//! Consumer-facing query surface over one loaded dataset.
//!
//! [`SummaryEngine`] bundles the dataset accessor, the aggregation engine,
//! and the scoring adapter behind one read-only handle. A process-wide shared
//! instance can be initialized exactly once via [`init_shared`]; every later
//! caller gets the same engine.

use std::path::Path;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::info;

use crate::aggregate;
use crate::config::ScoringConfig;
use crate::dataset::{Dataset, Subset};
use crate::error::Result;
use crate::scoring::{Predictor, ScoringAdapter};
use crate::types::{
    ColumnDescriptor, ColumnKind, CorrelationMatrix, DescribeTable, FrequencyTable, GroupOverview,
    MetricOp, MissingReport,
};

static SHARED: OnceCell<Arc<SummaryEngine>> = OnceCell::new();

/// Read-only query surface over a single dataset.
#[derive(Debug, Clone)]
pub struct SummaryEngine {
    dataset: Dataset,
}

impl SummaryEngine {
    /// Build an engine over an already-loaded dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self { dataset }
    }

    /// Load a CSV and build an engine over it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(Dataset::load(path)?))
    }

    /// The underlying dataset.
    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Column descriptors, in frame order.
    pub fn columns(&self) -> &[ColumnDescriptor] {
        self.dataset.descriptors()
    }

    /// Names of the numeric columns, the default describe/correlation set.
    pub fn numeric_columns(&self) -> Vec<&str> {
        self.dataset
            .descriptors()
            .iter()
            .filter(|d| d.kind == ColumnKind::Numeric)
            .map(|d| d.name.as_str())
            .collect()
    }

    /// Distinct values of a column in first-seen order, for selection lists.
    pub fn list_values(&self, column: &str) -> Result<Vec<String>> {
        self.dataset.unique_values(column)
    }

    /// Rows matching a group key.
    pub fn filter(&self, column: &str, key: &str) -> Result<Subset<'_>> {
        self.dataset.filter_by(column, key)
    }

    /// Descriptive statistics for the given numeric columns.
    pub fn describe(&self, columns: &[&str]) -> Result<DescribeTable> {
        aggregate::describe(&self.dataset.slice(), columns)
    }

    /// Frequency table of a categorical, identifier, or boolean column.
    pub fn value_counts(&self, column: &str) -> Result<FrequencyTable> {
        aggregate::value_counts(&self.dataset.slice(), column)
    }

    /// Null counts for every column.
    pub fn missing_report(&self) -> Result<MissingReport> {
        aggregate::missing_report(&self.dataset.slice())
    }

    /// Pearson correlation matrix over the given numeric columns.
    pub fn correlation_matrix(&self, columns: &[&str]) -> Result<CorrelationMatrix> {
        aggregate::correlation_matrix(&self.dataset.slice(), columns)
    }

    /// One aggregate over the rows matching a group key.
    pub fn group_metric(
        &self,
        group_column: &str,
        group_key: &str,
        metric_column: &str,
        op: MetricOp,
    ) -> Result<f64> {
        aggregate::group_metric(&self.dataset, group_column, group_key, metric_column, op)
    }

    /// Several aggregates over one group, bundled for display.
    pub fn group_overview(
        &self,
        group_column: &str,
        group_key: &str,
        metrics: &[(&str, MetricOp)],
    ) -> Result<GroupOverview> {
        aggregate::group_overview(&self.dataset, group_column, group_key, metrics)
    }

    /// Score the dataset with an external predictor, returning a new engine
    /// over the scored dataset. This engine's dataset is unchanged.
    pub fn score(&self, config: ScoringConfig, predictor: &dyn Predictor) -> Result<SummaryEngine> {
        let scored = ScoringAdapter::new(config).score(&self.dataset, predictor)?;
        Ok(SummaryEngine::new(scored))
    }
}

/// Initialize the process-wide shared engine from a CSV, at most once.
///
/// The first successful call loads the dataset; later calls return the same
/// engine regardless of their `path` argument. A failed load leaves the
/// barrier unset so a corrected path can retry.
pub fn init_shared(path: impl AsRef<Path>) -> Result<Arc<SummaryEngine>> {
    let engine = SHARED.get_or_try_init(|| {
        info!("Initializing shared summary engine");
        SummaryEngine::load(path).map(Arc::new)
    })?;
    Ok(Arc::clone(engine))
}

/// The shared engine, if [`init_shared`] has succeeded.
pub fn try_shared() -> Option<Arc<SummaryEngine>> {
    SHARED.get().cloned()
}
