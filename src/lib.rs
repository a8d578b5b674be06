//! Tabular Summary Engine for Course Completion Analytics
//!
//! A small, deterministic library built on Polars for inspecting tabular
//! course-completion data: descriptive statistics, frequency tables, missing
//! value reports, correlation matrices, per-group metrics, and a batch
//! scoring adapter for an external completion predictor.
//!
//! # Overview
//!
//! - **Dataset Accessor**: CSV loading with typed column descriptors, key
//!   filtering, and distinct-value listing
//! - **Aggregation Engine**: pure summaries (describe, value counts, missing
//!   report, Pearson correlations, group metrics) that exclude nulls and
//!   never mutate their input
//! - **Scoring Adapter**: one batched call to an external [`Predictor`],
//!   null fill policies, and a derived `predicted_<target>` column on a new
//!   dataset
//! - **Query Surface**: [`SummaryEngine`] as the single read-only handle,
//!   with a process-wide one-time initialization barrier
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use course_insight::{MetricOp, SummaryEngine};
//!
//! let engine = SummaryEngine::load("courses.csv")?;
//!
//! // Selection lists and per-group metrics
//! let courses = engine.list_values("course_id")?;
//! let mean = engine.group_metric("course_id", &courses[0], "completion", MetricOp::Mean)?;
//!
//! // Whole-dataset summaries
//! let stats = engine.describe(&engine.numeric_columns())?;
//! let missing = engine.missing_report()?;
//! ```
//!
//! # Scoring
//!
//! ```rust,ignore
//! use course_insight::{Predictor, ScoringConfig, SummaryEngine};
//!
//! let config = ScoringConfig::builder()
//!     .feature_columns(["video_completion", "problem_completion"])
//!     .target("completion")
//!     .build()?;
//!
//! let scored = engine.score(config, &my_model)?;
//! let predictions = scored.dataset().series("predicted_completion")?;
//! ```

pub mod aggregate;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod scoring;
pub mod types;
pub mod utils;

// Re-exports for convenient access
pub use config::{
    ConfigValidationError, DuplicatePolicy, FillPolicy, ScoringConfig, ScoringConfigBuilder,
};
pub use dataset::{DataSlice, Dataset, Subset};
pub use engine::{SummaryEngine, init_shared, try_shared};
pub use error::{EngineError, Result, ResultExt};
pub use scoring::{FeatureMatrix, Predictor, ScoringAdapter};
pub use types::{
    ColumnDescriptor, ColumnKind, ColumnStats, CorrelationMatrix, DescribeRow, DescribeTable,
    FrequencyEntry, FrequencyTable, GroupOverview, MetricOp, MetricValue, MissingCount,
    MissingReport,
};
