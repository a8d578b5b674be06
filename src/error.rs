//! Custom error types for the tabular summary engine.
//!
//! This module provides the error hierarchy using `thiserror`. Every error
//! carries enough context (column or key name) for the caller to react;
//! nothing is retried automatically and no operation produces partial output.
//!
//! Errors are serializable so a UI layer can display them as
//! `{code, message}` pairs.

use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

use crate::types::ColumnKind;

/// The main error type for dataset access, aggregation, and scoring.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The CSV source could not be read or parsed.
    #[error("Failed to load dataset from '{path}': {reason}")]
    DataLoad { path: String, reason: String },

    /// Column was not found in the dataset.
    #[error("Column '{0}' not found in dataset")]
    ColumnNotFound(String),

    /// A group key offered for filtering matched no rows. Since keys are
    /// listed from the dataset itself, this signals a data/selection desync.
    #[error("No rows match key '{key}' in column '{column}'")]
    KeyNotFound { column: String, key: String },

    /// An aggregation was requested on a column whose declared kind does not
    /// support it.
    #[error("Column '{column}' has kind {kind}, which does not support {operation}")]
    ColumnType {
        column: String,
        kind: ColumnKind,
        operation: &'static str,
    },

    /// A feature column required by the scoring adapter is absent.
    #[error("Required feature column '{0}' is missing from the dataset")]
    MissingFeatureColumn(String),

    /// The derived prediction column already exists and the configured
    /// duplicate policy rejects overwriting it.
    #[error("Derived column '{0}' already exists in the dataset")]
    DuplicateColumn(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external predictor violated its batching contract.
    #[error("Prediction failed: {0}")]
    PredictionFailed(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<EngineError>,
    },
}

impl EngineError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        EngineError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get a stable error code for frontend handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::DataLoad { .. } => "DATA_LOAD_ERROR",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::KeyNotFound { .. } => "KEY_NOT_FOUND",
            Self::ColumnType { .. } => "COLUMN_TYPE_ERROR",
            Self::MissingFeatureColumn(_) => "MISSING_FEATURE_COLUMN",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::PredictionFailed(_) => "PREDICTION_FAILED",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error is recoverable by the caller picking a different
    /// selection (as opposed to a programming or data error).
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::KeyNotFound { .. } | Self::ColumnNotFound(_) | Self::InvalidConfig(_)
        )
    }
}

/// Serialize implementation for display layers.
///
/// Errors are serialized as a struct with `code` and `message` fields.
impl Serialize for EngineError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("EngineError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for summary-engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| EngineError::Polars(e).with_context(context))
    }
}
