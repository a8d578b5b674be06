//! Configuration for the scoring adapter.
//!
//! Uses the builder pattern for ergonomic setup and validates the feature
//! list before any scoring takes place.

use serde::{Deserialize, Serialize};

/// Strategy for substituting nulls in feature columns before prediction.
///
/// The default is `Zero`, preserving the literal fallback the original
/// pipeline used; `Mean` and `Median` are opt-in alternatives and are never
/// applied silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FillPolicy {
    /// Replace null with 0.0.
    #[default]
    Zero,
    /// Replace null with the column mean over non-null values.
    Mean,
    /// Replace null with the column median over non-null values.
    Median,
}

/// Policy when the derived prediction column already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Replace the existing derived column deterministically. Re-scoring an
    /// already-scored dataset yields the same result as scoring once.
    #[default]
    Overwrite,
    /// Fail with `DuplicateColumn`.
    Reject,
}

/// Configuration for a scoring run.
///
/// # Example
///
/// ```rust,ignore
/// use course_insight::{FillPolicy, ScoringConfig};
///
/// let config = ScoringConfig::builder()
///     .feature_columns(["video_completion", "problem_completion"])
///     .target("completion")
///     .fill_policy(FillPolicy::Zero)
///     .build()?;
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Ordered list of feature columns fed to the predictor. Order matters:
    /// it defines the layout of the feature matrix.
    pub feature_columns: Vec<String>,

    /// Name of the predicted quantity; the derived column is named
    /// `predicted_<target>`.
    pub target: String,

    /// Null substitution applied to feature values before prediction.
    pub fill_policy: FillPolicy,

    /// Behavior when the derived column already exists.
    pub duplicate_policy: DuplicatePolicy,
}

impl ScoringConfig {
    /// Create a new configuration builder.
    pub fn builder() -> ScoringConfigBuilder {
        ScoringConfigBuilder::default()
    }

    /// Name of the derived column this configuration produces.
    pub fn derived_column(&self) -> String {
        format!("predicted_{}", self.target)
    }

    /// Validate the configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.feature_columns.is_empty() {
            return Err(ConfigValidationError::EmptyFeatureList);
        }
        if self.target.is_empty() {
            return Err(ConfigValidationError::EmptyTarget);
        }
        for (i, name) in self.feature_columns.iter().enumerate() {
            if self.feature_columns[..i].contains(name) {
                return Err(ConfigValidationError::DuplicateFeature(name.clone()));
            }
        }
        Ok(())
    }
}

/// Builder for [`ScoringConfig`].
#[derive(Debug, Clone, Default)]
pub struct ScoringConfigBuilder {
    feature_columns: Vec<String>,
    target: String,
    fill_policy: FillPolicy,
    duplicate_policy: DuplicatePolicy,
}

impl ScoringConfigBuilder {
    /// Set the ordered feature column list.
    pub fn feature_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the target name (derived column becomes `predicted_<target>`).
    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = target.into();
        self
    }

    /// Set the null fill policy.
    pub fn fill_policy(mut self, policy: FillPolicy) -> Self {
        self.fill_policy = policy;
        self
    }

    /// Set the duplicate-column policy.
    pub fn duplicate_policy(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicate_policy = policy;
        self
    }

    /// Build and validate the configuration.
    pub fn build(self) -> Result<ScoringConfig, ConfigValidationError> {
        let config = ScoringConfig {
            feature_columns: self.feature_columns,
            target: self.target,
            fill_policy: self.fill_policy,
            duplicate_policy: self.duplicate_policy,
        };
        config.validate()?;
        Ok(config)
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Feature column list must not be empty")]
    EmptyFeatureList,

    #[error("Target name must not be empty")]
    EmptyTarget,

    #[error("Feature column '{0}' is listed more than once")]
    DuplicateFeature(String),
}
