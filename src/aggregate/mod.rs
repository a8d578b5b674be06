//! Aggregation engine: pure summaries over a [`DataSlice`].
//!
//! Every function here is deterministic, mutates nothing, and excludes nulls
//! from its computation. All of them operate on a slice so the same code
//! serves whole-dataset and per-group queries.
//!
//! [`DataSlice`]: crate::dataset::DataSlice

mod correlation;
mod describe;
mod frequency;
mod group;
mod missing;

pub use correlation::correlation_matrix;
pub use describe::describe;
pub use frequency::value_counts;
pub use group::{group_metric, group_overview, metric};
pub use missing::missing_report;
