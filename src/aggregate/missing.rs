//! Per-column null counts.

use crate::dataset::DataSlice;
use crate::error::Result;
use crate::types::{MissingCount, MissingReport};

/// Null counts for every column of the slice, in column order.
pub fn missing_report(slice: &DataSlice<'_>) -> Result<MissingReport> {
    let mut counts = Vec::with_capacity(slice.descriptors().len());
    for descriptor in slice.descriptors() {
        let series = slice.series(&descriptor.name)?;
        counts.push(MissingCount {
            column: descriptor.name.clone(),
            nulls: series.null_count(),
        });
    }
    Ok(MissingReport { counts })
}
