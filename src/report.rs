//! Slowest-tests reporting
//!
//! A read-only view over the durations file for finding optimization
//! targets; has no feedback into partitioning.

use crate::durations::{DurationRecord, DurationStore};
use std::cmp::Ordering;

/// The recorded tests sorted by duration, slowest first.
///
/// The sort is stable, so tests with equal durations keep their store
/// insertion order. `limit` truncates the result; `None` or `Some(0)`
/// returns every record.
pub fn slowest(known: &DurationStore, limit: Option<usize>) -> Vec<DurationRecord> {
    let mut records: Vec<DurationRecord> = known.iter().cloned().collect();
    records.sort_by(|a, b| {
        b.seconds
            .partial_cmp(&a.seconds)
            .unwrap_or(Ordering::Equal)
    });

    if let Some(limit) = limit {
        if limit > 0 {
            records.truncate(limit);
        }
    }
    records
}
