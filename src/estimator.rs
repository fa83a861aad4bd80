//! Duration estimation for tests without recorded history
//!
//! Produces a complete duration vector for the current suite: recorded
//! values are used verbatim, unknown tests get the mean of the recorded
//! values among tests actually present in this run. Restricting the mean
//! to the current suite keeps stale history for deleted or renamed tests
//! from skewing the estimate.

use crate::durations::DurationStore;
use crate::partition::TestItem;
use tracing::debug;

/// Duration assigned to every test when the suite has no recorded history.
/// The value is arbitrary: with all durations equal, both splitting
/// algorithms reduce to an even split by count.
pub const DEFAULT_TEST_DURATION: f64 = 1.0;

/// Attach a duration to every test in `test_ids`, in suite order.
///
/// Pure with respect to `known`: the store is only read. Never fails; a
/// missing or empty store means everything gets the uniform default.
pub fn estimate(test_ids: &[String], known: &DurationStore) -> Vec<TestItem> {
    let mut recorded_total = 0.0;
    let mut recorded_count = 0usize;
    for id in test_ids {
        if let Some(seconds) = known.get(id) {
            recorded_total += seconds;
            recorded_count += 1;
        }
    }

    let fallback = if recorded_count > 0 {
        recorded_total / recorded_count as f64
    } else {
        DEFAULT_TEST_DURATION
    };
    debug!(
        tests = test_ids.len(),
        recorded = recorded_count,
        fallback,
        "estimated test durations"
    );

    test_ids
        .iter()
        .map(|id| TestItem::new(id.clone(), known.get(id).unwrap_or(fallback)))
        .collect()
}
