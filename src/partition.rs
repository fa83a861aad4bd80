//! Test partitioning algorithms
//!
//! Splits an ordered test list into a fixed number of groups whose summed
//! durations are as close to equal as each algorithm's ordering guarantee
//! allows. Partitioning is a pure function of its inputs: every shard of a
//! CI run recomputes the same groups from the same durations file, so no
//! map iteration order may influence the result. All walks below follow
//! the original suite order.

use crate::cli::SplitAlgorithm;
use thiserror::Error;

/// Errors for invalid split configurations
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SplitError {
    #[error("argument `--splits` must be >= 1")]
    InvalidSplits(usize),

    #[error("argument `--group` must be >= 1 and <= {splits}")]
    GroupOutOfRange { group: usize, splits: usize },
}

/// Result type for partitioning operations
pub type Result<T> = std::result::Result<T, SplitError>;

/// A test with its estimated or recorded duration in seconds
#[derive(Debug, Clone, PartialEq)]
pub struct TestItem {
    /// Stable identifier assigned by the host runner's collection phase
    pub id: String,
    /// Estimated execution time in seconds
    pub seconds: f64,
}

impl TestItem {
    /// Create a test item
    pub fn new(id: impl Into<String>, seconds: f64) -> Self {
        Self {
            id: id.into(),
            seconds,
        }
    }
}

/// One of the groups a suite was split into
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    /// Zero-based group index
    pub index: usize,
    /// Tests assigned to this group, in suite order
    pub items: Vec<TestItem>,
    /// Sum of the item durations in seconds
    pub total_duration: f64,
}

impl Group {
    /// Test identifiers of this group, in order
    pub fn ids(&self) -> Vec<&str> {
        self.items.iter().map(|item| item.id.as_str()).collect()
    }
}

/// The full partition of a suite: exactly `splits` groups in index order
#[derive(Debug, Clone, PartialEq)]
pub struct PartitionResult {
    pub groups: Vec<Group>,
}

impl PartitionResult {
    /// Number of groups
    pub fn splits(&self) -> usize {
        self.groups.len()
    }
}

/// Split `items` into `splits` groups using the given algorithm.
///
/// Groups may be empty when `splits` exceeds the number of tests. Every
/// input item lands in exactly one group and group totals equal the sum of
/// their item durations.
pub fn partition(
    items: Vec<TestItem>,
    splits: usize,
    algorithm: SplitAlgorithm,
) -> Result<PartitionResult> {
    if splits < 1 {
        return Err(SplitError::InvalidSplits(splits));
    }

    let buckets = match algorithm {
        SplitAlgorithm::DurationBasedChunks => duration_based_chunks(items, splits),
        SplitAlgorithm::LeastDuration => least_duration(items, splits),
    };

    let groups = buckets
        .into_iter()
        .enumerate()
        .map(|(index, items)| {
            let total_duration = items.iter().map(|item| item.seconds).sum();
            Group {
                index,
                items,
                total_duration,
            }
        })
        .collect();

    Ok(PartitionResult { groups })
}

/// Cut the suite into contiguous chunks of near-equal summed duration.
///
/// Each test goes to the chunk its inclusive cumulative duration `C_i`
/// falls into: `g = ceil(C_i * splits / T) - 1`, clamped to
/// `[0, splits - 1]`. A cumulative sum landing exactly on a chunk boundary
/// stays in the earlier group, so a suite whose total divides evenly never
/// leaves a spurious empty trailing group. Cumulative sums never decrease,
/// so group indices never decrease and every group is one unbroken run of
/// the original order.
fn duration_based_chunks(items: Vec<TestItem>, splits: usize) -> Vec<Vec<TestItem>> {
    let total: f64 = items.iter().map(|item| item.seconds).sum();
    if total <= 0.0 {
        return count_based_chunks(items, splits);
    }

    let mut buckets: Vec<Vec<TestItem>> = (0..splits).map(|_| Vec::new()).collect();
    let mut cumulative = 0.0;
    for item in items {
        cumulative += item.seconds;
        let boundary = cumulative * splits as f64 / total;
        let group = (boundary.ceil() as usize)
            .saturating_sub(1)
            .min(splits - 1);
        buckets[group].push(item);
    }
    buckets
}

/// Count-based fallback when every duration is zero: contiguous chunks of
/// equal size, remainder distributed one-each to the first groups.
fn count_based_chunks(items: Vec<TestItem>, splits: usize) -> Vec<Vec<TestItem>> {
    let base = items.len() / splits;
    let remainder = items.len() % splits;

    let mut buckets = Vec::with_capacity(splits);
    let mut iter = items.into_iter();
    for index in 0..splits {
        let size = base + usize::from(index < remainder);
        buckets.push(iter.by_ref().take(size).collect());
    }
    buckets
}

/// Append each test, in suite order, to the group with the smallest
/// running total; ties go to the lowest group index.
///
/// Groups are not contiguous slices of the suite, but each group's items
/// keep their original relative order. At termination the spread between
/// the heaviest and lightest group never exceeds the single largest test
/// duration.
fn least_duration(items: Vec<TestItem>, splits: usize) -> Vec<Vec<TestItem>> {
    let mut buckets: Vec<Vec<TestItem>> = (0..splits).map(|_| Vec::new()).collect();
    let mut totals = vec![0.0f64; splits];

    for item in items {
        let mut lightest = 0;
        for (index, total) in totals.iter().enumerate().skip(1) {
            if *total < totals[lightest] {
                lightest = index;
            }
        }
        totals[lightest] += item.seconds;
        buckets[lightest].push(item);
    }
    buckets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn suite(durations: &[f64]) -> Vec<TestItem> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &seconds)| TestItem::new(format!("test_{}", i + 1), seconds))
            .collect()
    }

    fn group_ids(result: &PartitionResult, index: usize) -> Vec<&str> {
        result.groups[index].ids()
    }

    #[test]
    fn test_rejects_zero_splits() {
        let result = partition(suite(&[1.0]), 0, SplitAlgorithm::DurationBasedChunks);
        assert_eq!(result.unwrap_err(), SplitError::InvalidSplits(0));
    }

    #[test]
    fn test_single_split_keeps_whole_suite() {
        let result = partition(suite(&[1.0, 2.0, 3.0]), 1, SplitAlgorithm::LeastDuration).unwrap();
        assert_eq!(result.splits(), 1);
        assert_eq!(group_ids(&result, 0), ["test_1", "test_2", "test_3"]);
        assert_eq!(result.groups[0].total_duration, 6.0);
    }

    #[test]
    fn test_chunks_scenario_heavy_head() {
        // A=10 B=5 C=1 D=4 over two groups: the heavy head alone balances
        // the rest
        let items = vec![
            TestItem::new("A", 10.0),
            TestItem::new("B", 5.0),
            TestItem::new("C", 1.0),
            TestItem::new("D", 4.0),
        ];
        let result = partition(items, 2, SplitAlgorithm::DurationBasedChunks).unwrap();
        assert_eq!(group_ids(&result, 0), ["A"]);
        assert_eq!(group_ids(&result, 1), ["B", "C", "D"]);
        assert_eq!(result.groups[0].total_duration, 10.0);
        assert_eq!(result.groups[1].total_duration, 10.0);
    }

    #[test]
    fn test_chunks_accepts_imbalance_to_keep_order() {
        // A=1 B=1 C=10 D=1: contiguity forces 2 vs 11
        let items = vec![
            TestItem::new("A", 1.0),
            TestItem::new("B", 1.0),
            TestItem::new("C", 10.0),
            TestItem::new("D", 1.0),
        ];
        let result = partition(items, 2, SplitAlgorithm::DurationBasedChunks).unwrap();
        assert_eq!(group_ids(&result, 0), ["A", "B"]);
        assert_eq!(group_ids(&result, 1), ["C", "D"]);
        assert_eq!(result.groups[0].total_duration, 2.0);
        assert_eq!(result.groups[1].total_duration, 11.0);
    }

    #[test]
    fn test_least_duration_balances_heavy_middle() {
        // Same suite as above: without the contiguity constraint the heavy
        // test gets a group mate that ran before it
        let items = vec![
            TestItem::new("A", 1.0),
            TestItem::new("B", 1.0),
            TestItem::new("C", 10.0),
            TestItem::new("D", 1.0),
        ];
        let result = partition(items, 2, SplitAlgorithm::LeastDuration).unwrap();
        assert_eq!(group_ids(&result, 0), ["A", "C"]);
        assert_eq!(group_ids(&result, 1), ["B", "D"]);
        assert_eq!(result.groups[0].total_duration, 11.0);
        assert_eq!(result.groups[1].total_duration, 2.0);
    }

    #[test]
    fn test_least_duration_balance_bound() {
        let items = suite(&[3.0, 7.0, 2.0, 9.0, 4.0, 1.0, 6.0]);
        let max_single = 9.0;
        let result = partition(items, 3, SplitAlgorithm::LeastDuration).unwrap();

        let totals: Vec<f64> = result.groups.iter().map(|g| g.total_duration).collect();
        let max = totals.iter().cloned().fold(f64::MIN, f64::max);
        let min = totals.iter().cloned().fold(f64::MAX, f64::min);
        assert!(max - min <= max_single);
    }

    #[test]
    fn test_more_splits_than_tests_leaves_empty_groups() {
        let result = partition(suite(&[1.0, 1.0]), 3, SplitAlgorithm::DurationBasedChunks).unwrap();
        assert_eq!(result.splits(), 3);
        let empty = result.groups.iter().filter(|g| g.items.is_empty()).count();
        assert_eq!(empty, 1);

        let result = partition(suite(&[1.0, 1.0]), 3, SplitAlgorithm::LeastDuration).unwrap();
        let empty = result.groups.iter().filter(|g| g.items.is_empty()).count();
        assert_eq!(empty, 1);
    }

    #[test]
    fn test_all_zero_durations_fall_back_to_count_split() {
        let result = partition(suite(&[0.0; 7]), 3, SplitAlgorithm::DurationBasedChunks).unwrap();
        let sizes: Vec<usize> = result.groups.iter().map(|g| g.items.len()).collect();
        assert_eq!(sizes, [3, 2, 2]);
        // Contiguity holds for the fallback too
        assert_eq!(group_ids(&result, 0), ["test_1", "test_2", "test_3"]);
        assert_eq!(group_ids(&result, 1), ["test_4", "test_5"]);
        assert_eq!(group_ids(&result, 2), ["test_6", "test_7"]);
    }

    #[test]
    fn test_uniform_durations_split_near_equal_by_count() {
        // With all durations equal both algorithms degenerate to a count
        // split
        for algorithm in [
            SplitAlgorithm::DurationBasedChunks,
            SplitAlgorithm::LeastDuration,
        ] {
            let result = partition(suite(&[1.0; 10]), 4, algorithm).unwrap();
            let mut sizes: Vec<usize> = result.groups.iter().map(|g| g.items.len()).collect();
            sizes.sort_unstable();
            assert_eq!(sizes, [2, 2, 3, 3]);
        }
    }

    #[test]
    fn test_exact_boundary_stays_in_earlier_group() {
        // Cumulative sums hit the 50% boundary exactly after test_2; the
        // boundary test belongs to the earlier group and the trailing
        // group still gets its share
        let result = partition(suite(&[1.0, 1.0, 1.0, 1.0]), 2, SplitAlgorithm::DurationBasedChunks)
            .unwrap();
        assert_eq!(group_ids(&result, 0), ["test_1", "test_2"]);
        assert_eq!(group_ids(&result, 1), ["test_3", "test_4"]);
    }

    #[test]
    fn test_chunk_group_indices_never_decrease() {
        let items = suite(&[0.5, 2.0, 0.1, 0.1, 3.0, 1.2, 0.7]);
        let result = partition(items.clone(), 3, SplitAlgorithm::DurationBasedChunks).unwrap();

        let concatenated: Vec<&str> = result
            .groups
            .iter()
            .flat_map(|g| g.items.iter().map(|item| item.id.as_str()))
            .collect();
        let original: Vec<&str> = items.iter().map(|item| item.id.as_str()).collect();
        assert_eq!(concatenated, original);
    }

    #[test]
    fn test_empty_suite_yields_all_empty_groups() {
        for algorithm in [
            SplitAlgorithm::DurationBasedChunks,
            SplitAlgorithm::LeastDuration,
        ] {
            let result = partition(Vec::new(), 4, algorithm).unwrap();
            assert_eq!(result.splits(), 4);
            assert!(result.groups.iter().all(|g| g.items.is_empty()));
            assert!(result.groups.iter().all(|g| g.total_duration == 0.0));
        }
    }

    #[test]
    fn test_least_duration_tie_goes_to_lowest_index() {
        // First test lands in group 0, not any other equally empty group
        let result = partition(suite(&[1.0]), 3, SplitAlgorithm::LeastDuration).unwrap();
        assert_eq!(result.groups[0].items.len(), 1);
        assert!(result.groups[1].items.is_empty());
        assert!(result.groups[2].items.is_empty());
    }

    #[test]
    fn test_partition_is_deterministic() {
        let items = suite(&[2.5, 0.3, 1.1, 4.0, 0.9, 2.2]);
        for algorithm in [
            SplitAlgorithm::DurationBasedChunks,
            SplitAlgorithm::LeastDuration,
        ] {
            let first = partition(items.clone(), 3, algorithm).unwrap();
            let second = partition(items.clone(), 3, algorithm).unwrap();
            assert_eq!(first, second);
        }
    }
}
