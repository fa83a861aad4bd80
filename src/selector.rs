//! Group selection for a single CI shard
//!
//! Every shard computes the full partition and picks just its own group;
//! group numbering is 1-based on the command line, so group 1 is the first
//! group of the partition.

use crate::partition::{Group, PartitionResult, Result, SplitError};

/// Select one group of a partition by its 1-based number.
///
/// Selecting a valid but empty group succeeds with an empty test list;
/// a number outside `[1, splits]` is a configuration error.
pub fn select(result: &PartitionResult, group: usize) -> Result<&Group> {
    let splits = result.splits();
    if group < 1 || group > splits {
        return Err(SplitError::GroupOutOfRange { group, splits });
    }
    Ok(&result.groups[group - 1])
}
