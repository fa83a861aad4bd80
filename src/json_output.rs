//! JSON output format for split results and reports

use crate::cli::SplitAlgorithm;
use crate::durations::DurationRecord;
use crate::partition::Group;
use serde::{Deserialize, Serialize};

/// The selected group of a split, for --format json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonGroup {
    /// 1-based group number that was selected
    pub group: usize,
    /// Total number of groups in the partition
    pub splits: usize,
    /// Algorithm that produced the partition
    pub algorithm: String,
    /// Estimated total duration of this group in seconds
    pub estimated_duration: f64,
    /// Test identifiers of this group, in execution order
    pub tests: Vec<String>,
}

impl JsonGroup {
    /// Build the JSON view of a selected group
    pub fn from_group(group: &Group, splits: usize, algorithm: SplitAlgorithm) -> Self {
        let algorithm = match algorithm {
            SplitAlgorithm::DurationBasedChunks => "duration_based_chunks",
            SplitAlgorithm::LeastDuration => "least_duration",
        };
        Self {
            group: group.index + 1,
            splits,
            algorithm: algorithm.to_string(),
            estimated_duration: group.total_duration,
            tests: group.items.iter().map(|item| item.id.clone()).collect(),
        }
    }
}

/// One entry of the slowest-tests report, for --format json
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSlowTest {
    /// Stable test identifier
    pub id: String,
    /// Recorded duration in seconds
    pub seconds: f64,
}

impl From<&DurationRecord> for JsonSlowTest {
    fn from(record: &DurationRecord) -> Self {
        Self {
            id: record.id.clone(),
            seconds: record.seconds,
        }
    }
}
