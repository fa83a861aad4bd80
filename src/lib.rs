//! Repartir - Duration-balanced test suite splitting for CI shards
//!
//! This library partitions an ordered test suite into a fixed number of
//! groups with near-equal total execution time, so each group can run on
//! an independent CI worker. Durations observed in earlier runs are
//! persisted in a JSON file and fed back into the split; tests without
//! history get an estimated duration. Partitioning is deterministic, so
//! every shard of a run computes the same groups and together they cover
//! the suite exactly once.

pub mod cli;
pub mod durations;
pub mod estimator;
pub mod json_output;
pub mod partition;
pub mod report;
pub mod selector;
