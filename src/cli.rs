//! CLI argument parsing for Repartir

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Algorithm used to divide the test suite into groups
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SplitAlgorithm {
    /// Contiguous chunks of near-equal summed duration (keeps the suite's
    /// absolute order; balance limited by contiguity)
    DurationBasedChunks,
    /// Greedy assignment to the least-loaded group (best balance; keeps
    /// relative order within each group)
    LeastDuration,
}

/// Output format for the selected group and the slowest-tests report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One test identifier per line (default)
    Text,
    /// JSON format for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "repartir")]
#[command(version)]
#[command(about = "Duration-balanced test suite splitting for CI shards", long_about = None)]
pub struct Cli {
    /// The number of groups to split the tests into
    #[arg(long, value_name = "N")]
    pub splits: Option<usize>,

    /// The group of tests to select, first group is 1
    #[arg(long, value_name = "K")]
    pub group: Option<usize>,

    /// Splitting algorithm
    #[arg(long, value_enum, default_value = "duration-based-chunks")]
    pub algorithm: SplitAlgorithm,

    /// Path to the file in which test durations are (to be) stored
    #[arg(
        long = "durations-path",
        value_name = "PATH",
        default_value = ".test_durations"
    )]
    pub durations_path: PathBuf,

    /// Read test identifiers from FILE instead of stdin, one per line
    #[arg(long = "tests-from", value_name = "FILE")]
    pub tests_from: Option<PathBuf>,

    /// Merge measured durations from a JSON report into the durations file
    #[arg(long = "store-durations", value_name = "REPORT")]
    pub store_durations: Option<PathBuf>,

    /// List the COUNT slowest tests from the durations file (0 = all)
    #[arg(
        long = "slowest",
        value_name = "COUNT",
        num_args = 0..=1,
        default_missing_value = "10"
    )]
    pub slowest: Option<usize>,

    /// Output format (text or json)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
