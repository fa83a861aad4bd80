use anyhow::{bail, Context, Result};
use clap::Parser;
use repartir::cli::{Cli, OutputFormat};
use repartir::durations::DurationStore;
use repartir::json_output::{JsonGroup, JsonSlowTest};
use repartir::{estimator, partition, report, selector};
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber on stderr; warnings always show, --debug
/// raises the level to TRACE
fn init_tracing(debug: bool) {
    let level = if debug {
        tracing::Level::TRACE
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// Read the ordered test list, one identifier per line, from a file or
/// stdin. Blank lines are skipped; order is preserved.
fn read_test_ids(tests_from: Option<&Path>) -> Result<Vec<String>> {
    let contents = match tests_from {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read test list from {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read test list from stdin")?;
            buffer
        }
    };

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect())
}

/// Split the suite and print the selected group's test identifiers to
/// stdout. Status goes to stderr so stdout stays machine-readable.
fn run_split(args: &Cli, splits: usize, group_number: usize) -> Result<()> {
    let test_ids = read_test_ids(args.tests_from.as_deref())?;
    let known = DurationStore::load_or_default(&args.durations_path);
    if known.is_empty() {
        eprintln!(
            "[repartir] No test durations found. Tests will be split evenly; \
             expect better results once durations have been stored."
        );
    }

    let items = estimator::estimate(&test_ids, &known);
    let result = partition::partition(items, splits, args.algorithm)?;
    let selected = selector::select(&result, group_number)?;

    match args.format {
        OutputFormat::Text => {
            for id in selected.ids() {
                println!("{id}");
            }
        }
        OutputFormat::Json => {
            let json = JsonGroup::from_group(selected, splits, args.algorithm);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }

    eprintln!(
        "[repartir] Running group {}/{} ({}/{} tests, estimated duration: {:.2}s)",
        group_number,
        splits,
        selected.items.len(),
        test_ids.len(),
        selected.total_duration
    );
    Ok(())
}

/// Merge a duration report produced by the host runner into the durations
/// file, replacing it atomically.
fn run_store(report_path: &Path, durations_path: &Path) -> Result<()> {
    if !report_path.exists() {
        bail!("duration report not found: {}", report_path.display());
    }
    let measured = DurationStore::load(report_path)
        .with_context(|| format!("failed to read duration report {}", report_path.display()))?;

    let mut store = DurationStore::load_or_default(durations_path);
    store.merge(&measured);
    store.save(durations_path).with_context(|| {
        format!(
            "failed to store test durations in {}",
            durations_path.display()
        )
    })?;

    eprintln!(
        "[repartir] Stored test durations in {}",
        durations_path.display()
    );
    Ok(())
}

/// Print the slowest recorded tests, longest first
fn run_slowest(args: &Cli, count: usize) -> Result<()> {
    let known = DurationStore::load_or_default(&args.durations_path);
    let limit = (count > 0).then_some(count);
    let records = report::slowest(&known, limit);

    match args.format {
        OutputFormat::Text => {
            for record in &records {
                println!("{:>10.4}s {}", record.seconds, record.id);
            }
        }
        OutputFormat::Json => {
            let entries: Vec<JsonSlowTest> = records.iter().map(JsonSlowTest::from).collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.debug);

    let splitting = args.splits.is_some() || args.group.is_some();
    let storing = args.store_durations.is_some();
    let reporting = args.slowest.is_some();
    if [splitting, storing, reporting].iter().filter(|on| **on).count() > 1 {
        bail!("Cannot combine --splits/--group with --store-durations or --slowest. Choose one mode.");
    }

    if let Some(report_path) = &args.store_durations {
        return run_store(report_path, &args.durations_path);
    }

    if let Some(count) = args.slowest {
        return run_slowest(&args, count);
    }

    if splitting {
        // Validate the configuration up front: a bad group number must
        // fail before any test list is read or partition attempted
        let splits = match args.splits {
            Some(splits) => splits,
            None => bail!("argument `--splits` is required"),
        };
        let group = match args.group {
            Some(group) => group,
            None => bail!("argument `--group` is required"),
        };
        if splits < 1 {
            bail!("argument `--splits` must be >= 1");
        }
        if group < 1 || group > splits {
            bail!("argument `--group` must be >= 1 and <= {splits}");
        }
        return run_split(&args, splits, group);
    }

    bail!(
        "Must specify a mode. Usage: repartir --splits N --group K < test_ids.txt, \
         repartir --store-durations REPORT, or repartir --slowest"
    );
}
