//! Persistent storage of observed test durations
//!
//! The durations file is a JSON object mapping test identifier to observed
//! execution time in seconds. It is read at the start of every run and
//! rewritten wholesale (read old, merge new, atomic replace) when the host
//! runner asks for durations to be recorded. Records keep their file order
//! in memory so reports and saved files stay stable across cycles.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors that can occur while loading or saving the durations file
#[derive(Error, Debug)]
pub enum DurationStoreError {
    #[error("failed to parse durations file {path}: {reason}")]
    Malformed { path: String, reason: String },

    #[error("failed to serialize durations: {0}")]
    SaveError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

/// Result type for durations file operations
pub type Result<T> = std::result::Result<T, DurationStoreError>;

/// One persisted duration observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationRecord {
    /// Stable test identifier
    pub id: String,
    /// Observed execution time in seconds, never negative
    pub seconds: f64,
}

/// On-disk representations accepted by `load`. Early versions of the format
/// stored a list of `[id, seconds]` pairs instead of an object; both still
/// parse.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDurations {
    Map(serde_json::Map<String, serde_json::Value>),
    Pairs(Vec<(String, f64)>),
}

/// Insertion-ordered mapping from test identifier to observed duration
#[derive(Debug, Clone, Default)]
pub struct DurationStore {
    records: Vec<DurationRecord>,
    index: HashMap<String, usize>,
}

impl DurationStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a durations file.
    ///
    /// A missing file yields an empty store: absent history means every
    /// duration gets estimated, not that the run fails. Unparsable content
    /// or non-numeric values yield [`DurationStoreError::Malformed`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "durations file not found, starting empty");
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };

        let malformed = |reason: String| DurationStoreError::Malformed {
            path: path.display().to_string(),
            reason,
        };

        let parsed: StoredDurations =
            serde_json::from_str(&contents).map_err(|err| malformed(err.to_string()))?;

        let mut store = Self::new();
        match parsed {
            StoredDurations::Map(map) => {
                for (id, value) in map {
                    let seconds = value
                        .as_f64()
                        .ok_or_else(|| malformed(format!("non-numeric duration for `{id}`")))?;
                    store.record(id, seconds);
                }
            }
            StoredDurations::Pairs(pairs) => {
                for (id, seconds) in pairs {
                    store.record(id, seconds);
                }
            }
        }
        Ok(store)
    }

    /// Load a durations file, falling back to an empty store on malformed
    /// content.
    ///
    /// Duration data is advisory: a corrupt file should cost estimation
    /// quality, not the CI run. The failure is logged at warn level.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path.as_ref()) {
            Ok(store) => store,
            Err(err) => {
                warn!(
                    path = %path.as_ref().display(),
                    error = %err,
                    "ignoring unreadable durations file, splitting without history"
                );
                Self::new()
            }
        }
    }

    /// Insert or update a record, skipping negative observations.
    ///
    /// An existing id keeps its position in the file order; new ids append.
    fn record(&mut self, id: String, seconds: f64) {
        if seconds < 0.0 {
            warn!(id = %id, seconds, "skipping negative test duration");
            return;
        }
        match self.index.get(&id) {
            Some(&position) => self.records[position].seconds = seconds,
            None => {
                self.index.insert(id.clone(), self.records.len());
                self.records.push(DurationRecord { id, seconds });
            }
        }
    }

    /// Insert or update a single observation
    pub fn insert(&mut self, id: impl Into<String>, seconds: f64) {
        self.record(id.into(), seconds);
    }

    /// Merge newly measured durations into this store.
    ///
    /// Existing tests are overwritten in place, newly seen tests append in
    /// report order.
    pub fn merge(&mut self, report: &DurationStore) {
        for record in report.iter() {
            self.record(record.id.clone(), record.seconds);
        }
    }

    /// Look up the recorded duration for a test
    pub fn get(&self, id: &str) -> Option<f64> {
        self.index.get(id).map(|&position| self.records[position].seconds)
    }

    /// Records in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &DurationRecord> {
        self.records.iter()
    }

    /// Number of recorded tests
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Write the store to `path` with atomic replacement.
    ///
    /// The contents are serialized to a sibling temporary file which is
    /// then renamed over the target, so a crash or a failed write leaves
    /// the previous file intact. The temporary is removed if the write
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let mut map = serde_json::Map::with_capacity(self.records.len());
        for record in &self.records {
            map.insert(record.id.clone(), record.seconds.into());
        }
        let contents = serde_json::to_string_pretty(&serde_json::Value::Object(map))
            .map_err(|err| DurationStoreError::SaveError(err.to_string()))?;

        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from(".test_durations"));
        let tmp_path = path.with_file_name(format!("{file_name}.tmp"));

        if let Err(err) = fs::write(&tmp_path, contents) {
            let _ = fs::remove_file(&tmp_path);
            return Err(err.into());
        }
        fs::rename(&tmp_path, path)?;
        Ok(())
    }
}
