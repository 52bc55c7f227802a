//! A bounded list of recent analyses.
//!
//! [`History`] is a plain value owned by the caller; nothing in the engine
//! keeps one globally. Entries are kept newest first and the oldest entry is
//! dropped once the capacity is reached.

use std::{
    collections::VecDeque,
    fs, io,
    path::Path,
    time::{SystemTime, UNIX_EPOCH},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{config::HistoryConfig, error::CodeflowError};

/// One recorded submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    id: u64,
    code: String,
    timestamp: u64,
}

impl HistoryEntry {
    /// Unique id, increasing with every recorded entry.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// The submitted source code.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// Seconds since the unix epoch at recording time.
    pub fn timestamp(&self) -> u64 {
        self.timestamp
    }
}

/// Recent submissions, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct History {
    capacity: usize,
    entries: VecDeque<HistoryEntry>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(HistoryConfig::default().capacity())
    }
}

impl History {
    /// Creates an empty history keeping at most `capacity` entries, and
    /// never fewer than one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    /// Creates an empty history sized by `config`.
    pub fn from_config(config: &HistoryConfig) -> Self {
        Self::new(config.capacity())
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries, newest first.
    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Record `code` as the newest entry, stamped with the current time.
    pub fn record(&mut self, code: impl Into<String>) -> &HistoryEntry {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        self.record_at(code, now.as_millis() as u64)
    }

    /// Record `code` as the newest entry at `millis` since the unix epoch.
    pub fn record_at(&mut self, code: impl Into<String>, millis: u64) -> &HistoryEntry {
        let id = self
            .entries
            .front()
            .map_or(millis, |newest| millis.max(newest.id + 1));
        self.entries.push_front(HistoryEntry {
            id,
            code: code.into(),
            timestamp: millis / 1000,
        });
        self.entries.truncate(self.capacity);

        debug!(id, len = self.entries.len(); "Recorded history entry");
        &self.entries[0]
    }

    /// Change the capacity, dropping the oldest entries that no longer fit.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        self.entries.truncate(self.capacity);
    }

    /// Load a history from a JSON file.
    ///
    /// A missing file yields an empty history with `config`'s capacity. The
    /// configured capacity always replaces the stored one.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid history.
    pub fn load(path: &Path, config: &HistoryConfig) -> Result<Self, CodeflowError> {
        let mut history = match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str::<History>(&content)?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path:? = path; "No history file yet");
                return Ok(Self::from_config(config));
            }
            Err(err) => return Err(err.into()),
        };
        history.set_capacity(config.capacity());
        Ok(history)
    }

    /// Save the history as JSON, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), CodeflowError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        info!(path:? = path, entries = self.entries.len(); "Saved history");
        Ok(())
    }
}
