use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use crate::ingestion::FileId;

/// Lifecycle state of a file
///
/// A file enters `Processing` when its upload is accepted and moves to one of
/// the terminal states when its processing run returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Processing,
    Completed,
    Error,
}

impl FileStatus {
    /// `Completed` and `Error` end a run
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Error)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Registry value: current state plus when it was written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEntry {
    pub status: FileStatus,
    pub updated_at: DateTime<Utc>,
}

/// Number of entries per state
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    pub processing: usize,
    pub completed: usize,
    pub error: usize,
}

/// Concurrency-safe map from file identifier to status
///
/// Every read and write goes through one mutex guarding the whole map, so a
/// reader never sees a half-applied update. Writes are last-writer-wins and
/// no history is kept. Entries are never removed: the map grows with the
/// number of distinct identifiers uploaded during the process lifetime.
///
/// The registry is meant to be shared behind an `Arc` and handed to whoever
/// needs it, rather than living in a global.
#[derive(Debug, Default)]
pub struct StatusRegistry {
    entries: Mutex<HashMap<FileId, StatusEntry>>,
}

impl StatusRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // A panic while holding the guard cannot leave an entry half-written
    // (inserts are single operations), so a poisoned map is still consistent.
    fn lock(&self) -> MutexGuard<'_, HashMap<FileId, StatusEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record `status` for `id`, replacing any previous entry
    pub fn set(&self, id: &FileId, status: FileStatus) -> StatusEntry {
        let entry = StatusEntry {
            status,
            updated_at: Utc::now(),
        };
        let previous = self.lock().insert(id.clone(), entry);

        debug!(
            file_id = %id,
            status = %status,
            previous = ?previous.map(|e| e.status),
            "Status updated"
        );
        entry
    }

    /// Current entry for `id`, or `None` if it was never set
    pub fn get(&self, id: &FileId) -> Option<StatusEntry> {
        self.lock().get(id).copied()
    }

    /// Current state for `id`
    pub fn status(&self, id: &FileId) -> Option<FileStatus> {
        self.get(id).map(|entry| entry.status)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of every entry, ordered by identifier
    pub fn snapshot(&self) -> Vec<(FileId, StatusEntry)> {
        let mut entries: Vec<_> = self
            .lock()
            .iter()
            .map(|(id, entry)| (id.clone(), *entry))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Count entries per state
    pub fn summary(&self) -> StatusSummary {
        self.lock()
            .values()
            .fold(StatusSummary::default(), |mut summary, entry| {
                match entry.status {
                    FileStatus::Processing => summary.processing += 1,
                    FileStatus::Completed => summary.completed += 1,
                    FileStatus::Error => summary.error += 1,
                }
                summary
            })
    }
}
