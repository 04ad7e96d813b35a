use chrono::{DateTime, FixedOffset};
use glflite_fs::FileEntry;
use serde::{Deserialize, Serialize};

/// Persisted state of one tracked file, stored in its own sidecar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub file_path: String,
    /// When the file was first given a record; preserved on refresh
    pub tracked_since: DateTime<FixedOffset>,
    pub last_modified: DateTime<FixedOffset>,
    pub size: u64,
    /// Lowercase hex SHA-256 of the content
    pub sha256sum: String,
}

impl MetadataRecord {
    /// First record for a file seen on disk.
    pub fn new(entry: &FileEntry, sha256sum: String, now: DateTime<FixedOffset>) -> Self {
        MetadataRecord {
            file_path: entry.path.clone(),
            tracked_since: now,
            last_modified: entry.modified.into(),
            size: entry.size,
            sha256sum,
        }
    }

    /// A new record describing `entry`, keeping this record's `tracked_since`.
    #[must_use]
    pub fn refreshed(&self, entry: &FileEntry, sha256sum: String) -> Self {
        MetadataRecord {
            file_path: entry.path.clone(),
            tracked_since: self.tracked_since,
            last_modified: entry.modified.into(),
            size: entry.size,
            sha256sum,
        }
    }

    /// Recorded modification time truncated to whole seconds.
    #[inline]
    pub fn modified_secs(&self) -> i64 {
        self.last_modified.timestamp()
    }

    /// Fast-path comparison: whole-second mtime and size.
    #[inline]
    pub fn matches_entry(&self, entry: &FileEntry) -> bool {
        self.modified_secs() == entry.modified_secs() && self.size == entry.size
    }
}
