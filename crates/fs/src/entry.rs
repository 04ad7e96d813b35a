use std::{io, time::SystemTime};

use chrono::{DateTime, Utc};
use log::warn;

/// A filesystem object discovered by the walk. Rebuilt on every run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Root-relative path with `/` separators
    pub path: String,
    pub is_dir: bool,
    /// Symlinks carry their target's kind, size and mtime; the walk never
    /// descends into them
    pub is_symlink: bool,
    /// Size in bytes, 0 for directories
    pub size: u64,
    /// Last modification time, full filesystem precision
    pub modified: DateTime<Utc>,
}

impl FileEntry {
    /// Modification time truncated to whole seconds since the epoch.
    #[inline]
    pub fn modified_secs(&self) -> i64 {
        self.modified.timestamp()
    }
}

/// Falls back to the epoch when the platform cannot report an mtime.
pub(crate) fn to_utc(modified: io::Result<SystemTime>, path: &str) -> DateTime<Utc> {
    match modified {
        Ok(t) => DateTime::<Utc>::from(t),
        Err(e) => {
            warn!("[walk] no modification time for {path} ({e}); using the epoch");
            DateTime::<Utc>::UNIX_EPOCH
        }
    }
}

/// Convert a platform path component list into the `/`-joined form used as key.
#[inline]
pub fn normalize_separators(path: &str) -> String {
    path.replace('\\', "/")
}
