use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, FixedOffset};
use glflite_fs::{FileEntry, RuleSet};
use glflite_runtime::tracked_path_for;
use log::{debug, warn};

use crate::{error::Result, store::MetadataStore};

/// Where a tracked file's size and mtime come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    /// The file exists in the working tree.
    OnDisk(FileEntry),
    /// Only its record survives.
    Recorded {
        size: u64,
        modified: DateTime<FixedOffset>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedFile {
    pub path: String,
    pub presence: Presence,
    /// Content hash, filled in once the active mode resolves it
    pub hash: Option<String>,
}

impl TrackedFile {
    pub fn on_disk(entry: FileEntry) -> Self {
        TrackedFile {
            path: entry.path.clone(),
            presence: Presence::OnDisk(entry),
            hash: None,
        }
    }

    pub fn recorded(path: String, size: u64, modified: DateTime<FixedOffset>) -> Self {
        TrackedFile {
            path,
            presence: Presence::Recorded { size, modified },
            hash: None,
        }
    }

    #[inline]
    pub fn is_present(&self) -> bool {
        matches!(self.presence, Presence::OnDisk(_))
    }

    #[inline]
    pub fn entry(&self) -> Option<&FileEntry> {
        match &self.presence {
            Presence::OnDisk(e) => Some(e),
            Presence::Recorded { .. } => None,
        }
    }

    pub fn size(&self) -> u64 {
        match &self.presence {
            Presence::OnDisk(e) => e.size,
            Presence::Recorded { size, .. } => *size,
        }
    }

    /// Non-empty hash, if one has been resolved.
    #[inline]
    pub fn known_hash(&self) -> Option<&str> {
        self.hash.as_deref().filter(|h| !h.is_empty())
    }
}

/// Engine-owned table of tracked files, iterated in path order.
#[derive(Debug, Clone, Default)]
pub struct TrackedSet {
    files: BTreeMap<String, TrackedFile>,
}

impl TrackedSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, file: TrackedFile) {
        self.files.insert(file.path.clone(), file);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    pub fn get(&self, path: &str) -> Option<&TrackedFile> {
        self.files.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TrackedFile> {
        self.files.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TrackedFile> {
        self.files.values_mut()
    }

    /// `(path, hash)` for every file with a resolved hash.
    pub fn hashed(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files
            .values()
            .filter_map(|f| f.known_hash().map(|h| (f.path.as_str(), h)))
    }

    /// Keep only `scope` itself and paths below it.
    pub fn retain_scope(&mut self, scope: &str) {
        let scope = scope.trim_end_matches('/');
        if scope.is_empty() {
            return;
        }

        self.files.retain(|path, _| in_scope(path, scope));
    }
}

#[inline]
fn in_scope(path: &str, scope: &str) -> bool {
    path == scope
        || path
            .strip_prefix(scope)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Any proper ancestor directory of `path` is in `dirs`.
fn under_any(path: &str, dirs: &HashSet<&str>) -> bool {
    path.match_indices('/')
        .any(|(idx, _)| dirs.contains(&path[..idx]))
}

/// Build the tracked set from a walk.
///
/// A non-directory entry is tracked when the rules exclude it or one of its
/// ancestor directories. Sidecars are never tracked themselves; a sidecar
/// whose file is not otherwise tracked contributes that file, present if it
/// still exists on disk and recorded-only otherwise.
pub fn discover<S: MetadataStore>(
    entries: &[FileEntry],
    rules: &RuleSet,
    store: &S,
) -> Result<TrackedSet> {
    let excluded_dirs: HashSet<&str> = entries
        .iter()
        .filter(|e| e.is_dir && rules.is_excluded(&e.path, true))
        .map(|e| e.path.as_str())
        .collect();

    let files: HashMap<&str, &FileEntry> = entries
        .iter()
        .filter(|e| !e.is_dir)
        .map(|e| (e.path.as_str(), e))
        .collect();

    let mut set = TrackedSet::new();
    let mut sidecars = Vec::new();

    for entry in files.values() {
        if let Some(tracked) = tracked_path_for(&entry.path) {
            sidecars.push(tracked);
            continue;
        }

        if rules.is_excluded(&entry.path, false) || under_any(&entry.path, &excluded_dirs) {
            set.insert(TrackedFile::on_disk((*entry).clone()));
        }
    }

    sidecars.sort_unstable();

    for tracked in sidecars {
        if set.contains(tracked) {
            continue;
        }

        let Some(record) = store.load(tracked)? else {
            continue;
        };

        if record.file_path != tracked {
            warn!(
                "[discover] record for {tracked} names {}; using the sidecar location",
                record.file_path
            );
        }

        match files.get(tracked) {
            Some(entry) => {
                warn!("[discover] {tracked} has a record but no longer matches any rule");
                set.insert(TrackedFile::on_disk((*entry).clone()));
            }
            None => {
                debug!("[discover] {tracked} is recorded but absent");
                set.insert(TrackedFile::recorded(
                    tracked.to_owned(),
                    record.size,
                    record.last_modified,
                ));
            }
        }
    }

    debug!(
        "[discover] {} tracked files from {} entries",
        set.len(),
        entries.len()
    );

    Ok(set)
}

#[cfg(test)]
#[path = "tracked_tests.rs"]
mod tests;
