use std::path::PathBuf;

use chrono::{DateTime, FixedOffset, Local};
use glflite_fs::FileEntry;
use log::{debug, info};

use crate::{
    error::Result,
    hasher::hash_file,
    record::MetadataRecord,
    store::MetadataStore,
    tracked::{TrackedFile, TrackedSet},
};

/// How staleness is decided for files present on disk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CheckMode {
    /// Whole-second mtime and size against the record. Never reads content,
    /// so a rewrite that keeps both is invisible.
    #[default]
    Fast,
    /// Live content hash against the recorded hash.
    Thorough,
}

impl CheckMode {
    #[inline]
    pub fn from_force(force: bool) -> Self {
        if force {
            CheckMode::Thorough
        } else {
            CheckMode::Fast
        }
    }
}

/// Why a present file disagrees with its record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StaleReason {
    Modified { recorded: i64, actual: i64 },
    Size { recorded: u64, actual: u64 },
    Content { recorded: String, actual: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    /// Tracked but not on disk; its record, if any, is left untouched.
    Missing,
    /// On disk but never given a record.
    Unlinked,
    UpToDate,
    /// Always carries at least one reason.
    Stale(Vec<StaleReason>),
}

impl Status {
    #[inline]
    pub fn is_problem(&self) -> bool {
        !matches!(self, Status::UpToDate)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileOutcome<T> {
    pub path: String,
    pub outcome: T,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub missing: usize,
    pub unlinked: usize,
    pub up_to_date: usize,
    pub stale: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub mode: CheckMode,
    pub files: Vec<FileOutcome<Status>>,
}

impl CheckReport {
    pub fn counts(&self) -> StatusCounts {
        let mut c = StatusCounts::default();
        for f in &self.files {
            match f.outcome {
                Status::Missing => c.missing += 1,
                Status::Unlinked => c.unlinked += 1,
                Status::UpToDate => c.up_to_date += 1,
                Status::Stale(_) => c.stale += 1,
            }
        }
        c
    }

    pub fn has_problems(&self) -> bool {
        self.files.iter().any(|f| f.outcome.is_problem())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateAction {
    /// A first record was written.
    Created,
    /// The record was rewritten to match the file.
    Refreshed,
    Unchanged,
    /// Not on disk, so there is nothing to record.
    SkippedMissing,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounts {
    pub created: usize,
    pub refreshed: usize,
    pub unchanged: usize,
    pub skipped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateReport {
    pub files: Vec<FileOutcome<UpdateAction>>,
}

impl UpdateReport {
    pub fn counts(&self) -> UpdateCounts {
        let mut c = UpdateCounts::default();
        for f in &self.files {
            match f.outcome {
                UpdateAction::Created => c.created += 1,
                UpdateAction::Refreshed => c.refreshed += 1,
                UpdateAction::Unchanged => c.unchanged += 1,
                UpdateAction::SkippedMissing => c.skipped += 1,
            }
        }
        c
    }

    /// Number of records written.
    pub fn writes(&self) -> usize {
        let c = self.counts();
        c.created + c.refreshed
    }
}

/// Result of classifying one file; `live_hash` is set when content was read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub status: Status,
    pub live_hash: Option<String>,
}

/// Fast-path reasons: both mismatches are reported, the file is stale once.
fn fast_path_reasons(record: &MetadataRecord, entry: &FileEntry) -> Vec<StaleReason> {
    let mut reasons = Vec::new();

    if record.modified_secs() != entry.modified_secs() {
        reasons.push(StaleReason::Modified {
            recorded: record.modified_secs(),
            actual: entry.modified_secs(),
        });
    }

    if record.size != entry.size {
        reasons.push(StaleReason::Size {
            recorded: record.size,
            actual: entry.size,
        });
    }

    reasons
}

/// Compares tracked files against their records and, in update mode,
/// rewrites records. Owns nothing but the store and settings; the tracked
/// set is passed into each phase.
pub struct Engine<S> {
    root: PathBuf,
    store: S,
    mode: CheckMode,
}

impl<S: MetadataStore> Engine<S> {
    pub fn new(root: impl Into<PathBuf>, store: S, mode: CheckMode) -> Self {
        Engine {
            root: root.into(),
            store,
            mode,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn hash(&self, path: &str) -> Result<String> {
        debug!("[engine] hashing {path}");
        hash_file(&self.root.join(path))
    }

    /// Classify one file against its record (`None` when never recorded).
    pub fn classify(
        &self,
        file: &TrackedFile,
        record: Option<&MetadataRecord>,
    ) -> Result<Classification> {
        let Some(entry) = file.entry() else {
            return Ok(Classification {
                status: Status::Missing,
                live_hash: None,
            });
        };

        let Some(record) = record else {
            return Ok(Classification {
                status: Status::Unlinked,
                live_hash: None,
            });
        };

        match self.mode {
            CheckMode::Fast => {
                let reasons = fast_path_reasons(record, entry);
                let status = if reasons.is_empty() {
                    Status::UpToDate
                } else {
                    Status::Stale(reasons)
                };
                Ok(Classification {
                    status,
                    live_hash: None,
                })
            }
            CheckMode::Thorough => {
                let live = self.hash(&file.path)?;
                let status = if live == record.sha256sum {
                    Status::UpToDate
                } else {
                    Status::Stale(vec![StaleReason::Content {
                        recorded: record.sha256sum.clone(),
                        actual: live.clone(),
                    }])
                };
                Ok(Classification {
                    status,
                    live_hash: Some(live),
                })
            }
        }
    }

    /// Read-only reconciliation of every file in `set`.
    ///
    /// Each file's hash is set to the live hash when one was computed, and to
    /// the recorded hash otherwise.
    pub fn check(&self, set: &mut TrackedSet) -> Result<CheckReport> {
        let mut report = CheckReport {
            mode: self.mode,
            files: Vec::with_capacity(set.len()),
        };

        for file in set.iter_mut() {
            let record = self.store.load(&file.path)?;
            let Classification { status, live_hash } = self.classify(file, record.as_ref())?;

            file.hash = live_hash.or_else(|| record.map(|r| r.sha256sum));

            debug!("[check] {}: {:?}", file.path, status);
            report.files.push(FileOutcome {
                path: file.path.clone(),
                outcome: status,
            });
        }

        Ok(report)
    }

    /// Bring every present file's record in line with the file.
    ///
    /// One write per changed file; the first I/O failure aborts the run.
    pub fn update(&self, set: &mut TrackedSet) -> Result<UpdateReport> {
        self.update_at(set, Local::now().fixed_offset())
    }

    /// [`Engine::update`] with an explicit timestamp for new records.
    pub fn update_at(
        &self,
        set: &mut TrackedSet,
        now: DateTime<FixedOffset>,
    ) -> Result<UpdateReport> {
        let mut report = UpdateReport {
            files: Vec::with_capacity(set.len()),
        };

        for file in set.iter_mut() {
            let record = self.store.load(&file.path)?;
            let action = self.update_one(file, record, now)?;

            report.files.push(FileOutcome {
                path: file.path.clone(),
                outcome: action,
            });
        }

        let counts = report.counts();
        info!(
            "[update] created {}, refreshed {}, unchanged {}, skipped {}",
            counts.created, counts.refreshed, counts.unchanged, counts.skipped
        );

        Ok(report)
    }

    fn update_one(
        &self,
        file: &mut TrackedFile,
        record: Option<MetadataRecord>,
        now: DateTime<FixedOffset>,
    ) -> Result<UpdateAction> {
        let Some(entry) = file.entry() else {
            file.hash = record.map(|r| r.sha256sum);
            return Ok(UpdateAction::SkippedMissing);
        };

        let (next, action) = match record {
            None => {
                let hash = self.hash(&file.path)?;
                info!("[update] creating record for {}", file.path);
                (MetadataRecord::new(entry, hash, now), UpdateAction::Created)
            }
            Some(current) if current.matches_entry(entry) => {
                if self.mode == CheckMode::Fast {
                    file.hash = Some(current.sha256sum);
                    return Ok(UpdateAction::Unchanged);
                }

                let hash = self.hash(&file.path)?;
                if hash == current.sha256sum {
                    file.hash = Some(hash);
                    return Ok(UpdateAction::Unchanged);
                }

                info!("[update] content of {} changed in place", file.path);
                (current.refreshed(entry, hash), UpdateAction::Refreshed)
            }
            Some(current) => {
                let hash = self.hash(&file.path)?;
                info!("[update] refreshing record for {}", file.path);
                (current.refreshed(entry, hash), UpdateAction::Refreshed)
            }
        };

        self.store.save(&file.path, &next)?;
        file.hash = Some(next.sha256sum);

        Ok(action)
    }
}

#[cfg(test)]
#[path = "reconcile_tests.rs"]
mod tests;
