mod dupes;
mod error;
mod export;
mod hasher;
mod persist;
mod reconcile;
mod record;
mod run;
mod store;
mod tracked;

#[cfg(test)]
mod testing;

pub use dupes::{DuplicateGroup, find_duplicates};
pub use error::{Error, Result};
pub use export::{Manifests, hash_list, rsync_list, write_manifests};
pub use hasher::{hash_file, hash_reader};
pub use reconcile::{
    CheckMode, CheckReport, Classification, Engine, FileOutcome, StaleReason, Status,
    StatusCounts, UpdateAction, UpdateCounts, UpdateReport,
};
pub use record::MetadataRecord;
pub use run::{CheckRun, RunOptions, UpdateRun, load_repo_rules, run_check, run_update};
pub use store::{MetadataStore, SidecarStore};
pub use tracked::{Presence, TrackedFile, TrackedSet, discover};
