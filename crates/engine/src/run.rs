use std::{
    io,
    path::{Path, PathBuf},
};

use glflite_fs::{RuleSet, collect_entries, load_rules};
use glflite_runtime::IGNORE_FILE_NAME;
use log::{info, warn};

use crate::{
    dupes::{DuplicateGroup, find_duplicates},
    error::{Error, Result},
    export::{Manifests, write_manifests},
    reconcile::{CheckMode, CheckReport, Engine, UpdateReport},
    store::SidecarStore,
    tracked::{TrackedSet, discover},
};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Repository root (the directory holding `.git`)
    pub root: PathBuf,
    pub mode: CheckMode,
    /// Root-relative path limiting the run to itself and what lies below it
    pub scope: Option<String>,
}

impl RunOptions {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RunOptions {
            root: root.into(),
            mode: CheckMode::Fast,
            scope: None,
        }
    }
}

#[derive(Debug)]
pub struct CheckRun {
    pub report: CheckReport,
    pub duplicates: Vec<DuplicateGroup>,
    /// `None` when a scope was active
    pub manifests: Option<Manifests>,
}

#[derive(Debug)]
pub struct UpdateRun {
    pub report: UpdateReport,
    pub duplicates: Vec<DuplicateGroup>,
    pub manifests: Option<Manifests>,
}

/// Tracked rules of the repository at `root`.
pub fn load_repo_rules(root: &Path) -> Result<RuleSet> {
    let ignore_file = root.join(IGNORE_FILE_NAME);

    match load_rules(&ignore_file) {
        Ok(Some(rules)) => Ok(rules),
        Ok(None) => {
            warn!(
                "[rules] {} has no #GitLFSLite section; nothing is tracked",
                ignore_file.display()
            );
            Ok(RuleSet::default())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(Error::configuration(format!(
            "the file {} doesn't exist; run `glflite init` to create it",
            ignore_file.display()
        ))),
        Err(e) => Err(Error::configuration(format!(
            "cannot read {}: {e}",
            ignore_file.display()
        ))),
    }
}

/// Rules, walk and discovery: everything that happens before reconciliation.
fn prepare(opts: &RunOptions, store: &SidecarStore) -> Result<TrackedSet> {
    let rules = load_repo_rules(&opts.root)?;
    let entries = collect_entries(&opts.root).map_err(|e| Error::io(opts.root.clone(), e))?;

    let mut set = discover(&entries, &rules, store)?;
    if let Some(scope) = &opts.scope {
        set.retain_scope(scope);
        info!("[run] scope {scope}: {} tracked files", set.len());
    }

    Ok(set)
}

fn finish(
    opts: &RunOptions,
    set: &TrackedSet,
) -> Result<(Vec<DuplicateGroup>, Option<Manifests>)> {
    let duplicates = find_duplicates(set.hashed());

    let manifests = match opts.scope {
        Some(_) => None,
        None => Some(write_manifests(&opts.root, set)?),
    };

    Ok((duplicates, manifests))
}

pub fn run_check(opts: &RunOptions) -> Result<CheckRun> {
    let store = SidecarStore::new(&opts.root);
    let mut set = prepare(opts, &store)?;

    let engine = Engine::new(&opts.root, store, opts.mode);
    let report = engine.check(&mut set)?;
    let (duplicates, manifests) = finish(opts, &set)?;

    Ok(CheckRun {
        report,
        duplicates,
        manifests,
    })
}

pub fn run_update(opts: &RunOptions) -> Result<UpdateRun> {
    let store = SidecarStore::new(&opts.root);
    let mut set = prepare(opts, &store)?;

    let engine = Engine::new(&opts.root, store, opts.mode);
    let report = engine.update(&mut set)?;
    let (duplicates, manifests) = finish(opts, &set)?;

    Ok(UpdateRun {
        report,
        duplicates,
        manifests,
    })
}

#[cfg(test)]
#[path = "run_tests.rs"]
mod tests;
