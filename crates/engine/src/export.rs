use std::path::{Path, PathBuf};

use glflite_runtime::{HASH_LIST_NAME, RSYNC_LIST_NAME, RSYNC_LOCAL_LIST_NAME};
use log::debug;

use crate::{
    error::{Error, Result},
    persist::write_atomic,
    tracked::TrackedSet,
};

/// `./<path>` per line for rsync `--files-from`; `local_only` keeps present files.
pub fn rsync_list(set: &TrackedSet, local_only: bool) -> String {
    let mut out = String::new();
    for file in set.iter().filter(|f| !local_only || f.is_present()) {
        out.push_str("./");
        out.push_str(&file.path);
        out.push('\n');
    }
    out
}

/// `<hash>  ./<path>` per hashed file, sorted by line text, no trailing newline.
pub fn hash_list(set: &TrackedSet) -> String {
    let mut lines: Vec<String> = set
        .hashed()
        .map(|(path, hash)| format!("{hash}  ./{path}"))
        .collect();
    lines.sort_unstable();
    lines.join("\n")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifests {
    pub rsync: PathBuf,
    pub rsync_local: PathBuf,
    pub hashes: PathBuf,
}

impl Manifests {
    pub fn under(root: &Path) -> Self {
        Manifests {
            rsync: root.join(RSYNC_LIST_NAME),
            rsync_local: root.join(RSYNC_LOCAL_LIST_NAME),
            hashes: root.join(HASH_LIST_NAME),
        }
    }
}

/// Write the three manifests at `root`.
pub fn write_manifests(root: &Path, set: &TrackedSet) -> Result<Manifests> {
    let manifests = Manifests::under(root);

    let outputs = [
        (&manifests.rsync_local, rsync_list(set, true)),
        (&manifests.rsync, rsync_list(set, false)),
        (&manifests.hashes, hash_list(set)),
    ];

    for (path, content) in outputs {
        debug!("[export] writing {}", path.display());
        write_atomic(path, content.as_bytes()).map_err(|e| Error::io(path.clone(), e))?;
    }

    Ok(manifests)
}

#[cfg(test)]
#[path = "export_tests.rs"]
mod tests;
