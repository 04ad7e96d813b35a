use std::{
    env, io,
    path::{Path, PathBuf},
};

use log::debug;

use crate::config::VCS_DIR_NAME;

/// Walk up from `start` until a directory holding a `.git` directory is found.
pub fn find_repo_root(start: &Path) -> io::Result<PathBuf> {
    let start = start.canonicalize()?;

    for dir in start.ancestors() {
        if dir.join(VCS_DIR_NAME).is_dir() {
            debug!("[repo] root found at {}", dir.display());
            return Ok(dir.to_path_buf());
        }
    }

    Err(io::Error::new(
        io::ErrorKind::NotFound,
        format!(
            "git folder not found in {} or any of its parent folders",
            start.display()
        ),
    ))
}

/// Repository root for the current working directory.
pub fn current_repo_root() -> io::Result<PathBuf> {
    find_repo_root(&env::current_dir()?)
}

#[cfg(test)]
#[path = "repo_tests.rs"]
mod tests;
