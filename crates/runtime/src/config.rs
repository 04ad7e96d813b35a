pub const PROGRAM_LOG_LEVEL: &str = "GLFLITE_LOG_LEVEL";

/// Extension appended to a tracked path to locate its metadata sidecar.
pub const SIDECAR_EXTENSION: &str = "glflite";

/// Marker line that opens the tracked-rules section of the ignore file.
pub const RULES_MARKER: &str = "#GitLFSLite";

pub const IGNORE_FILE_NAME: &str = ".gitignore";
pub const SETUP_FILE_NAME: &str = ".glflite";
pub const VCS_DIR_NAME: &str = ".git";

/// rsync `--files-from` list with every tracked path.
pub const RSYNC_LIST_NAME: &str = "rsync_list_glflite";
/// rsync list restricted to tracked files present in this working tree.
pub const RSYNC_LOCAL_LIST_NAME: &str = "rsync_list_glflite_local";
/// `sha256sum -c` compatible manifest.
pub const HASH_LIST_NAME: &str = "sha256_list_glflite";

/// Read size used when hashing file contents.
pub const HASH_CHUNK_SIZE: usize = 32 * 1024;

/// Content written when `init` creates the ignore file from scratch.
pub const DEFAULT_IGNORE_CONTENT: &str = "\nrsync_list_glflite_local\n#GitLFSLite\n";

/// Root-relative entries the walker never reports.
pub const WALK_SKIP_NAMES: &[&str] = &[VCS_DIR_NAME, IGNORE_FILE_NAME, SETUP_FILE_NAME];

/// Path of the sidecar for a root-relative tracked path.
#[inline]
pub fn sidecar_path_for(tracked: &str) -> String {
    format!("{tracked}.{SIDECAR_EXTENSION}")
}

/// Inverse of [`sidecar_path_for`]; `None` when `path` is not a sidecar.
#[inline]
pub fn tracked_path_for(path: &str) -> Option<&str> {
    path.strip_suffix(SIDECAR_EXTENSION)
        .and_then(|p| p.strip_suffix('.'))
        .filter(|p| !p.is_empty() && !p.ends_with('/'))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
