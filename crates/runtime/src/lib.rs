pub mod config;
pub mod logging;
mod repo;

pub use config::{
    HASH_CHUNK_SIZE, HASH_LIST_NAME, IGNORE_FILE_NAME, RSYNC_LIST_NAME, RSYNC_LOCAL_LIST_NAME,
    RULES_MARKER, SIDECAR_EXTENSION, sidecar_path_for, tracked_path_for,
};
pub use repo::{current_repo_root, find_repo_root};
