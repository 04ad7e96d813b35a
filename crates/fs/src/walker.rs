use std::{
    fs::{self, read_dir},
    io,
    path::{Component, Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    thread,
    time::Duration,
};

use crossbeam::channel::{self, RecvTimeoutError, Sender};
use glflite_runtime::config::WALK_SKIP_NAMES;
use log::{debug, warn};

use crate::{
    config::{BATCH_SIZE, IDLE_POLL_MS},
    entry::{FileEntry, to_utc},
};

pub struct ScanContext {
    /// Canonical repository root; every reported path is relative to it.
    pub root: PathBuf,
    /// Names skipped when they appear directly under the root.
    pub skip_root_names: Vec<String>,
    errors: Mutex<Vec<io::Error>>,
}

impl ScanContext {
    pub fn new(root: PathBuf) -> Self {
        ScanContext {
            root,
            skip_root_names: WALK_SKIP_NAMES.iter().map(|s| (*s).to_owned()).collect(),
            errors: Mutex::new(Vec::new()),
        }
    }

    fn record_error(&self, err: io::Error) {
        if let Ok(mut errors) = self.errors.lock() {
            errors.push(err);
        }
    }

    fn take_first_error(&self) -> Option<io::Error> {
        self.errors
            .lock()
            .ok()
            .and_then(|mut errors| (!errors.is_empty()).then(|| errors.swap_remove(0)))
    }
}

/// Multi-threaded walk of `ctx.root` using crossbeam work queues.
///
/// Directories are fanned out across `num_threads` workers and entries are
/// sent in batches. Any directory or entry that cannot be read fails the walk
/// once all workers have stopped.
pub fn walk_parallel(
    file_tx: Sender<Vec<FileEntry>>,
    ctx: Arc<ScanContext>,
    num_threads: usize,
) -> io::Result<()> {
    let (work_tx, work_rx) = channel::unbounded::<PathBuf>();

    // Track pending work items to know when to terminate
    let pending = Arc::new(AtomicUsize::new(1));
    let _ = work_tx.send(ctx.root.clone());

    debug!("[walk_parallel] starting with {} threads", num_threads);

    thread::scope(|s| {
        for _ in 0..num_threads.max(1) {
            let work_rx = work_rx.clone();
            let work_tx = work_tx.clone();
            let file_tx = file_tx.clone();
            let ctx = Arc::clone(&ctx);
            let pending = Arc::clone(&pending);

            s.spawn(move || {
                worker_loop(work_rx, work_tx, file_tx, &ctx, &pending);
            });
        }
    });

    match ctx.take_first_error() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

/// Walk `root` and return every entry sorted by relative path.
pub fn collect_entries(root: &Path) -> io::Result<Vec<FileEntry>> {
    let root = root.canonicalize()?;
    let ctx = Arc::new(ScanContext::new(root));
    let (file_tx, file_rx) = channel::unbounded::<Vec<FileEntry>>();

    let num_threads = thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4);

    let walker = {
        let ctx = Arc::clone(&ctx);
        thread::spawn(move || walk_parallel(file_tx, ctx, num_threads))
    };

    let mut entries = Vec::new();
    while let Ok(batch) = file_rx.recv() {
        entries.extend(batch);
    }

    walker
        .join()
        .map_err(|_| io::Error::other("filesystem walker thread panicked"))??;

    entries.sort_unstable_by(|a, b| a.path.cmp(&b.path));
    debug!("[walk] collected {} entries", entries.len());

    Ok(entries)
}

/// Each worker processes directories from the work queue and sends batched entries.
fn worker_loop(
    work_rx: channel::Receiver<PathBuf>,
    work_tx: channel::Sender<PathBuf>,
    file_tx: Sender<Vec<FileEntry>>,
    ctx: &ScanContext,
    pending: &AtomicUsize,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);

    loop {
        match work_rx.recv_timeout(Duration::from_millis(IDLE_POLL_MS)) {
            Ok(dir) => {
                if let Err(e) = scan_dir(&dir, &work_tx, &mut batch, ctx, pending) {
                    ctx.record_error(io::Error::new(
                        e.kind(),
                        format!("reading {}: {e}", dir.display()),
                    ));
                }

                if batch.len() >= BATCH_SIZE {
                    let to_send = std::mem::take(&mut batch);
                    if file_tx.send(to_send).is_err() {
                        return;
                    }
                }

                if pending.fetch_sub(1, Ordering::AcqRel) == 1 {
                    break;
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                if pending.load(Ordering::Acquire) == 0 {
                    break;
                }
            }
            Err(RecvTimeoutError::Disconnected) => {
                break;
            }
        }
    }

    if !batch.is_empty() {
        let _ = file_tx.send(batch);
    }
}

/// Push subdirectories to the work queue and collect entries into `batch`.
fn scan_dir(
    dir: &Path,
    work_tx: &channel::Sender<PathBuf>,
    batch: &mut Vec<FileEntry>,
    ctx: &ScanContext,
    pending: &AtomicUsize,
) -> io::Result<()> {
    let at_root = dir == ctx.root;

    for entry_res in read_dir(dir)? {
        let entry = entry_res?;

        if at_root
            && let Some(name) = entry.file_name().to_str()
            && ctx.skip_root_names.iter().any(|skip| skip == name)
        {
            continue;
        }

        if let Some(found) = inspect_fs_entry(&entry, &ctx.root)? {
            if found.is_dir && !found.is_symlink {
                pending.fetch_add(1, Ordering::AcqRel);
                let _ = work_tx.send(entry.path());
            }
            batch.push(found);
        }
    }

    Ok(())
}

/// Symlinks are described by their target so that size and mtime cover the
/// same bytes the hasher reads. A dangling link is left out of the walk.
fn inspect_fs_entry(entry: &fs::DirEntry, root: &Path) -> io::Result<Option<FileEntry>> {
    // DirEntry::metadata does not follow symlinks.
    let own = entry.metadata()?;
    let full_path = entry.path();

    let Some(path) = relative_key(root, &full_path) else {
        debug!("[walk] skipping non UTF-8 path {:?}", full_path);
        return Ok(None);
    };

    let is_symlink = own.is_symlink();
    let metadata = if is_symlink {
        match fs::metadata(&full_path) {
            Ok(target) => target,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!("[walk] {path} is a broken symlink; treating it as absent");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }
    } else {
        own
    };

    let is_dir = metadata.is_dir();
    let size = if is_dir { 0 } else { metadata.len() };
    let modified = to_utc(metadata.modified(), &path);

    Ok(Some(FileEntry {
        path,
        is_dir,
        is_symlink,
        size,
        modified,
    }))
}

/// Root-relative, `/`-joined key for `full`.
fn relative_key(root: &Path, full: &Path) -> Option<String> {
    let rel = full.strip_prefix(root).ok()?;
    let mut parts = Vec::new();

    for comp in rel.components() {
        match comp {
            Component::Normal(os) => parts.push(os.to_str()?),
            _ => return None,
        }
    }

    (!parts.is_empty()).then(|| parts.join("/"))
}

#[cfg(test)]
#[path = "walker_tests.rs"]
mod tests;
