//! Fixtures shared by the unit tests of this crate.

use std::{cell::RefCell, collections::BTreeMap};

use chrono::{DateTime, Utc};
use glflite_fs::FileEntry;

use crate::{error::Result, record::MetadataRecord, store::MetadataStore};

pub fn file(path: &str, size: u64, secs: i64) -> FileEntry {
    FileEntry {
        path: path.to_owned(),
        is_dir: false,
        is_symlink: false,
        size,
        modified: DateTime::<Utc>::from_timestamp(secs, 0).expect("valid timestamp"),
    }
}

pub fn dir(path: &str) -> FileEntry {
    FileEntry {
        path: path.to_owned(),
        is_dir: true,
        is_symlink: false,
        size: 0,
        modified: DateTime::<Utc>::UNIX_EPOCH,
    }
}

/// In-memory store counting writes.
#[derive(Default)]
pub struct MemoryStore {
    records: RefCell<BTreeMap<String, MetadataRecord>>,
    saves: RefCell<usize>,
}

impl MemoryStore {
    pub fn with(records: impl IntoIterator<Item = MetadataRecord>) -> Self {
        let store = MemoryStore::default();
        for r in records {
            store.records.borrow_mut().insert(r.file_path.clone(), r);
        }
        store
    }

    pub fn saves(&self) -> usize {
        *self.saves.borrow()
    }

    pub fn get(&self, path: &str) -> Option<MetadataRecord> {
        self.records.borrow().get(path).cloned()
    }
}

impl MetadataStore for MemoryStore {
    fn load(&self, tracked: &str) -> Result<Option<MetadataRecord>> {
        Ok(self.get(tracked))
    }

    fn save(&self, tracked: &str, record: &MetadataRecord) -> Result<()> {
        *self.saves.borrow_mut() += 1;
        self.records
            .borrow_mut()
            .insert(tracked.to_owned(), record.clone());
        Ok(())
    }
}
