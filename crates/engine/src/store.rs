use std::{fs, path::PathBuf};

use glflite_runtime::sidecar_path_for;
use log::debug;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::{
    error::{Error, Result},
    persist::write_atomic,
    record::MetadataRecord,
};

/// Persistence for one [`MetadataRecord`] per tracked path.
///
/// Records are independent: nothing is transactional across paths.
pub trait MetadataStore {
    /// `Ok(None)` when the path has never been given a record.
    fn load(&self, tracked: &str) -> Result<Option<MetadataRecord>>;

    /// Replace the whole record for `tracked`.
    fn save(&self, tracked: &str, record: &MetadataRecord) -> Result<()>;
}

/// JSON sidecar next to each tracked file: `<path>.glflite`.
#[derive(Debug, Clone)]
pub struct SidecarStore {
    root: PathBuf,
}

impl SidecarStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        SidecarStore { root: root.into() }
    }

    pub fn sidecar_path(&self, tracked: &str) -> PathBuf {
        self.root.join(sidecar_path_for(tracked))
    }
}

/// Tab-indented JSON, matching the sidecars already found in repositories.
fn encode(record: &MetadataRecord) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut ser)?;
    Ok(buf)
}

impl MetadataStore for SidecarStore {
    fn load(&self, tracked: &str) -> Result<Option<MetadataRecord>> {
        let path = self.sidecar_path(tracked);

        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(Error::Io { path, source }),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| Error::MalformedRecord { path, source })
    }

    fn save(&self, tracked: &str, record: &MetadataRecord) -> Result<()> {
        let path = self.sidecar_path(tracked);
        let bytes = encode(record).map_err(|e| Error::Io {
            path: path.clone(),
            source: e.into(),
        })?;

        debug!("[store] writing {}", path.display());
        write_atomic(&path, &bytes).map_err(|source| Error::Io { path, source })
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;
