use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use glflite_runtime::HASH_CHUNK_SIZE;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

/// Stream `reader` through SHA-256 in `chunk_size` reads and return the
/// lowercase hex digest.
pub fn hash_reader<R: Read>(mut reader: R, chunk_size: usize) -> io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = vec![0u8; chunk_size.max(1)];

    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        hasher.update(&buf[..n]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

/// Content digest of the file at `path`.
///
/// A path that does not exist yields [`Error::NotFound`]; any other failure,
/// including the file vanishing mid-read, is [`Error::Io`].
pub fn hash_file(path: &Path) -> Result<String> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;

    hash_reader(file, HASH_CHUNK_SIZE).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
#[path = "hasher_tests.rs"]
mod tests;
