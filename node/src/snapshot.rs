//! Snapshot files on disk.
//!
//! Writes go to a sibling temporary file first and are renamed into place,
//! so a crash mid-write never leaves a truncated snapshot behind.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::NodeError;

/// Atomically replace the snapshot at `path` with `bytes`.
pub fn write_snapshot(path: &Path, bytes: &[u8]) -> Result<(), NodeError> {
    let tmp = temp_path(path);
    {
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
    }
    fs::rename(&tmp, path)?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "snapshot written");
    Ok(())
}

/// `path` with `.tmp` appended, so the temporary file never aliases the target.
fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

/// Read the snapshot at `path`; `None` when no snapshot exists yet.
pub fn read_snapshot(path: &Path) -> Result<Option<Vec<u8>>, NodeError> {
    match fs::read(path) {
        Ok(bytes) => Ok(Some(bytes)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
