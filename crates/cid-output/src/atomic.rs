//! Temp-file-then-persist writes.

use std::fs;
use std::io::{BufWriter, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::{OutputError, Result};

/// Writes `path` through a temp file in the same directory.
///
/// `fill` receives a buffered writer. The target only appears once `fill`
/// succeeded and the data is synced; on any error the temp file is removed.
pub(crate) fn write_atomically<F>(path: &Path, fill: F) -> Result<()>
where
    F: FnOnce(&mut dyn Write) -> Result<()>,
{
    let dir = path
        .parent()
        .filter(|parent| !parent.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    fs::create_dir_all(dir).map_err(|e| OutputError::io("create directory", dir, e))?;

    let mut temp =
        NamedTempFile::new_in(dir).map_err(|e| OutputError::io("create temp file in", dir, e))?;
    {
        let mut writer = BufWriter::new(temp.as_file_mut());
        fill(&mut writer)?;
        writer
            .flush()
            .map_err(|e| OutputError::io("write", path, e))?;
    }
    temp.as_file()
        .sync_all()
        .map_err(|e| OutputError::io("sync", temp.path(), e))?;

    temp.persist(path)
        .map_err(|e| OutputError::AtomicWriteFailed {
            temp_path: e.file.path().to_path_buf(),
            target_path: path.to_path_buf(),
            source: e.error,
        })?;
    Ok(())
}
