//! Sequential writer for a temp download file.

use crate::error::{ResourceError, Result};
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Writer for a temp download file. Bytes are appended in arrival order;
/// the file only gets its final name through [`StorageWriter::finalize`].
pub struct StorageWriter {
    file: File,
    temp_path: PathBuf,
    written: u64,
}

impl StorageWriter {
    /// Create a new temp file at `temp_path` (e.g. `downloaded.part`).
    /// Overwrites if the path already exists.
    pub fn create(temp_path: &Path) -> Result<Self> {
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(temp_path)
            .map_err(|e| ResourceError::storage(temp_path, e))?;
        tracing::debug!(path = %temp_path.display(), "created temp file");
        Ok(Self {
            file,
            temp_path: temp_path.to_path_buf(),
            written: 0,
        })
    }

    /// Bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Sync file data to disk. Call before `finalize` for durability.
    pub fn sync(&self) -> Result<()> {
        self.file
            .sync_all()
            .map_err(|e| ResourceError::storage(&self.temp_path, e))
    }

    /// Atomically rename the temp file to the final path. Consumes the writer and closes the file.
    /// Fails if `final_path` is on a different filesystem.
    pub fn finalize(self, final_path: &Path) -> Result<()> {
        let temp_path = self.temp_path;
        drop(self.file);

        std::fs::rename(&temp_path, final_path)
            .map_err(|e| ResourceError::storage(final_path, e))?;
        tracing::debug!(
            from = %temp_path.display(),
            to = %final_path.display(),
            "finalized download"
        );
        Ok(())
    }

    /// Close and remove the temp file. Removal failures are logged, not returned,
    /// since this only runs on paths that are already failing.
    pub fn discard(self) {
        let temp_path = self.temp_path;
        drop(self.file);
        if let Err(e) = std::fs::remove_file(&temp_path) {
            tracing::warn!(path = %temp_path.display(), "failed to remove temp file: {}", e);
        }
    }
}

impl Write for StorageWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.file.write(buf)?;
        self.written += n as u64;
        Ok(n)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}
