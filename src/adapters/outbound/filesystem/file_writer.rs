use crate::shared::error::TrackerError;
use crate::shared::security::validate_not_symlink;
use crate::shared::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// AtomicFileWriter replaces a file's content in one rename
///
/// Content goes to a randomly named temp file in the target directory,
/// is flushed to disk, then renamed over the target. Readers see either
/// the old file or the new one. The temp file is removed on any error
/// path when the `NamedTempFile` drops.
pub struct AtomicFileWriter {
    path: PathBuf,
}

impl AtomicFileWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn parent_directory(&self) -> Result<PathBuf> {
        let parent = match self.path.parent() {
            Some(p) if p != Path::new("") => p.to_path_buf(),
            _ => PathBuf::from("."),
        };

        if !parent.is_dir() {
            return Err(TrackerError::FileWriteError {
                path: self.path.clone(),
                details: format!("Parent directory does not exist: {}", parent.display()),
            }
            .into());
        }
        Ok(parent)
    }

    pub fn write(&self, content: &str) -> Result<()> {
        let parent = self.parent_directory()?;

        // Renaming over a symlink would replace the link, not its target
        if self.path.symlink_metadata().is_ok() {
            validate_not_symlink(&self.path, "write")?;
        }

        let write_error = |details: String| TrackerError::FileWriteError {
            path: self.path.clone(),
            details,
        };

        let mut temp = NamedTempFile::new_in(&parent)
            .map_err(|e| write_error(format!("Failed to create temporary file: {}", e)))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| write_error(e.to_string()))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| write_error(format!("Failed to flush: {}", e)))?;
        temp.persist(&self.path)
            .map_err(|e| write_error(format!("Failed to replace file: {}", e.error)))?;

        Ok(())
    }
}
