use crate::release_tracking::domain::VersionRecord;
use crate::shared::Result;
use std::path::Path;

/// VersionRecordReader port for the curated versions file
pub trait VersionRecordReader {
    /// # Errors
    /// `TrackerError::InvalidVersionsFile` when the file is unreadable or lacks `versions`
    fn read_versions(&self, path: &Path) -> Result<Vec<VersionRecord>>;
}
