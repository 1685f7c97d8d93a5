use crate::release_tracking::domain::SnapshotLog;
use crate::shared::Result;
use std::path::Path;

/// SnapshotRepository port for the persisted snapshot log
///
/// Every mutation is a full read-modify-write of the log; `save` must
/// replace the file atomically so a concurrent reader never sees a
/// partial write.
pub trait SnapshotRepository {
    /// Reads and normalises the log at `path`.
    ///
    /// # Errors
    /// - `TrackerError::SnapshotLogNotFound` when the file does not exist
    /// - `TrackerError::SnapshotLogParseError` when it cannot be parsed or lacks `snapshots`
    fn load(&self, path: &Path) -> Result<SnapshotLog>;

    /// Writes the whole log to `path`
    fn save(&self, path: &Path, log: &SnapshotLog) -> Result<()>;
}
