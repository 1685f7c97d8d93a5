use crate::ports::outbound::SnapshotRepository;
use crate::release_tracking::domain::{Component, InsertOutcome, Snapshot, SnapshotLog};
use crate::shared::error::TrackerError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Result of saving a scan result
pub type SaveOutcome = InsertOutcome;

/// SnapshotStore - the snapshot log bound to one file
///
/// Every operation reads the whole log; every mutation writes it back in
/// one atomic replace. No locking: two processes mutating the same file
/// concurrently lose one of the writes (last writer wins).
pub struct SnapshotStore<R> {
    repository: R,
    path: PathBuf,
}

impl<R: SnapshotRepository> SnapshotStore<R> {
    pub fn new(repository: R, path: impl Into<PathBuf>) -> Self {
        Self {
            repository,
            path: path.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Strict load: a missing or unparseable log is an error
    pub fn load(&self) -> Result<SnapshotLog> {
        self.repository.load(&self.path)
    }

    /// Tolerant load: a missing log is empty, a broken one is logged and replaced
    pub fn load_or_default(&self) -> SnapshotLog {
        match self.repository.load(&self.path) {
            Ok(log) => log,
            Err(e) => {
                if matches!(
                    e.downcast_ref::<TrackerError>(),
                    Some(TrackerError::SnapshotLogNotFound { .. })
                ) {
                    info!(path = %self.path.display(), "No snapshot log yet; starting a new one");
                } else {
                    warn!(
                        path = %self.path.display(),
                        error = %e,
                        "Snapshot log is unreadable; starting a new log and overwriting it on save"
                    );
                }
                SnapshotLog::default()
            }
        }
    }

    /// The pending snapshot with the newest `generated_at`
    pub fn find_pending(&self) -> Result<Option<Snapshot>> {
        let log = self.load()?;
        let pending = log.pending_snapshots();
        let selected = log.find_pending().cloned();

        if pending.len() > 1 {
            let others: Vec<&str> = pending
                .iter()
                .map(|s| s.id())
                .filter(|id| Some(*id) != selected.as_ref().map(Snapshot::id))
                .collect();
            warn!(
                count = pending.len(),
                selected = selected.as_ref().map(Snapshot::id).unwrap_or_default(),
                others = ?others,
                "Several snapshots are pending; using the newest"
            );
        }

        Ok(selected)
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Snapshot>> {
        Ok(self.load()?.find_by_id(id).cloned())
    }

    /// Position 0 is the newest snapshot
    pub fn find_by_index(&self, index: usize) -> Result<Option<Snapshot>> {
        Ok(self.load()?.find_by_index(index).cloned())
    }

    /// Prepends a pending snapshot unless the newest one holds the same components
    pub fn save_components(&self, components: Vec<Component>) -> Result<SaveOutcome> {
        self.save_components_at(components, Utc::now())
    }

    pub fn save_components_at(
        &self,
        components: Vec<Component>,
        generated_at: DateTime<Utc>,
    ) -> Result<SaveOutcome> {
        let mut log = self.load_or_default();
        let outcome = log.insert_if_changed(components, generated_at);

        match &outcome {
            InsertOutcome::Inserted(id) => {
                self.repository.save(&self.path, &log)?;
                info!(snapshot = %id, path = %self.path.display(), "Recorded new pending snapshot");
            }
            InsertOutcome::Unchanged => {
                info!(path = %self.path.display(), "Components unchanged since the newest snapshot; nothing written");
            }
        }

        Ok(outcome)
    }

    /// Persists the terminal status carried by `snapshot`.
    ///
    /// The stored entry is re-validated: it must exist and still be pending.
    /// Only status and `tested_at` are copied onto it.
    pub fn update(&self, snapshot: &Snapshot) -> Result<Snapshot> {
        if !snapshot.status().is_terminal() {
            return Err(TrackerError::InvalidTransition {
                id: snapshot.id().to_string(),
                from: "pending".to_string(),
                to: snapshot.status().to_string(),
            }
            .into());
        }

        let mut log = self.load()?;
        let stored = log.record_transition(snapshot, Utc::now())?.clone();
        self.repository.save(&self.path, &log)?;

        info!(
            snapshot = stored.id(),
            status = %stored.status(),
            "Recorded test result"
        );
        Ok(stored)
    }
}
