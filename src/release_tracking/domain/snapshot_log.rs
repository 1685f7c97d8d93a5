use super::component::Component;
use super::snapshot::{parse_timestamp, Snapshot, SnapshotStatus};
use crate::shared::error::TrackerError;
use crate::shared::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Result of offering a new component set to the log
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertOutcome {
    /// A new pending snapshot was prepended; carries its id
    Inserted(String),
    /// The newest snapshot already holds the same component set
    Unchanged,
}

/// Ordered snapshot log, newest first.
///
/// Entries are only ever prepended; existing entries keep their position
/// and only their status/tested_at ever change.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SnapshotLog {
    snapshots: Vec<Snapshot>,
}

impl SnapshotLog {
    pub fn new(snapshots: Vec<Snapshot>) -> Self {
        Self { snapshots }
    }

    pub fn snapshots(&self) -> &[Snapshot] {
        &self.snapshots
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    pub fn newest(&self) -> Option<&Snapshot> {
        self.snapshots.first()
    }

    /// Prepends a pending snapshot for `components` unless the newest entry
    /// already has a set-equal component set.
    pub fn insert_if_changed(
        &mut self,
        components: Vec<Component>,
        generated_at: DateTime<Utc>,
    ) -> InsertOutcome {
        if let Some(newest) = self.newest() {
            if newest.has_same_components(&components) {
                return InsertOutcome::Unchanged;
            }
        }

        let snapshot = Snapshot::pending(components, generated_at);
        let id = snapshot.id().to_string();
        self.snapshots.insert(0, snapshot);
        InsertOutcome::Inserted(id)
    }

    pub fn pending_snapshots(&self) -> Vec<&Snapshot> {
        self.snapshots
            .iter()
            .filter(|s| s.status() == SnapshotStatus::Pending)
            .collect()
    }

    /// The pending snapshot with the newest `generated_at`.
    ///
    /// Ties (or unparseable timestamps) fall back to the string value, then to
    /// log position, so the result never depends on anything but file content.
    pub fn find_pending(&self) -> Option<&Snapshot> {
        self.pending_snapshots()
            .into_iter()
            .fold(None, |best: Option<&Snapshot>, candidate| match best {
                Some(current) if compare_generated_at(candidate, current) != Ordering::Greater => {
                    Some(current)
                }
                _ => Some(candidate),
            })
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Snapshot> {
        self.snapshots.iter().find(|s| s.id() == id)
    }

    /// Position 0 is the newest snapshot
    pub fn find_by_index(&self, index: usize) -> Option<&Snapshot> {
        self.snapshots.get(index)
    }

    /// Applies the terminal status carried by `updated` to the stored entry with the same id.
    ///
    /// Only status and tested_at are copied; the stored components are kept.
    pub fn record_transition(&mut self, updated: &Snapshot, now: DateTime<Utc>) -> Result<&Snapshot> {
        let entry = self
            .snapshots
            .iter_mut()
            .find(|s| s.id() == updated.id())
            .ok_or_else(|| TrackerError::SnapshotNotFound {
                id: updated.id().to_string(),
            })?;

        let tested_at = updated
            .tested_at()
            .and_then(parse_timestamp)
            .unwrap_or(now);
        entry.complete(updated.status(), tested_at)?;
        Ok(&*entry)
    }
}

fn compare_generated_at(a: &Snapshot, b: &Snapshot) -> Ordering {
    match (a.generated_at_time(), b.generated_at_time()) {
        (Some(ta), Some(tb)) if ta != tb => ta.cmp(&tb),
        _ => a.id().cmp(b.id()),
    }
}
