use crate::release_tracking::domain::{Snapshot, SnapshotStatus};
use std::collections::BTreeMap;

/// Which snapshot a test run targets
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SnapshotSelector {
    /// The pending snapshot, if any
    #[default]
    Pending,
    /// By `metadata.generated_at`
    Id(String),
    /// By log position, 0 being the newest
    Index(usize),
}

#[derive(Debug, Clone, Default)]
pub struct TestRunRequest {
    pub selector: SnapshotSelector,
    pub dry_run: bool,
}

impl TestRunRequest {
    pub fn new(selector: SnapshotSelector, dry_run: bool) -> Self {
        Self { selector, dry_run }
    }
}

/// TestRunOutcome - result of one test trigger invocation
#[derive(Debug, Clone)]
pub enum TestRunOutcome {
    /// Nothing to do: no snapshot is pending
    NoPendingSnapshot,
    /// The action was not run and the log was not touched
    DryRun {
        snapshot_id: String,
        command: String,
        variables: BTreeMap<String, String>,
    },
    /// The action ran and the snapshot now carries its terminal status
    Completed { snapshot: Snapshot },
}

impl TestRunOutcome {
    /// The recorded status, for completed runs
    pub fn status(&self) -> Option<SnapshotStatus> {
        match self {
            TestRunOutcome::Completed { snapshot } => Some(snapshot.status()),
            _ => None,
        }
    }
}
