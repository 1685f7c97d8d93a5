use crate::release_tracking::domain::VersionRecord;

#[derive(Debug, Clone)]
pub struct TagRequest {
    pub versions: Vec<VersionRecord>,
    /// Reconcile only this version name
    pub only: Option<String>,
    /// Report missing tags without creating them
    pub dry_run: bool,
}

/// ReconcileReport - per-version outcome of tag reconciliation
///
/// Repositories are base repositories (`org/repo`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub version: String,
    /// Tag already existed
    pub ensured: Vec<String>,
    /// Tag was created by this run
    pub created: Vec<String>,
    /// Tag is missing; dry runs only
    pub would_create: Vec<String>,
    /// Repository and error message
    pub failed: Vec<(String, String)>,
}

impl ReconcileReport {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            ..Self::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}
