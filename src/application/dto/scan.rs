use crate::application::services::SaveOutcome;
use crate::release_tracking::domain::{Component, RepositoryConfig};

/// ScanRequest - which repositories to resolve in one scan
#[derive(Debug, Clone)]
pub struct ScanRequest {
    pub repositories: Vec<RepositoryConfig>,
}

impl ScanRequest {
    pub fn new(repositories: Vec<RepositoryConfig>) -> Self {
        Self { repositories }
    }
}

/// ScanResponse - resolved components and what happened to the log
#[derive(Debug, Clone)]
pub struct ScanResponse {
    /// Sorted by (repository, name)
    pub components: Vec<Component>,
    pub outcome: SaveOutcome,
    /// Labels of targets that resolved to nothing or failed
    pub unresolved: Vec<String>,
}
