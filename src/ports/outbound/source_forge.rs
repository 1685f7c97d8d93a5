use crate::release_tracking::domain::{Commit, Release};
use crate::shared::Result;
use async_trait::async_trait;

/// SourceForge port for the Git hosting service API
///
/// Covers what release tracking needs: listing releases and commits
/// (newest first) and the tag-ref calls used by tag reconciliation.
///
/// Implementations must be `Send + Sync`; the scanner calls them from
/// many concurrent tasks.
#[async_trait]
pub trait SourceForge: Send + Sync {
    /// Lists up to `limit` releases of `repository`, newest first
    async fn list_releases(&self, repository: &str, limit: usize) -> Result<Vec<Release>>;

    /// Lists up to `limit` commits of the default branch, newest first
    async fn list_commits(&self, repository: &str, limit: usize) -> Result<Vec<Commit>>;

    /// Fetches the ref `refs/tags/<tag>` and returns the SHA it points at.
    ///
    /// # Errors
    /// Any failure, a missing tag included, is an error.
    async fn get_tag_ref(&self, repository: &str, tag: &str) -> Result<String>;

    /// Creates an annotated tag object for commit `sha`; returns the tag object's SHA
    async fn create_tag_object(
        &self,
        repository: &str,
        tag: &str,
        message: &str,
        sha: &str,
    ) -> Result<String>;

    /// Creates the ref `ref_name` (e.g. `refs/tags/v1.0.0`) pointing at `sha`
    async fn create_ref(&self, repository: &str, ref_name: &str, sha: &str) -> Result<()>;
}
