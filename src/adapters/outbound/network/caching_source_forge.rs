use crate::ports::outbound::SourceForge;
use crate::release_tracking::domain::{Commit, Release};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Cache key for commit listings
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
struct CommitsKey {
    repository: String,
    limit: usize,
}

/// CachingSourceForge wraps a SourceForge and caches commit listings in memory.
///
/// A repository that publishes several images is resolved by one task per
/// image; they all share one commit listing through this cache. Tasks that
/// ask for the same listing while it is in flight wait for that single fetch.
/// Only successful listings are cached. Tag and release calls pass through.
///
/// Create one per scan so listings never outlive the run.
pub struct CachingSourceForge<S: SourceForge> {
    inner: S,
    commits: Arc<DashMap<CommitsKey, Arc<OnceCell<Vec<Commit>>>>>,
}

impl<S: SourceForge> CachingSourceForge<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            commits: Arc::new(DashMap::new()),
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    #[cfg(test)]
    pub fn cache_size(&self) -> usize {
        self.commits
            .iter()
            .filter(|entry| entry.value().initialized())
            .count()
    }
}

#[async_trait]
impl<S: SourceForge> SourceForge for CachingSourceForge<S> {
    async fn list_releases(&self, repository: &str, limit: usize) -> Result<Vec<Release>> {
        self.inner.list_releases(repository, limit).await
    }

    async fn list_commits(&self, repository: &str, limit: usize) -> Result<Vec<Commit>> {
        let key = CommitsKey {
            repository: repository.to_string(),
            limit,
        };

        // The map guard must be released before awaiting.
        let cell = Arc::clone(self.commits.entry(key).or_default().value());

        let commits = cell
            .get_or_try_init(|| self.inner.list_commits(repository, limit))
            .await?;
        Ok(commits.clone())
    }

    async fn get_tag_ref(&self, repository: &str, tag: &str) -> Result<String> {
        self.inner.get_tag_ref(repository, tag).await
    }

    async fn create_tag_object(
        &self,
        repository: &str,
        tag: &str,
        message: &str,
        sha: &str,
    ) -> Result<String> {
        self.inner
            .create_tag_object(repository, tag, message, sha)
            .await
    }

    async fn create_ref(&self, repository: &str, ref_name: &str, sha: &str) -> Result<()> {
        self.inner.create_ref(repository, ref_name, sha).await
    }
}
