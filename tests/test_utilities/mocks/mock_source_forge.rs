use async_trait::async_trait;
use rc_tracker::prelude::*;
use rc_tracker::release_tracking::domain::{Commit, Release};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct ForgeState {
    releases: HashMap<String, Vec<Release>>,
    commits: HashMap<String, Vec<Commit>>,
    /// (repository, tag) -> object the ref points at
    tags: HashMap<(String, String), String>,
    tag_objects: Vec<(String, String, String)>,
    refs: Vec<(String, String)>,
}

/// Mock SourceForge backed by in-memory releases, commits and tags
///
/// Clones share state, so a test can keep a handle after moving one
/// into a use case.
#[derive(Default, Clone)]
pub struct MockSourceForge {
    state: Arc<Mutex<ForgeState>>,
}

impl MockSourceForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the release list of `repository` (newest first)
    pub fn set_releases(&self, repository: &str, releases: Vec<Release>) {
        self.state
            .lock()
            .unwrap()
            .releases
            .insert(repository.to_string(), releases);
    }

    /// Replaces the commit list of `repository` (newest first)
    pub fn set_commits(&self, repository: &str, shas: &[&str]) {
        self.state.lock().unwrap().commits.insert(
            repository.to_string(),
            shas.iter().map(|s| Commit::new(*s)).collect(),
        );
    }

    /// Number of annotated tag objects created so far
    pub fn tag_object_count(&self) -> usize {
        self.state.lock().unwrap().tag_objects.len()
    }

    /// Created refs as (repository, ref name)
    pub fn created_refs(&self) -> Vec<(String, String)> {
        self.state.lock().unwrap().refs.clone()
    }

    pub fn has_tag(&self, repository: &str, tag: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .tags
            .contains_key(&(repository.to_string(), tag.to_string()))
    }
}

#[async_trait]
impl SourceForge for MockSourceForge {
    async fn list_releases(&self, repository: &str, limit: usize) -> Result<Vec<Release>> {
        let state = self.state.lock().unwrap();
        match state.releases.get(repository) {
            Some(releases) => Ok(releases.iter().take(limit).cloned().collect()),
            None => anyhow::bail!("GitHub API returned status code 404 for {}", repository),
        }
    }

    async fn list_commits(&self, repository: &str, limit: usize) -> Result<Vec<Commit>> {
        let state = self.state.lock().unwrap();
        match state.commits.get(repository) {
            Some(commits) => Ok(commits.iter().take(limit).cloned().collect()),
            None => anyhow::bail!("GitHub API returned status code 404 for {}", repository),
        }
    }

    async fn get_tag_ref(&self, repository: &str, tag: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        state
            .tags
            .get(&(repository.to_string(), tag.to_string()))
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("GitHub API returned status code 404"))
    }

    async fn create_tag_object(
        &self,
        repository: &str,
        tag: &str,
        _message: &str,
        sha: &str,
    ) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state
            .tag_objects
            .push((repository.to_string(), tag.to_string(), sha.to_string()));
        Ok(format!("tag-object-{}", state.tag_objects.len()))
    }

    async fn create_ref(&self, repository: &str, ref_name: &str, sha: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        let tag = ref_name.trim_start_matches("refs/tags/").to_string();
        let key = (repository.to_string(), tag);
        if state.tags.contains_key(&key) {
            anyhow::bail!("GitHub API returned status code 422: Reference already exists");
        }
        state.tags.insert(key, sha.to_string());
        state
            .refs
            .push((repository.to_string(), ref_name.to_string()));
        Ok(())
    }
}
