use crate::ports::outbound::{ImageRegistry, SourceForge};
use crate::release_tracking::domain::{Component, ResolutionTarget};
use crate::release_tracking::services::ReleaseSelector;
use crate::shared::Result;
use tracing::{debug, info, warn};

/// Commits inspected by the commit-with-image strategy
pub const DEFAULT_MAX_COMMITS: usize = 20;

/// Releases listed by the release strategy
pub const DEFAULT_MAX_RELEASES: usize = 100;

/// Registry tag published for each built commit
pub fn image_tag_for(sha: &str) -> String {
    format!("latest-{}", sha)
}

/// VersionResolver - resolves one target to its components
///
/// Listings are always walked newest first and the first qualifying
/// entry wins. "Nothing qualifies" is an empty list; forge errors are
/// returned to the caller, registry errors count as "tag absent".
///
/// A release target with fallback images yields one component per image
/// that resolves when no release qualifies.
pub struct VersionResolver<F, R> {
    forge: F,
    registry: R,
    max_commits: usize,
    max_releases: usize,
}

impl<F: SourceForge, R: ImageRegistry> VersionResolver<F, R> {
    pub fn new(forge: F, registry: R) -> Self {
        Self {
            forge,
            registry,
            max_commits: DEFAULT_MAX_COMMITS,
            max_releases: DEFAULT_MAX_RELEASES,
        }
    }

    pub fn with_limits(mut self, max_commits: usize, max_releases: usize) -> Self {
        self.max_commits = max_commits;
        self.max_releases = max_releases;
        self
    }

    pub fn forge(&self) -> &F {
        &self.forge
    }

    pub async fn resolve(&self, target: &ResolutionTarget) -> Result<Vec<Component>> {
        match target {
            ResolutionTarget::Release {
                repository,
                prefix,
                fallback_images,
            } => {
                self.resolve_release_or_images(repository, prefix, fallback_images)
                    .await
            }
            ResolutionTarget::Image { repository, image } => Ok(self
                .resolve_commit_with_image(repository, image)
                .await?
                .into_iter()
                .collect()),
        }
    }

    async fn resolve_release_or_images(
        &self,
        repository: &str,
        prefix: &str,
        fallback_images: &[String],
    ) -> Result<Vec<Component>> {
        let release_error = match self.resolve_release(repository, prefix).await {
            Ok(Some(component)) => return Ok(vec![component]),
            Ok(None) if fallback_images.is_empty() => return Ok(Vec::new()),
            Ok(None) => None,
            Err(e) if fallback_images.is_empty() => return Err(e),
            Err(e) => {
                warn!(repository, error = %e, "Release lookup failed; trying images");
                Some(e)
            }
        };

        info!(repository, images = fallback_images.len(), "Falling back to published images");
        let mut components = Vec::new();
        let mut first_error = release_error;
        for image in fallback_images {
            match self.resolve_commit_with_image(repository, image).await {
                Ok(Some(component)) => components.push(component),
                Ok(None) => {}
                Err(e) => {
                    warn!(repository, image = %image, error = %e, "Image fallback failed");
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) if components.is_empty() => Err(e),
            _ => Ok(components),
        }
    }

    async fn resolve_release(&self, repository: &str, prefix: &str) -> Result<Option<Component>> {
        let releases = self.forge.list_releases(repository, self.max_releases).await?;

        match ReleaseSelector::select(&releases, prefix) {
            Some(release) => {
                info!(
                    repository,
                    tag = release.tag_name(),
                    target = release.target_commitish(),
                    "Selected release"
                );
                Ok(Some(Component::release(repository, release.tag_name())))
            }
            None => {
                warn!(
                    repository,
                    prefix,
                    inspected = releases.len(),
                    "No stable release matches the tag prefix"
                );
                Ok(None)
            }
        }
    }

    async fn resolve_commit_with_image(
        &self,
        repository: &str,
        image: &str,
    ) -> Result<Option<Component>> {
        let commits = self.forge.list_commits(repository, self.max_commits).await?;

        for commit in &commits {
            let tag = image_tag_for(commit.sha());
            match self.registry.find_manifest(image, &tag).await {
                Ok(Some(manifest)) => {
                    info!(repository, image, sha = commit.sha(), "Selected commit with published image");
                    return Ok(Some(Component::commit_image(
                        repository,
                        commit.sha(),
                        image,
                        &tag,
                        manifest.digest().map(str::to_string),
                    )));
                }
                Ok(None) => debug!(repository, image, %tag, "Image tag not published"),
                Err(e) => warn!(repository, image, %tag, error = %e, "Registry probe failed; treating tag as absent"),
            }
        }

        warn!(
            repository,
            image,
            inspected = commits.len(),
            "No recent commit has a published image"
        );
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release_tracking::domain::{Commit, ManifestInfo, Release, VersioningMechanism};
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct StubForge {
        releases: Vec<Release>,
        commits: Vec<Commit>,
        fail: bool,
    }

    #[async_trait]
    impl SourceForge for StubForge {
        async fn list_releases(&self, _repository: &str, limit: usize) -> Result<Vec<Release>> {
            if self.fail {
                anyhow::bail!("GitHub API returned status code 502");
            }
            Ok(self.releases.iter().take(limit).cloned().collect())
        }

        async fn list_commits(&self, _repository: &str, limit: usize) -> Result<Vec<Commit>> {
            if self.fail {
                anyhow::bail!("GitHub API returned status code 502");
            }
            Ok(self.commits.iter().take(limit).cloned().collect())
        }

        async fn get_tag_ref(&self, _repository: &str, _tag: &str) -> Result<String> {
            anyhow::bail!("unused")
        }

        async fn create_tag_object(
            &self,
            _repository: &str,
            _tag: &str,
            _message: &str,
            _sha: &str,
        ) -> Result<String> {
            anyhow::bail!("unused")
        }

        async fn create_ref(&self, _repository: &str, _ref_name: &str, _sha: &str) -> Result<()> {
            anyhow::bail!("unused")
        }
    }

    /// Registry answering from a tag -> outcome table; records probe order
    #[derive(Default)]
    struct StubRegistry {
        published: HashMap<String, Option<String>>,
        broken: Vec<String>,
        probes: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageRegistry for StubRegistry {
        async fn find_manifest(&self, _image: &str, tag: &str) -> Result<Option<ManifestInfo>> {
            self.probes.lock().unwrap().push(tag.to_string());
            if self.broken.iter().any(|t| t == tag) {
                anyhow::bail!("connection reset");
            }
            Ok(self
                .published
                .get(tag)
                .map(|digest| ManifestInfo::new(digest.clone())))
        }
    }

    fn commits(shas: &[&str]) -> Vec<Commit> {
        shas.iter().map(|s| Commit::new(*s)).collect()
    }

    fn image_target() -> ResolutionTarget {
        ResolutionTarget::Image {
            repository: "openshift/assisted-service".to_string(),
            image: "quay.io/edge-infrastructure/assisted-service".to_string(),
        }
    }

    fn release_target(fallback_images: &[&str]) -> ResolutionTarget {
        ResolutionTarget::Release {
            repository: "kubernetes-sigs/cluster-api".to_string(),
            prefix: "v".to_string(),
            fallback_images: fallback_images.iter().map(|i| i.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_release_strategy_skips_prereleases() {
        let forge = StubForge {
            releases: vec![
                Release::new("v1.10.0-rc.2", "main", true),
                Release::new("v1.9.5", "release-1.9", false),
            ],
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());

        let component = resolver
            .resolve(&release_target(&[]))
            .await
            .unwrap()
            .pop()
            .unwrap();

        assert_eq!(component.git_ref(), "v1.9.5");
        assert_eq!(
            component.versioning_selection_mechanism(),
            VersioningMechanism::Release
        );
    }

    #[tokio::test]
    async fn test_release_strategy_without_match_is_empty() {
        let forge = StubForge {
            releases: vec![Release::new("v2.0.0-rc.0", "main", true)],
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());

        let result = resolver.resolve(&release_target(&[])).await.unwrap();
        assert!(result.is_empty());
    }

    #[tokio::test]
    async fn test_commit_strategy_first_published_commit_wins() {
        let forge = StubForge {
            commits: commits(&["c5", "c4", "c3", "c2", "c1"]),
            ..StubForge::default()
        };
        let mut published = HashMap::new();
        published.insert("latest-c3".to_string(), Some("sha256:c3".to_string()));
        published.insert("latest-c1".to_string(), None);
        let registry = StubRegistry {
            published,
            ..StubRegistry::default()
        };
        let resolver = VersionResolver::new(forge, registry);

        let component = resolver.resolve(&image_target()).await.unwrap().pop().unwrap();

        assert_eq!(component.git_ref(), "c3");
        assert_eq!(
            component.image_url(),
            Some("quay.io/edge-infrastructure/assisted-service:latest-c3")
        );
        assert_eq!(component.image_digest(), Some("sha256:c3"));
        assert_eq!(
            *resolver.registry.probes.lock().unwrap(),
            vec!["latest-c5", "latest-c4", "latest-c3"]
        );
    }

    #[tokio::test]
    async fn test_commit_strategy_probe_error_counts_as_absent() {
        let forge = StubForge {
            commits: commits(&["c2", "c1"]),
            ..StubForge::default()
        };
        let mut published = HashMap::new();
        published.insert("latest-c1".to_string(), None);
        let registry = StubRegistry {
            published,
            broken: vec!["latest-c2".to_string()],
            ..StubRegistry::default()
        };
        let resolver = VersionResolver::new(forge, registry);

        let component = resolver.resolve(&image_target()).await.unwrap().pop().unwrap();
        assert_eq!(component.git_ref(), "c1");
    }

    #[tokio::test]
    async fn test_commit_strategy_respects_commit_limit() {
        let forge = StubForge {
            commits: commits(&["c3", "c2", "c1"]),
            ..StubForge::default()
        };
        let mut published = HashMap::new();
        published.insert("latest-c1".to_string(), None);
        let registry = StubRegistry {
            published,
            ..StubRegistry::default()
        };
        let resolver = VersionResolver::new(forge, registry).with_limits(2, 10);

        assert!(resolver.resolve(&image_target()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_forge_error_is_returned() {
        let forge = StubForge {
            fail: true,
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());
        assert!(resolver.resolve(&image_target()).await.is_err());
    }

    #[tokio::test]
    async fn test_release_without_match_falls_back_to_images() {
        let forge = StubForge {
            releases: vec![Release::new("v2.0.0-rc.0", "main", true)],
            commits: commits(&["c2", "c1"]),
            ..StubForge::default()
        };
        let mut published = HashMap::new();
        published.insert("latest-c2".to_string(), Some("sha256:c2".to_string()));
        let registry = StubRegistry {
            published,
            ..StubRegistry::default()
        };
        let resolver = VersionResolver::new(forge, registry);

        let components = resolver
            .resolve(&release_target(&["quay.io/k8s/capi-controller"]))
            .await
            .unwrap();

        assert_eq!(components.len(), 1);
        assert_eq!(components[0].git_ref(), "c2");
        assert_eq!(
            components[0].versioning_selection_mechanism(),
            VersioningMechanism::Commit
        );
        assert_eq!(components[0].name(), "kubernetes-sigs/capi-controller");
    }

    #[tokio::test]
    async fn test_matching_release_skips_fallback_images() {
        let forge = StubForge {
            releases: vec![Release::new("v1.9.5", "main", false)],
            commits: commits(&["c1"]),
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());

        let components = resolver
            .resolve(&release_target(&["quay.io/k8s/capi-controller"]))
            .await
            .unwrap();

        assert_eq!(components.len(), 1);
        assert_eq!(components[0].git_ref(), "v1.9.5");
        assert!(resolver.registry.probes.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_release_and_fallback_both_empty() {
        let forge = StubForge {
            releases: vec![Release::new("v2.0.0-rc.0", "main", true)],
            commits: commits(&["c2", "c1"]),
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());

        let components = resolver
            .resolve(&release_target(&["quay.io/k8s/capi-controller"]))
            .await
            .unwrap();

        assert!(components.is_empty());
        assert_eq!(resolver.registry.probes.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_release_error_with_failing_fallback_is_returned() {
        let forge = StubForge {
            fail: true,
            ..StubForge::default()
        };
        let resolver = VersionResolver::new(forge, StubRegistry::default());

        assert!(resolver
            .resolve(&release_target(&["quay.io/k8s/capi-controller"]))
            .await
            .is_err());
    }
}
