use super::repository_id::RepositoryId;
use crate::shared::error::TrackerError;
use crate::shared::Result;

/// How a tracked repository's candidate version is chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersioningStrategy {
    /// Newest non-prerelease release whose tag starts with `prefix`.
    /// When none qualifies, each of `fallback_images` is resolved as under
    /// `CommitWithImage`.
    Release {
        prefix: String,
        fallback_images: Vec<String>,
    },
    /// Per listed image, the newest commit whose `latest-<sha>` tag is published.
    /// Each image is resolved independently.
    CommitWithImage { images: Vec<String> },
}

/// One unit of resolution work handed to the scanner's worker pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionTarget {
    Release {
        repository: String,
        prefix: String,
        fallback_images: Vec<String>,
    },
    Image { repository: String, image: String },
}

impl ResolutionTarget {
    pub fn repository(&self) -> &str {
        match self {
            ResolutionTarget::Release { repository, .. } => repository,
            ResolutionTarget::Image { repository, .. } => repository,
        }
    }

    /// Short label for logs and progress output
    pub fn label(&self) -> String {
        match self {
            ResolutionTarget::Release { repository, .. } => repository.clone(),
            ResolutionTarget::Image { repository, image } => format!("{} ({})", repository, image),
        }
    }
}

/// Registry entry: a tracked repository and its strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryConfig {
    repository: String,
    strategy: VersioningStrategy,
}

impl RepositoryConfig {
    pub fn new(repository: String, strategy: VersioningStrategy) -> Result<Self> {
        RepositoryId::parse(&repository)?;

        let images = match &strategy {
            VersioningStrategy::CommitWithImage { images } => {
                if images.is_empty() {
                    return Err(TrackerError::Validation {
                        message: format!(
                            "repository '{}' uses the commit strategy but lists no images",
                            repository
                        ),
                    }
                    .into());
                }
                images
            }
            VersioningStrategy::Release {
                fallback_images, ..
            } => fallback_images,
        };
        if let Some(blank) = images.iter().find(|i| i.trim().is_empty()) {
            return Err(TrackerError::Validation {
                message: format!(
                    "repository '{}' lists an empty image name ('{}')",
                    repository, blank
                ),
            }
            .into());
        }

        Ok(Self {
            repository,
            strategy,
        })
    }

    pub fn release(repository: &str, prefix: &str) -> Result<Self> {
        Self::new(
            repository.to_string(),
            VersioningStrategy::Release {
                prefix: prefix.to_string(),
                fallback_images: Vec::new(),
            },
        )
    }

    /// Release strategy that falls back to published images when no release qualifies
    pub fn release_with_fallback(repository: &str, prefix: &str, images: &[&str]) -> Result<Self> {
        Self::new(
            repository.to_string(),
            VersioningStrategy::Release {
                prefix: prefix.to_string(),
                fallback_images: images.iter().map(|i| i.to_string()).collect(),
            },
        )
    }

    pub fn commit_with_images(repository: &str, images: &[&str]) -> Result<Self> {
        Self::new(
            repository.to_string(),
            VersioningStrategy::CommitWithImage {
                images: images.iter().map(|i| i.to_string()).collect(),
            },
        )
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn strategy(&self) -> &VersioningStrategy {
        &self.strategy
    }

    /// Expands the entry into independent resolution tasks (one per image for commit repositories).
    ///
    /// A release entry stays a single task; its fallback images only run when no release qualifies.
    pub fn targets(&self) -> Vec<ResolutionTarget> {
        match &self.strategy {
            VersioningStrategy::Release {
                prefix,
                fallback_images,
            } => vec![ResolutionTarget::Release {
                repository: self.repository.clone(),
                prefix: prefix.clone(),
                fallback_images: fallback_images.clone(),
            }],
            VersioningStrategy::CommitWithImage { images } => images
                .iter()
                .map(|image| ResolutionTarget::Image {
                    repository: self.repository.clone(),
                    image: image.clone(),
                })
                .collect(),
        }
    }
}

/// Repositories tracked when no configuration file overrides them
pub fn default_registry() -> Result<Vec<RepositoryConfig>> {
    Ok(vec![
        RepositoryConfig::release("kubernetes-sigs/cluster-api", "v")?,
        RepositoryConfig::release("metal3-io/cluster-api-provider-metal3", "v")?,
        RepositoryConfig::commit_with_images(
            "openshift/assisted-service",
            &["quay.io/edge-infrastructure/assisted-service"],
        )?,
        RepositoryConfig::commit_with_images(
            "openshift/assisted-image-service",
            &["quay.io/edge-infrastructure/assisted-image-service"],
        )?,
        RepositoryConfig::commit_with_images(
            "openshift/assisted-installer-agent",
            &["quay.io/edge-infrastructure/assisted-installer-agent"],
        )?,
        RepositoryConfig::commit_with_images(
            "openshift/assisted-installer",
            &[
                "quay.io/edge-infrastructure/assisted-installer-controller",
                "quay.io/edge-infrastructure/assisted-installer",
            ],
        )?,
    ])
}
