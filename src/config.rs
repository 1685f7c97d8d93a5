//! Configuration file support for rc-tracker.
//!
//! Provides YAML-based configuration through `rc-tracker.config.yml` files,
//! including data structures, file loading, and validation. Every key is
//! optional; command-line flags override what the file says.

use anyhow::{bail, Context};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::release_tracking::domain::{default_registry, RepositoryConfig, VersioningStrategy};
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "rc-tracker.config.yml";

pub const DEFAULT_SNAPSHOT_FILE: &str = "release-candidates.yaml";
pub const DEFAULT_VERSIONS_FILE: &str = "versions.yaml";

/// Upper bound for `max_commits` and `max_releases`; listings are one API page
pub const MAX_LISTING_LIMIT: usize = 100;

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    /// Replaces the built-in registry when present
    pub repositories: Option<Vec<RepositoryEntry>>,
    pub max_commits: Option<usize>,
    pub max_releases: Option<usize>,
    pub concurrency: Option<usize>,
    pub github_api_url: Option<String>,
    pub snapshot_file: Option<PathBuf>,
    pub versions_file: Option<PathBuf>,
    pub test_action: Option<TestActionConfig>,
    pub tag_message: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

/// A tracked repository: `release`, `commit`, or both.
///
/// With both, the release is tried first and the commit images are the fallback.
#[derive(Debug, Deserialize)]
pub struct RepositoryEntry {
    pub repository: String,
    pub release: Option<ReleaseEntry>,
    pub commit: Option<CommitEntry>,
}

#[derive(Debug, Deserialize)]
pub struct ReleaseEntry {
    #[serde(default)]
    pub prefix: String,
}

#[derive(Debug, Deserialize)]
pub struct CommitEntry {
    #[serde(default)]
    pub images: Vec<String>,
}

/// Overrides for the external test command
#[derive(Debug, Deserialize, Default, Clone)]
pub struct TestActionConfig {
    pub program: Option<String>,
    pub playbook: Option<PathBuf>,
    pub inventory: Option<PathBuf>,
}

impl RepositoryEntry {
    fn to_repository_config(&self) -> Result<RepositoryConfig> {
        let strategy = match (&self.release, &self.commit) {
            (Some(release), None) => VersioningStrategy::Release {
                prefix: release.prefix.clone(),
                fallback_images: Vec::new(),
            },
            (None, Some(commit)) => VersioningStrategy::CommitWithImage {
                images: commit.images.clone(),
            },
            (Some(release), Some(commit)) => {
                if commit.images.is_empty() {
                    bail!(
                        "repository '{}' has a 'commit' fallback that lists no images",
                        self.repository
                    );
                }
                VersioningStrategy::Release {
                    prefix: release.prefix.clone(),
                    fallback_images: commit.images.clone(),
                }
            }
            (None, None) => bail!(
                "repository '{}' sets neither 'release' nor 'commit'",
                self.repository
            ),
        };
        RepositoryConfig::new(self.repository.clone(), strategy)
    }
}

impl ConfigFile {
    /// Repositories to scan: the configured list, or the built-in registry
    pub fn repository_configs(&self) -> Result<Vec<RepositoryConfig>> {
        match &self.repositories {
            Some(entries) => entries
                .iter()
                .enumerate()
                .map(|(i, entry)| {
                    entry.to_repository_config().with_context(|| {
                        format!(
                            "Invalid config: repositories[{}]\n\n\
                             💡 Hint: Each entry needs 'repository: org/name' plus \
                             'release: {{prefix: v}}', 'commit: {{images: [...]}}', or both.",
                            i
                        )
                    })
                })
                .collect(),
            None => default_registry(),
        }
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    validate_config(&config)?;
    warn_unknown_fields(&config);

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// `--config` wins; otherwise discovery in `dir`; otherwise all defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_config_from_path(path),
        None => Ok(discover_config(dir)?.unwrap_or_default()),
    }
}

/// Validate the loaded configuration.
fn validate_config(config: &ConfigFile) -> Result<()> {
    for (key, value) in [
        ("concurrency", config.concurrency),
        ("max_commits", config.max_commits),
        ("max_releases", config.max_releases),
    ] {
        if value == Some(0) {
            bail!(
                "Invalid config: {} must be greater than 0.\n\n\
                 💡 Hint: Remove the key to use the default.",
                key
            );
        }
    }

    for (key, value) in [
        ("max_commits", config.max_commits),
        ("max_releases", config.max_releases),
    ] {
        if let Some(value) = value.filter(|v| *v > MAX_LISTING_LIMIT) {
            bail!(
                "Invalid config: {} must be at most {}, got {}.\n\n\
                 💡 Hint: Listings are fetched as a single page of the GitHub API.",
                key,
                MAX_LISTING_LIMIT,
                value
            );
        }
    }

    if let Some(template) = &config.tag_message {
        if !template.contains("{version}") {
            bail!(
                "Invalid config: tag_message must contain '{{version}}'.\n\n\
                 💡 Hint: For example \"Version {{version}} - Tagged by rc-tracker\"."
            );
        }
    }

    if let Some(url) = &config.github_api_url {
        if !url.starts_with("https://") && !url.starts_with("http://") {
            bail!("Invalid config: github_api_url must be an http(s) URL, got '{}'", url);
        }
    }

    config.repository_configs()?;
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        warn!(field = %key, "Unknown config field will be ignored");
    }
}
