use crate::ports::outbound::VersionRecordReader;
use crate::release_tracking::domain::{VersionComponent, VersionRecord};
use crate::shared::error::TrackerError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawVersionsFile {
    #[serde(default)]
    versions: Option<Vec<RawVersion>>,
}

#[derive(Debug, Deserialize)]
struct RawVersion {
    name: String,
    #[serde(default)]
    components: Option<Vec<RawVersionComponent>>,
    /// Older layout: repository -> {commit_sha}
    #[serde(default)]
    repositories: Option<BTreeMap<String, RawRepositoryPin>>,
}

#[derive(Debug, Deserialize)]
struct RawVersionComponent {
    repository: String,
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(default)]
    image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawRepositoryPin {
    commit_sha: String,
}

fn parse_versions(content: &str) -> std::result::Result<Vec<VersionRecord>, String> {
    let raw: RawVersionsFile = serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?;
    let versions = raw
        .versions
        .ok_or_else(|| "missing top-level 'versions' list".to_string())?;

    versions
        .into_iter()
        .map(|version| {
            let components = match (version.components, version.repositories) {
                (Some(components), _) => components
                    .into_iter()
                    .map(|c| VersionComponent::new(c.repository, c.git_ref, c.image_url))
                    .collect(),
                (None, Some(repositories)) => repositories
                    .into_iter()
                    .map(|(repository, pin)| VersionComponent::new(repository, pin.commit_sha, None))
                    .collect(),
                (None, None) => {
                    return Err(format!(
                        "version '{}' has neither 'components' nor 'repositories'",
                        version.name
                    ))
                }
            };
            Ok(VersionRecord::new(version.name, components))
        })
        .collect()
}

/// VersionsFileReader adapter for the curated versions file (YAML)
pub struct VersionsFileReader;

impl VersionsFileReader {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VersionsFileReader {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionRecordReader for VersionsFileReader {
    fn read_versions(&self, path: &Path) -> Result<Vec<VersionRecord>> {
        let invalid = |details: String| TrackerError::InvalidVersionsFile {
            path: path.to_path_buf(),
            details,
        };

        let content = read_regular_file(path, "versions file").map_err(|e| invalid(e.to_string()))?;
        Ok(parse_versions(&content).map_err(invalid)?)
    }
}
