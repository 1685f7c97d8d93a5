use super::file_writer::AtomicFileWriter;
use crate::ports::outbound::SnapshotRepository;
use crate::release_tracking::domain::{
    image_component_name, Component, RepositoryId, Snapshot, SnapshotLog, SnapshotMetadata,
    SnapshotStatus, VersioningMechanism,
};
use crate::shared::error::TrackerError;
use crate::shared::security::read_regular_file;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawLog {
    #[serde(default)]
    snapshots: Option<Vec<RawSnapshot>>,
}

#[derive(Debug, Deserialize)]
struct RawSnapshot {
    metadata: RawMetadata,
    #[serde(default)]
    components: Option<Vec<RawComponent>>,
    /// Older layout: component name -> version info
    #[serde(default)]
    versions: Option<BTreeMap<String, RawVersionEntry>>,
}

#[derive(Debug, Deserialize)]
struct RawMetadata {
    generated_at: String,
    status: String,
    #[serde(default)]
    tested_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawComponent {
    repository: String,
    #[serde(rename = "ref")]
    git_ref: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    versioning_selection_mechanism: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_digest: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawVersionEntry {
    version: String,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_digest: Option<String>,
}

/// Parses snapshot log content, accepting every layout written so far.
///
/// The result is always the current in-memory model; saving it writes the
/// current layout.
pub fn parse_snapshot_log(content: &str) -> std::result::Result<SnapshotLog, String> {
    let raw: RawLog = serde_yaml_ng::from_str(content).map_err(|e| e.to_string())?;
    let raw_snapshots = raw
        .snapshots
        .ok_or_else(|| "missing top-level 'snapshots' list".to_string())?;

    let snapshots = raw_snapshots
        .into_iter()
        .enumerate()
        .map(|(index, raw)| {
            normalise_snapshot(raw).map_err(|e| format!("snapshot #{}: {}", index, e))
        })
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(SnapshotLog::new(snapshots))
}

fn normalise_snapshot(raw: RawSnapshot) -> std::result::Result<Snapshot, String> {
    let status: SnapshotStatus = raw.metadata.status.parse()?;
    let metadata = SnapshotMetadata::new(raw.metadata.generated_at, status, raw.metadata.tested_at);

    let components = match (raw.components, raw.versions) {
        (Some(components), _) => components
            .into_iter()
            .map(normalise_component)
            .collect::<std::result::Result<Vec<_>, _>>()?,
        (None, Some(versions)) => versions
            .into_iter()
            .map(|(key, entry)| normalise_version_entry(&key, entry))
            .collect(),
        (None, None) => return Err("has neither 'components' nor 'versions'".to_string()),
    };

    Ok(Snapshot::new(metadata, components))
}

fn normalise_component(raw: RawComponent) -> std::result::Result<Component, String> {
    let mechanism = match raw.versioning_selection_mechanism.as_deref() {
        Some("release") => VersioningMechanism::Release,
        Some("commit") => VersioningMechanism::Commit,
        Some(other) => return Err(format!("unknown versioning_selection_mechanism '{}'", other)),
        None => infer_mechanism(raw.image_url.as_deref()),
    };
    let name = raw
        .name
        .unwrap_or_else(|| derived_name(&raw.repository, raw.image_url.as_deref()));

    Ok(Component::new(
        raw.repository,
        raw.git_ref,
        name,
        mechanism,
        raw.image_url,
        raw.image_digest,
    ))
}

/// Converts one `versions: {<key>: {version, ...}}` entry.
///
/// Keys were either `org/repo` or `org/repo/<image>`.
fn normalise_version_entry(key: &str, entry: RawVersionEntry) -> Component {
    let repository = RepositoryId::parse(key)
        .map(|id| id.base())
        .unwrap_or_else(|_| key.to_string());

    let name = derived_name(&repository, entry.image_url.as_deref());

    Component::new(
        repository,
        entry.version,
        name,
        infer_mechanism(entry.image_url.as_deref()),
        entry.image_url,
        entry.image_digest,
    )
}

/// Name for entries written before names were recorded: one per image, else the repository
fn derived_name(repository: &str, image_url: Option<&str>) -> String {
    match image_url {
        Some(url) => image_component_name(repository, strip_image_tag(url)),
        None => repository.to_string(),
    }
}

fn infer_mechanism(image_url: Option<&str>) -> VersioningMechanism {
    if image_url.is_some() {
        VersioningMechanism::Commit
    } else {
        VersioningMechanism::Release
    }
}

/// `quay.io/org/app:latest-abc` -> `quay.io/org/app`; a `host:port` prefix is kept
fn strip_image_tag(image_url: &str) -> &str {
    match image_url.rsplit_once(':') {
        Some((image, tag)) if !tag.contains('/') => image,
        _ => image_url,
    }
}

/// YamlSnapshotStore adapter for the snapshot log file
///
/// Implements the SnapshotRepository port with serde_yaml_ng. Reads go
/// through the shared regular-file checks; writes are atomic renames.
pub struct YamlSnapshotStore;

impl YamlSnapshotStore {
    pub fn new() -> Self {
        Self
    }
}

impl Default for YamlSnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SnapshotRepository for YamlSnapshotStore {
    fn load(&self, path: &Path) -> Result<SnapshotLog> {
        if path.symlink_metadata().is_err() {
            return Err(TrackerError::SnapshotLogNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = read_regular_file(path, "snapshot log")?;
        parse_snapshot_log(&content).map_err(|details| {
            anyhow::Error::from(TrackerError::SnapshotLogParseError {
                path: path.to_path_buf(),
                details,
            })
        })
    }

    fn save(&self, path: &Path, log: &SnapshotLog) -> Result<()> {
        let content = serde_yaml_ng::to_string(log).map_err(|e| TrackerError::FileWriteError {
            path: path.to_path_buf(),
            details: format!("Failed to serialize snapshot log: {}", e),
        })?;
        AtomicFileWriter::new(path).write(&content)
    }
}
