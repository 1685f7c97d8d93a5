pub mod component;
pub mod forge;
pub mod repository_config;
pub mod repository_id;
pub mod snapshot;
pub mod snapshot_log;
pub mod version_record;

pub use component::{image_component_name, Component, ComponentKey, VersioningMechanism};
pub use forge::{Commit, ManifestInfo, Release};
pub use repository_config::{
    default_registry, RepositoryConfig, ResolutionTarget, VersioningStrategy,
};
pub use repository_id::{extract_base_repo, RepositoryId};
pub use snapshot::{format_timestamp, parse_timestamp, Snapshot, SnapshotMetadata, SnapshotStatus};
pub use snapshot_log::{InsertOutcome, SnapshotLog};
pub use version_record::{VersionComponent, VersionRecord};
