/// Application services shared by the use cases
mod snapshot_store;
mod version_resolver;

pub use snapshot_store::{SaveOutcome, SnapshotStore};
pub use version_resolver::{
    image_tag_for, VersionResolver, DEFAULT_MAX_COMMITS, DEFAULT_MAX_RELEASES,
};
