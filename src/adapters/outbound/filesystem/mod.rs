/// Filesystem adapters for the snapshot log and the versions file
mod file_writer;
mod versions_file_reader;
mod yaml_snapshot_store;

pub use file_writer::AtomicFileWriter;
pub use versions_file_reader::VersionsFileReader;
pub use yaml_snapshot_store::{parse_snapshot_log, YamlSnapshotStore};
