/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to reach the source forge, the image registry, the file system,
/// the test runner and the console.
pub mod image_registry;
pub mod progress_reporter;
pub mod snapshot_repository;
pub mod source_forge;
pub mod test_action;
pub mod version_record_reader;

pub use image_registry::ImageRegistry;
pub use progress_reporter::ProgressReporter;
pub use snapshot_repository::SnapshotRepository;
pub use source_forge::SourceForge;
pub use test_action::{TestAction, TestActionResult};
pub use version_record_reader::VersionRecordReader;
