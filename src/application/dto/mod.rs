/// Data Transfer Objects for application layer
///
/// DTOs carry requests in from the CLI and results back out, keeping
/// the domain layer free of presentation concerns.
mod scan;
mod tag;
mod test_run;

pub use scan::{ScanRequest, ScanResponse};
pub use tag::{ReconcileReport, TagRequest};
pub use test_run::{SnapshotSelector, TestRunOutcome, TestRunRequest};
