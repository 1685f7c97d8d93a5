/// Use cases module containing application business logic orchestration
mod reconcile_tags;
mod scan_components;

pub use reconcile_tags::{ReconcileTagsUseCase, DEFAULT_TAG_MESSAGE};
pub use run_tests::RunTestsUseCase;
pub use scan_components::{ScanComponentsUseCase, ScanResult, DEFAULT_CONCURRENCY};
