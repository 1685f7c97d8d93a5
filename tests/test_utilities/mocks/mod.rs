/// Mock implementations for testing
mod mock_image_registry;
mod mock_progress_reporter;
mod mock_source_forge;
mod mock_test_action;

pub use mock_image_registry::MockImageRegistry;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_source_forge::MockSourceForge;
pub use mock_test_action::MockTestAction;
