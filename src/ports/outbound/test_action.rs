use crate::shared::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Observable outcome of one test action run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestActionResult {
    pub success: bool,
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
}

/// TestAction port for the external functional test runner
///
/// The runner is opaque: it receives the snapshot's variables and reports
/// pass or fail.
#[async_trait]
pub trait TestAction: Send + Sync {
    /// Runs the tests once and waits for completion.
    ///
    /// # Errors
    /// When the action cannot be started at all. Callers record this as a failed run.
    async fn run(&self, env: &BTreeMap<String, String>) -> Result<TestActionResult>;

    /// Human-readable command line, for logs and dry runs
    fn describe(&self) -> String;
}
