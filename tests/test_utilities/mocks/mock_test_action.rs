use async_trait::async_trait;
use rc_tracker::ports::outbound::TestActionResult;
use rc_tracker::prelude::*;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock TestAction with a switchable verdict; records each environment it was given
#[derive(Clone)]
pub struct MockTestAction {
    passes: Arc<AtomicBool>,
    pub runs: Arc<Mutex<Vec<BTreeMap<String, String>>>>,
}

impl MockTestAction {
    pub fn passing() -> Self {
        Self {
            passes: Arc::new(AtomicBool::new(true)),
            runs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn set_passes(&self, passes: bool) {
        self.passes.store(passes, Ordering::SeqCst);
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().unwrap().len()
    }

    pub fn last_env(&self) -> Option<BTreeMap<String, String>> {
        self.runs.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TestAction for MockTestAction {
    async fn run(&self, env: &BTreeMap<String, String>) -> Result<TestActionResult> {
        self.runs.lock().unwrap().push(env.clone());
        let success = self.passes.load(Ordering::SeqCst);
        Ok(TestActionResult {
            success,
            exit_code: Some(if success { 0 } else { 2 }),
        })
    }

    fn describe(&self) -> String {
        "mock-tests".to_string()
    }
}
