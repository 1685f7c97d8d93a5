use crate::ports::outbound::{TestAction, TestActionResult};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::process::Command;

pub const DEFAULT_PROGRAM: &str = "ansible-playbook";
pub const DEFAULT_PLAYBOOK: &str = "test/playbooks/run_test.yaml";
pub const DEFAULT_INVENTORY: &str = "test/playbooks/inventories/remote_host.yaml";

/// AnsiblePlaybookAction adapter running `<program> <playbook> -i <inventory>`
///
/// Variables are handed to the child with `Command::envs`; the current
/// process environment is inherited but never modified. The child's
/// stdout and stderr go straight to ours.
#[derive(Debug, Clone)]
pub struct AnsiblePlaybookAction {
    program: String,
    playbook: PathBuf,
    inventory: PathBuf,
}

impl AnsiblePlaybookAction {
    pub fn new(program: impl Into<String>, playbook: impl Into<PathBuf>, inventory: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            playbook: playbook.into(),
            inventory: inventory.into(),
        }
    }
}

impl Default for AnsiblePlaybookAction {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM, DEFAULT_PLAYBOOK, DEFAULT_INVENTORY)
    }
}

#[async_trait]
impl TestAction for AnsiblePlaybookAction {
    async fn run(&self, env: &BTreeMap<String, String>) -> Result<TestActionResult> {
        let status = Command::new(&self.program)
            .arg(&self.playbook)
            .arg("-i")
            .arg(&self.inventory)
            .envs(env)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .with_context(|| format!("Failed to start test action: {}", self.describe()))?;

        Ok(TestActionResult {
            success: status.success(),
            exit_code: status.code(),
        })
    }

    fn describe(&self) -> String {
        format!(
            "{} {} -i {}",
            self.program,
            self.playbook.display(),
            self.inventory.display()
        )
    }
}
