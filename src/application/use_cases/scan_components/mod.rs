use crate::application::dto::{ScanRequest, ScanResponse};
use crate::application::services::{SnapshotStore, VersionResolver};
use crate::ports::outbound::{ImageRegistry, ProgressReporter, SnapshotRepository, SourceForge};
use crate::release_tracking::domain::{Component, RepositoryConfig, ResolutionTarget};
use crate::shared::Result;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, warn};

/// Default size of the resolution worker pool
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Components found by one fan-out, plus the targets that produced nothing
#[derive(Debug, Default)]
pub struct ScanResult {
    pub components: Vec<Component>,
    pub unresolved: Vec<String>,
}

/// ScanComponentsUseCase - resolves every tracked repository and records the result
///
/// One task per resolution target runs on a bounded pool. A task that
/// errors (or panics) only removes its own component from the result.
///
/// # Type Parameters
/// * `F` - SourceForge implementation
/// * `R` - ImageRegistry implementation
/// * `S` - SnapshotRepository implementation
/// * `P` - ProgressReporter implementation
pub struct ScanComponentsUseCase<F, R, S, P> {
    resolver: Arc<VersionResolver<F, R>>,
    store: SnapshotStore<S>,
    progress_reporter: P,
    concurrency: usize,
}

impl<F, R, S, P> ScanComponentsUseCase<F, R, S, P>
where
    F: SourceForge + 'static,
    R: ImageRegistry + 'static,
    S: SnapshotRepository,
    P: ProgressReporter,
{
    pub fn new(
        resolver: VersionResolver<F, R>,
        store: SnapshotStore<S>,
        progress_reporter: P,
        concurrency: usize,
    ) -> Self {
        Self {
            resolver: Arc::new(resolver),
            store,
            progress_reporter,
            concurrency: concurrency.max(1),
        }
    }

    /// Resolves, then persists unless nothing changed.
    ///
    /// # Errors
    /// When no component at all could be resolved; the log is left untouched.
    pub async fn execute(&self, request: ScanRequest) -> Result<ScanResponse> {
        let scan = self.scan(&request.repositories).await;

        if scan.components.is_empty() {
            anyhow::bail!(
                "No components could be resolved ({} target(s) failed); {} was not modified",
                scan.unresolved.len(),
                self.store.path().display()
            );
        }

        let outcome = self.store.save_components(scan.components.clone())?;

        Ok(ScanResponse {
            components: scan.components,
            outcome,
            unresolved: scan.unresolved,
        })
    }

    /// Runs the fan-out only; nothing is persisted
    pub async fn scan(&self, repositories: &[RepositoryConfig]) -> ScanResult {
        let targets: Vec<ResolutionTarget> =
            repositories.iter().flat_map(RepositoryConfig::targets).collect();

        info!(
            targets = targets.len(),
            concurrency = self.concurrency,
            "Resolving component versions"
        );
        self.progress_reporter
            .start(targets.len(), "Resolving component versions");

        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut join_set = JoinSet::new();

        for target in targets {
            let resolver = Arc::clone(&self.resolver);
            let semaphore = Arc::clone(&semaphore);
            join_set.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let result = resolver.resolve(&target).await;
                (target, result)
            });
        }

        let mut result = ScanResult::default();
        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok((target, Ok(components))) => {
                    self.progress_reporter.advance(&target.label());
                    if components.is_empty() {
                        result.unresolved.push(target.label());
                    }
                    result.components.extend(components);
                }
                Ok((target, Err(e))) => {
                    error!(target = %target.label(), error = %e, "Failed to resolve component");
                    self.progress_reporter
                        .report_error(&format!("⚠️  {}: {}", target.label(), e));
                    self.progress_reporter.advance(&target.label());
                    result.unresolved.push(target.label());
                }
                Err(e) => {
                    error!(error = %e, "Resolution task did not complete");
                    self.progress_reporter.advance("(aborted task)");
                    result.unresolved.push(format!("task: {}", e));
                }
            }
        }

        result
            .components
            .sort_by(|a, b| (a.repository(), a.name()).cmp(&(b.repository(), b.name())));
        result.unresolved.sort();

        if !result.unresolved.is_empty() {
            warn!(unresolved = ?result.unresolved, "Some components are missing from this scan");
        }
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} component(s), {} missing",
            result.components.len(),
            result.unresolved.len()
        ));

        result
    }
}
