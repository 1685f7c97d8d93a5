use crate::application::dto::{ReconcileReport, TagRequest};
use crate::ports::outbound::SourceForge;
use crate::release_tracking::domain::{extract_base_repo, VersionRecord};
use crate::release_tracking::services::TagPlanner;
use crate::shared::error::TrackerError;
use crate::shared::Result;
use tracing::{debug, error, info, warn};

/// Message template for annotated tags; `{version}` is substituted
pub const DEFAULT_TAG_MESSAGE: &str = "Version {version} - Tagged by rc-tracker";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagState {
    AlreadyExists,
    Created,
    WouldCreate,
}

/// ReconcileTagsUseCase - makes every named version durable as Git tags
///
/// For each base repository of a version, `refs/tags/<version>` must exist.
/// Existing tags are never moved or recreated, so running this twice
/// creates each tag at most once.
pub struct ReconcileTagsUseCase<F> {
    forge: F,
    tag_message: String,
}

impl<F: SourceForge> ReconcileTagsUseCase<F> {
    pub fn new(forge: F) -> Self {
        Self {
            forge,
            tag_message: DEFAULT_TAG_MESSAGE.to_string(),
        }
    }

    pub fn with_tag_message(mut self, template: impl Into<String>) -> Self {
        self.tag_message = template.into();
        self
    }

    pub fn forge(&self) -> &F {
        &self.forge
    }

    /// Reconciles every requested version; per-repository failures end up in the reports
    ///
    /// # Errors
    /// When `only` names a version that is not in the request.
    pub async fn execute(&self, request: TagRequest) -> Result<Vec<ReconcileReport>> {
        let selected: Vec<&VersionRecord> = match &request.only {
            Some(name) => {
                let record = request
                    .versions
                    .iter()
                    .find(|v| v.name() == name)
                    .ok_or_else(|| TrackerError::Validation {
                        message: format!("Version '{}' is not listed in the versions file", name),
                    })?;
                vec![record]
            }
            None => request.versions.iter().collect(),
        };

        let mut reports = Vec::with_capacity(selected.len());
        for record in selected {
            reports.push(self.reconcile_version(record, request.dry_run).await);
        }
        Ok(reports)
    }

    /// Whole-version convenience path: one failing repository does not stop the others
    pub async fn reconcile_version(&self, record: &VersionRecord, dry_run: bool) -> ReconcileReport {
        let version = record.name();
        let mut report = ReconcileReport::new(version);
        let plan = TagPlanner::plan(record);

        for conflict in &plan.conflicts {
            warn!(
                version,
                repository = %conflict.repository,
                kept = %conflict.kept,
                ignored = %conflict.ignored,
                "Components disagree on the ref for one repository; using the first"
            );
        }
        for (repository, reason) in plan.invalid {
            error!(version, repository = %repository, reason = %reason, "Skipping invalid repository");
            report.failed.push((repository, reason));
        }

        for target in plan.targets {
            match self
                .ensure_tag(&target.repository, &target.sha, version, dry_run)
                .await
            {
                Ok(TagState::AlreadyExists) => report.ensured.push(target.repository),
                Ok(TagState::Created) => report.created.push(target.repository),
                Ok(TagState::WouldCreate) => report.would_create.push(target.repository),
                Err(e) => {
                    error!(version, repository = %target.repository, error = %e, "Failed to create tag");
                    report.failed.push((target.repository, format!("{:#}", e)));
                }
            }
        }

        info!(
            version,
            ensured = report.ensured.len(),
            created = report.created.len(),
            would_create = report.would_create.len(),
            failed = report.failed.len(),
            "Tag reconciliation finished"
        );
        report
    }

    /// Single-repository primitive; returns true once the tag exists.
    ///
    /// `repository` may carry a sub-artifact segment; the tag is placed on the base repository.
    ///
    /// # Errors
    /// Forge errors while creating the tag object or its ref are returned as-is.
    pub async fn reconcile_tag(&self, repository: &str, sha: &str, version: &str) -> Result<bool> {
        let base = extract_base_repo(repository)?;
        self.ensure_tag(&base, sha, version, false).await?;
        Ok(true)
    }

    /// Any failure to read the ref, "not found" included, counts as absent
    pub async fn tag_exists(&self, repository: &str, version: &str) -> bool {
        match self.forge.get_tag_ref(repository, version).await {
            Ok(sha) => {
                debug!(repository, version, %sha, "Tag exists");
                true
            }
            Err(e) => {
                debug!(repository, version, error = %e, "Tag not found");
                false
            }
        }
    }

    /// Annotated tag: the tag object first, then the ref naming it
    pub async fn create_tag(&self, repository: &str, sha: &str, version: &str) -> Result<()> {
        let message = self.tag_message.replace("{version}", version);
        let tag_sha = self
            .forge
            .create_tag_object(repository, version, &message, sha)
            .await?;
        self.forge
            .create_ref(repository, &format!("refs/tags/{}", version), &tag_sha)
            .await?;
        info!(repository, version, sha, "Created tag");
        Ok(())
    }

    async fn ensure_tag(
        &self,
        repository: &str,
        sha: &str,
        version: &str,
        dry_run: bool,
    ) -> Result<TagState> {
        if self.tag_exists(repository, version).await {
            info!(repository, version, "Tag already exists");
            return Ok(TagState::AlreadyExists);
        }
        if dry_run {
            info!(repository, version, sha, "Dry run: tag would be created");
            return Ok(TagState::WouldCreate);
        }
        self.create_tag(repository, sha, version).await?;
        Ok(TagState::Created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release_tracking::domain::{Commit, Release, VersionComponent};
    use async_trait::async_trait;
    use std::collections::{HashMap, HashSet};
    use std::sync::Mutex;

    /// Forge holding tags as (repository, tag) -> sha, recording every write
    #[derive(Default)]
    struct TagForge {
        tags: Mutex<HashMap<(String, String), String>>,
        tag_objects: Mutex<Vec<(String, String, String, String)>>,
        refs: Mutex<Vec<(String, String, String)>>,
        failing_writes: HashSet<String>,
    }

    #[async_trait]
    impl SourceForge for TagForge {
        async fn list_releases(&self, _repository: &str, _limit: usize) -> Result<Vec<Release>> {
            Ok(Vec::new())
        }

        async fn list_commits(&self, _repository: &str, _limit: usize) -> Result<Vec<Commit>> {
            Ok(Vec::new())
        }

        async fn get_tag_ref(&self, repository: &str, tag: &str) -> Result<String> {
            self.tags
                .lock()
                .unwrap()
                .get(&(repository.to_string(), tag.to_string()))
                .cloned()
                .ok_or_else(|| anyhow::anyhow!("GitHub API returned status code 404"))
        }

        async fn create_tag_object(
            &self,
            repository: &str,
            tag: &str,
            message: &str,
            sha: &str,
        ) -> Result<String> {
            if self.failing_writes.contains(repository) {
                anyhow::bail!("GitHub API returned status code 403");
            }
            self.tag_objects.lock().unwrap().push((
                repository.to_string(),
                tag.to_string(),
                message.to_string(),
                sha.to_string(),
            ));
            Ok(format!("tagobj-{}", sha))
        }

        async fn create_ref(&self, repository: &str, ref_name: &str, sha: &str) -> Result<()> {
            self.refs.lock().unwrap().push((
                repository.to_string(),
                ref_name.to_string(),
                sha.to_string(),
            ));
            let tag = ref_name.trim_start_matches("refs/tags/").to_string();
            self.tags
                .lock()
                .unwrap()
                .insert((repository.to_string(), tag), sha.to_string());
            Ok(())
        }
    }

    fn record(name: &str, components: &[(&str, &str)]) -> VersionRecord {
        VersionRecord::new(
            name.to_string(),
            components
                .iter()
                .map(|(repo, sha)| VersionComponent::new(repo.to_string(), sha.to_string(), None))
                .collect(),
        )
    }

    #[tokio::test]
    async fn test_reconcile_tag_is_idempotent() {
        let use_case = ReconcileTagsUseCase::new(TagForge::default());

        assert!(use_case
            .reconcile_tag("org/repo", "abc123", "v0.1.0")
            .await
            .unwrap());
        assert!(use_case
            .reconcile_tag("org/repo", "abc123", "v0.1.0")
            .await
            .unwrap());

        assert_eq!(use_case.forge().tag_objects.lock().unwrap().len(), 1);
        let refs = use_case.forge().refs.lock().unwrap().clone();
        assert_eq!(
            refs,
            vec![(
                "org/repo".to_string(),
                "refs/tags/v0.1.0".to_string(),
                "tagobj-abc123".to_string()
            )]
        );
    }

    #[tokio::test]
    async fn test_reconcile_tag_uses_base_repository_and_message() {
        let use_case = ReconcileTagsUseCase::new(TagForge::default())
            .with_tag_message("Release {version} (automated)");

        use_case
            .reconcile_tag("org/repo/controller", "abc123", "v0.2.0")
            .await
            .unwrap();

        let objects = use_case.forge().tag_objects.lock().unwrap().clone();
        assert_eq!(objects[0].0, "org/repo");
        assert_eq!(objects[0].2, "Release v0.2.0 (automated)");
        assert_eq!(objects[0].3, "abc123");
    }

    #[tokio::test]
    async fn test_reconcile_tag_propagates_write_failures() {
        let forge = TagForge {
            failing_writes: ["org/locked".to_string()].into_iter().collect(),
            ..TagForge::default()
        };
        let use_case = ReconcileTagsUseCase::new(forge);

        assert!(use_case
            .reconcile_tag("org/locked", "abc123", "v0.1.0")
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_existing_tag_is_never_recreated() {
        let forge = TagForge::default();
        forge.tags.lock().unwrap().insert(
            ("org/repo".to_string(), "v0.1.0".to_string()),
            "older".to_string(),
        );
        let use_case = ReconcileTagsUseCase::new(forge);

        let report = use_case
            .reconcile_version(&record("v0.1.0", &[("org/repo", "newer")]), false)
            .await;

        assert_eq!(report.ensured, vec!["org/repo".to_string()]);
        assert!(use_case.forge().tag_objects.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_version_failures_are_isolated() {
        let forge = TagForge {
            failing_writes: ["org/locked".to_string()].into_iter().collect(),
            ..TagForge::default()
        };
        let use_case = ReconcileTagsUseCase::new(forge);

        let report = use_case
            .reconcile_version(
                &record(
                    "v0.1.0",
                    &[("org/locked", "aaa"), ("org/open", "bbb"), ("bogus", "ccc")],
                ),
                false,
            )
            .await;

        assert_eq!(report.created, vec!["org/open".to_string()]);
        assert_eq!(report.failed.len(), 2);
        assert!(!report.is_success());
    }

    #[tokio::test]
    async fn test_dry_run_creates_nothing() {
        let use_case = ReconcileTagsUseCase::new(TagForge::default());

        let report = use_case
            .reconcile_version(&record("v0.1.0", &[("org/repo", "abc")]), true)
            .await;

        assert_eq!(report.would_create, vec!["org/repo".to_string()]);
        assert!(use_case.forge().refs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_filters_by_version() {
        let use_case = ReconcileTagsUseCase::new(TagForge::default());
        let versions = vec![
            record("v0.1.0", &[("org/repo", "aaa")]),
            record("v0.2.0", &[("org/repo", "bbb")]),
        ];

        let reports = use_case
            .execute(TagRequest {
                versions: versions.clone(),
                only: Some("v0.2.0".to_string()),
                dry_run: false,
            })
            .await
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].version, "v0.2.0");

        let err = use_case
            .execute(TagRequest {
                versions,
                only: Some("v9.9.9".to_string()),
                dry_run: false,
            })
            .await
            .unwrap_err();
        assert!(err.to_string().contains("v9.9.9"));
    }
}
