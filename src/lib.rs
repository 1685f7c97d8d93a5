//! rc-tracker - release candidate tracking for multi-repository projects
//!
//! Discovers the latest qualifying version of every tracked component,
//! records each distinct set as a snapshot in a YAML log, drives an
//! external test run against the pending snapshot, and back-fills Git
//! tags once a set is promoted to a named version.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`release_tracking`): Value objects and pure services
//! - **Application Layer** (`application`): Use cases and application services
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): Concrete implementations of ports
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use rc_tracker::prelude::*;
//!
//! # async fn example() -> Result<()> {
//! let forge = CachingSourceForge::new(GitHubClient::new(DEFAULT_GITHUB_API_URL, None)?);
//! let resolver = VersionResolver::new(forge, OciRegistryClient::new()?);
//! let store = SnapshotStore::new(YamlSnapshotStore::new(), "release-candidates.yaml");
//!
//! let use_case = ScanComponentsUseCase::new(resolver, store, StderrProgressReporter::new(), 10);
//! let response = use_case.execute(ScanRequest::new(default_registry()?)).await?;
//! println!("{} component(s) resolved", response.components.len());
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod ports;
pub mod release_tracking;
pub mod shared;
pub mod telemetry;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::{SilentProgressReporter, StderrProgressReporter};
    pub use crate::adapters::outbound::filesystem::{VersionsFileReader, YamlSnapshotStore};
    pub use crate::adapters::outbound::network::{
        CachingSourceForge, GitHubClient, OciRegistryClient, DEFAULT_GITHUB_API_URL,
    };
    pub use crate::adapters::outbound::process::AnsiblePlaybookAction;
    pub use crate::application::dto::{
        ReconcileReport, ScanRequest, ScanResponse, SnapshotSelector, TagRequest, TestRunOutcome,
        TestRunRequest,
    };
    pub use crate::application::services::{SaveOutcome, SnapshotStore, VersionResolver};
    pub use crate::application::use_cases::{
        ReconcileTagsUseCase, RunTestsUseCase, ScanComponentsUseCase,
    };
    pub use crate::ports::outbound::{
        ImageRegistry, ProgressReporter, SnapshotRepository, SourceForge, TestAction,
        VersionRecordReader,
    };
    pub use crate::release_tracking::domain::{
        default_registry, Component, RepositoryConfig, Snapshot, SnapshotLog, SnapshotStatus,
        VersionRecord, VersioningStrategy,
    };
    pub use crate::shared::Result;
}
