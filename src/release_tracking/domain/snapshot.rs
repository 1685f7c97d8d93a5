use super::component::{Component, ComponentKey};
use crate::shared::error::TrackerError;
use crate::shared::Result;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Test status of a snapshot.
///
/// `Pending` moves exactly once to `Successful` or `Failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotStatus {
    Pending,
    Successful,
    Failed,
}

impl SnapshotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SnapshotStatus::Pending => "pending",
            SnapshotStatus::Successful => "successful",
            SnapshotStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, SnapshotStatus::Pending)
    }
}

impl std::fmt::Display for SnapshotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SnapshotStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(SnapshotStatus::Pending),
            "successful" | "success" => Ok(SnapshotStatus::Successful),
            "failed" | "failure" => Ok(SnapshotStatus::Failed),
            other => Err(format!("Unknown snapshot status: {}", other)),
        }
    }
}

/// Formats a timestamp the way snapshot metadata stores it (RFC 3339, UTC, microseconds)
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parses a stored timestamp. Naive timestamps written by older tooling are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotMetadata {
    generated_at: String,
    status: SnapshotStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    tested_at: Option<String>,
}

impl SnapshotMetadata {
    pub fn new(generated_at: String, status: SnapshotStatus, tested_at: Option<String>) -> Self {
        Self {
            generated_at,
            status,
            tested_at,
        }
    }

    pub fn generated_at(&self) -> &str {
        &self.generated_at
    }

    pub fn status(&self) -> SnapshotStatus {
        self.status
    }

    pub fn tested_at(&self) -> Option<&str> {
        self.tested_at.as_deref()
    }
}

/// One discovery result plus its test status.
///
/// `metadata.generated_at` is the snapshot's identity within the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    metadata: SnapshotMetadata,
    components: Vec<Component>,
}

impl Snapshot {
    pub fn new(metadata: SnapshotMetadata, components: Vec<Component>) -> Self {
        Self {
            metadata,
            components,
        }
    }

    /// A freshly scanned snapshot awaiting its test run
    pub fn pending(components: Vec<Component>, generated_at: DateTime<Utc>) -> Self {
        Self::new(
            SnapshotMetadata::new(format_timestamp(generated_at), SnapshotStatus::Pending, None),
            components,
        )
    }

    pub fn id(&self) -> &str {
        self.metadata.generated_at()
    }

    pub fn metadata(&self) -> &SnapshotMetadata {
        &self.metadata
    }

    pub fn status(&self) -> SnapshotStatus {
        self.metadata.status
    }

    pub fn tested_at(&self) -> Option<&str> {
        self.metadata.tested_at()
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn generated_at_time(&self) -> Option<DateTime<Utc>> {
        parse_timestamp(self.metadata.generated_at())
    }

    /// Order-independent comparison on the (repository, ref, image_url) triple
    pub fn has_same_components(&self, other: &[Component]) -> bool {
        component_keys(&self.components) == component_keys(other)
    }

    /// Moves a pending snapshot to a terminal status and stamps `tested_at`.
    ///
    /// # Errors
    /// `TrackerError::InvalidTransition` when the snapshot is already terminal
    /// or `status` is `Pending`.
    pub fn complete(&mut self, status: SnapshotStatus, tested_at: DateTime<Utc>) -> Result<()> {
        if self.metadata.status.is_terminal() || !status.is_terminal() {
            return Err(TrackerError::InvalidTransition {
                id: self.id().to_string(),
                from: self.metadata.status.to_string(),
                to: status.to_string(),
            }
            .into());
        }

        self.metadata.status = status;
        self.metadata.tested_at = Some(format_timestamp(tested_at));
        Ok(())
    }
}

fn component_keys(components: &[Component]) -> HashSet<ComponentKey> {
    components.iter().map(Component::key).collect()
}
