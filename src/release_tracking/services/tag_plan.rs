use crate::release_tracking::domain::{RepositoryId, VersionRecord};

/// One tag that must exist: `version` on `repository` pointing at `sha`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagTarget {
    pub repository: String,
    pub sha: String,
}

/// Two components of one version claim different refs for the same base repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefConflict {
    pub repository: String,
    pub kept: String,
    pub ignored: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagPlan {
    pub targets: Vec<TagTarget>,
    pub conflicts: Vec<RefConflict>,
    /// Components whose repository identifier could not be parsed, with the reason
    pub invalid: Vec<(String, String)>,
}

/// TagPlanner - reduces a version record to one tag target per base repository
pub struct TagPlanner;

impl TagPlanner {
    /// Sub-artifact identifiers (`org/repo/sub`) collapse onto `org/repo`.
    /// The first component seen for a base repository wins.
    pub fn plan(record: &VersionRecord) -> TagPlan {
        let mut plan = TagPlan::default();

        for component in record.components() {
            let base = match RepositoryId::parse(component.repository()) {
                Ok(id) => id.base(),
                Err(e) => {
                    plan.invalid
                        .push((component.repository().to_string(), e.to_string()));
                    continue;
                }
            };

            match plan.targets.iter().find(|t| t.repository == base) {
                Some(existing) => {
                    if existing.sha != component.git_ref() {
                        plan.conflicts.push(RefConflict {
                            repository: base,
                            kept: existing.sha.clone(),
                            ignored: component.git_ref().to_string(),
                        });
                    }
                }
                None => plan.targets.push(TagTarget {
                    repository: base,
                    sha: component.git_ref().to_string(),
                }),
            }
        }

        plan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::release_tracking::domain::VersionComponent;

    fn component(repository: &str, git_ref: &str) -> VersionComponent {
        VersionComponent::new(repository.to_string(), git_ref.to_string(), None)
    }

    #[test]
    fn test_collapses_subcomponents_onto_base_repo() {
        let record = VersionRecord::new(
            "v0.1.0".to_string(),
            vec![
                component("openshift/assisted-installer", "c389a38"),
                component("openshift/assisted-installer/controller", "c389a38"),
                component("kubernetes-sigs/cluster-api", "v1.9.5"),
            ],
        );

        let plan = TagPlanner::plan(&record);
        assert_eq!(plan.targets.len(), 2);
        assert_eq!(plan.targets[0].repository, "openshift/assisted-installer");
        assert!(plan.conflicts.is_empty());
    }

    #[test]
    fn test_conflicting_refs_keep_first() {
        let record = VersionRecord::new(
            "v0.1.0".to_string(),
            vec![
                component("openshift/assisted-installer/controller", "aaa"),
                component("openshift/assisted-installer", "bbb"),
            ],
        );

        let plan = TagPlanner::plan(&record);
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.targets[0].sha, "aaa");
        assert_eq!(
            plan.conflicts,
            vec![RefConflict {
                repository: "openshift/assisted-installer".to_string(),
                kept: "aaa".to_string(),
                ignored: "bbb".to_string(),
            }]
        );
    }

    #[test]
    fn test_invalid_repository_is_reported() {
        let record = VersionRecord::new(
            "v0.1.0".to_string(),
            vec![component("not-a-repo", "abc"), component("org/repo", "abc")],
        );

        let plan = TagPlanner::plan(&record);
        assert_eq!(plan.targets.len(), 1);
        assert_eq!(plan.invalid.len(), 1);
        assert_eq!(plan.invalid[0].0, "not-a-repo");
    }
}
