use crate::shared::error::TrackerError;
use crate::shared::Result;

/// Maximum length for one path segment of a repository identifier (security limit)
const MAX_SEGMENT_LENGTH: usize = 100;

/// Repository identifier as it appears in component descriptors and version records.
///
/// Accepted shapes:
/// - `org/repo`
/// - `org/repo/subcomponent` (one repository publishing several artifacts)
/// - forge URLs such as `https://github.com/org/repo` or `https://github.com/org/repo.git`
///
/// Tags always live on the base repository (`org/repo`), see [`RepositoryId::base`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RepositoryId {
    owner: String,
    name: String,
    subcomponent: Option<String>,
}

impl RepositoryId {
    pub fn parse(value: &str) -> Result<Self> {
        let invalid = |reason: &str| TrackerError::InvalidRepositoryId {
            value: value.to_string(),
            reason: reason.to_string(),
        };

        let trimmed = value.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"));

        let mut segments: Vec<&str> = without_scheme
            .unwrap_or(trimmed)
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        // Drop the forge host when a URL was given
        if without_scheme.is_some() && !segments.is_empty() {
            segments.remove(0);
        }

        if segments.len() < 2 {
            return Err(invalid("expected at least '<owner>/<repository>'").into());
        }

        for segment in &segments {
            if segment.len() > MAX_SEGMENT_LENGTH {
                return Err(invalid("path segment is too long").into());
            }
            if *segment == "." || *segment == ".." {
                return Err(invalid("relative path segments are not allowed").into());
            }
            if !segment
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
            {
                return Err(invalid(
                    "only alphanumeric characters, hyphens, underscores and dots are allowed",
                )
                .into());
            }
        }

        let owner = segments[0].to_string();
        let name = segments[1].trim_end_matches(".git").to_string();
        let subcomponent = if segments.len() > 2 {
            Some(segments[2..].join("/"))
        } else {
            None
        };

        Ok(Self {
            owner,
            name,
            subcomponent,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn subcomponent(&self) -> Option<&str> {
        self.subcomponent.as_deref()
    }

    /// The `owner/repo` slug, with any sub-artifact segment stripped
    pub fn base(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

impl std::fmt::Display for RepositoryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.subcomponent {
            Some(sub) => write!(f, "{}/{}/{}", self.owner, self.name, sub),
            None => write!(f, "{}/{}", self.owner, self.name),
        }
    }
}

/// Derives the base repository slug from a component identifier.
pub fn extract_base_repo(identifier: &str) -> Result<String> {
    Ok(RepositoryId::parse(identifier)?.base())
}
