/// A published release as listed by the source forge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Release {
    tag_name: String,
    target_commitish: String,
    prerelease: bool,
}

impl Release {
    pub fn new(tag_name: impl Into<String>, target_commitish: impl Into<String>, prerelease: bool) -> Self {
        Self {
            tag_name: tag_name.into(),
            target_commitish: target_commitish.into(),
            prerelease,
        }
    }

    pub fn tag_name(&self) -> &str {
        &self.tag_name
    }

    /// Branch or commit the release tag was cut from
    pub fn target_commitish(&self) -> &str {
        &self.target_commitish
    }

    pub fn is_prerelease(&self) -> bool {
        self.prerelease
    }
}

/// A commit on the default branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    sha: String,
}

impl Commit {
    pub fn new(sha: impl Into<String>) -> Self {
        Self { sha: sha.into() }
    }

    pub fn sha(&self) -> &str {
        &self.sha
    }
}

/// Registry answer for an existing manifest
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ManifestInfo {
    digest: Option<String>,
}

impl ManifestInfo {
    pub fn new(digest: Option<String>) -> Self {
        Self { digest }
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }
}
