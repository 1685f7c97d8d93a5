/// One component pin inside a named version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionComponent {
    repository: String,
    git_ref: String,
    image_url: Option<String>,
}

impl VersionComponent {
    pub fn new(repository: String, git_ref: String, image_url: Option<String>) -> Self {
        Self {
            repository,
            git_ref,
            image_url,
        }
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// A named, externally curated release: the input of tag reconciliation.
///
/// Read-only to rc-tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionRecord {
    name: String,
    components: Vec<VersionComponent>,
}

impl VersionRecord {
    pub fn new(name: String, components: Vec<VersionComponent>) -> Self {
        Self { name, components }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn components(&self) -> &[VersionComponent] {
        &self.components
    }
}
