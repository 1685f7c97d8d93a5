use serde::Serialize;

/// Strategy that selected a component's version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VersioningMechanism {
    /// Newest non-prerelease release whose tag matches a prefix
    Release,
    /// Newest commit with a published container image
    Commit,
}

impl VersioningMechanism {
    pub fn as_str(&self) -> &'static str {
        match self {
            VersioningMechanism::Release => "release",
            VersioningMechanism::Commit => "commit",
        }
    }
}

impl std::fmt::Display for VersioningMechanism {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity used when comparing component sets: repository, ref and image URL
pub type ComponentKey = (String, String, Option<String>);

/// Component descriptor - one resolved artifact inside a snapshot.
///
/// Immutable once produced by a scan. Field order matches the persisted layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Component {
    repository: String,
    #[serde(rename = "ref")]
    git_ref: String,
    name: String,
    versioning_selection_mechanism: VersioningMechanism,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_digest: Option<String>,
}

impl Component {
    pub fn new(
        repository: String,
        git_ref: String,
        name: String,
        versioning_selection_mechanism: VersioningMechanism,
        image_url: Option<String>,
        image_digest: Option<String>,
    ) -> Self {
        Self {
            repository,
            git_ref,
            name,
            versioning_selection_mechanism,
            image_url,
            image_digest,
        }
    }

    /// A component pinned to a release tag of `repository`
    pub fn release(repository: &str, tag: &str) -> Self {
        Self::new(
            repository.to_string(),
            tag.to_string(),
            repository.to_string(),
            VersioningMechanism::Release,
            None,
            None,
        )
    }

    /// A component pinned to a commit whose image `image` was published as `image:tag`
    pub fn commit_image(
        repository: &str,
        commit_sha: &str,
        image: &str,
        tag: &str,
        image_digest: Option<String>,
    ) -> Self {
        Self::new(
            repository.to_string(),
            commit_sha.to_string(),
            image_component_name(repository, image),
            VersioningMechanism::Commit,
            Some(format!("{}:{}", image, tag)),
            image_digest,
        )
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    pub fn git_ref(&self) -> &str {
        &self.git_ref
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn versioning_selection_mechanism(&self) -> VersioningMechanism {
        self.versioning_selection_mechanism
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn image_digest(&self) -> Option<&str> {
        self.image_digest.as_deref()
    }

    pub fn key(&self) -> ComponentKey {
        (
            self.repository.clone(),
            self.git_ref.clone(),
            self.image_url.clone(),
        )
    }
}

/// `<owner>/<image basename>`, e.g. `openshift/assisted-installer-controller`
/// for image `quay.io/edge-infrastructure/assisted-installer-controller` of
/// repository `openshift/assisted-installer`.
pub fn image_component_name(repository: &str, image: &str) -> String {
    let owner = repository.split('/').next().unwrap_or(repository);
    let basename = image.rsplit('/').next().unwrap_or(image);
    format!("{}/{}", owner, basename)
}
