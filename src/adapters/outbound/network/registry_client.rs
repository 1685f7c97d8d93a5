use crate::ports::outbound::ImageRegistry;
use crate::release_tracking::domain::ManifestInfo;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::time::Duration;

const DOCKER_HUB_HOST: &str = "registry-1.docker.io";

/// Manifest media types accepted when probing
const MANIFEST_ACCEPT: &str = "application/vnd.docker.distribution.manifest.v2+json, \
application/vnd.docker.distribution.manifest.list.v2+json, \
application/vnd.oci.image.manifest.v1+json, \
application/vnd.oci.image.index.v1+json";

const DIGEST_HEADER: &str = "docker-content-digest";

/// Registry host plus repository path of an image name without tag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReference {
    host: String,
    path: String,
}

impl ImageReference {
    /// Splits `quay.io/org/name` into host and path.
    ///
    /// A first segment without `.` or `:` (and not `localhost`) is a
    /// Docker Hub path; single-segment names live under `library/`.
    pub fn parse(image: &str) -> Result<Self> {
        let image = image.trim();
        if image.is_empty() {
            anyhow::bail!("Image name is empty");
        }
        if image.contains('@') || image.contains("..") || image.contains(char::is_whitespace) {
            anyhow::bail!("Image name contains characters that are not allowed: {}", image);
        }

        let (first, rest) = match image.split_once('/') {
            Some((first, rest)) => (first, Some(rest)),
            None => (image, None),
        };

        let is_host = first.contains('.') || first.contains(':') || first == "localhost";
        let (host, path) = match (is_host, rest) {
            (true, Some(rest)) => (first.to_string(), rest.to_string()),
            (true, None) => anyhow::bail!("Image name has a registry host but no repository: {}", image),
            (false, Some(_)) => (DOCKER_HUB_HOST.to_string(), image.to_string()),
            (false, None) => (DOCKER_HUB_HOST.to_string(), format!("library/{}", image)),
        };

        if path.split('/').any(|segment| segment.is_empty()) {
            anyhow::bail!("Image name has an empty path segment: {}", image);
        }

        Ok(Self { host, path })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn manifest_url(&self, tag: &str) -> String {
        format!(
            "https://{}/v2/{}/manifests/{}",
            self.host,
            self.path,
            urlencoding::encode(tag)
        )
    }
}

/// OciRegistryClient adapter probing image manifests over the registry v2 API
///
/// A HEAD on the manifest endpoint is enough: 200 means the tag exists and
/// the `Docker-Content-Digest` header carries the digest. No token exchange
/// is done, so only anonymously readable repositories resolve.
pub struct OciRegistryClient {
    client: reqwest::Client,
}

impl OciRegistryClient {
    pub fn new() -> Result<Self> {
        let version = env!("CARGO_PKG_VERSION");
        let user_agent = format!("rc-tracker/{}", version);
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ImageRegistry for OciRegistryClient {
    async fn find_manifest(&self, image: &str, tag: &str) -> Result<Option<ManifestInfo>> {
        let reference = ImageReference::parse(image)?;
        let response = self
            .client
            .head(reference.manifest_url(tag))
            .header(ACCEPT, MANIFEST_ACCEPT)
            .send()
            .await?;

        if response.status() != reqwest::StatusCode::OK {
            return Ok(None);
        }

        let digest = response
            .headers()
            .get(DIGEST_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Some(ManifestInfo::new(digest)))
    }
}
