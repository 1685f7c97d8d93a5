use crate::release_tracking::domain::ManifestInfo;
use crate::shared::Result;
use async_trait::async_trait;

/// ImageRegistry port for container registry lookups
#[async_trait]
pub trait ImageRegistry: Send + Sync {
    /// Probes the manifest of `image:tag`.
    ///
    /// # Returns
    /// `Some` when the registry answers 200, `None` for any other status.
    ///
    /// # Errors
    /// Transport failures (DNS, timeout, TLS). Callers treat these as "absent".
    async fn find_manifest(&self, image: &str, tag: &str) -> Result<Option<ManifestInfo>>;
}
