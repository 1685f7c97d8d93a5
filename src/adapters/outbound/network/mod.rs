/// Network adapters for the source forge and the image registry
mod caching_source_forge;
mod github_client;
mod registry_client;

pub use caching_source_forge::CachingSourceForge;
pub use github_client::{GitHubClient, DEFAULT_GITHUB_API_URL};
pub use registry_client::{ImageReference, OciRegistryClient};
