use async_trait::async_trait;
use rc_tracker::prelude::*;
use rc_tracker::release_tracking::domain::ManifestInfo;
use std::collections::HashSet;
use std::sync::{Arc, Mutex};

/// Mock ImageRegistry holding a set of published `image:tag` references
#[derive(Default, Clone)]
pub struct MockImageRegistry {
    published: Arc<Mutex<HashSet<String>>>,
}

impl MockImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes `image:latest-<sha>`
    pub fn publish(&self, image: &str, sha: &str) {
        self.published
            .lock()
            .unwrap()
            .insert(format!("{}:latest-{}", image, sha));
    }
}

#[async_trait]
impl ImageRegistry for MockImageRegistry {
    async fn find_manifest(&self, image: &str, tag: &str) -> Result<Option<ManifestInfo>> {
        let reference = format!("{}:{}", image, tag);
        let published = self.published.lock().unwrap().contains(&reference);
        Ok(published.then(|| ManifestInfo::new(Some(format!("sha256:digest-{}", tag)))))
    }
}
