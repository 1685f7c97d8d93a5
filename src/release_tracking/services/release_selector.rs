use crate::release_tracking::domain::Release;

/// ReleaseSelector - picks the qualifying release from a newest-first listing
///
/// Pure logic, no I/O. A release qualifies when its tag starts with the
/// configured prefix and it is not flagged as a prerelease.
pub struct ReleaseSelector;

impl ReleaseSelector {
    /// Returns the first qualifying release.
    ///
    /// `releases` must be ordered newest first. Prereleases are skipped no
    /// matter how recent they are.
    pub fn select<'a>(releases: &'a [Release], prefix: &str) -> Option<&'a Release> {
        releases
            .iter()
            .find(|release| !release.is_prerelease() && release.tag_name().starts_with(prefix))
    }
}
