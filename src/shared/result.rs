/// Crate-wide result type; errors are `anyhow::Error` carrying a
/// [`TrackerError`](crate::shared::error::TrackerError) where callers need to branch on the cause.
pub type Result<T> = std::result::Result<T, anyhow::Error>;
