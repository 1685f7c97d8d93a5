use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let the CI job that drives rc-tracker tell a failed
/// test run apart from a broken invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success - scan finished, snapshot tested successfully, or tags ensured
    Success = 0,
    /// The external test action reported failure for the processed snapshot
    TestsFailed = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (invalid input file, API error, missing snapshot, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::TestsFailed => write!(f, "Tests Failed (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for release candidate tracking.
///
/// Variants exist for the failures a caller has to tell apart; anything
/// else travels as a plain `anyhow::Error` with context attached.
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Snapshot log not found: {path}\n\n💡 Hint: Run `rc-tracker scan` first, or point --file at an existing release-candidates file")]
    SnapshotLogNotFound { path: PathBuf },

    #[error("Failed to parse snapshot log: {path}\nDetails: {details}\n\n💡 Hint: The file must contain a top-level 'snapshots' list")]
    SnapshotLogParseError { path: PathBuf, details: String },

    #[error("Invalid versions file: {path}\nDetails: {details}\n\n💡 Hint: The file must contain a top-level 'versions' list")]
    InvalidVersionsFile { path: PathBuf, details: String },

    #[error("Snapshot not found: {id}")]
    SnapshotNotFound { id: String },

    #[error("Invalid status transition for snapshot {id}: {from} -> {to}\n\n💡 Hint: Only pending snapshots can be marked successful or failed, and only once")]
    InvalidTransition { id: String, from: String, to: String },

    #[error("Invalid repository identifier: '{value}'\nReason: {reason}")]
    InvalidRepositoryId { value: String, reason: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },

    /// Validation error for configuration and value objects
    #[error("Validation error: {message}")]
    Validation { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_values() {
        assert_eq!(ExitCode::Success.as_i32(), 0);
        assert_eq!(ExitCode::TestsFailed.as_i32(), 1);
        assert_eq!(ExitCode::InvalidArguments.as_i32(), 2);
        assert_eq!(ExitCode::ApplicationError.as_i32(), 3);
    }

    #[test]
    fn test_exit_code_display() {
        assert_eq!(format!("{}", ExitCode::Success), "Success (0)");
        assert_eq!(format!("{}", ExitCode::TestsFailed), "Tests Failed (1)");
        assert_eq!(
            format!("{}", ExitCode::ApplicationError),
            "Application Error (3)"
        );
    }

    #[test]
    fn test_snapshot_log_not_found_display() {
        let error = TrackerError::SnapshotLogNotFound {
            path: PathBuf::from("/work/release-candidates.yaml"),
        };
        let display = format!("{}", error);
        assert!(display.contains("Snapshot log not found"));
        assert!(display.contains("/work/release-candidates.yaml"));
        assert!(display.contains("💡 Hint:"));
    }

    #[test]
    fn test_invalid_transition_display() {
        let error = TrackerError::InvalidTransition {
            id: "2025-03-10T10:00:00Z".to_string(),
            from: "failed".to_string(),
            to: "pending".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("failed -> pending"));
        assert!(display.contains("2025-03-10T10:00:00Z"));
    }

    #[test]
    fn test_security_error_display() {
        let error = TrackerError::SecurityError {
            path: PathBuf::from("/test/symlink"),
            reason: "Symbolic links are not allowed".to_string(),
            hint: "Use a regular file instead".to_string(),
        };
        let display = format!("{}", error);
        assert!(display.contains("Security violation"));
        assert!(display.contains("Use a regular file instead"));
    }

    #[test]
    fn test_downcast_from_anyhow() {
        let err: anyhow::Error = TrackerError::SnapshotNotFound {
            id: "abc".to_string(),
        }
        .into();
        assert!(matches!(
            err.downcast_ref::<TrackerError>(),
            Some(TrackerError::SnapshotNotFound { .. })
        ));
    }
}
