//! Error types for moai-platform.

use std::path::PathBuf;

use thiserror::Error;

//--------------------------------------------------------------------------------------------------
// Types
//--------------------------------------------------------------------------------------------------

/// Result type for moai-platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Error type for moai-platform operations.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Config kind name that is not one of `mcp`, `statusline`, `claude_settings`.
    #[error("Unknown config kind: {0}")]
    UnknownKind(String),

    /// The directory a target file should live in does not exist.
    #[error("Parent directory does not exist: {}", .0.display())]
    MissingParentDirectory(PathBuf),

    /// Target path has no file name component.
    #[error("Invalid target path: {}", .0.display())]
    InvalidTarget(PathBuf),

    /// Target file does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Rollback was requested but no backup exists for the target.
    #[error("No backup found for {}", .0.display())]
    NoBackup(PathBuf),

    /// Base directory for a setup run does not exist.
    #[error("Directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),

    /// Setup refused because the detected platform is not supported.
    #[error("Unsupported platform: {0}")]
    UnsupportedPlatform(String),

    /// One or more artifacts failed to apply.
    #[error("Failed to apply: {0}")]
    ApplyFailed(String),

    /// Document does not have the shape its kind requires.
    #[error("Invalid {kind} document: {issues}")]
    InvalidDocument { kind: String, issues: String },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error.
    #[error("{0}")]
    Generic(String),
}

//--------------------------------------------------------------------------------------------------
// Trait Implementations
//--------------------------------------------------------------------------------------------------

impl From<anyhow::Error> for PlatformError {
    fn from(err: anyhow::Error) -> Self {
        PlatformError::Generic(format!("{:#}", err))
    }
}
