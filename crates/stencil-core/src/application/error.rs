//! Application layer errors.
//!
//! These errors represent failures in orchestration, not business logic.
//! Business logic errors are `DomainError` from `crate::domain`.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::ErrorCategory;

/// How a remote clone failed, classified from the tool's diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloneFailureKind {
    Authentication,
    NotFound,
    Network,
    Timeout,
    Other,
}

/// Errors that occur during application orchestration.
#[derive(Debug, Error, Clone)]
pub enum ApplicationError {
    /// Template directory missing or unusable.
    #[error("Template directory not found: {path}")]
    TemplateNotFound { path: PathBuf },

    #[error("Template path is not a directory: {path}")]
    TemplateNotADirectory { path: PathBuf },

    /// Destination conflicts (exists as file, clobbers template, etc).
    #[error("Invalid project location {path}: {reason}")]
    LocationConflict { path: PathBuf, reason: String },

    /// Template src subtree missing at rename time.
    #[error("Template src directory not found: {path}")]
    SrcDirNotFound {
        path: PathBuf,
        available: Vec<String>,
    },

    /// Filesystem operation failed.
    #[error("Filesystem error at {path}: {reason}")]
    FilesystemError { path: PathBuf, reason: String },

    /// Remote clone failed.
    #[error("Failed to clone repository {url}")]
    CloneFailed {
        url: String,
        kind: CloneFailureKind,
        detail: String,
    },

    /// A required external tool is not on PATH.
    #[error("Required tool not found: {tool}")]
    ToolMissing { tool: &'static str },

    /// An external command exited non-zero.
    #[error("Command failed: {command} (exit code {exit_code})")]
    CommandFailed {
        command: String,
        exit_code: i32,
        stdout: String,
        stderr: String,
    },

    /// An external command exceeded its timeout.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    CommandTimeout { command: String, timeout_secs: u64 },

    /// An external command was interrupted by the user.
    #[error("Command interrupted: {command}")]
    CommandInterrupted { command: String },
}

impl ApplicationError {
    /// Get user-actionable suggestions.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TemplateNotFound { path } => vec![
                format!("Expected location: {}", path.display()),
                "Check the template name, or configure STENCIL_REPO_DIR".into(),
            ],
            Self::SrcDirNotFound { path, available } => {
                let mut suggestions = vec![format!("Expected to find: {}", path.display())];
                if !available.is_empty() {
                    suggestions.push(format!(
                        "Available directories in src/: {}",
                        available.join(", ")
                    ));
                }
                suggestions
            }
            Self::LocationConflict { path, .. } => vec![
                format!("Conflicting path: {}", path.display()),
                "Choose a different project name".into(),
            ],
            Self::FilesystemError { path, .. } => vec![
                format!("Failed to access: {}", path.display()),
                "Check that you have write permissions".into(),
                "Ensure the parent directory exists".into(),
            ],
            Self::CloneFailed { kind, .. } => match kind {
                CloneFailureKind::Authentication => vec![
                    "Check if the repository is public".into(),
                    "Verify your Git credentials are configured".into(),
                ],
                CloneFailureKind::NotFound => vec![
                    "Verify the repository URL is correct".into(),
                    "Check if the repository exists and is accessible".into(),
                ],
                CloneFailureKind::Network => vec![
                    "Check your internet connection".into(),
                    "Try again later if the server is temporarily unavailable".into(),
                ],
                CloneFailureKind::Timeout => vec![
                    "Check your internet connection speed".into(),
                    "The repository might be very large".into(),
                ],
                CloneFailureKind::Other => vec!["Check the error output above".into()],
            },
            Self::ToolMissing { tool } => vec![
                format!("Please install {tool} and ensure it's in your PATH"),
            ],
            Self::CommandFailed { command, .. } => {
                let mut suggestions = vec!["Check the command output above for details".into()];
                if command.starts_with("uv") {
                    suggestions.push("Check if uv is properly installed and up to date".into());
                    suggestions.push("Verify pyproject.toml syntax is correct".into());
                    suggestions.push("Check network connectivity for package downloads".into());
                } else if command.starts_with("git") {
                    suggestions.push("Check if directory is already a git repository".into());
                    suggestions.push("Verify write permissions in the directory".into());
                }
                suggestions
            }
            Self::CommandTimeout { command, .. } if command.starts_with("uv") => vec![
                "Package installation may be taking longer than expected".into(),
                "Consider checking network connectivity".into(),
            ],
            Self::CommandTimeout { .. } => vec!["Try the command manually to diagnose".into()],
            Self::CommandInterrupted { .. } => vec![
                "Operation was cancelled".into(),
                "The project directory may be partially created".into(),
            ],
            Self::TemplateNotADirectory { .. } => {
                vec!["The template path must be a directory".into()]
            }
        }
    }

    /// Get error category.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::TemplateNotFound { .. } | Self::SrcDirNotFound { .. } => ErrorCategory::NotFound,
            Self::TemplateNotADirectory { .. } | Self::LocationConflict { .. } => {
                ErrorCategory::Validation
            }
            Self::FilesystemError { .. }
            | Self::CloneFailed { .. }
            | Self::CommandFailed { .. }
            | Self::CommandTimeout { .. }
            | Self::CommandInterrupted { .. } => ErrorCategory::Internal,
            Self::ToolMissing { .. } => ErrorCategory::Configuration,
        }
    }
}
