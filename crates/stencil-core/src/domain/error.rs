// ============================================================================
// domain/error.rs - COMPREHENSIVE ERROR DOMAIN
// ============================================================================

use std::path::PathBuf;
use thiserror::Error;

/// Root domain error type.
///
/// All errors are:
/// - Cloneable (for retry logic)
/// - Categorizable (for CLI display)
/// - Actionable (provides suggestions)
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    // ========================================================================
    // Metadata Errors (400-level equivalent)
    // ========================================================================
    #[error("Metadata file not found: {path}")]
    MetadataNotFound { path: PathBuf },

    #[error("Metadata path is not a file: {path}")]
    MetadataNotAFile { path: PathBuf },

    #[error("Cannot read metadata file {path}: {reason}")]
    MetadataUnreadable { path: PathBuf, reason: String },

    #[error("Invalid metadata format: {reason}")]
    MetadataFormat { reason: String },

    #[error("Invalid {section} section: expected {expected}")]
    InvalidSection {
        section: &'static str,
        expected: &'static str,
    },

    #[error("Invalid badge {index}: {reason}")]
    InvalidBadge { index: usize, reason: String },

    // ========================================================================
    // Template Source Errors
    // ========================================================================
    #[error("Empty git URL provided")]
    EmptyGitUrl,

    #[error("Invalid git URL '{url}': {reason}")]
    InvalidGitUrl { url: String, reason: String },

    // ========================================================================
    // Feature Graph Errors
    // ========================================================================
    #[error("Malformed feature graph: {detail}")]
    MalformedFeatureGraph { detail: String },
}

impl DomainError {
    /// Get user-actionable suggestions for fixing this error.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::MetadataNotFound { path } => vec![
                format!("Expected file at: {}", path.display()),
                "Check the path passed via --metadata".into(),
            ],
            Self::MetadataFormat { reason } => vec![
                format!("Details: {}", reason),
                "The metadata file must be a YAML object".into(),
            ],
            Self::InvalidSection { section, expected } => vec![
                format!("The '{}' section must be {}", section, expected),
                "Fix the metadata file and try again".into(),
            ],
            Self::InvalidBadge { index, .. } => vec![
                format!("Badge {} is malformed", index),
                "Each badge requires 'name' and 'url' fields".into(),
            ],
            Self::InvalidGitUrl { .. } => vec![
                "Supported formats:".into(),
                "  • https://github.com/username/repository".into(),
                "  • https://gitlab.com/username/repository".into(),
                "  • https://bitbucket.org/username/repository".into(),
                "  • https://your-git-server.com/path/repository".into(),
            ],
            Self::MalformedFeatureGraph { detail } => vec![
                format!("Details: {}", detail),
                "This is a build-time defect in the feature tables".into(),
            ],
            _ => vec!["See documentation for more details".into()],
        }
    }

    /// Error category for CLI display styling.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MetadataNotFound { .. } | Self::MetadataNotAFile { .. } => ErrorCategory::NotFound,
            Self::MetadataUnreadable { .. } => ErrorCategory::Internal,
            Self::MetadataFormat { .. }
            | Self::InvalidSection { .. }
            | Self::InvalidBadge { .. }
            | Self::EmptyGitUrl
            | Self::InvalidGitUrl { .. } => ErrorCategory::Validation,
            Self::MalformedFeatureGraph { .. } => ErrorCategory::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    NotFound,
    Internal,
}
