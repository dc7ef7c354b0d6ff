//! Application layer for Stencil.
//!
//! This layer contains:
//! - **Services**: Use case orchestration (InstantiateService, SetupService)
//! - **Ports**: Interface definitions (traits) for external dependencies
//! - **Errors**: Application-specific error types
//!
//! The application layer coordinates the domain layer but contains no
//! business logic itself. All business rules live in `crate::domain`.

pub mod error;
pub mod ports;
pub mod services;

// Re-export main services
pub use services::{
    DEFAULT_FILE_PATTERNS, FeatureInstall, FeatureOrigin, IGNORED_ENTRIES, InstantiateService,
    METADATA_MARKER, Projection, SetupPlan, SetupService, UpdateReport, apply_replacements,
    generate_readme_content,
};

// Re-export port traits (for adapter implementation)
pub use ports::{CommandOutput, CommandRunner, CommandSpec, Filesystem, TemplateFetcher};

pub use error::{ApplicationError, CloneFailureKind};
