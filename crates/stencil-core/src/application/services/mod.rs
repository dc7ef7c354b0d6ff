//! Application services - use case orchestration.

pub mod instantiate;
pub mod projectors;
pub mod rewrite;
pub mod setup;

pub use instantiate::{DEFAULT_FILE_PATTERNS, IGNORED_ENTRIES, InstantiateService, UpdateReport};
pub use projectors::{METADATA_MARKER, Projection, generate_readme_content};
pub use rewrite::apply_replacements;
pub use setup::{FeatureInstall, FeatureOrigin, SetupPlan, SetupService};
