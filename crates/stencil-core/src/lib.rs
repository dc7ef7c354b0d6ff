//! Stencil Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for the Stencil
//! project bootstrapping tool, following hexagonal (ports and adapters)
//! architecture.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │          stencil-cli (CLI)              │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (InstantiateService, SetupService, ...) │
//! │         Orchestrates Use Cases          │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │  (Driven: Filesystem, Fetcher, Runner)  │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │     stencil-adapters (Infrastructure)   │
//! │  (LocalFilesystem, GitFetcher, etc.)    │
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │        Domain Layer (Pure Logic)        │
//! │ (TemplateMetadata, FeatureId, Variants) │
//! │         No External Dependencies        │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::path::Path;
//! use stencil_core::{
//!     application::InstantiateService,
//!     domain::{ReplacementTable, TemplateMetadata},
//! };
//!
//! // 1. Load metadata and build the replacement table
//! let metadata = TemplateMetadata::load(Path::new("metadata.yaml")).unwrap();
//! let table = ReplacementTable::for_rename("my_template", "my_app").with_metadata(&metadata);
//!
//! // 2. Use the application service (with an injected filesystem adapter)
//! let service = InstantiateService::new(filesystem);
//! service.copy_template(Path::new("/repos/my_template"), Path::new("/repos/my_app")).unwrap();
//! ```

// Re-export domain layer (stable, well-defined API)
pub mod domain;

// Re-export application layer (orchestration logic)
pub mod application;

// Re-export error types
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        InstantiateService, SetupPlan, SetupService, UpdateReport,
        ports::{CommandRunner, CommandSpec, Filesystem, TemplateFetcher},
    };
    pub use crate::domain::{
        CaseVariants, FeatureId, GitUrl, PackageSpec, ReplacementTable, TemplateMetadata,
        TemplateSource,
    };
    pub use crate::error::{StencilError, StencilResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
