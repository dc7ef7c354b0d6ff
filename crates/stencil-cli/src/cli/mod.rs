//! CLI argument definitions using the clap derive API.
//!
//! This module is the *only* place that knows about argument names, aliases,
//! help text, and value enums.  No business logic lives here.

use std::path::PathBuf;

use clap::{Args, Parser, ValueEnum};

use stencil_core::domain::FeatureId;

pub mod global;
pub use global::GlobalArgs;

// ── Top-level CLI ─────────────────────────────────────────────────────────────

/// Main CLI entry-point.
///
/// A single command: create a new project from a local template or a remote
/// git repository.
#[derive(Debug, Parser)]
#[command(
    name    = "stencil",
    bin_name = "stencil",
    version  = env!("CARGO_PKG_VERSION"),
    author   = env!("CARGO_PKG_AUTHORS"),
    about    = "\u{26a1} Bootstrap projects from reusable templates",
    long_about = "Stencil copies a project template, rewrites its placeholders \
                  for your project, and installs the selected feature sets.",
    after_help = "EXAMPLES:\n\
        \x20 stencil -n my_app\n\
        \x20 stencil -n my_app -t new_cli_project_template -f cli\n\
        \x20 stencil -n my_app -t https://github.com/user/template -m metadata.yaml\n\
        \x20 stencil --list-features",
)]
pub struct Cli {
    /// Flags available on every invocation.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// The create-project arguments.
    #[command(flatten)]
    pub args: CreateArgs,
}

// ── create ────────────────────────────────────────────────────────────────────

/// Arguments for creating a project.
#[derive(Debug, Args)]
pub struct CreateArgs {
    /// Project name in snake_case.
    #[arg(
        short = 'n',
        long = "project-name",
        value_name = "NAME",
        help = "Project name in snake_case"
    )]
    pub project_name: Option<String>,

    /// Template name or git URL.
    #[arg(
        short = 't',
        long = "template-name",
        value_name = "NAME_OR_URL",
        default_value = "new_cli_project_template",
        help = "Template name or git URL"
    )]
    pub template_name: String,

    /// Features to install (repeatable).
    #[arg(
        short = 'f',
        long = "features",
        value_name = "FEATURE",
        value_enum,
        help = "Features to install (repeat for more than one)"
    )]
    pub features: Option<Vec<FeatureArg>>,

    /// Path to a YAML metadata file for template customization.
    #[arg(
        short = 'm',
        long = "metadata",
        value_name = "FILE",
        help = "Path to YAML metadata file for template customization"
    )]
    pub metadata: Option<PathBuf>,

    /// List available features and exit.
    #[arg(short = 'L', long = "list-features", help = "List available features")]
    pub list_features: bool,

    /// Preview the operation without touching the filesystem.
    #[arg(short = 'P', long = "preview", help = "Preview operation")]
    pub preview: bool,
}

// ── value enums ───────────────────────────────────────────────────────────────

/// Installable features, mirrored from the core feature enumeration so the
/// clap layer owns all argument parsing concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FeatureArg {
    Base,
    Cli,
    Textual,
    #[value(name = "par-ai-core")]
    ParAiCore,
}

impl From<FeatureArg> for FeatureId {
    fn from(arg: FeatureArg) -> Self {
        match arg {
            FeatureArg::Base => FeatureId::Base,
            FeatureArg::Cli => FeatureId::Cli,
            FeatureArg::Textual => FeatureId::Textual,
            FeatureArg::ParAiCore => FeatureId::ParAiCore,
        }
    }
}

impl std::fmt::Display for FeatureArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        FeatureId::from(*self).fmt(f)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
