//! Driven (output) ports - implemented by infrastructure.
//!
//! These traits define what the application needs from external systems.
//! The `stencil-adapters` crate provides implementations.

use std::fmt;
use std::path::Path;
use std::time::Duration;

use crate::domain::GitUrl;
use crate::error::StencilResult;

/// Port for filesystem operations.
///
/// Implemented by:
/// - `stencil_adapters::filesystem::LocalFilesystem` (production)
/// - `stencil_adapters::filesystem::MemoryFilesystem` (testing)
///
/// ## Design Notes
///
/// - `copy_tree` owns the ignore-set policy (version-control metadata,
///   virtual environments, lock files, IDE state, lint caches)
/// - Reads and writes are text-oriented where the engine needs them;
///   `copy_tree` must preserve bytes for arbitrary template content
pub trait Filesystem: Send + Sync {
    /// Read an entire file as UTF-8 text.
    fn read_to_string(&self, path: &Path) -> StencilResult<String>;

    /// Write content to a file, replacing any previous content.
    fn write(&self, path: &Path, content: &str) -> StencilResult<()>;

    /// Check if path exists.
    fn exists(&self, path: &Path) -> bool;

    /// Check if path exists and is a regular file.
    fn is_file(&self, path: &Path) -> bool;

    /// Check if path exists and is a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// Create a directory and all parent directories.
    fn create_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// Recursively copy a directory tree, skipping ignored entries and
    /// merging into an existing destination.
    fn copy_tree(&self, src: &Path, dest: &Path) -> StencilResult<()>;

    /// Rename a file or directory.
    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()>;

    /// Remove a directory and all contents.
    fn remove_dir_all(&self, path: &Path) -> StencilResult<()>;

    /// List the entry names of a directory.
    fn list_dir(&self, path: &Path) -> StencilResult<Vec<String>>;
}

/// Port for fetching a remote template.
///
/// Implemented by:
/// - `stencil_adapters::GitFetcher` (shallow `git clone`)
pub trait TemplateFetcher: Send + Sync {
    /// Shallow-clone `url` into `dest`. `dest` is created if needed and
    /// must end up non-empty.
    fn fetch(&self, url: &GitUrl, dest: &Path) -> StencilResult<()>;
}

/// One external command with its timeout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl CommandSpec {
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = impl Into<String>>,
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a completed command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
    /// The process died from SIGINT (user interrupt).
    pub interrupted: bool,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0 && !self.interrupted
    }
}

/// Port for running external commands.
///
/// Implemented by:
/// - `stencil_adapters::SystemRunner` (std::process with timeout)
///
/// A completed run returns `Ok(CommandOutput)` whatever the exit code;
/// spawn failures and timeouts are `Err`.
pub trait CommandRunner: Send + Sync {
    fn run(&self, spec: &CommandSpec, cwd: &Path) -> StencilResult<CommandOutput>;
}

// ── tests ─────────────────────────────────────────────────────────────────────
