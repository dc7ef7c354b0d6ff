//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value.  The
//! CLI layer owns config; the core crate never sees it.
//!
//! # Resolution order (highest priority first)
//!
//! 1. Environment variables (`STENCIL_FILE_PATTERNS`, `STENCIL_REPO_DIR`,
//!    `STENCIL_REPO_PATHS`)
//! 2. Built-in defaults (always present)

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use stencil_core::application::DEFAULT_FILE_PATTERNS;

/// Default locations searched for the template repository directory.
pub const DEFAULT_REPO_PATHS: &[&str] = &["~/Repos", "d:\\Repos", "c:\\Repos", "Repos"];

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Explicit template repository directory (STENCIL_REPO_DIR).
    pub repo_dir: Option<PathBuf>,
    /// Candidate repository directories, first existing wins.
    pub repo_paths: Vec<String>,
    /// Path templates rewritten during instantiation.
    pub file_patterns: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            repo_dir: None,
            repo_paths: DEFAULT_REPO_PATHS.iter().map(|s| s.to_string()).collect(),
            file_patterns: DEFAULT_FILE_PATTERNS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the environment, starting from defaults.
    pub fn load() -> Self {
        let mut config = Self::default();

        if let Ok(repo_dir) = std::env::var("STENCIL_REPO_DIR")
            && !repo_dir.trim().is_empty()
        {
            config.repo_dir = Some(expand_home(repo_dir.trim()));
        }

        if let Ok(paths) = std::env::var("STENCIL_REPO_PATHS")
            && !paths.trim().is_empty()
        {
            config.repo_paths = paths.split(',').map(|p| p.trim().to_string()).collect();
        }

        if let Ok(patterns) = std::env::var("STENCIL_FILE_PATTERNS")
            && !patterns.trim().is_empty()
        {
            config.file_patterns = patterns.split(',').map(String::from).collect();
        }

        config
    }

    /// Locate the template repository directory.
    ///
    /// The explicit override wins when it exists; otherwise the first
    /// existing candidate from the search path is used.
    pub fn find_repo_dir(&self) -> Option<PathBuf> {
        if let Some(repo_dir) = &self.repo_dir
            && repo_dir.exists()
        {
            return Some(repo_dir.clone());
        }

        self.repo_paths
            .iter()
            .map(|p| expand_home(p))
            .find(|p| p.exists())
    }
}

/// Expand a leading `~/` against the user's home directory.
fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(dirs) = directories::UserDirs::new()
    {
        return dirs.home_dir().join(rest);
    }
    PathBuf::from(path)
}

// ── tests ─────────────────────────────────────────────────────────────────────
