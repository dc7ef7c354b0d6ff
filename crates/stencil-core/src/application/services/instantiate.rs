//! Instantiation orchestration - copy, rename, rewrite, project.
//!
//! `InstantiateService` owns the filesystem port and walks one template
//! instantiation from validated inputs to a rewritten project tree. File
//! updates are strictly ordered: one file is fully read, transformed and
//! written before the next begins. There is no rollback - interruption
//! leaves whatever partial state existed.

use std::path::{Path, PathBuf};

use tracing::{info, instrument, warn};

use crate::application::error::ApplicationError;
use crate::application::ports::Filesystem;
use crate::application::services::projectors::{
    Projection, update_env, update_pyproject, update_readme,
};
use crate::application::services::rewrite::apply_replacements;
use crate::domain::{ReplacementTable, TemplateMetadata};
use crate::error::StencilResult;

/// Directory and file names excluded from template copies.
pub const IGNORED_ENTRIES: &[&str] = &[".git", ".venv", "uv.lock", ".idea", ".ruff_cache"];

/// Well-known files rewritten in every instantiation, in order.
/// Overridable per run via the CLI's file-pattern configuration.
pub const DEFAULT_FILE_PATTERNS: &[&str] = &[
    ".env",
    "README.md",
    "Makefile",
    "pyproject.toml",
    "demo.tape",
    "CLAUDE.md",
    "src/{project_name}/__init__.py",
    "src/{project_name}/__main__.py",
    "src/{project_name}/ai_utils.py",
    "src/{project_name}/config.py",
    "src/{project_name}/logging_config.py",
    ".github-disabled/workflows/build.yml",
    ".github-disabled/workflows/publish.yml",
    ".github-disabled/workflows/publish-dev.yml",
    ".github-disabled/workflows/release.yml",
];

/// Result of one file-update pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Files from the pattern list that existed and were scanned.
    pub files_visited: usize,
    /// Files whose content actually changed.
    pub files_changed: usize,
    pub readme: Projection,
    pub pyproject: Projection,
    pub env: Projection,
}

/// Main instantiation service.
pub struct InstantiateService {
    fs: Box<dyn Filesystem>,
}

impl InstantiateService {
    pub fn new(fs: Box<dyn Filesystem>) -> Self {
        Self { fs }
    }

    /// Validate template and destination before any mutation.
    ///
    /// A non-empty destination is a warning, not an error - existing files
    /// may be overwritten, matching the copy semantics.
    pub fn validate_setup(
        &self,
        template_dir: &Path,
        project_location: &Path,
        is_remote: bool,
    ) -> StencilResult<()> {
        if !self.fs.exists(template_dir) {
            return Err(ApplicationError::TemplateNotFound {
                path: template_dir.to_path_buf(),
            }
            .into());
        }
        if !self.fs.is_dir(template_dir) {
            return Err(ApplicationError::TemplateNotADirectory {
                path: template_dir.to_path_buf(),
            }
            .into());
        }

        if !is_remote && template_dir == project_location {
            return Err(ApplicationError::LocationConflict {
                path: project_location.to_path_buf(),
                reason: "template and project directories cannot be the same".into(),
            }
            .into());
        }

        if self.fs.exists(project_location) {
            if self.fs.is_file(project_location) {
                return Err(ApplicationError::LocationConflict {
                    path: project_location.to_path_buf(),
                    reason: "project location exists as a file".into(),
                }
                .into());
            }
            if let Ok(entries) = self.fs.list_dir(project_location)
                && !entries.is_empty()
            {
                warn!(
                    path = %project_location.display(),
                    entries = entries.len(),
                    "Project directory already exists and is not empty; files may be overwritten"
                );
            }
        }

        if let Some(parent) = project_location.parent()
            && !parent.as_os_str().is_empty()
            && !self.fs.exists(parent)
        {
            self.fs.create_dir_all(parent)?;
        }

        Ok(())
    }

    /// Recursively copy the template into the project location.
    #[instrument(skip(self))]
    pub fn copy_template(&self, template_dir: &Path, project_location: &Path) -> StencilResult<()> {
        self.fs.copy_tree(template_dir, project_location)?;
        info!("Template copied successfully");
        Ok(())
    }

    /// Rename `src/<template_name>` to `src/<project_name>`.
    #[instrument(skip(self, project_location))]
    pub fn rename_src_dir(
        &self,
        project_location: &Path,
        template_name: &str,
        project_name: &str,
    ) -> StencilResult<()> {
        let template_src = project_location.join("src").join(template_name);
        let new_src = project_location.join("src").join(project_name);

        if !self.fs.is_dir(&template_src) {
            // Suggest what is actually there to rename.
            let available = self
                .fs
                .list_dir(&project_location.join("src"))
                .unwrap_or_default();
            return Err(ApplicationError::SrcDirNotFound {
                path: template_src,
                available,
            }
            .into());
        }

        if self.fs.exists(&new_src) {
            return Err(ApplicationError::LocationConflict {
                path: new_src,
                reason: "cannot rename to existing directory".into(),
            }
            .into());
        }

        self.fs.rename(&template_src, &new_src)?;
        info!(from = template_name, to = project_name, "Renamed src directory");
        Ok(())
    }

    /// Expand the file-pattern list against the project name, appending any
    /// metadata-declared additional files.
    pub fn expand_patterns(
        patterns: &[String],
        project_name: &str,
        metadata: Option<&TemplateMetadata>,
    ) -> Vec<PathBuf> {
        let additional = metadata
            .map(|m| m.additional_files.as_slice())
            .unwrap_or_default();

        patterns
            .iter()
            .map(String::as_str)
            .chain(additional.iter().map(String::as_str))
            .map(|pattern| PathBuf::from(pattern.replace("{project_name}", project_name)))
            .collect()
    }

    /// Rewrite template placeholders across the project's files, then run
    /// the metadata projectors.
    ///
    /// `observer` is invoked once per pattern-listed file (present or not)
    /// so the caller can render progress without owning the loop.
    #[instrument(skip_all, fields(project = %project_name))]
    pub fn update_files(
        &self,
        project_location: &Path,
        template_name: &str,
        project_name: &str,
        metadata: Option<&TemplateMetadata>,
        patterns: &[String],
        mut observer: impl FnMut(&Path),
    ) -> StencilResult<UpdateReport> {
        let mut table = ReplacementTable::for_rename(template_name, project_name);
        if let Some(metadata) = metadata {
            table = table.with_metadata(metadata);
        }

        let files = Self::expand_patterns(patterns, project_name, metadata);

        let mut report = UpdateReport {
            files_visited: 0,
            files_changed: 0,
            readme: Projection::Skipped,
            pyproject: Projection::Skipped,
            env: Projection::Skipped,
        };

        for file in &files {
            let path = project_location.join(file);
            observer(&path);
            if !self.fs.exists(&path) {
                continue;
            }
            report.files_visited += 1;
            if apply_replacements(self.fs.as_ref(), &path, &table)? {
                report.files_changed += 1;
            }
        }

        // Projectors are enhancements, not core requirements: their own
        // failures downgrade to warnings and the run continues.
        if let Some(metadata) = metadata {
            report.readme = self.project_best_effort("README.md", || {
                update_readme(self.fs.as_ref(), project_location, metadata, project_name)
            });
            report.pyproject = self.project_best_effort("pyproject.toml", || {
                update_pyproject(self.fs.as_ref(), project_location, metadata)
            });
            report.env = self.project_best_effort(".env", || {
                update_env(self.fs.as_ref(), project_location, metadata)
            });
        }

        info!(
            visited = report.files_visited,
            changed = report.files_changed,
            "File update pass complete"
        );

        Ok(report)
    }

    fn project_best_effort(
        &self,
        target: &str,
        run: impl FnOnce() -> StencilResult<Projection>,
    ) -> Projection {
        match run() {
            Ok(projection) => projection,
            Err(e) => {
                warn!(target, error = %e, "Metadata projection failed, continuing");
                Projection::Skipped
            }
        }
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
