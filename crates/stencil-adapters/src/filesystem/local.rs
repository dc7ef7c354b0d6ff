//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use tracing::trace;
use walkdir::WalkDir;

use stencil_core::application::IGNORED_ENTRIES;
use stencil_core::{application::ports::Filesystem, error::StencilResult};

/// Production filesystem implementation using `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    /// Create a new local filesystem adapter.
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn read_to_string(&self, path: &Path) -> StencilResult<String> {
        std::fs::read_to_string(path).map_err(|e| map_io_error(path, e, "read file"))
    }

    fn write(&self, path: &Path, content: &str) -> StencilResult<()> {
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> StencilResult<()> {
        // Merge into an existing destination; byte-preserving copies so
        // binary template assets survive.
        for entry in WalkDir::new(src).min_depth(0).into_iter().filter_entry(|e| {
            e.depth() == 0
                || e.file_name()
                    .to_str()
                    .is_none_or(|name| !IGNORED_ENTRIES.contains(&name))
        }) {
            let entry = entry.map_err(|e| map_io_error(src, e.into(), "walk template"))?;
            let relative = entry
                .path()
                .strip_prefix(src)
                .expect("walkdir yields paths under its root");
            if relative.as_os_str().is_empty() {
                continue;
            }
            let target = dest.join(relative);

            if entry.file_type().is_dir() {
                std::fs::create_dir_all(&target)
                    .map_err(|e| map_io_error(&target, e, "create directory"))?;
            } else {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)
                        .map_err(|e| map_io_error(parent, e, "create directory"))?;
                }
                std::fs::copy(entry.path(), &target)
                    .map_err(|e| map_io_error(&target, e, "copy file"))?;
                trace!(file = %relative.display(), "Copied");
            }
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        std::fs::rename(from, to).map_err(|e| map_io_error(from, e, "rename"))
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }

    fn list_dir(&self, path: &Path) -> StencilResult<Vec<String>> {
        let entries = std::fs::read_dir(path).map_err(|e| map_io_error(path, e, "list directory"))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(path, e, "list directory"))?;
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
        names.sort();
        Ok(names)
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> stencil_core::error::StencilError {
    use stencil_core::application::ApplicationError;

    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_tree_skips_ignored_entries() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        std::fs::create_dir_all(src.path().join(".git/objects")).unwrap();
        std::fs::create_dir_all(src.path().join(".venv")).unwrap();
        std::fs::create_dir_all(src.path().join("src/tpl")).unwrap();
        std::fs::write(src.path().join("uv.lock"), "locked").unwrap();
        std::fs::write(src.path().join("README.md"), "# tpl").unwrap();
        std::fs::write(src.path().join("src/tpl/__init__.py"), "").unwrap();

        let fs = LocalFilesystem::new();
        fs.copy_tree(src.path(), dest.path()).unwrap();

        assert!(dest.path().join("README.md").is_file());
        assert!(dest.path().join("src/tpl/__init__.py").is_file());
        assert!(!dest.path().join(".git").exists());
        assert!(!dest.path().join(".venv").exists());
        assert!(!dest.path().join("uv.lock").exists());
    }

    #[test]
    fn copy_tree_merges_into_existing_destination() {
        let src = tempfile::tempdir().unwrap();
        let dest = tempfile::tempdir().unwrap();

        std::fs::write(src.path().join("new.txt"), "new").unwrap();
        std::fs::write(dest.path().join("existing.txt"), "keep").unwrap();

        let fs = LocalFilesystem::new();
        fs.copy_tree(src.path(), dest.path()).unwrap();

        assert!(dest.path().join("new.txt").is_file());
        assert_eq!(
            std::fs::read_to_string(dest.path().join("existing.txt")).unwrap(),
            "keep"
        );
    }

    #[test]
    fn list_dir_is_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.txt"), "").unwrap();
        std::fs::write(dir.path().join("a.txt"), "").unwrap();

        let fs = LocalFilesystem::new();
        assert_eq!(fs.list_dir(dir.path()).unwrap(), vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn read_missing_file_maps_to_filesystem_error() {
        let fs = LocalFilesystem::new();
        let err = fs.read_to_string(Path::new("/no/such/file")).unwrap_err();
        assert!(err.to_string().contains("read file"));
    }
}
