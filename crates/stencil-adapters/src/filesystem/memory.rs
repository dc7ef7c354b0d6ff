//! In-memory filesystem adapter for testing.

use std::{
    collections::{HashMap, HashSet},
    path::{Path, PathBuf},
    sync::{Arc, RwLock},
};

use stencil_core::application::ports::Filesystem;
use stencil_core::application::{ApplicationError, IGNORED_ENTRIES};
use stencil_core::error::StencilResult;

/// In-memory filesystem for testing.
///
/// Keeps a write log so tests can assert the rewrite engine's
/// no-write-on-no-op guarantee, not just final content.
#[derive(Debug, Clone)]
pub struct MemoryFilesystem {
    inner: Arc<RwLock<MemoryFilesystemInner>>,
}

#[derive(Debug, Default)]
struct MemoryFilesystemInner {
    files: HashMap<PathBuf, String>,
    directories: HashSet<PathBuf>,
    write_log: Vec<PathBuf>,
}

impl MemoryFilesystem {
    /// Create a new empty memory filesystem.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryFilesystemInner::default())),
        }
    }

    /// Seed a file, creating parent directories (testing helper).
    pub fn seed_file(&self, path: impl Into<PathBuf>, content: &str) {
        let path = path.into();
        let mut inner = self.inner.write().unwrap();
        let mut current = PathBuf::new();
        if let Some(parent) = path.parent() {
            for component in parent.components() {
                current.push(component);
                inner.directories.insert(current.clone());
            }
        }
        inner.files.insert(path, content.to_string());
    }

    /// Read a file's content (testing helper).
    pub fn read_file(&self, path: &Path) -> Option<String> {
        let inner = self.inner.read().ok()?;
        inner.files.get(path).cloned()
    }

    /// Number of writes recorded against a path.
    pub fn writes_to(&self, path: &Path) -> usize {
        let inner = self.inner.read().unwrap();
        inner.write_log.iter().filter(|p| p.as_path() == path).count()
    }

    /// List all files.
    pub fn list_files(&self) -> Vec<PathBuf> {
        let inner = self.inner.read().unwrap();
        let mut files: Vec<PathBuf> = inner.files.keys().cloned().collect();
        files.sort();
        files
    }

    /// Clear all contents.
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        inner.files.clear();
        inner.directories.clear();
        inner.write_log.clear();
    }

    fn lock_err(path: &Path) -> stencil_core::error::StencilError {
        ApplicationError::FilesystemError {
            path: path.to_path_buf(),
            reason: "filesystem lock poisoned".into(),
        }
        .into()
    }
}

impl Default for MemoryFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for MemoryFilesystem {
    fn read_to_string(&self, path: &Path) -> StencilResult<String> {
        let inner = self.inner.read().map_err(|_| Self::lock_err(path))?;
        inner.files.get(path).cloned().ok_or_else(|| {
            ApplicationError::FilesystemError {
                path: path.to_path_buf(),
                reason: "Failed to read file: not found".into(),
            }
            .into()
        })
    }

    fn write(&self, path: &Path, content: &str) -> StencilResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_err(path))?;
        inner.files.insert(path.to_path_buf(), content.to_string());
        inner.write_log.push(path.to_path_buf());
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        let inner = self.inner.read().unwrap();
        inner.files.contains_key(path) || inner.directories.contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.inner.read().unwrap().files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.inner.read().unwrap().directories.contains(path)
    }

    fn create_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_err(path))?;
        let mut current = PathBuf::new();
        for component in path.components() {
            current.push(component);
            inner.directories.insert(current.clone());
        }
        Ok(())
    }

    fn copy_tree(&self, src: &Path, dest: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_err(src))?;

        let copies: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter(|(path, _)| path.starts_with(src))
            .filter_map(|(path, content)| {
                let relative = path.strip_prefix(src).ok()?;
                let ignored = relative
                    .components()
                    .any(|c| IGNORED_ENTRIES.contains(&c.as_os_str().to_str().unwrap_or("")));
                (!ignored).then(|| (dest.join(relative), content.clone()))
            })
            .collect();

        for (path, content) in copies {
            let mut current = PathBuf::new();
            if let Some(parent) = path.parent() {
                for component in parent.components() {
                    current.push(component);
                    inner.directories.insert(current.clone());
                }
            }
            inner.files.insert(path, content);
        }
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_err(from))?;

        let moved_files: Vec<(PathBuf, String)> = inner
            .files
            .iter()
            .filter(|(path, _)| path.starts_with(from))
            .map(|(path, content)| {
                (
                    to.join(path.strip_prefix(from).unwrap()),
                    content.clone(),
                )
            })
            .collect();
        let moved_dirs: Vec<PathBuf> = inner
            .directories
            .iter()
            .filter(|path| path.starts_with(from))
            .map(|path| to.join(path.strip_prefix(from).unwrap()))
            .collect();

        inner.files.retain(|path, _| !path.starts_with(from));
        inner.directories.retain(|path| !path.starts_with(from));
        inner.files.extend(moved_files);
        inner.directories.extend(moved_dirs);
        Ok(())
    }

    fn remove_dir_all(&self, path: &Path) -> StencilResult<()> {
        let mut inner = self.inner.write().map_err(|_| Self::lock_err(path))?;
        inner.directories.retain(|p| !p.starts_with(path));
        inner.files.retain(|p, _| !p.starts_with(path));
        Ok(())
    }

    fn list_dir(&self, path: &Path) -> StencilResult<Vec<String>> {
        let inner = self.inner.read().map_err(|_| Self::lock_err(path))?;
        let mut names: Vec<String> = inner
            .files
            .keys()
            .chain(inner.directories.iter())
            .filter(|p| p.parent() == Some(path))
            .filter_map(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
            .collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
