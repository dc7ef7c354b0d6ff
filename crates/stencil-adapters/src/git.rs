//! Remote template retrieval via `git clone`.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use tracing::{info, instrument};

use stencil_core::application::ports::TemplateFetcher;
use stencil_core::application::{ApplicationError, CloneFailureKind};
use stencil_core::domain::GitUrl;
use stencil_core::error::StencilResult;

use crate::process::{run_with_timeout, wait_outcome_to_error};

/// Clone timeout - large templates over slow links still fit.
const CLONE_TIMEOUT: Duration = Duration::from_secs(300);

/// Fetches remote templates with a shallow `git clone`.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitFetcher;

impl GitFetcher {
    pub fn new() -> Self {
        Self
    }
}

impl TemplateFetcher for GitFetcher {
    #[instrument(skip(self))]
    fn fetch(&self, url: &GitUrl, dest: &Path) -> StencilResult<()> {
        if which::which("git").is_err() {
            return Err(ApplicationError::ToolMissing { tool: "git" }.into());
        }

        std::fs::create_dir_all(dest).map_err(|e| ApplicationError::FilesystemError {
            path: dest.to_path_buf(),
            reason: format!("Failed to create clone directory: {e}"),
        })?;

        let mut command = Command::new("git");
        command
            .arg("clone")
            .arg("--depth")
            .arg("1")
            .arg(url.as_str())
            .arg(dest);

        let description = format!("git clone --depth 1 {} {}", url, dest.display());
        let output = run_with_timeout(command, CLONE_TIMEOUT)
            .map_err(|outcome| wait_outcome_to_error(&description, outcome))?;

        if !output.success() {
            return Err(ApplicationError::CloneFailed {
                url: url.to_string(),
                kind: classify_clone_failure(&output.stderr),
                detail: output.stderr,
            }
            .into());
        }

        // A clone that "succeeded" into an empty directory is still a failure.
        let is_empty = std::fs::read_dir(dest)
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(true);
        if is_empty {
            return Err(ApplicationError::CloneFailed {
                url: url.to_string(),
                kind: CloneFailureKind::Other,
                detail: "clone completed but directory is empty".into(),
            }
            .into());
        }

        info!(url = %url, "Remote template cloned successfully");
        Ok(())
    }
}

/// Classify git's diagnostic text into a failure kind.
///
/// Pattern-literal on purpose: git has no structured error output, so the
/// categories are only as good as the phrases it prints.
fn classify_clone_failure(stderr: &str) -> CloneFailureKind {
    let stderr = stderr.to_lowercase();
    if stderr.contains("authentication failed") || stderr.contains("permission denied") {
        CloneFailureKind::Authentication
    } else if stderr.contains("repository not found") || stderr.contains("not found") {
        CloneFailureKind::NotFound
    } else if stderr.contains("network") || stderr.contains("connection") {
        CloneFailureKind::Network
    } else {
        CloneFailureKind::Other
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_failures_classify_first() {
        assert_eq!(
            classify_clone_failure("fatal: Authentication failed for 'https://…'"),
            CloneFailureKind::Authentication
        );
        // "Permission denied" wins over the generic "not found" match.
        assert_eq!(
            classify_clone_failure("git@github.com: Permission denied (publickey)."),
            CloneFailureKind::Authentication
        );
    }

    #[test]
    fn missing_repos_classify_as_not_found() {
        assert_eq!(
            classify_clone_failure("fatal: repository not found"),
            CloneFailureKind::NotFound
        );
    }

    #[test]
    fn network_trouble_classifies_as_network() {
        assert_eq!(
            classify_clone_failure("fatal: unable to access: Connection timed out"),
            CloneFailureKind::Network
        );
    }

    #[test]
    fn unknown_text_is_other() {
        assert_eq!(
            classify_clone_failure("fatal: something novel"),
            CloneFailureKind::Other
        );
    }
}
