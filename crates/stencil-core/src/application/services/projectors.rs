//! Metadata-to-artifact projectors.
//!
//! Three independent writers that turn metadata fields into concrete file
//! mutations: a README content block, a pyproject placeholder patcher, and
//! an environment-file appender. Each is best-effort - an absent target
//! file is a warning, not an error - and idempotent where the target
//! allows it.

use std::path::Path;

use tracing::{debug, warn};

use crate::application::ports::Filesystem;
use crate::domain::TemplateMetadata;
use crate::domain::naming::CaseVariants;
use crate::domain::replacements::{
    DESCRIPTION_TOKEN, DOCUMENTATION_TOKEN, HOMEPAGE_TOKEN, ISSUES_TOKEN, MAINTAINER_EMAIL_TOKEN,
    MAINTAINER_NAME_TOKEN, REPOSITORY_TOKEN,
};
use crate::error::StencilResult;

/// Marker token delimiting the generated README block.
pub const METADATA_MARKER: &str = "<!-- METADATA_CONTENT -->";

/// Outcome of one projector run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Target file was rewritten.
    Updated,
    /// Target existed but nothing needed to change.
    Unchanged,
    /// Target absent, or the metadata had nothing to contribute.
    Skipped,
}

/// Build the README content block from metadata.
///
/// Returns an empty string when both title and description are empty -
/// the caller treats that as "nothing to project".
pub fn generate_readme_content(metadata: &TemplateMetadata, project_name: &str) -> String {
    if metadata.readme.title.is_empty() && metadata.readme.description.is_empty() {
        return String::new();
    }

    let mut content = Vec::new();

    let title = if metadata.readme.title.is_empty() {
        CaseVariants::of(project_name).title
    } else {
        metadata.readme.title.clone()
    };
    content.push(format!("# {title}"));

    if !metadata.readme.subtitle.is_empty() {
        content.push(format!("\n{}", metadata.readme.subtitle));
    }

    if !metadata.readme.badges.is_empty() {
        content.push("\n".into());
        for badge in &metadata.readme.badges {
            if badge.link.is_empty() {
                content.push(format!("![{}]({})", badge.name, badge.url));
            } else {
                content.push(format!("[![{}]({})]({})", badge.name, badge.url, badge.link));
            }
        }
        content.push(String::new());
    }

    if !metadata.readme.description.is_empty() {
        content.push(format!("\n{}", metadata.readme.description));
    }

    content.join("\n")
}

/// Project metadata into README.md.
///
/// When the file carries a [`METADATA_MARKER`], the generated block
/// replaces the first marker's trailing segment; otherwise the block is
/// prepended to the existing content.
pub fn update_readme(
    fs: &dyn Filesystem,
    project_location: &Path,
    metadata: &TemplateMetadata,
    project_name: &str,
) -> StencilResult<Projection> {
    let readme_path = project_location.join("README.md");
    if !fs.exists(&readme_path) {
        warn!("README.md not found, skipping metadata update");
        return Ok(Projection::Skipped);
    }

    let block = generate_readme_content(metadata, project_name);
    if block.is_empty() {
        return Ok(Projection::Skipped);
    }

    let current = fs.read_to_string(&readme_path)?;

    if current.contains(METADATA_MARKER) {
        let parts: Vec<&str> = current.split(METADATA_MARKER).collect();
        if parts.len() >= 2 {
            fs.write(&readme_path, &format!("{block}\n\n{}", parts[1]))?;
        }
    } else {
        fs.write(&readme_path, &format!("{block}\n\n{current}"))?;
    }

    Ok(Projection::Updated)
}

/// Project metadata into pyproject.toml by literal placeholder patching.
///
/// Each field is applied only when present in the metadata; a placeholder
/// whose layout in the target does not match the expected literal silently
/// fails to match. Substitution here is pattern-literal, not structural.
pub fn update_pyproject(
    fs: &dyn Filesystem,
    project_location: &Path,
    metadata: &TemplateMetadata,
) -> StencilResult<Projection> {
    let pyproject_path = project_location.join("pyproject.toml");
    if !fs.exists(&pyproject_path) {
        warn!("pyproject.toml not found, skipping metadata update");
        return Ok(Projection::Skipped);
    }

    let original = fs.read_to_string(&pyproject_path)?;
    let mut content = original.clone();

    let mut patch = |field: &str, search: &str, replacement: &str| {
        if content.contains(search) {
            content = content.replace(search, replacement);
        } else {
            debug!(field, "placeholder not present in pyproject.toml");
        }
    };

    if !metadata.project.description.is_empty() {
        patch(
            "description",
            &format!("description = \"{DESCRIPTION_TOKEN}\""),
            &format!("description = \"{}\"", metadata.project.description),
        );
    }

    if !metadata.project.keywords.is_empty() {
        let keywords = metadata.project.keywords.join("\",\n    \"");
        patch(
            "keywords",
            "keywords = [\n    \"TEMPLATE_KEYWORDS\",\n]",
            &format!("keywords = [\n    \"{keywords}\",\n]"),
        );
    }

    if !metadata.pyproject_classifiers.is_empty() {
        let classifiers = metadata.pyproject_classifiers.join("\",\n    \"");
        patch(
            "classifiers",
            "\"TEMPLATE_CLASSIFIERS\",",
            &format!("\"{classifiers}\","),
        );
    }

    if !metadata.project.homepage.is_empty() {
        patch("homepage", HOMEPAGE_TOKEN, &metadata.project.homepage);
    }
    if !metadata.project.repository.is_empty() {
        patch("repository", REPOSITORY_TOKEN, &metadata.project.repository);
    }
    if !metadata.project.documentation.is_empty() {
        patch(
            "documentation",
            DOCUMENTATION_TOKEN,
            &metadata.project.documentation,
        );
    }
    if !metadata.project.issues.is_empty() {
        patch("issues", ISSUES_TOKEN, &metadata.project.issues);
    }

    // Maintainer resolves to the author when none was declared - this is
    // the point of use for that rule.
    let maintainer = metadata.maintainer_or_author();
    if !maintainer.name.is_empty() {
        patch("maintainer name", MAINTAINER_NAME_TOKEN, &maintainer.name);
    }
    if !maintainer.email.is_empty() {
        patch("maintainer email", MAINTAINER_EMAIL_TOKEN, &maintainer.email);
    }

    if content != original {
        fs.write(&pyproject_path, &content)?;
        return Ok(Projection::Updated);
    }

    Ok(Projection::Unchanged)
}

/// Append metadata environment variables to .env.
///
/// A key is appended only when no `KEY=` prefix occurs anywhere in the
/// file; existing keys are never overwritten.
pub fn update_env(
    fs: &dyn Filesystem,
    project_location: &Path,
    metadata: &TemplateMetadata,
) -> StencilResult<Projection> {
    if metadata.environment.is_empty() {
        return Ok(Projection::Skipped);
    }

    let env_path = project_location.join(".env");
    if !fs.exists(&env_path) {
        warn!(".env file not found, skipping metadata update");
        return Ok(Projection::Skipped);
    }

    let original = fs.read_to_string(&env_path)?;
    let mut content = original.clone();

    for (key, value) in &metadata.environment {
        if !content.contains(&format!("{key}=")) {
            content.push_str(&format!("\n{key}={value}"));
        }
    }

    if content != original {
        fs.write(&env_path, &content)?;
        return Ok(Projection::Updated);
    }

    Ok(Projection::Unchanged)
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ReadmeBadge, TemplateMetadata};

    fn metadata_with_readme(title: &str, description: &str) -> TemplateMetadata {
        let mut metadata = TemplateMetadata::default();
        metadata.readme.title = title.into();
        metadata.readme.description = description.into();
        metadata
    }

    #[test]
    fn readme_block_empty_without_title_and_description() {
        let metadata = TemplateMetadata::default();
        assert_eq!(generate_readme_content(&metadata, "my_app"), "");
    }

    #[test]
    fn readme_title_falls_back_to_project_name() {
        let metadata = metadata_with_readme("", "Does things.");
        let block = generate_readme_content(&metadata, "my_app");
        assert!(block.starts_with("# My App"));
        assert!(block.contains("Does things."));
    }

    #[test]
    fn badges_render_with_and_without_links() {
        let mut metadata = metadata_with_readme("Tool", "");
        metadata.readme.badges = vec![
            ReadmeBadge {
                name: "CI".into(),
                url: "https://x/ci.svg".into(),
                link: String::new(),
            },
            ReadmeBadge {
                name: "PyPI".into(),
                url: "https://x/pypi.svg".into(),
                link: "https://pypi.org/p".into(),
            },
        ];
        let block = generate_readme_content(&metadata, "my_app");
        assert!(block.contains("![CI](https://x/ci.svg)"));
        assert!(block.contains("[![PyPI](https://x/pypi.svg)](https://pypi.org/p)"));
    }

    #[test]
    fn subtitle_appears_after_title() {
        let mut metadata = metadata_with_readme("Tool", "Desc");
        metadata.readme.subtitle = "A subtitle".into();
        let block = generate_readme_content(&metadata, "my_app");
        let title_at = block.find("# Tool").unwrap();
        let subtitle_at = block.find("A subtitle").unwrap();
        let desc_at = block.find("Desc").unwrap();
        assert!(title_at < subtitle_at && subtitle_at < desc_at);
    }
}
