//! The replacement table: an ordered mapping of literal search strings to
//! literal replacement strings, built fresh for each file-update run.
//!
//! Insertion order is application order. The construction below inserts the
//! specific forms before anything that could contain them, so no
//! length-sorting is needed. Empty search keys are never stored.

use super::metadata::TemplateMetadata;
use super::naming::CaseVariants;

/// Placeholder tokens recognized across template files.
pub const DESCRIPTION_TOKEN: &str = "TEMPLATE_DESCRIPTION";
pub const AUTHOR_NAME_TOKEN: &str = "TEMPLATE_AUTHOR_NAME";
pub const AUTHOR_EMAIL_TOKEN: &str = "TEMPLATE_AUTHOR_EMAIL";
pub const HOMEPAGE_TOKEN: &str = "TEMPLATE_HOMEPAGE";
pub const REPOSITORY_TOKEN: &str = "TEMPLATE_REPOSITORY";
pub const DOCUMENTATION_TOKEN: &str = "TEMPLATE_DOCUMENTATION";
pub const ISSUES_TOKEN: &str = "TEMPLATE_ISSUES";
pub const MAINTAINER_NAME_TOKEN: &str = "TEMPLATE_MAINTAINER_NAME";
pub const MAINTAINER_EMAIL_TOKEN: &str = "TEMPLATE_MAINTAINER_EMAIL";

/// Ordered literal-string replacement mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplacementTable {
    entries: Vec<(String, String)>,
}

impl ReplacementTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair. Empty search keys are dropped - they would match
    /// everywhere and mean nothing.
    pub fn insert(&mut self, search: impl Into<String>, replacement: impl Into<String>) {
        let search = search.into();
        if search.is_empty() {
            return;
        }
        self.entries.push((search, replacement.into()));
    }

    /// Build the rename table: each case form of the template name maps to
    /// the same case form of the project name.
    pub fn for_rename(template_name: &str, project_name: &str) -> Self {
        let template = CaseVariants::of(template_name);
        let project = CaseVariants::of(project_name);

        let mut table = Self::new();
        table.insert(template.snake, project.snake);
        table.insert(template.title, project.title);
        table.insert(template.kebab, project.kebab);
        table.insert(template.pascal, project.pascal);
        table
    }

    /// Extend the table with metadata-derived placeholder pairs. A pair is
    /// only added when the metadata field is non-empty, so untouched
    /// placeholders stay visible in the output for later hand-editing.
    pub fn with_metadata(mut self, metadata: &TemplateMetadata) -> Self {
        if !metadata.project.description.is_empty() {
            self.insert(DESCRIPTION_TOKEN, &metadata.project.description);
        }
        if !metadata.author.name.is_empty() {
            self.insert(AUTHOR_NAME_TOKEN, &metadata.author.name);
        }
        if !metadata.author.email.is_empty() {
            self.insert(AUTHOR_EMAIL_TOKEN, &metadata.author.email);
        }
        if !metadata.project.homepage.is_empty() {
            self.insert(HOMEPAGE_TOKEN, &metadata.project.homepage);
        }
        if !metadata.project.repository.is_empty() {
            self.insert(REPOSITORY_TOKEN, &metadata.project.repository);
        }
        self
    }

    /// Pairs in application order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(s, r)| (s.as_str(), r.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rename_table_contains_all_case_forms() {
        let table = ReplacementTable::for_rename("new_cli_project_template", "my_app");
        let pairs: Vec<_> = table.entries().collect();
        assert_eq!(
            pairs,
            vec![
                ("new_cli_project_template", "my_app"),
                ("New Cli Project Template", "My App"),
                ("new-cli-project-template", "my-app"),
                ("NewCliProjectTemplate", "MyApp"),
            ]
        );
    }

    #[test]
    fn empty_search_keys_are_dropped() {
        let mut table = ReplacementTable::new();
        table.insert("", "something");
        assert!(table.is_empty());
    }

    #[test]
    fn metadata_pairs_are_conditional() {
        let mut metadata = TemplateMetadata::default();
        metadata.project.description = "A tool".into();
        metadata.project.repository = "https://github.com/ada/tool".into();
        // author left empty on purpose

        let table = ReplacementTable::for_rename("tpl", "app").with_metadata(&metadata);
        let searches: Vec<_> = table.entries().map(|(s, _)| s).collect();
        assert!(searches.contains(&DESCRIPTION_TOKEN));
        assert!(searches.contains(&REPOSITORY_TOKEN));
        assert!(!searches.contains(&AUTHOR_NAME_TOKEN));
        assert!(!searches.contains(&HOMEPAGE_TOKEN));
    }
}
