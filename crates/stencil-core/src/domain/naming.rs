//! Case-variant generation for template and project identifiers.
//!
//! Precondition: identifiers are underscore-separated lowercase tokens
//! (`new_cli_project_template`). Behaviour on hyphenated or mixed-case
//! input is unspecified and deliberately unguarded.

/// The four textual case forms derived from an identifier.
///
/// These are the search/replacement halves of the rename table: each form
/// of the template name is replaced by the same form of the project name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseVariants {
    pub snake: String,
    pub title: String,
    pub kebab: String,
    pub pascal: String,
}

impl CaseVariants {
    /// Derive all four case forms from a snake_case identifier.
    pub fn of(identifier: &str) -> Self {
        Self {
            snake: identifier.to_string(),
            title: title_case(identifier),
            kebab: identifier.replace('_', "-"),
            pascal: pascal_case(identifier),
        }
    }
}

/// `my_project` → `My Project`. Remainders are lowercased, so an all-caps
/// token comes out capitalized rather than preserved.
fn title_case(identifier: &str) -> String {
    identifier
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// `my_project` → `MyProject`. Unlike [`title_case`], remainders are left
/// unchanged - existing templates rely on this exact asymmetry.
fn pascal_case(identifier: &str) -> String {
    identifier
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect()
}

// ── tests ─────────────────────────────────────────────────────────────────────
