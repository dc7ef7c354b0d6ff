//! Template metadata: record types and the YAML loader/validator.
//!
//! The loader is deliberately strict about shape and lenient about
//! presence: any recognized section (or nested field) of the wrong type
//! aborts the whole load with a diagnostic naming the offender, while a
//! missing section silently yields defaults. No partial record ever
//! escapes a failed load.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_yaml::Value;

use super::error::DomainError;

/// Author or maintainer identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorInfo {
    pub name: String,
    pub email: String,
    pub github_username: String,
}

/// Project-level metadata (description, links, license).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub description: String,
    pub keywords: Vec<String>,
    pub homepage: String,
    pub repository: String,
    pub documentation: String,
    pub issues: String,
    pub license: String,
}

impl Default for ProjectInfo {
    fn default() -> Self {
        Self {
            description: String::new(),
            keywords: Vec::new(),
            homepage: String::new(),
            repository: String::new(),
            documentation: String::new(),
            issues: String::new(),
            license: "MIT".into(),
        }
    }
}

/// A README badge: rendered as an image, optionally link-wrapped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeBadge {
    pub name: String,
    pub url: String,
    pub link: String,
}

/// README customization block.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadmeInfo {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub badges: Vec<ReadmeBadge>,
}

/// Complete template metadata, owned by one instantiation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemplateMetadata {
    pub project: ProjectInfo,
    pub author: AuthorInfo,
    pub maintainer: Option<AuthorInfo>,
    pub packages: Vec<String>,
    pub readme: ReadmeInfo,
    pub pyproject_classifiers: Vec<String>,
    pub environment: BTreeMap<String, String>,
    pub additional_files: Vec<String>,
}

impl TemplateMetadata {
    /// Load metadata from a YAML file.
    ///
    /// Reads exactly one file and performs no other side effects. An empty
    /// document yields an all-defaults record.
    pub fn load(path: &Path) -> Result<Self, DomainError> {
        if !path.exists() {
            return Err(DomainError::MetadataNotFound {
                path: path.to_path_buf(),
            });
        }
        if !path.is_file() {
            return Err(DomainError::MetadataNotAFile {
                path: path.to_path_buf(),
            });
        }

        let text = fs::read_to_string(path).map_err(|e| DomainError::MetadataUnreadable {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let document: Value =
            serde_yaml::from_str(&text).map_err(|e| DomainError::MetadataFormat {
                reason: e.to_string(),
            })?;

        Self::from_document(document)
    }

    /// Validate a parsed document into a metadata record.
    fn from_document(document: Value) -> Result<Self, DomainError> {
        let mapping = match document {
            // Empty documents parse to null; treat as an empty mapping.
            Value::Null => return Ok(Self::default()),
            Value::Mapping(mapping) => mapping,
            other => {
                return Err(DomainError::MetadataFormat {
                    reason: format!("expected YAML object, got {}", value_kind(&other)),
                });
            }
        };

        let mut metadata = Self::default();

        if let Some(value) = mapping.get("project") {
            let section = expect_mapping(value, "project")?;
            metadata.project = ProjectInfo {
                description: get_str(section, "description", "project.description")?,
                keywords: get_str_list(section, "keywords", "project.keywords")?,
                homepage: get_str(section, "homepage", "project.homepage")?,
                repository: get_str(section, "repository", "project.repository")?,
                documentation: get_str(section, "documentation", "project.documentation")?,
                issues: get_str(section, "issues", "project.issues")?,
                license: get_str_or(section, "license", "project.license", "MIT")?,
            };
        }

        if let Some(value) = mapping.get("author") {
            metadata.author = parse_author(value, "author")?;
        }

        // Optional; the author fallback is resolved at use time, not here.
        if let Some(value) = mapping.get("maintainer") {
            metadata.maintainer = Some(parse_author(value, "maintainer")?);
        }

        if let Some(value) = mapping.get("packages") {
            metadata.packages = expect_str_list(value, "packages")?;
        }

        if let Some(value) = mapping.get("readme") {
            let section = expect_mapping(value, "readme")?;
            let mut badges = Vec::new();
            if let Some(badges_value) = section.get("badges") {
                let entries = match badges_value {
                    Value::Sequence(entries) => entries,
                    _ => {
                        return Err(DomainError::InvalidSection {
                            section: "badges",
                            expected: "a list",
                        });
                    }
                };
                for (index, entry) in entries.iter().enumerate() {
                    badges.push(parse_badge(entry, index)?);
                }
            }
            metadata.readme = ReadmeInfo {
                title: get_str(section, "title", "readme.title")?,
                subtitle: get_str(section, "subtitle", "readme.subtitle")?,
                description: get_str(section, "description", "readme.description")?,
                badges,
            };
        }

        if let Some(value) = mapping.get("pyproject") {
            let section = expect_mapping(value, "pyproject")?;
            if let Some(classifiers) = section.get("classifiers") {
                metadata.pyproject_classifiers = expect_str_list(classifiers, "classifiers")?;
            }
        }

        if let Some(value) = mapping.get("environment") {
            let section = expect_mapping(value, "environment")?;
            for (key, val) in section {
                let key = as_str(key).ok_or(DomainError::InvalidSection {
                    section: "environment",
                    expected: "string keys",
                })?;
                let val = as_str(val).ok_or(DomainError::InvalidSection {
                    section: "environment",
                    expected: "string values",
                })?;
                metadata.environment.insert(key.into(), val.into());
            }
        }

        if let Some(value) = mapping.get("additional_files") {
            metadata.additional_files = expect_str_list(value, "additional_files")?;
        }

        Ok(metadata)
    }

    /// The maintainer, falling back to the author when none was supplied.
    ///
    /// Computed at use time so the record stays a faithful reflection of
    /// the source document.
    pub fn maintainer_or_author(&self) -> &AuthorInfo {
        self.maintainer.as_ref().unwrap_or(&self.author)
    }
}

// ── parsing helpers ───────────────────────────────────────────────────────────

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "list",
        Value::Mapping(_) => "object",
        Value::Tagged(_) => "tagged value",
    }
}

fn as_str(value: &Value) -> Option<&str> {
    value.as_str()
}

fn expect_mapping<'a>(
    value: &'a Value,
    section: &'static str,
) -> Result<&'a serde_yaml::Mapping, DomainError> {
    value.as_mapping().ok_or(DomainError::InvalidSection {
        section,
        expected: "an object",
    })
}

fn expect_str_list(value: &Value, section: &'static str) -> Result<Vec<String>, DomainError> {
    let entries = value.as_sequence().ok_or(DomainError::InvalidSection {
        section,
        expected: "a list",
    })?;
    entries
        .iter()
        .map(|entry| {
            as_str(entry)
                .map(String::from)
                .ok_or(DomainError::InvalidSection {
                    section,
                    expected: "a list of strings",
                })
        })
        .collect()
}

fn get_str(
    mapping: &serde_yaml::Mapping,
    key: &str,
    section: &'static str,
) -> Result<String, DomainError> {
    get_str_or(mapping, key, section, "")
}

fn get_str_or(
    mapping: &serde_yaml::Mapping,
    key: &str,
    section: &'static str,
    default: &str,
) -> Result<String, DomainError> {
    match mapping.get(key) {
        None => Ok(default.into()),
        Some(value) => as_str(value)
            .map(String::from)
            .ok_or(DomainError::InvalidSection {
                section,
                expected: "a string",
            }),
    }
}

fn get_str_list(
    mapping: &serde_yaml::Mapping,
    key: &str,
    section: &'static str,
) -> Result<Vec<String>, DomainError> {
    match mapping.get(key) {
        None => Ok(Vec::new()),
        Some(value) => expect_str_list(value, section),
    }
}

fn parse_author(value: &Value, section: &'static str) -> Result<AuthorInfo, DomainError> {
    let mapping = expect_mapping(value, section)?;
    Ok(AuthorInfo {
        name: get_str(mapping, "name", section)?,
        email: get_str(mapping, "email", section)?,
        github_username: get_str(mapping, "github_username", section)?,
    })
}

fn parse_badge(value: &Value, index: usize) -> Result<ReadmeBadge, DomainError> {
    let mapping = value.as_mapping().ok_or(DomainError::InvalidBadge {
        index,
        reason: "expected object".into(),
    })?;

    let required = |key: &str| -> Result<String, DomainError> {
        mapping
            .get(key)
            .and_then(as_str)
            .map(String::from)
            .ok_or(DomainError::InvalidBadge {
                index,
                reason: "name and url are required".into(),
            })
    };

    Ok(ReadmeBadge {
        name: required("name")?,
        url: required("url")?,
        link: mapping
            .get("link")
            .and_then(as_str)
            .unwrap_or_default()
            .to_string(),
    })
}

// ── tests ─────────────────────────────────────────────────────────────────────
