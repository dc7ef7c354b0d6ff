//! Template source classification: local directory name vs remote git URL.
//!
//! Recognition uses a fixed set of host patterns; anything that matches
//! none of them is treated as a local template name. Validation and
//! normalisation only run on strings that already look like git URLs.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use super::error::DomainError;

/// Hosts whose URLs are normalised to end in `.git`.
const KNOWN_HOSTS: &[&str] = &["github.com", "gitlab.com", "bitbucket.org"];

static GIT_URL_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^https://github\.com/[\w\-\.]+/[\w\-\.]+(?:\.git)?/?$",
        r"^https://gitlab\.com/[\w\-\.]+/[\w\-\.]+(?:\.git)?/?$",
        r"^https://bitbucket\.org/[\w\-\.]+/[\w\-\.]+(?:\.git)?/?$",
        // Generic HTTPS git URL
        r"^https://[\w\-\.]+/[\w\-\./]+(?:\.git)?/?$",
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("hardcoded pattern"))
    .collect()
});

/// A validated, normalised git clone URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitUrl(String);

impl GitUrl {
    /// Whether a string matches one of the recognized git-hosting patterns.
    pub fn recognize(input: &str) -> bool {
        GIT_URL_PATTERNS.iter().any(|p| p.is_match(input))
    }

    /// Validate and normalise a git URL.
    ///
    /// Known hosts get a `.git` suffix appended; other hosts are kept
    /// verbatim minus any trailing slash.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DomainError::EmptyGitUrl);
        }

        if !Self::recognize(input) {
            return Err(DomainError::InvalidGitUrl {
                url: input.into(),
                reason: "does not match a supported git URL format".into(),
            });
        }

        let parsed = Url::parse(input).map_err(|e| DomainError::InvalidGitUrl {
            url: input.into(),
            reason: e.to_string(),
        })?;

        match parsed.scheme() {
            "http" | "https" => {}
            other => {
                return Err(DomainError::InvalidGitUrl {
                    url: input.into(),
                    reason: format!("unsupported URL scheme '{other}'"),
                });
            }
        }

        let host = parsed.host_str().ok_or_else(|| DomainError::InvalidGitUrl {
            url: input.into(),
            reason: "missing hostname".into(),
        })?;

        if KNOWN_HOSTS.contains(&host) {
            let mut path = parsed.path().trim_end_matches('/').to_string();
            if !path.ends_with(".git") {
                path.push_str(".git");
            }
            return Ok(Self(format!("{}://{}{}", parsed.scheme(), host, path)));
        }

        Ok(Self(input.trim_end_matches('/').to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GitUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a template comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// A template directory name resolved against the repo search path.
    Local(String),
    /// A remote repository cloned into a temporary directory.
    Remote(GitUrl),
}

impl TemplateSource {
    /// Classify a user-supplied template argument.
    pub fn classify(input: &str) -> Result<Self, DomainError> {
        let input = input.trim();
        if GitUrl::recognize(input) {
            return Ok(Self::Remote(GitUrl::parse(input)?));
        }
        Ok(Self::Local(input.to_string()))
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
