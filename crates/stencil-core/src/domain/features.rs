//! Feature dependency graph.
//!
//! A closed enumeration of installable feature sets, each mapping to the
//! packages it pulls in, plus a static dependency graph between features.
//! The graph is data (`FEATURE_REGISTRY` / `FEATURE_DEPS`), not scattered
//! lookups: adding a feature means editing the two tables below and nothing
//! else.
//!
//! [`resolve`] computes the transitive closure of a requested set;
//! [`validate_graph`] is run once at process start and guards the
//! properties the resolver itself does not check (the resolver has no
//! cycle guard and would not terminate on a cyclic graph).

use std::collections::{HashSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use super::error::DomainError;

/// The baseline feature, unconditionally included in every resolution.
pub const BASELINE: FeatureId = FeatureId::Base;

/// Closed enumeration of feature identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureId {
    Base,
    Cli,
    Textual,
    ParAiCore,
}

/// Every declared feature, in display order.
pub const ALL_FEATURES: &[FeatureId] = &[
    FeatureId::Base,
    FeatureId::Cli,
    FeatureId::Textual,
    FeatureId::ParAiCore,
];

/// Feature → package list.
const FEATURE_REGISTRY: &[(FeatureId, &[&str])] = &[
    (
        FeatureId::Base,
        &[
            "python-dotenv",
            "asyncio",
            "pydantic-core",
            "pydantic",
            "orjson",
            "rich",
            "requests",
        ],
    ),
    (FeatureId::Cli, &["prompt-toolkit", "typer", "clipman"]),
    (FeatureId::Textual, &["textual", "textual-dev", "clipman"]),
    (FeatureId::ParAiCore, &["par-ai-core"]),
];

/// Feature → direct dependencies. Features absent from this table have none.
const FEATURE_DEPS: &[(FeatureId, &[FeatureId])] = &[
    (FeatureId::Cli, &[FeatureId::Base]),
    (FeatureId::Textual, &[FeatureId::Base, FeatureId::Cli]),
    (FeatureId::ParAiCore, &[FeatureId::Base]),
];

impl FeatureId {
    /// Canonical identifier as it appears on the command line and in
    /// metadata package lists.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Base => "base",
            Self::Cli => "cli",
            Self::Textual => "textual",
            Self::ParAiCore => "par-ai-core",
        }
    }

    /// Packages installed by this feature.
    pub fn packages(&self) -> &'static [&'static str] {
        FEATURE_REGISTRY
            .iter()
            .find(|(id, _)| id == self)
            .map(|(_, pkgs)| *pkgs)
            .unwrap_or(&[])
    }

    /// Direct dependencies of this feature.
    pub fn deps(&self) -> &'static [FeatureId] {
        FEATURE_DEPS
            .iter()
            .find(|(id, _)| id == self)
            .map(|(_, deps)| *deps)
            .unwrap_or(&[])
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeatureId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_FEATURES
            .iter()
            .copied()
            .find(|f| f.as_str() == s)
            .ok_or(())
    }
}

/// A metadata package entry, classified once against the closed feature set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PackageSpec {
    /// A recognized feature identifier.
    Feature(FeatureId),
    /// A literal package name handed to the package manager as-is.
    Direct(String),
}

impl PackageSpec {
    /// Classify a metadata package entry: feature identifier or literal name.
    pub fn classify(entry: &str) -> Self {
        match FeatureId::from_str(entry) {
            Ok(feature) => Self::Feature(feature),
            Err(()) => Self::Direct(entry.to_string()),
        }
    }
}

/// Resolve the transitive closure of a requested feature set.
///
/// The baseline is unconditionally included, even for `None` or an empty
/// request. Output is a plain set - callers needing a stable order use
/// [`sorted_for_display`].
pub fn resolve(requested: Option<&[FeatureId]>) -> HashSet<FeatureId> {
    let mut resolved: HashSet<FeatureId> = HashSet::from([BASELINE]);

    let Some(requested) = requested else {
        return resolved;
    };

    resolved.extend(requested.iter().copied());

    // Breadth-first expansion; new dependencies are queued for their own
    // expansion. Termination relies on the graph being acyclic, which
    // validate_graph() established at startup.
    let mut queue: VecDeque<FeatureId> = resolved.iter().copied().collect();
    while let Some(feature) = queue.pop_front() {
        for dep in feature.deps() {
            if resolved.insert(*dep) {
                queue.push_back(*dep);
            }
        }
    }

    resolved
}

/// Order a resolved set for display: baseline first, then lexicographic.
pub fn sorted_for_display(features: &HashSet<FeatureId>) -> Vec<FeatureId> {
    let mut sorted: Vec<FeatureId> = features.iter().copied().collect();
    sorted.sort_by_key(|f| (*f != BASELINE, f.as_str()));
    sorted
}

/// Validate the static graph once at process start.
///
/// With a closed enum, identifier membership is guaranteed by the type
/// system; what remains falsifiable is that the baseline declares no
/// dependencies (it is the closure's implicit root) and that no dependency
/// chain cycles back on itself.
pub fn validate_graph() -> Result<(), DomainError> {
    if !BASELINE.deps().is_empty() {
        return Err(DomainError::MalformedFeatureGraph {
            detail: format!("baseline feature '{}' declares dependencies", BASELINE),
        });
    }

    for feature in ALL_FEATURES {
        let mut visited = HashSet::new();
        let mut stack = vec![*feature];
        while let Some(current) = stack.pop() {
            for dep in current.deps() {
                if dep == feature {
                    return Err(DomainError::MalformedFeatureGraph {
                        detail: format!("dependency cycle through feature '{feature}'"),
                    });
                }
                if visited.insert(*dep) {
                    stack.push(*dep);
                }
            }
        }
    }

    Ok(())
}

// ── tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_always_present() {
        for requested in [
            None,
            Some(&[][..]),
            Some(&[FeatureId::Cli][..]),
            Some(&[FeatureId::Textual, FeatureId::ParAiCore][..]),
        ] {
            assert!(resolve(requested).contains(&BASELINE));
        }
    }

    #[test]
    fn none_and_empty_resolve_to_baseline_only() {
        let none = resolve(None);
        let empty = resolve(Some(&[]));
        assert_eq!(none, empty);
        assert_eq!(none, HashSet::from([FeatureId::Base]));
    }

    #[test]
    fn closure_is_complete() {
        // textual depends on base and cli; all three must appear.
        let resolved = resolve(Some(&[FeatureId::Textual]));
        assert!(resolved.contains(&FeatureId::Textual));
        assert!(resolved.contains(&FeatureId::Cli));
        assert!(resolved.contains(&FeatureId::Base));
    }

    #[test]
    fn closure_is_minimal() {
        // par-ai-core pulls in base only; cli and textual stay out.
        let resolved = resolve(Some(&[FeatureId::ParAiCore]));
        assert_eq!(
            resolved,
            HashSet::from([FeatureId::Base, FeatureId::ParAiCore])
        );
    }

    #[test]
    fn display_order_is_baseline_then_lexicographic() {
        let resolved = resolve(Some(&[FeatureId::Textual, FeatureId::ParAiCore]));
        let sorted = sorted_for_display(&resolved);
        assert_eq!(
            sorted,
            vec![
                FeatureId::Base,
                FeatureId::Cli,
                FeatureId::ParAiCore,
                FeatureId::Textual,
            ]
        );
    }

    #[test]
    fn graph_validates() {
        validate_graph().unwrap();
    }

    #[test]
    fn identifiers_round_trip() {
        for feature in ALL_FEATURES {
            assert_eq!(FeatureId::from_str(feature.as_str()), Ok(*feature));
        }
    }

    #[test]
    fn unknown_identifier_is_rejected() {
        assert!(FeatureId::from_str("not-a-feature").is_err());
    }

    #[test]
    fn classify_feature_vs_direct() {
        assert_eq!(
            PackageSpec::classify("cli"),
            PackageSpec::Feature(FeatureId::Cli)
        );
        assert_eq!(
            PackageSpec::classify("par-ai-core"),
            PackageSpec::Feature(FeatureId::ParAiCore)
        );
        assert_eq!(
            PackageSpec::classify("httpx"),
            PackageSpec::Direct("httpx".into())
        );
    }

    #[test]
    fn every_feature_has_packages() {
        for feature in ALL_FEATURES {
            assert!(!feature.packages().is_empty(), "no packages for {feature}");
        }
    }
}
