//! Integration tests for stencil-core: metadata → replacement table →
//! setup plan, wired together the way the CLI drives them.

use std::collections::HashSet;

use stencil_core::domain::{
    self, FeatureId, ReplacementTable, TemplateMetadata, TemplateSource,
};

#[test]
fn metadata_feeds_the_replacement_table() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.yaml");
    std::fs::write(
        &path,
        r#"
project:
  description: Terminal dashboards
  repository: https://github.com/ada/dash
author:
  name: Ada Lovelace
  email: ada@example.com
"#,
    )
    .unwrap();

    let metadata = TemplateMetadata::load(&path).unwrap();
    let table =
        ReplacementTable::for_rename("new_cli_project_template", "my_app").with_metadata(&metadata);

    let pairs: Vec<(&str, &str)> = table.entries().collect();

    // Case-variant rename pairs come first, placeholders after.
    assert_eq!(pairs[0], ("new_cli_project_template", "my_app"));
    assert_eq!(pairs[1], ("New Cli Project Template", "My App"));
    assert!(pairs.contains(&("TEMPLATE_DESCRIPTION", "Terminal dashboards")));
    assert!(pairs.contains(&("TEMPLATE_AUTHOR_NAME", "Ada Lovelace")));
    assert!(pairs.contains(&("TEMPLATE_REPOSITORY", "https://github.com/ada/dash")));
    // homepage was absent, so no pair for it.
    assert!(!pairs.iter().any(|(s, _)| *s == "TEMPLATE_HOMEPAGE"));
}

#[test]
fn feature_closure_matches_spec_properties() {
    domain::validate_graph().unwrap();

    // Baseline membership for every requested set.
    for requested in [
        vec![],
        vec![FeatureId::Cli],
        vec![FeatureId::Textual],
        vec![FeatureId::Cli, FeatureId::ParAiCore],
    ] {
        let resolved = domain::resolve(Some(&requested));
        assert!(resolved.contains(&FeatureId::Base));

        // Completeness: every transitive dependency is present.
        for feature in &resolved {
            for dep in feature.deps() {
                assert!(resolved.contains(dep), "{feature} missing dep {dep}");
            }
        }
    }

    // Minimality: nothing outside the closure of the request.
    let resolved = domain::resolve(Some(&[FeatureId::ParAiCore]));
    assert_eq!(
        resolved,
        HashSet::from([FeatureId::Base, FeatureId::ParAiCore])
    );
}

#[test]
fn remote_and_local_sources_classify_round_trip() {
    match TemplateSource::classify("https://github.com/ada/tpl").unwrap() {
        TemplateSource::Remote(url) => {
            assert_eq!(url.as_str(), "https://github.com/ada/tpl.git");
        }
        other => panic!("expected remote source, got {other:?}"),
    }

    assert_eq!(
        TemplateSource::classify("new_cli_project_template").unwrap(),
        TemplateSource::Local("new_cli_project_template".into())
    );
}

#[test]
fn metadata_load_failure_returns_no_partial_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("metadata.yaml");
    // The project section is fine; the broken badge must sink the whole load.
    std::fs::write(
        &path,
        "project:\n  description: ok\nreadme:\n  badges:\n    - name: CI\n",
    )
    .unwrap();

    let err = TemplateMetadata::load(&path).unwrap_err();
    assert!(err.to_string().contains("badge 0"), "got: {err}");
}
