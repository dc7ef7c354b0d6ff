//! Integration tests: core services wired to the adapter filesystems.

use std::path::Path;

use stencil_adapters::{LocalFilesystem, MemoryFilesystem};
use stencil_core::application::{Filesystem, InstantiateService, Projection, apply_replacements};
use stencil_core::domain::{ReplacementTable, TemplateMetadata};

fn patterns(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

#[test]
fn full_instantiation_over_memory_filesystem() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/repos/new_cli_project_template/README.md", "# New Cli Project Template\n");
    fs.seed_file(
        "/repos/new_cli_project_template/pyproject.toml",
        "name = \"new_cli_project_template\"\ndescription = \"TEMPLATE_DESCRIPTION\"\n",
    );
    fs.seed_file(
        "/repos/new_cli_project_template/src/new_cli_project_template/__init__.py",
        "\"\"\"New Cli Project Template\"\"\"\n",
    );
    fs.seed_file("/repos/new_cli_project_template/.git/HEAD", "ref: main");

    let service = InstantiateService::new(Box::new(fs.clone()));
    let template_dir = Path::new("/repos/new_cli_project_template");
    let project_dir = Path::new("/repos/my_app");

    service.validate_setup(template_dir, project_dir, false).unwrap();
    service.copy_template(template_dir, project_dir).unwrap();
    service
        .rename_src_dir(project_dir, "new_cli_project_template", "my_app")
        .unwrap();

    let mut metadata = TemplateMetadata::default();
    metadata.project.description = "Makes apps".into();

    let report = service
        .update_files(
            project_dir,
            "new_cli_project_template",
            "my_app",
            Some(&metadata),
            &patterns(&["README.md", "pyproject.toml", "src/{project_name}/__init__.py"]),
            |_| {},
        )
        .unwrap();

    assert_eq!(report.files_visited, 3);
    assert_eq!(report.files_changed, 3);

    // The title-case variant of the template name was rewritten.
    let init = fs
        .read_file(Path::new("/repos/my_app/src/my_app/__init__.py"))
        .unwrap();
    assert_eq!(init, "\"\"\"My App\"\"\"\n");

    let pyproject = fs.read_file(Path::new("/repos/my_app/pyproject.toml")).unwrap();
    assert!(pyproject.contains("name = \"my_app\""));
    assert!(pyproject.contains("description = \"Makes apps\""));

    // Ignored entries never crossed over.
    assert!(!fs.exists(Path::new("/repos/my_app/.git/HEAD")));
}

#[test]
fn engine_is_idempotent_and_skips_noop_writes() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/f.txt", "alpha beta alpha");

    let mut table = ReplacementTable::new();
    table.insert("alpha", "gamma");

    assert!(apply_replacements(&fs, Path::new("/f.txt"), &table).unwrap());
    assert_eq!(fs.read_file(Path::new("/f.txt")).unwrap(), "gamma beta gamma");
    assert_eq!(fs.writes_to(Path::new("/f.txt")), 1);

    // Second pass: search keys no longer occur, no write happens.
    assert!(!apply_replacements(&fs, Path::new("/f.txt"), &table).unwrap());
    assert_eq!(fs.writes_to(Path::new("/f.txt")), 1);
}

#[test]
fn readme_marker_replaces_trailing_content() {
    let fs = MemoryFilesystem::new();
    fs.seed_file(
        "/proj/README.md",
        "old generated stuff\n<!-- METADATA_CONTENT -->\n## Usage\nRun it.\n",
    );

    let mut metadata = TemplateMetadata::default();
    metadata.readme.title = "My App".into();
    metadata.readme.description = "Does things.".into();

    let service = InstantiateService::new(Box::new(fs.clone()));
    let report = service
        .update_files(Path::new("/proj"), "tpl", "my_app", Some(&metadata), &[], |_| {})
        .unwrap();
    assert_eq!(report.readme, Projection::Updated);

    let readme = fs.read_file(Path::new("/proj/README.md")).unwrap();
    assert!(readme.starts_with("# My App"));
    assert!(readme.contains("## Usage"));
    assert!(!readme.contains("old generated stuff"));
}

#[test]
fn readme_without_marker_gets_block_prepended() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/proj/README.md", "existing body\n");

    let mut metadata = TemplateMetadata::default();
    metadata.readme.title = "Tool".into();
    metadata.readme.description = "Desc".into();

    let service = InstantiateService::new(Box::new(fs.clone()));
    service
        .update_files(Path::new("/proj"), "tpl", "tool", Some(&metadata), &[], |_| {})
        .unwrap();

    let readme = fs.read_file(Path::new("/proj/README.md")).unwrap();
    assert!(readme.starts_with("# Tool"));
    assert!(readme.ends_with("existing body\n"));
}

#[test]
fn pyproject_placeholders_patch_exact_layouts_only() {
    let fs = MemoryFilesystem::new();
    fs.seed_file(
        "/proj/pyproject.toml",
        concat!(
            "keywords = [\n    \"TEMPLATE_KEYWORDS\",\n]\n",
            "classifiers = [\n    \"TEMPLATE_CLASSIFIERS\",\n]\n",
            "Documentation = \"TEMPLATE_DOCUMENTATION\"\n",
            "Issues = \"TEMPLATE_ISSUES\"\n",
            "maintainers = [{ name = \"TEMPLATE_MAINTAINER_NAME\", email = \"TEMPLATE_MAINTAINER_EMAIL\" }]\n",
        ),
    );

    let mut metadata = TemplateMetadata::default();
    metadata.project.keywords = vec!["cli".into(), "tool".into()];
    metadata.pyproject_classifiers = vec!["Development Status :: 4 - Beta".into()];
    metadata.project.documentation = "https://docs.example.com".into();
    metadata.project.issues = "https://github.com/ada/tool/issues".into();
    metadata.author.name = "Ada".into();
    metadata.author.email = "ada@example.com".into();
    // no maintainer section: author fills in at use time

    let service = InstantiateService::new(Box::new(fs.clone()));
    let report = service
        .update_files(Path::new("/proj"), "tpl", "tool", Some(&metadata), &[], |_| {})
        .unwrap();
    assert_eq!(report.pyproject, Projection::Updated);

    let pyproject = fs.read_file(Path::new("/proj/pyproject.toml")).unwrap();
    assert!(pyproject.contains("keywords = [\n    \"cli\",\n    \"tool\",\n]"));
    assert!(pyproject.contains("\"Development Status :: 4 - Beta\","));
    assert!(pyproject.contains("Documentation = \"https://docs.example.com\""));
    assert!(pyproject.contains("name = \"Ada\", email = \"ada@example.com\""));
}

#[test]
fn pyproject_mismatched_layout_is_a_silent_miss() {
    let fs = MemoryFilesystem::new();
    // Single-line keyword layout does not match the expected block form.
    fs.seed_file("/proj/pyproject.toml", "keywords = [\"TEMPLATE_KEYWORDS\"]\n");

    let mut metadata = TemplateMetadata::default();
    metadata.project.keywords = vec!["cli".into()];

    let service = InstantiateService::new(Box::new(fs.clone()));
    let report = service
        .update_files(Path::new("/proj"), "tpl", "tool", Some(&metadata), &[], |_| {})
        .unwrap();

    assert_eq!(report.pyproject, Projection::Unchanged);
    assert_eq!(
        fs.read_file(Path::new("/proj/pyproject.toml")).unwrap(),
        "keywords = [\"TEMPLATE_KEYWORDS\"]\n"
    );
}

#[test]
fn env_projector_appends_without_overwriting() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/proj/.env", "APP_ENV=production\n");

    let mut metadata = TemplateMetadata::default();
    metadata.environment.insert("APP_ENV".into(), "dev".into());
    metadata.environment.insert("LOG_LEVEL".into(), "info".into());

    let service = InstantiateService::new(Box::new(fs.clone()));
    let report = service
        .update_files(Path::new("/proj"), "tpl", "tool", Some(&metadata), &[], |_| {})
        .unwrap();
    assert_eq!(report.env, Projection::Updated);

    let env = fs.read_file(Path::new("/proj/.env")).unwrap();
    assert!(env.contains("APP_ENV=production"));
    assert!(!env.contains("APP_ENV=dev"));
    assert!(env.contains("LOG_LEVEL=info"));
}

#[test]
fn missing_projector_targets_are_warnings_not_errors() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/proj/placeholder.txt", "");

    let mut metadata = TemplateMetadata::default();
    metadata.readme.title = "Tool".into();
    metadata.environment.insert("K".into(), "v".into());

    let service = InstantiateService::new(Box::new(fs.clone()));
    let report = service
        .update_files(Path::new("/proj"), "tpl", "tool", Some(&metadata), &[], |_| {})
        .unwrap();

    assert_eq!(report.readme, Projection::Skipped);
    assert_eq!(report.pyproject, Projection::Skipped);
    assert_eq!(report.env, Projection::Skipped);
}

#[test]
fn end_to_end_on_real_disk() {
    let repo = tempfile::tempdir().unwrap();
    let template_dir = repo.path().join("new_cli_project_template");
    std::fs::create_dir_all(template_dir.join("src/new_cli_project_template")).unwrap();
    std::fs::write(
        template_dir.join("src/new_cli_project_template/__init__.py"),
        "\"\"\"New Cli Project Template\"\"\"\n",
    )
    .unwrap();
    std::fs::write(template_dir.join("README.md"), "# new_cli_project_template\n").unwrap();

    let project_dir = repo.path().join("my_app");
    let service = InstantiateService::new(Box::new(LocalFilesystem::new()));

    service.validate_setup(&template_dir, &project_dir, false).unwrap();
    service.copy_template(&template_dir, &project_dir).unwrap();
    service
        .rename_src_dir(&project_dir, "new_cli_project_template", "my_app")
        .unwrap();

    let mut seen = Vec::new();
    service
        .update_files(
            &project_dir,
            "new_cli_project_template",
            "my_app",
            None,
            &patterns(&["README.md", "src/{project_name}/__init__.py"]),
            |path| seen.push(path.to_path_buf()),
        )
        .unwrap();

    assert_eq!(seen.len(), 2);
    let init =
        std::fs::read_to_string(project_dir.join("src/my_app/__init__.py")).unwrap();
    assert_eq!(init, "\"\"\"My App\"\"\"\n");
    let readme = std::fs::read_to_string(project_dir.join("README.md")).unwrap();
    assert_eq!(readme, "# my_app\n");
}

#[test]
fn rename_missing_src_reports_available_dirs() {
    let fs = MemoryFilesystem::new();
    fs.seed_file("/proj/src/something_else/__init__.py", "");

    let service = InstantiateService::new(Box::new(fs));
    let err = service
        .rename_src_dir(Path::new("/proj"), "tpl", "my_app")
        .unwrap_err();
    let suggestions = match &err {
        stencil_core::error::StencilError::Application(app) => app.suggestions(),
        other => panic!("unexpected error: {other:?}"),
    };
    assert!(
        suggestions
            .iter()
            .any(|s| s.contains("something_else")),
        "got: {suggestions:?}"
    );
}
