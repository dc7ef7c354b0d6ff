//! Implementation of the create-project flow.
//!
//! Responsibility: translate CLI arguments into domain inputs, call the
//! core services, and display results.  No business logic lives here.

use std::path::PathBuf;

use tracing::{debug, info, instrument};

use stencil_adapters::{GitFetcher, LocalFilesystem, SystemRunner, ensure_tools};
use stencil_core::{
    application::{
        FeatureOrigin, InstantiateService, SetupPlan, SetupService,
        ports::TemplateFetcher,
    },
    domain::{self, FeatureId, GitUrl, TemplateMetadata, TemplateSource},
};

use crate::{
    cli::{CreateArgs, global::GlobalArgs},
    config::AppConfig,
    error::{CliError, CliResult},
    output::OutputManager,
};

/// Longest project name accepted.
const MAX_PROJECT_NAME_LEN: usize = 50;

/// External tools the setup phase shells out to.
const REQUIRED_TOOLS: &[&str] = &["uv", "git"];

/// Execute the create-project flow.
///
/// Dispatch sequence:
/// 1. Load metadata (if requested) and handle `--list-features`
/// 2. Validate the project name
/// 3. Resolve the template source (local repo dir or remote clone)
/// 4. Validate the setup, show the feature resolution summary
/// 5. Copy, rename, rewrite, project
/// 6. Run the package/VCS bootstrap commands
#[instrument(skip_all, fields(project = args.project_name.as_deref().unwrap_or("")))]
pub fn execute(
    args: CreateArgs,
    _global: GlobalArgs,
    config: AppConfig,
    output: OutputManager,
) -> CliResult<()> {
    // 1. Metadata and informational flags
    let metadata = match &args.metadata {
        Some(path) => {
            let metadata = TemplateMetadata::load(path).map_err(stencil_core::error::StencilError::from)?;
            output.success(&format!("Loaded metadata from {}", path.display()))?;
            Some(metadata)
        }
        None => None,
    };

    if args.list_features {
        return list_features(&output);
    }

    let features: Option<Vec<FeatureId>> = args
        .features
        .as_ref()
        .map(|f| f.iter().map(|arg| FeatureId::from(*arg)).collect());

    if args.preview {
        output.info("Preview mode enabled")?;
        if let Some(metadata) = &metadata {
            show_metadata_preview(metadata, &output)?;
        }
    }

    // 2. Project name
    let project_name = args.project_name.as_deref().ok_or_else(|| {
        CliError::InvalidInput {
            message: "project name is required (use --project-name or -n)".into(),
            source: None,
        }
    })?;
    validate_project_name(project_name)?;

    // 3. Template source
    let source = TemplateSource::classify(&args.template_name)
        .map_err(stencil_core::error::StencilError::from)?;

    // The temp dir guard must outlive the whole flow; dropping it removes
    // the clone whether we succeed or bail out.
    let mut clone_guard: Option<tempfile::TempDir> = None;

    let (template_dir, template_name, project_location) = match &source {
        TemplateSource::Remote(url) => {
            let template_name = template_name_from_url(url);
            let project_location = std::env::current_dir()?.join(project_name);
            if args.preview {
                output.info(&format!("Would clone remote template from {url}"))?;
                // Display-only path; preview never touches it.
                (PathBuf::from(url.as_str()), template_name, project_location)
            } else {
                let dir = clone_remote(url, &output)?;
                let path = dir.path().to_path_buf();
                clone_guard = Some(dir);
                (path, template_name, project_location)
            }
        }
        TemplateSource::Local(name) => {
            let repo_dir = config.find_repo_dir().ok_or(CliError::RepoDirNotFound)?;
            debug!(repo_dir = %repo_dir.display(), "Using template repository");
            (repo_dir.join(name), name.clone(), repo_dir.join(project_name))
        }
    };

    // 4. Validation + resolution summary
    let service = InstantiateService::new(Box::new(LocalFilesystem::new()));
    let is_remote = matches!(source, TemplateSource::Remote(_));

    if !args.preview || !is_remote {
        service.validate_setup(&template_dir, &project_location, is_remote)?;
    }

    let plan = SetupPlan::build(features.as_deref().unwrap_or_default(), metadata.as_ref());
    show_feature_summary(&plan, features.as_deref(), &output)?;

    // 5. Copy, rename, rewrite
    output.header(&format!(
        "Copying template from {} to {}...",
        template_dir.display(),
        project_location.display()
    ))?;
    if !args.preview {
        service.copy_template(&template_dir, &project_location)?;
        output.success("Template copied successfully")?;
    }

    output.header(&format!(
        "Renaming src/{template_name} to src/{project_name}..."
    ))?;
    if !args.preview {
        service.rename_src_dir(&project_location, &template_name, project_name)?;
        output.success(&format!(
            "Renamed src directory: {template_name} \u{2192} {project_name}"
        ))?;
    }

    output.header(&format!("Updating files with project name '{project_name}'..."))?;
    if !args.preview {
        let files =
            InstantiateService::expand_patterns(&config.file_patterns, project_name, metadata.as_ref());
        let bar = output.progress_bar(files.len() as u64, "Updating files...");
        let report = service.update_files(
            &project_location,
            &template_name,
            project_name,
            metadata.as_ref(),
            &config.file_patterns,
            |_| bar.inc(1),
        )?;
        bar.finish_and_clear();
        info!(
            visited = report.files_visited,
            changed = report.files_changed,
            "Files updated"
        );
        if metadata.is_some() {
            report_projection(&output, "README.md", report.readme)?;
            report_projection(&output, "pyproject.toml", report.pyproject)?;
            report_projection(&output, ".env", report.env)?;
        }
    }

    // 6. Bootstrap commands
    output.header("Running setup commands...")?;
    if !args.preview {
        ensure_tools(REQUIRED_TOOLS)?;
        let setup = SetupService::new(Box::new(SystemRunner::new()));
        let bar = output.progress_bar(plan.commands().len() as u64, "Running setup commands...");
        setup.run(&plan, &project_location, |spec| {
            bar.set_message(spec.to_string());
            bar.inc(1);
        })?;
        bar.finish_and_clear();
        output.success("Dependencies synchronized")?;
        output.success("Git repository initialized")?;
    }

    if args.preview {
        output.success(&format!("Preview completed for project '{project_name}'"))?;
    } else {
        output.success(&format!("Project '{project_name}' created successfully!"))?;
        output.dim(&format!("Location: {}", project_location.display()))?;
    }

    // Explicit for readability: the clone directory is removed here.
    drop(clone_guard);

    Ok(())
}

// ── Project name validation ───────────────────────────────────────────────────

fn validate_project_name(name: &str) -> CliResult<()> {
    if name.is_empty() {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "name cannot be empty".into(),
        });
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: "only letters, numbers, underscores, and hyphens are allowed".into(),
        });
    }
    if name.len() > MAX_PROJECT_NAME_LEN {
        return Err(CliError::InvalidProjectName {
            name: name.into(),
            reason: format!("{} characters exceeds the {MAX_PROJECT_NAME_LEN} limit", name.len()),
        });
    }
    Ok(())
}

// ── Template source helpers ───────────────────────────────────────────────────

/// Template name for rename/rewrite purposes: the URL's last path segment
/// minus any `.git` suffix.
fn template_name_from_url(url: &GitUrl) -> String {
    url.as_str()
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("template")
        .trim_end_matches(".git")
        .to_string()
}

fn clone_remote(url: &GitUrl, output: &OutputManager) -> CliResult<tempfile::TempDir> {
    let temp_dir = tempfile::Builder::new()
        .prefix("stencil_template_")
        .tempdir()?;

    let spinner = output.spinner(&format!("Cloning remote template from {url}..."));
    let fetcher = GitFetcher::new();
    let result = fetcher.fetch(url, temp_dir.path());
    spinner.finish_and_clear();
    result?;

    output.success("Remote template cloned successfully")?;
    Ok(temp_dir)
}

// ── UI helpers ────────────────────────────────────────────────────────────────

fn list_features(output: &OutputManager) -> CliResult<()> {
    output.header("Available Features:")?;
    for feature in domain::ALL_FEATURES {
        let deps = feature.deps();
        let dep_info = if deps.is_empty() {
            String::new()
        } else {
            format!(
                " (depends on: {})",
                deps.iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        output.print(&format!(
            "  {}: {}{}",
            feature,
            feature.packages().join(", "),
            dep_info
        ))?;
    }
    Ok(())
}

fn show_metadata_preview(metadata: &TemplateMetadata, output: &OutputManager) -> CliResult<()> {
    output.header("Metadata loaded:")?;
    if !metadata.project.description.is_empty() {
        output.print(&format!("  Description: {}", metadata.project.description))?;
    }
    if !metadata.author.name.is_empty() {
        output.print(&format!(
            "  Author: {} <{}>",
            metadata.author.name, metadata.author.email
        ))?;
    }
    if !metadata.packages.is_empty() {
        output.print(&format!("  Required packages: {}", metadata.packages.join(", ")))?;
    }
    Ok(())
}

fn show_feature_summary(
    plan: &SetupPlan,
    requested: Option<&[FeatureId]>,
    output: &OutputManager,
) -> CliResult<()> {
    output.header("Feature resolution:")?;
    if let Some(requested) = requested
        && !requested.is_empty()
    {
        let names: Vec<&str> = requested.iter().map(|f| f.as_str()).collect();
        output.print(&format!("  Requested: {}", names.join(", ")))?;
    }
    for install in &plan.features {
        let origin = match install.origin {
            FeatureOrigin::Baseline => "always included",
            FeatureOrigin::Requested => "requested",
            FeatureOrigin::Metadata => "from metadata",
            FeatureOrigin::Dependency => "dependency",
        };
        output.print(&format!(
            "  \u{2713} {} ({origin}): {}",
            install.feature,
            install.packages.join(", ")
        ))?;
    }
    if !plan.direct_packages.is_empty() {
        output.print(&format!(
            "  Direct packages from metadata: {}",
            plan.direct_packages.join(", ")
        ))?;
    }
    output.print(&format!("  Total features to install: {}", plan.features.len()))?;
    Ok(())
}

fn report_projection(
    output: &OutputManager,
    target: &str,
    projection: stencil_core::application::Projection,
) -> CliResult<()> {
    use stencil_core::application::Projection;
    match projection {
        Projection::Updated => output.success(&format!("{target} updated with metadata"))?,
        Projection::Unchanged => {}
        Projection::Skipped => output.warning(&format!("{target} not updated (missing or nothing to apply)"))?,
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
