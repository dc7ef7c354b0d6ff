//! Setup command plan - package installation and repository init.
//!
//! Building the plan is pure (and fully testable); executing it goes
//! through the `CommandRunner` port. Commands run strictly in order and
//! the first failure aborts the sequence with the captured output
//! surfaced verbatim.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use tracing::{info, instrument};

use crate::application::error::ApplicationError;
use crate::application::ports::{CommandRunner, CommandSpec};
use crate::domain::features::{self, FeatureId, PackageSpec};
use crate::domain::metadata::TemplateMetadata;
use crate::error::StencilResult;

/// Timeout for package-manager commands.
const PACKAGE_TIMEOUT: Duration = Duration::from_secs(300);
/// Timeout for repository initialisation.
const VCS_TIMEOUT: Duration = Duration::from_secs(30);

/// Why a feature ended up in the plan, for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureOrigin {
    Baseline,
    Requested,
    Metadata,
    Dependency,
}

/// One feature scheduled for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureInstall {
    pub feature: FeatureId,
    pub packages: Vec<&'static str>,
    pub origin: FeatureOrigin,
}

/// The ordered command sequence for one instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetupPlan {
    /// Features in display/install order: baseline first, then lexicographic.
    pub features: Vec<FeatureInstall>,
    /// Metadata package entries that are not feature identifiers.
    pub direct_packages: Vec<String>,
    commands: Vec<CommandSpec>,
}

impl SetupPlan {
    /// Build the plan from requested features and optional metadata.
    ///
    /// Metadata package entries are classified once: feature identifiers
    /// join the resolution set, everything else installs verbatim.
    pub fn build(requested: &[FeatureId], metadata: Option<&TemplateMetadata>) -> Self {
        let mut all_requested: Vec<FeatureId> = requested.to_vec();
        let mut metadata_features: HashSet<FeatureId> = HashSet::new();
        let mut direct_packages: Vec<String> = Vec::new();

        if let Some(metadata) = metadata {
            for entry in &metadata.packages {
                match PackageSpec::classify(entry) {
                    PackageSpec::Feature(feature) => {
                        all_requested.push(feature);
                        metadata_features.insert(feature);
                    }
                    PackageSpec::Direct(name) => direct_packages.push(name),
                }
            }
        }

        let resolved = features::resolve(Some(&all_requested));
        let requested_set: HashSet<FeatureId> = requested.iter().copied().collect();

        let features: Vec<FeatureInstall> = features::sorted_for_display(&resolved)
            .into_iter()
            .map(|feature| {
                let origin = if feature == features::BASELINE {
                    FeatureOrigin::Baseline
                } else if requested_set.contains(&feature) {
                    FeatureOrigin::Requested
                } else if metadata_features.contains(&feature) {
                    FeatureOrigin::Metadata
                } else {
                    FeatureOrigin::Dependency
                };
                FeatureInstall {
                    feature,
                    packages: feature.packages().to_vec(),
                    origin,
                }
            })
            .collect();

        let mut commands = vec![CommandSpec::new("uv", ["sync", "-U"], PACKAGE_TIMEOUT)];
        for install in &features {
            let args: Vec<String> = std::iter::once("add".to_string())
                .chain(install.packages.iter().map(|p| p.to_string()))
                .collect();
            commands.push(CommandSpec::new("uv", args, PACKAGE_TIMEOUT));
        }
        if !direct_packages.is_empty() {
            let args: Vec<String> = std::iter::once("add".to_string())
                .chain(direct_packages.iter().cloned())
                .collect();
            commands.push(CommandSpec::new("uv", args, PACKAGE_TIMEOUT));
        }
        commands.push(CommandSpec::new("git", ["init"], VCS_TIMEOUT));

        Self {
            features,
            direct_packages,
            commands,
        }
    }

    /// Commands in execution order.
    pub fn commands(&self) -> &[CommandSpec] {
        &self.commands
    }
}

/// Executes a [`SetupPlan`] through the command-runner port.
pub struct SetupService {
    runner: Box<dyn CommandRunner>,
}

impl SetupService {
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }

    /// Run the plan sequentially inside the project directory.
    ///
    /// No retry: a non-zero exit aborts with the command's captured output,
    /// leaving retry policy to the operator.
    #[instrument(skip_all, fields(commands = plan.commands().len()))]
    pub fn run(
        &self,
        plan: &SetupPlan,
        project_location: &Path,
        mut observer: impl FnMut(&CommandSpec),
    ) -> StencilResult<()> {
        for spec in plan.commands() {
            observer(spec);
            let output = self.runner.run(spec, project_location)?;

            if output.interrupted {
                return Err(ApplicationError::CommandInterrupted {
                    command: spec.to_string(),
                }
                .into());
            }

            if !output.success() {
                return Err(ApplicationError::CommandFailed {
                    command: spec.to_string(),
                    exit_code: output.exit_code,
                    stdout: output.stdout,
                    stderr: output.stderr,
                }
                .into());
            }

            info!(command = %spec, "Command completed");
        }

        Ok(())
    }
}

// ── tests ─────────────────────────────────────────────────────────────────────
