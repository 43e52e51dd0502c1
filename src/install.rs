// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Idempotent dependency installation.
//!
//! Joylint needs a handful of development dependencies in every project it
//! touches. Users often already have some of them, sometimes pinned at
//! versions that differ from the ones joylint would pick. Joylint never
//! fights the user over this. Any dependency already declared in the
//! project manifest is left alone, and the user only gets an advisory about
//! the version joylint recommends.
//!
//! # Installation Plan
//!
//! An __installation plan__ is the ordered listing of dependency specs that
//! are actually missing from the project manifest. It keeps the relative
//! order of the requested dependencies. It is drafted once and consumed
//! right away by a single package manager call.

use crate::{
    manifest::{ManifestError, ManifestSnapshot, PackageManifest},
    syscall::{Invocation, Syscall, SyscallError, SystemShell},
};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    path::Path,
    str::FromStr,
};
use tracing::{info, instrument, warn};

/// Supported Node.js package managers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    #[default]
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    /// Name of the package manager binary.
    pub fn program(&self) -> &'static str {
        match self {
            Self::Npm => "npm",
            Self::Yarn => "yarn",
            Self::Pnpm => "pnpm",
        }
    }

    /// Construct install arguments for a plan.
    ///
    /// Pure function of the manager, the plan, and the workspace flag. The
    /// workspace flag only means something to pnpm, where it installs to the
    /// workspace root instead of refusing to do so.
    pub fn install_args(&self, plan: &InstallPlan, workspace: bool) -> Vec<String> {
        let specs = plan.specs().iter().cloned();
        match self {
            Self::Yarn => ["add", "-D"]
                .into_iter()
                .map(String::from)
                .chain(specs)
                .chain(["--verbose".into()])
                .collect(),
            Self::Pnpm => {
                let mut args = vec!["add".to_string()];
                if workspace {
                    args.push("-w".into());
                }
                args.push("-D".into());
                args.extend(specs);
                args
            }
            Self::Npm => ["install", "-D"]
                .into_iter()
                .map(String::from)
                .chain(specs)
                .chain(
                    ["--no-audit", "--loglevel", "error", "--verbose"]
                        .into_iter()
                        .map(String::from),
                )
                .collect(),
        }
    }
}

impl FromStr for PackageManager {
    type Err = UnsupportedManager;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "npm" => Ok(Self::Npm),
            "yarn" => Ok(Self::Yarn),
            "pnpm" => Ok(Self::Pnpm),
            _ => Err(UnsupportedManager(data.into())),
        }
    }
}

impl Display for PackageManager {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.program())
    }
}

/// Package manager identifier is not one joylint knows how to drive.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported package manager {0:?}, expected one of: npm, yarn, pnpm")]
pub struct UnsupportedManager(pub String);

/// Dependency that should be present in a project.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize, Serialize)]
pub struct Dependency {
    /// Package name, scoped names included.
    pub name: String,

    /// Version range to install, latest if absent.
    pub version: Option<String>,
}

impl Dependency {
    /// Construct dependency that resolves to latest version.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: None,
        }
    }

    /// Construct dependency with target version range.
    pub fn with_version(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            version: Some(version.into()),
        }
    }

    /// Package spec handed to package manager, e.g., `eslint@^8.57.0`.
    pub fn spec(&self) -> String {
        format!("{}@{}", self.name, self.version.as_deref().unwrap_or("latest"))
    }
}

/// Ordered listing of dependency specs missing from a project.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct InstallPlan {
    specs: Vec<String>,
}

impl InstallPlan {
    /// Draft plan from requested dependencies against a manifest snapshot.
    ///
    /// Emits an advisory for every requested dependency that the snapshot
    /// already contains.
    ///
    /// # Invariant
    ///
    /// - Dependencies already present are skipped regardless of version.
    /// - Relative order of the remaining dependencies is preserved.
    pub fn draft<'dep>(
        snapshot: &ManifestSnapshot,
        dependencies: impl IntoIterator<Item = &'dep Dependency>,
    ) -> Self {
        let mut specs = Vec::new();
        for dependency in dependencies {
            match snapshot.version_of(&dependency.name) {
                Some(installed) => warn!("{}", advisory(dependency, installed)),
                None => specs.push(dependency.spec()),
            }
        }

        Self { specs }
    }

    pub fn specs(&self) -> &[String] {
        self.specs.as_slice()
    }

    pub fn len(&self) -> usize {
        self.specs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specs.is_empty()
    }
}

fn advisory(dependency: &Dependency, installed: &str) -> String {
    let recommend = match &dependency.version {
        Some(version) => format!(", the recommended version is {version}"),
        None => String::new(),
    };

    format!(
        "local package has installed {} with version: {installed}{recommend}. Skip the install task!",
        dependency.name
    )
}

/// Install missing development dependencies through a package manager.
#[derive(Debug, Clone)]
pub struct Installer<S = SystemShell>
where
    S: Syscall,
{
    shell: S,
    manager: PackageManager,
    workspace: bool,
}

impl<S> Installer<S>
where
    S: Syscall,
{
    /// Construct new installer.
    pub fn new(shell: S, manager: PackageManager) -> Self {
        Self {
            shell,
            manager,
            workspace: false,
        }
    }

    /// Treat target project as a multi-package workspace root.
    pub fn workspace(mut self, workspace: bool) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn manager(&self) -> PackageManager {
        self.manager
    }

    /// Install requested dependencies that are missing from target project.
    ///
    /// Reads manifest at `<cwd>/package.json`, drafts an installation plan,
    /// and runs the package manager in `cwd` with inherited standard streams.
    /// Nothing is spawned when the plan is empty. Returns the number of
    /// dependencies handed to the package manager.
    ///
    /// # Errors
    ///
    /// - Return [`InstallError::Manifest`] if manifest is missing or
    ///   malformed. No install is attempted.
    /// - Return [`InstallError::Syscall`] if package manager fails.
    #[instrument(skip(self, cwd, dependencies), level = "debug")]
    pub fn install(
        &self,
        cwd: impl AsRef<Path>,
        dependencies: &[Dependency],
    ) -> Result<usize> {
        let snapshot = PackageManifest::load(cwd.as_ref())?.snapshot();
        let plan = InstallPlan::draft(&snapshot, dependencies);
        if plan.is_empty() {
            return Ok(0);
        }

        info!(
            "install {} with {}: {}",
            plan.len(),
            self.manager,
            plan.specs().join(" ")
        );
        let invocation = Invocation::new(self.manager.program())
            .args(self.manager.install_args(&plan, self.workspace))
            .current_dir(cwd.as_ref());
        self.shell.interactive(&invocation)?;

        Ok(plan.len())
    }
}

/// Dependency installation error types.
#[derive(Debug, thiserror::Error)]
pub enum InstallError {
    /// Project manifest cannot be loaded.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Package manager identifier is unknown.
    #[error(transparent)]
    UnsupportedManager(#[from] UnsupportedManager),

    /// Package manager itself failed.
    #[error("package manager failed")]
    Syscall(#[from] SyscallError),
}

/// Friendly result alias :3
type Result<T, E = InstallError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    fn plan_of(specs: &[&str]) -> InstallPlan {
        InstallPlan {
            specs: specs.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn draft_skips_installed_dependencies() {
        let snapshot = ManifestSnapshot::from_iter([("react", "18.0.0")]);
        let dependencies = vec![
            Dependency::new("react"),
            Dependency::with_version("eslint", "8.0.0"),
        ];

        let result = InstallPlan::draft(&snapshot, &dependencies);
        assert_eq!(result, plan_of(&["eslint@8.0.0"]));
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn draft_preserves_request_order() {
        let snapshot = ManifestSnapshot::from_iter([("b", "1.0.0"), ("d", "^2.0.0")]);
        let dependencies = vec![
            Dependency::new("e"),
            Dependency::new("b"),
            Dependency::with_version("a", "3.0.0"),
            Dependency::with_version("d", "2.1.0"),
            Dependency::new("c"),
        ];

        let result = InstallPlan::draft(&snapshot, &dependencies);
        assert_eq!(result, plan_of(&["e@latest", "a@3.0.0", "c@latest"]));
    }

    #[test]
    fn draft_of_everything_installed_is_empty() {
        let snapshot = ManifestSnapshot::from_iter([("husky", "^9.0.0"), ("lint-staged", "^15.0.0")]);
        let dependencies = vec![
            Dependency::with_version("husky", "^8.0.0"),
            Dependency::new("lint-staged"),
        ];

        assert!(InstallPlan::draft(&snapshot, &dependencies).is_empty());
        assert!(InstallPlan::draft(&snapshot, &[]).is_empty());
    }

    #[test]
    fn advisory_mentions_recommended_version() {
        let result = advisory(&Dependency::with_version("eslint", "^8.57.0"), "^7.32.0");
        assert_eq!(
            result,
            "local package has installed eslint with version: ^7.32.0, the recommended version is ^8.57.0. Skip the install task!"
        );

        let result = advisory(&Dependency::new("react"), "18.0.0");
        assert_eq!(
            result,
            "local package has installed react with version: 18.0.0. Skip the install task!"
        );
    }

    #[test_case(PackageManager::Yarn, false, &["add", "-D", "a@latest", "b@1.0.0", "--verbose"]; "yarn")]
    #[test_case(PackageManager::Yarn, true, &["add", "-D", "a@latest", "b@1.0.0", "--verbose"]; "yarn ignores workspace")]
    #[test_case(PackageManager::Pnpm, false, &["add", "-D", "a@latest", "b@1.0.0"]; "pnpm")]
    #[test_case(PackageManager::Pnpm, true, &["add", "-w", "-D", "a@latest", "b@1.0.0"]; "pnpm workspace")]
    #[test_case(
        PackageManager::Npm,
        false,
        &["install", "-D", "a@latest", "b@1.0.0", "--no-audit", "--loglevel", "error", "--verbose"];
        "npm"
    )]
    #[test_case(
        PackageManager::Npm,
        true,
        &["install", "-D", "a@latest", "b@1.0.0", "--no-audit", "--loglevel", "error", "--verbose"];
        "npm ignores workspace"
    )]
    #[test]
    fn install_args_per_manager(manager: PackageManager, workspace: bool, expect: &[&str]) {
        let plan = plan_of(&["a@latest", "b@1.0.0"]);
        let result = manager.install_args(&plan, workspace);
        pretty_assertions::assert_eq!(result, expect);
        pretty_assertions::assert_eq!(result, manager.install_args(&plan, workspace));
    }

    #[test]
    fn parse_package_manager() {
        assert_eq!("pnpm".parse::<PackageManager>(), Ok(PackageManager::Pnpm));
        assert_eq!("yarn".parse::<PackageManager>(), Ok(PackageManager::Yarn));
        assert_eq!("npm".parse::<PackageManager>(), Ok(PackageManager::Npm));
        assert_eq!(
            "bun".parse::<PackageManager>(),
            Err(UnsupportedManager("bun".into()))
        );
    }

    #[test]
    fn dependency_spec_defaults_to_latest() {
        assert_eq!(Dependency::new("@typescript-eslint/parser").spec(), "@typescript-eslint/parser@latest");
        assert_eq!(Dependency::with_version("husky", "^8.0.0").spec(), "husky@^8.0.0");
    }
}
