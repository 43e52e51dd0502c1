// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Lint tooling bootstrap.
//!
//! Joylint sets up a project in two independent steps:
//!
//! 1. __Lint packages__: install ESLint, Prettier, and whatever plugins the
//!    project's frontend framework needs, then drop ESLint and Prettier
//!    presets into the project unless it already configures them.
//! 2. __Husky__: install husky and lint-staged, scaffold the `.joylint/` and
//!    `.husky/` directories, copy hook scripts into `.joylint/`, and wire
//!    them up as commit-msg and pre-commit hooks.
//!
//! Both steps are safe to run again. Dependencies already declared by the
//! project are skipped, existing presets are kept, and hook scripts are
//! simply replaced with fresh copies.

use crate::{
    install::{Dependency, InstallError, Installer, PackageManager},
    manifest::{ManifestError, PackageManifest, MANIFEST_FILE},
    path::{husky_dir, joylint_dir},
    preset::{eslint_config, PrettierOptions},
    syscall::{Invocation, Syscall, SyscallError, SystemShell},
};

use serde::{Deserialize, Serialize};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::{create_dir_all, write},
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info, instrument};

/// Frontend framework of target project.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Framework {
    /// Plain JavaScript or TypeScript.
    #[default]
    None,
    React,
    Vue2,
    Vue3,
}

impl FromStr for Framework {
    type Err = UnsupportedFramework;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        match data {
            "none" => Ok(Self::None),
            "react" => Ok(Self::React),
            "vue2" => Ok(Self::Vue2),
            "vue3" => Ok(Self::Vue3),
            _ => Err(UnsupportedFramework(data.into())),
        }
    }
}

impl Display for Framework {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(match self {
            Self::None => "none",
            Self::React => "react",
            Self::Vue2 => "vue2",
            Self::Vue3 => "vue3",
        })
    }
}

/// Framework identifier is not one joylint has presets for.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("unsupported framework {0:?}, expected one of: none, react, vue2, vue3")]
pub struct UnsupportedFramework(pub String);

type DependencyTable = &'static [(&'static str, Option<&'static str>)];

const LINT_TOOLS: DependencyTable = &[
    ("eslint", Some("^8.57.0")),
    ("prettier", Some("^3.0.0")),
    ("eslint-config-prettier", None),
    ("eslint-plugin-prettier", None),
    ("@typescript-eslint/parser", Some("^6.0.0")),
    ("@typescript-eslint/eslint-plugin", Some("^6.0.0")),
    ("typescript", None),
];

const REACT_DEPS: DependencyTable = &[
    ("eslint-plugin-react", None),
    ("eslint-plugin-react-hooks", None),
];

const VUE2_DEPS: DependencyTable = &[
    ("eslint-plugin-vue", Some("^7.20.0")),
    ("vue-eslint-parser", Some("^7.11.0")),
];

const VUE3_DEPS: DependencyTable = &[
    ("eslint-plugin-vue", Some("^9.0.0")),
    ("vue-eslint-parser", Some("^9.0.0")),
];

const HUSKY_DEPS: DependencyTable = &[("husky", Some("^8.0.0")), ("lint-staged", None)];

// INVARIANT: Every hook script is embedded, so joylint needs no install tree.
const HOOK_SCRIPTS: &[(&str, &str)] = &[
    (
        "verify_commit_msg.mjs",
        include_str!("../templates/verify_commit_msg.mjs"),
    ),
    ("lint_staged.mjs", include_str!("../templates/lint_staged.mjs")),
];

const ESLINT_CONFIG_FILES: &[&str] = &[
    ".eslintrc",
    ".eslintrc.js",
    ".eslintrc.cjs",
    ".eslintrc.json",
    ".eslintrc.yaml",
    ".eslintrc.yml",
    "eslint.config.js",
    "eslint.config.mjs",
];

const PRETTIER_CONFIG_FILES: &[&str] = &[
    ".prettierrc",
    ".prettierrc.json",
    ".prettierrc.js",
    ".prettierrc.cjs",
    ".prettierrc.yaml",
    ".prettierrc.yml",
    "prettier.config.js",
    "prettier.config.cjs",
];

fn to_dependencies(tables: impl IntoIterator<Item = DependencyTable>) -> Vec<Dependency> {
    tables
        .into_iter()
        .flatten()
        .map(|(name, version)| Dependency {
            name: (*name).into(),
            version: version.map(Into::into),
        })
        .collect()
}

/// Lint dependencies for target framework.
pub fn lint_dependencies(framework: Framework) -> Vec<Dependency> {
    match framework {
        Framework::None => to_dependencies([LINT_TOOLS]),
        Framework::React => to_dependencies([LINT_TOOLS, REACT_DEPS]),
        Framework::Vue2 => to_dependencies([LINT_TOOLS, VUE2_DEPS]),
        Framework::Vue3 => to_dependencies([LINT_TOOLS, VUE3_DEPS]),
    }
}

/// Commit hook dependencies.
pub fn husky_dependencies() -> Vec<Dependency> {
    to_dependencies([HUSKY_DEPS])
}

/// Closing message of a finished setup task.
pub fn summary(task: impl AsRef<str>, installed: usize) -> String {
    let status = match installed {
        0 => "Already up-to-date.",
        _ => "All tasks are already done.",
    };

    format!("[JOYLINT] {} success {status}", task.as_ref())
}

/// Lint tooling bootstrapper for a single project.
#[derive(Debug, Clone)]
pub struct Setup<S = SystemShell>
where
    S: Syscall,
{
    shell: S,
    manager: PackageManager,
    workspace: bool,
    cwd: PathBuf,
}

impl<S> Setup<S>
where
    S: Syscall,
{
    /// Construct new bootstrapper for project at target directory.
    pub fn new(shell: S, manager: PackageManager, cwd: impl Into<PathBuf>) -> Self {
        Self {
            shell,
            manager,
            workspace: false,
            cwd: cwd.into(),
        }
    }

    /// Treat target project as a multi-package workspace root.
    pub fn workspace(mut self, workspace: bool) -> Self {
        self.workspace = workspace;
        self
    }

    pub fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    fn installer(&self) -> Installer<&S> {
        Installer::new(&self.shell, self.manager).workspace(self.workspace)
    }

    /// Install lint packages and write lint presets.
    ///
    /// A preset is skipped when the project already configures that tool,
    /// either through a config file or inline in its manifest. Returns number of dependencies installed.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::Install`] if dependency installation fails.
    /// - Return [`SetupError::Manifest`] if manifest cannot be reloaded.
    /// - Return [`SetupError::WriteFile`] if a preset cannot be written.
    #[instrument(skip(self), level = "debug")]
    pub fn lint_packages(&self, framework: Framework) -> Result<usize> {
        info!("setup lint packages for framework {framework}");
        let installed = self
            .installer()
            .install(&self.cwd, &lint_dependencies(framework))?;

        let manifest = PackageManifest::load(&self.cwd)?;
        if manifest.eslint_config.is_some() {
            info!("keep existing eslintConfig in {MANIFEST_FILE}");
        } else {
            let eslint = serde_json::to_string_pretty(&eslint_config(framework))?;
            write_preset(&self.cwd, ESLINT_CONFIG_FILES, ".eslintrc.json", eslint)?;
        }

        if manifest.prettier.is_some() {
            info!("keep existing prettier in {MANIFEST_FILE}");
        } else {
            let prettier = serde_json::to_string_pretty(&PrettierOptions::default())?;
            write_preset(&self.cwd, PRETTIER_CONFIG_FILES, ".prettierrc", prettier)?;
        }

        Ok(installed)
    }

    /// Install husky, copy hook scripts, and wire up commit hooks.
    ///
    /// Returns number of dependencies installed.
    ///
    /// # Errors
    ///
    /// - Return [`SetupError::Install`] if dependency installation fails.
    /// - Return [`SetupError::CreateDir`] if hook directories cannot be made.
    /// - Return [`SetupError::WriteFile`] if hook scripts cannot be written.
    /// - Return [`SetupError::Syscall`] if husky or npm fail.
    #[instrument(skip(self), level = "debug")]
    pub fn husky(&self) -> Result<usize> {
        info!("setup commit hooks");
        let installed = self.installer().install(&self.cwd, &husky_dependencies())?;

        let joylint_path = joylint_dir(&self.cwd);
        let husky_path = husky_dir(&self.cwd);
        create_dir_if_missing(&joylint_path)?;
        create_dir_if_missing(&husky_path)?;

        for (name, contents) in HOOK_SCRIPTS {
            let path = joylint_path.join(name);
            debug!("replace hook script {:?}", path.display());
            write(&path, contents).map_err(|err| SetupError::WriteFile { source: err, path })?;
        }

        let hooks = [
            ("commit-msg", "verify_commit_msg.mjs"),
            ("pre-commit", "lint_staged.mjs"),
        ];
        self.npx(["husky", "install"])?;
        for (hook, script) in hooks {
            let hook_path = husky_path.join(hook).display().to_string();
            let command = format!("node {}", joylint_path.join(script).display());
            self.npx(["husky".to_string(), "add".into(), hook_path, command])?;
        }

        // INVARIANT: Every future install re-runs husky install.
        self.shell.interactive(
            &Invocation::new("npm")
                .args(["pkg", "set", "scripts.prepare=husky install"])
                .current_dir(&self.cwd),
        )?;

        Ok(installed)
    }

    fn npx(&self, args: impl IntoIterator<Item = impl Into<String>>) -> Result<()> {
        let invocation = Invocation::new("npx").args(args).current_dir(&self.cwd);
        Ok(self.shell.interactive(&invocation)?)
    }
}

fn create_dir_if_missing(path: &Path) -> Result<bool> {
    if path.is_dir() {
        return Ok(false);
    }

    info!("[JOYLINT] Create {}", path.display());
    create_dir_all(path).map_err(|err| SetupError::CreateDir {
        source: err,
        path: path.to_path_buf(),
    })?;

    Ok(true)
}

// INVARIANT: Existing configuration always wins over presets.
fn write_preset(cwd: &Path, candidates: &[&str], target: &str, contents: String) -> Result<bool> {
    if let Some(existing) = candidates.iter().find(|name| cwd.join(name).exists()) {
        info!("keep existing {existing}");
        return Ok(false);
    }

    let path = cwd.join(target);
    info!("write preset {:?}", path.display());
    write(&path, format!("{contents}\n")).map_err(|err| SetupError::WriteFile { source: err, path })?;

    Ok(true)
}

/// Setup error types.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// Dependency installation fails.
    #[error(transparent)]
    Install(#[from] InstallError),

    /// Project manifest cannot be reloaded after install.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Hook wiring through husky or npm fails.
    #[error("failed to wire up commit hooks")]
    Syscall(#[from] SyscallError),

    /// Directory cannot be created.
    #[error("failed to create directory at {:?}", path.display())]
    CreateDir {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// File cannot be written.
    #[error("failed to write file at {:?}", path.display())]
    WriteFile {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Preset cannot be rendered.
    #[error(transparent)]
    Render(#[from] serde_json::Error),
}

/// Friendly result alias :3
type Result<T, E = SetupError> = std::result::Result<T, E>;
