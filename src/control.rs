// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Build and release control.
//!
//! A small router over the everyday chores of a frontend project: run the
//! development server, build, tag, delete tags, and cut a release. Every
//! chore is plain orchestration of external programs, in sequence, where the
//! first failing program aborts the rest.
//!
//! # Actions
//!
//! | Action   | Arguments          | Effect                                        |
//! |----------|--------------------|-----------------------------------------------|
//! | dev      |                    | Start development server                      |
//! | build    | `[--analysis]`     | Build project, or build with bundle analysis  |
//! | tag      | `[name]`           | Create annotated tag and push it              |
//! | deltag   | `--all \| names...` | Delete tags locally and on remote             |
//! | release  | `[name]`           | Build, archive, upload, then tag              |
//!
//! Tag and release names default to the short id of the current commit.

use crate::{
    config::ControlConfig,
    prompt::{Chooser, PromptError},
    syscall::{Invocation, Syscall, SyscallError, SystemShell},
};

use chrono::{Local, Utc};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    fs::remove_file,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, info, instrument, warn};

/// Available control actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Dev,
    Build,
    Tag,
    Deltag,
    Release,
}

impl Action {
    /// All actions in the order they are offered to the user.
    pub const ALL: [Action; 5] = [
        Self::Dev,
        Self::Build,
        Self::Tag,
        Self::Deltag,
        Self::Release,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Dev => "dev",
            Self::Build => "build",
            Self::Tag => "tag",
            Self::Deltag => "deltag",
            Self::Release => "release",
        }
    }
}

impl FromStr for Action {
    type Err = InvalidCommand;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == data)
            .ok_or_else(|| InvalidCommand(data.into()))
    }
}

impl Display for Action {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(self.as_str())
    }
}

/// Command is not a known control action.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("invalid command {0:?}")]
pub struct InvalidCommand(pub String);

/// Usage hint shown for unroutable commands.
pub fn usage() -> String {
    let actions = Action::ALL.map(|action| action.as_str()).join(" ");
    format!("Support command ===> {actions}")
}

/// Release controller for project at target directory.
#[derive(Debug, Clone)]
pub struct Control<S = SystemShell>
where
    S: Syscall,
{
    shell: S,
    config: ControlConfig,
    cwd: PathBuf,
}

impl<S> Control<S>
where
    S: Syscall,
{
    /// Construct new controller.
    pub fn new(shell: S, config: ControlConfig, cwd: impl Into<PathBuf>) -> Self {
        Self {
            shell,
            config,
            cwd: cwd.into(),
        }
    }

    pub fn cwd(&self) -> &Path {
        self.cwd.as_path()
    }

    /// Route command line to its action.
    ///
    /// Asks the chooser for a command line when `args` is empty. Unknown
    /// commands are not errors, the user just gets a usage hint.
    ///
    /// # Errors
    ///
    /// - Return [`ControlError::Prompt`] if no command could be obtained.
    /// - Return whatever error the routed action produces.
    #[instrument(skip(self, chooser), level = "debug")]
    pub fn route(&self, args: Vec<String>, chooser: &impl Chooser) -> Result<()> {
        let args = if args.is_empty() {
            let options = Action::ALL.map(|action| action.as_str());
            chooser
                .choose("Choose command:", &options, Some(Action::Build.as_str()))?
                .split_whitespace()
                .map(ToString::to_string)
                .collect()
        } else {
            args
        };

        let Some((target, rest)) = args.split_first() else {
            warn!("Please confirm your input!");
            info!("{}", usage());
            return Ok(());
        };

        let action = match target.parse::<Action>() {
            Ok(action) => action,
            Err(err) => {
                debug!("{err}");
                warn!("Please confirm your input!");
                info!("{}", usage());
                return Ok(());
            }
        };

        match action {
            Action::Dev => self.develop(),
            Action::Build => self.build(rest.iter().any(|arg| arg == "--analysis")),
            Action::Tag => self.tag(rest.first().cloned()),
            Action::Deltag => self.deltag(rest),
            Action::Release => self.release(rest.first().cloned()),
        }
    }

    /// Start development server with configured environment.
    ///
    /// Environment is handed to the server process only.
    pub fn develop(&self) -> Result<()> {
        info!("start development server");
        let invocation = self
            .invocation("pnpx", ["react-scripts", "start"])
            .envs(self.config.development_env.clone());
        self.shell.interactive(&invocation)?;

        Ok(())
    }

    /// Build project, optionally with bundle analysis.
    pub fn build(&self, analysis: bool) -> Result<()> {
        let script = if analysis { "analyze" } else { "build" };
        self.shell
            .interactive(&self.invocation("pnpm", ["run", script]))?;
        info!("Successfully built at {}", Utc::now().timestamp_millis());

        Ok(())
    }

    /// Create annotated tag and push it to remote.
    pub fn tag(&self, name: Option<String>) -> Result<()> {
        let name = match name {
            Some(name) => name,
            None => self.commit_id()?,
        };

        info!("Tag name is {name}");
        let message = format!("Created at {}", Local::now().format("%Y-%m-%d %H:%M:%S"));
        self.shell.interactive(
            &self.invocation("git", ["tag".to_string(), "-a".into(), name, "-m".into(), message]),
        )?;
        self.shell
            .interactive(&self.invocation("git", ["push", "--tag"]))?;
        info!("Successfully tag at {}", Utc::now().timestamp_millis());

        Ok(())
    }

    /// Delete tags locally and on remote.
    ///
    /// Pass `--all` to delete every local tag, on remote first. Otherwise
    /// target tags are deleted locally first.
    pub fn deltag(&self, names: &[String]) -> Result<()> {
        if names.first().is_some_and(|name| name == "--all") {
            let tags = self.shell.non_interactive(&self.invocation("git", ["tag", "-l"]))?;
            let tags = tags
                .lines()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .collect::<Vec<_>>();
            if tags.is_empty() {
                warn!("no tags to delete");
                return Ok(());
            }

            self.shell.interactive(
                &self.invocation("git", ["push", "origin", "-d"]).args(tags.iter().copied()),
            )?;
            self.shell
                .interactive(&self.invocation("git", ["tag", "-d"]).args(tags.iter().copied()))?;
            info!(
                "Successfully delete all tags on remote/local at {}",
                Utc::now().timestamp_millis()
            );

            return Ok(());
        }

        if names.is_empty() {
            warn!("no tags to delete, pass tag names or --all");
            return Ok(());
        }

        self.shell
            .interactive(&self.invocation("git", ["tag", "-d"]).args(names.iter().cloned()))?;
        self.shell.interactive(
            &self
                .invocation("git", ["push", "origin", "-d"])
                .args(names.iter().cloned()),
        )?;
        info!(
            "Successfully delete {} on remote/local at {}",
            names.join(" "),
            Utc::now().timestamp_millis()
        );

        Ok(())
    }

    /// Build, archive, and upload project, then tag the release.
    ///
    /// # Errors
    ///
    /// - Return [`ControlError::MissingCosPath`] if no upload target is
    ///   configured. Nothing runs in that case.
    pub fn release(&self, name: Option<String>) -> Result<()> {
        let cos_path = self
            .config
            .cos_path
            .as_deref()
            .map(|path| path.trim_end_matches('/').to_string())
            .ok_or(ControlError::MissingCosPath)?;
        let name = match name {
            Some(name) => name,
            None => self.commit_id()?,
        };
        let archive = format!("dist-{name}.tar.gz");

        self.build(false)?;
        self.remove_old_archives()?;
        self.shell.interactive(&self.invocation(
            "tar",
            ["-czvf".to_string(), archive.clone(), self.config.dist_dir.clone()],
        ))?;
        self.shell.interactive(&self.invocation(
            "coscli",
            ["cp".to_string(), archive.clone(), format!("{cos_path}/{archive}")],
        ))?;

        // INVARIANT: Tag last, the tag is what tells servers to update.
        self.tag(Some(name))
    }

    fn commit_id(&self) -> Result<String> {
        let output = self
            .shell
            .non_interactive(&self.invocation("git", ["rev-parse", "--short", "HEAD"]))?;

        Ok(output.trim().to_string())
    }

    fn remove_old_archives(&self) -> Result<()> {
        // INVARIANT: Only match archives directly inside project directory.
        let cwd = glob::Pattern::escape(&self.cwd.to_string_lossy());
        let pattern = Path::new(&cwd).join("dist-*.tar.gz");
        for entry in glob::glob(&pattern.to_string_lossy())? {
            let path = entry?;
            debug!("remove old archive {:?}", path.display());
            remove_file(&path).map_err(|err| ControlError::RemoveArchive { source: err, path })?;
        }

        Ok(())
    }

    fn invocation(
        &self,
        program: &str,
        args: impl IntoIterator<Item = impl Into<String>>,
    ) -> Invocation {
        Invocation::new(program).args(args).current_dir(&self.cwd)
    }
}

/// Control error types.
#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    /// Command could not be obtained from user.
    #[error(transparent)]
    Prompt(#[from] PromptError),

    /// External program failed.
    #[error("external program failed")]
    Syscall(#[from] SyscallError),

    /// Release has nowhere to upload to.
    #[error("no cos_path configured in control.toml, cannot upload release")]
    MissingCosPath,

    /// Archive pattern is malformed.
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Archive directory listing fails.
    #[error(transparent)]
    Glob(#[from] glob::GlobError),

    /// Old archive cannot be removed.
    #[error("failed to remove old archive at {:?}", path.display())]
    RemoveArchive {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
type Result<T, E = ControlError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use simple_test_case::test_case;

    #[test_case("dev", Ok(Action::Dev); "dev")]
    #[test_case("build", Ok(Action::Build); "build")]
    #[test_case("tag", Ok(Action::Tag); "tag")]
    #[test_case("deltag", Ok(Action::Deltag); "deltag")]
    #[test_case("release", Ok(Action::Release); "release")]
    #[test_case("deploy", Err(InvalidCommand("deploy".into())); "unknown")]
    #[test_case("Build", Err(InvalidCommand("Build".into())); "case sensitive")]
    #[test]
    fn parse_action(input: &str, expect: Result<Action, InvalidCommand>) {
        pretty_assertions::assert_eq!(input.parse::<Action>(), expect);
    }

    #[test]
    fn usage_lists_every_action() {
        assert_eq!(usage(), "Support command ===> dev build tag deltag release");
    }
}
