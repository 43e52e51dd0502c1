// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! External program invocation.
//!
//! Joylint does almost none of its own heavy lifting. Package managers, Git,
//! tar, and friends do the actual work, and joylint simply drives them. Every
//! external program goes through the [`Syscall`] trait so that callers never
//! touch [`std::process::Command`] directly.
//!
//! # Interactive vs Non-Interactive
//!
//! An __interactive__ call inherits the standard streams of the current
//! process, so the child talks straight to the user's terminal. A
//! __non-interactive__ call captures standard output and hands it back to
//! the caller as a [`String`]. Both block until the child exits. There is no
//! timeout, so a hung child hangs joylint with it.
//!
//! # Environment
//!
//! Environment variables meant for a child are attached to its
//! [`Invocation`]. The environment of the current process is never mutated.

use std::{
    collections::BTreeMap,
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
    path::{Path, PathBuf},
    process::Command,
};
use tracing::{debug, instrument};

/// Description of a single external program call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name or path of program to execute.
    pub program: String,

    /// Arguments passed to program.
    pub args: Vec<String>,

    /// Working directory of the child, or current directory if absent.
    pub cwd: Option<PathBuf>,

    /// Extra environment variables for the child only.
    pub envs: BTreeMap<String, String>,
}

impl Invocation {
    /// Construct new invocation of target program.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ..Default::default()
        }
    }

    /// Append listing of arguments.
    pub fn args(mut self, args: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Run child in target directory.
    pub fn current_dir(mut self, path: impl AsRef<Path>) -> Self {
        self.cwd = Some(path.as_ref().to_path_buf());
        self
    }

    /// Attach environment variables to child.
    pub fn envs(
        mut self,
        envs: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>,
    ) -> Self {
        self.envs
            .extend(envs.into_iter().map(|(key, value)| (key.into(), value.into())));
        self
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.envs);
        if let Some(cwd) = &self.cwd {
            command.current_dir(cwd);
        }

        command
    }
}

impl Display for Invocation {
    fn fmt(&self, fmt: &mut Formatter<'_>) -> FmtResult {
        fmt.write_str(&self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(fmt, " {arg:?}")?;
            } else {
                write!(fmt, " {arg}")?;
            }
        }

        Ok(())
    }
}

/// Layer of indirection for external program calls.
pub trait Syscall {
    /// Run program with inherited standard streams.
    fn interactive(&self, invocation: &Invocation) -> Result<()>;

    /// Run program and capture its standard output.
    fn non_interactive(&self, invocation: &Invocation) -> Result<String>;
}

impl<S> Syscall for &S
where
    S: Syscall + ?Sized,
{
    fn interactive(&self, invocation: &Invocation) -> Result<()> {
        (**self).interactive(invocation)
    }

    fn non_interactive(&self, invocation: &Invocation) -> Result<String> {
        (**self).non_interactive(invocation)
    }
}

/// System calls through the host operating system.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShell;

impl SystemShell {
    /// Construct new system shell.
    pub fn new() -> Self {
        Self
    }
}

impl Syscall for SystemShell {
    #[instrument(skip(self, invocation), fields(call = %invocation), level = "debug")]
    fn interactive(&self, invocation: &Invocation) -> Result<()> {
        debug!("spawn interactive child");
        let status = invocation
            .to_command()
            .status()
            .map_err(|err| SyscallError::Spawn {
                source: err,
                program: invocation.program.clone(),
            })?;

        if !status.success() {
            return Err(SyscallError::Failed {
                command: invocation.to_string(),
                code: status.code(),
                stderr: String::new(),
            });
        }

        Ok(())
    }

    #[instrument(skip(self, invocation), fields(call = %invocation), level = "debug")]
    fn non_interactive(&self, invocation: &Invocation) -> Result<String> {
        debug!("spawn non-interactive child");
        let output = invocation
            .to_command()
            .output()
            .map_err(|err| SyscallError::Spawn {
                source: err,
                program: invocation.program.clone(),
            })?;
        let stdout = String::from_utf8_lossy(output.stdout.as_slice()).into_owned();
        let stderr = String::from_utf8_lossy(output.stderr.as_slice()).into_owned();

        if !output.status.success() {
            return Err(SyscallError::Failed {
                command: invocation.to_string(),
                code: output.status.code(),
                stderr: chomp(stderr),
            });
        }

        if !stderr.is_empty() {
            debug!("stderr: {}", chomp(stderr));
        }

        Ok(chomp(stdout))
    }
}

// INVARIANT: Chomp trailing newlines only, leading whitespace is kept.
fn chomp(message: String) -> String {
    message
        .strip_suffix("\r\n")
        .or(message.strip_suffix('\n'))
        .map(ToString::to_string)
        .unwrap_or(message)
}

/// Determine process exit code that an error should produce.
///
/// Walks the source chain of the error looking for a failed child. If one
/// is found, then its exit code is used so that the failure status of the
/// child propagates to the caller of joylint. Otherwise the exit code is 1.
pub fn exit_code_of(error: &(dyn StdError + 'static)) -> i32 {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(syscall) = err.downcast_ref::<SyscallError>() {
            return syscall.exit_code();
        }
        current = err.source();
    }

    1
}

/// External program call error types.
#[derive(Debug, thiserror::Error)]
pub enum SyscallError {
    /// Program could not be started at all.
    #[error("failed to spawn {program:?}")]
    Spawn {
        #[source]
        source: std::io::Error,
        program: String,
    },

    /// Program ran, but exited with non-zero status.
    #[error("command {command:?} failed with {}", describe_exit(.code, .stderr))]
    Failed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },
}

impl SyscallError {
    /// Exit code to hand back to caller.
    ///
    /// Children killed by a signal have no exit code, so they map to 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Failed {
                code: Some(code), ..
            } => *code,
            _ => 1,
        }
    }
}

fn describe_exit(code: &Option<i32>, stderr: &str) -> String {
    let status = match code {
        Some(code) => format!("exit status {code}"),
        None => "termination by signal".into(),
    };

    if stderr.is_empty() {
        status
    } else {
        format!("{status}:\n{stderr}")
    }
}

/// Friendly result alias :3
pub type Result<T, E = SyscallError> = std::result::Result<T, E>;
