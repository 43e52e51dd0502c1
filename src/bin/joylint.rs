// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use joylint::{
    config::JoylintDefaults,
    path::default_config_file,
    setup::summary,
    syscall::{exit_code_of, SystemShell},
    Framework, PackageManager, Setup,
};

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::{env::current_dir, path::PathBuf, process::exit};
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about,
    override_usage = "joylint [options] <joylint-command>",
    subcommand_help_heading = "Commands",
    version
)]
struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    fn run(self) -> Result<()> {
        let defaults = match default_config_file() {
            Ok(path) => JoylintDefaults::load(path)?,
            Err(err) => {
                warn!("{err}, use built-in defaults");
                JoylintDefaults::default()
            }
        };
        match self.command {
            Command::Lint(opts) => run_lint(opts, &defaults),
            Command::Husky(opts) => run_husky(opts, &defaults),
            Command::Init(opts) => run_init(opts, &defaults),
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Install lint packages, and write ESLint and Prettier presets.
    #[command(override_usage = "joylint lint [options]")]
    Lint(LintOptions),

    /// Install husky, and wire up commit hooks.
    #[command(override_usage = "joylint husky [options]")]
    Husky(ProjectOptions),

    /// Set up lint packages and commit hooks in one go.
    #[command(override_usage = "joylint init [options]")]
    Init(LintOptions),
}

#[derive(Args, Clone, Debug)]
struct ProjectOptions {
    /// Package manager to install with [npm, yarn, pnpm].
    #[arg(short, long, value_name = "manager")]
    pub manager: Option<PackageManager>,

    /// Treat project as a workspace root.
    #[arg(short, long)]
    pub workspace: bool,

    /// Path to project, current directory if absent.
    #[arg(short = 'C', long, value_name = "path")]
    pub directory: Option<PathBuf>,
}

#[derive(Args, Clone, Debug)]
struct LintOptions {
    #[command(flatten)]
    pub project: ProjectOptions,

    /// Frontend framework of project [none, react, vue2, vue3].
    #[arg(short, long, value_name = "framework")]
    pub framework: Option<Framework>,
}

fn main() {
    let layer = fmt::layer()
        .compact()
        .with_target(false)
        .with_timer(false)
        .without_time();
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap();
    tracing_subscriber::registry()
        .with(layer)
        .with(filter)
        .init();

    if let Err(error) = run() {
        error!("{error:?}");
        let source: &(dyn std::error::Error + 'static) = error.as_ref();
        exit(exit_code_of(source));
    }

    exit(0)
}

fn run() -> Result<()> {
    Cli::parse().run()
}

fn setup_for(opts: ProjectOptions, defaults: &JoylintDefaults) -> Result<Setup> {
    let cwd = match opts.directory {
        Some(path) => path,
        None => current_dir()?,
    };
    let manager = opts.manager.or(defaults.manager).unwrap_or_default();
    let workspace = opts.workspace || defaults.workspace.unwrap_or(false);

    Ok(Setup::new(SystemShell::new(), manager, cwd).workspace(workspace))
}

fn run_lint(opts: LintOptions, defaults: &JoylintDefaults) -> Result<()> {
    let framework = opts.framework.or(defaults.framework).unwrap_or_default();
    let setup = setup_for(opts.project, defaults)?;
    let installed = setup.lint_packages(framework)?;
    info!("{}", summary("Init lint tools", installed));

    Ok(())
}

fn run_husky(opts: ProjectOptions, defaults: &JoylintDefaults) -> Result<()> {
    let setup = setup_for(opts, defaults)?;
    let installed = setup.husky()?;
    info!("{}", summary("Init Git process", installed));

    Ok(())
}

fn run_init(opts: LintOptions, defaults: &JoylintDefaults) -> Result<()> {
    let framework = opts.framework.or(defaults.framework).unwrap_or_default();
    let setup = setup_for(opts.project, defaults)?;
    let installed = setup.lint_packages(framework)? + setup.husky()?;
    info!("{}", summary("Init lint tools and Git process", installed));

    Ok(())
}
