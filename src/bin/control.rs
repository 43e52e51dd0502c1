// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use joylint::{
    config::ControlConfig,
    control::Control,
    prompt::InquireChooser,
    syscall::{exit_code_of, SystemShell},
};

use anyhow::Result;
use clap::Parser;
use std::{env::current_dir, path::PathBuf, process::exit};
use tracing::error;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Clone, Parser)]
#[command(
    about = "Build and release chores of a frontend project",
    override_usage = "control [options] [dev | build | tag | deltag | release] [args]...",
    version
)]
struct Cli {
    /// Path to project, current directory if absent.
    #[arg(short = 'C', long, value_name = "path")]
    pub directory: Option<PathBuf>,

    /// Action to run with its arguments, prompted for if absent.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "command")]
    pub command: Vec<String>,
}

impl Cli {
    fn run(self) -> Result<()> {
        let cwd = match self.directory {
            Some(path) => path,
            None => current_dir()?,
        };
        let config = ControlConfig::load(&cwd)?;
        let control = Control::new(SystemShell::new(), config, cwd);
        control.route(self.command, &InquireChooser::new())?;

        Ok(())
    }
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
