// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Configuration layout.
//!
//! Specify the layout for configuration files that joylint reads. There are
//! two of them:
//!
//! 1. `control.toml` at the top-level of a project, read by the release CLI.
//! 2. `$XDG_CONFIG_HOME/joylint/config.toml`, holding user-level defaults for
//!    the lint bootstrapper.
//!
//! Both files are optional. A missing file is the same as an empty one.

use crate::{install::PackageManager, path::CONTROL_CONFIG_FILE, setup::Framework};

use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Release CLI configuration layout.
///
/// # General Layout
///
/// ```toml
/// cos_path = "cos://bucket/releases"
/// dist_dir = "./dist"
///
/// [development_env]
/// PORT = "3000"
/// ```
///
/// All string values go through shell expansion, so `$HOME` and `~` work.
#[derive(Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct ControlConfig {
    /// Object storage prefix that release archives get uploaded to.
    #[serde(default)]
    pub cos_path: Option<String>,

    /// Build output directory to archive on release.
    #[serde(default = "default_dist_dir")]
    pub dist_dir: String,

    /// Environment handed to the development server only.
    #[serde(default)]
    pub development_env: BTreeMap<String, String>,
}

impl ControlConfig {
    /// Load release configuration of project at target directory.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if configuration file exists but
    ///   cannot be read.
    /// - Return [`ConfigError::Deserialize`] if configuration is malformed.
    /// - Return [`ConfigError::ShellExpansion`] if a value references an
    ///   undefined variable.
    pub fn load(cwd: impl AsRef<Path>) -> Result<Self> {
        let path = cwd.as_ref().join(CONTROL_CONFIG_FILE);
        match read_optional(&path)? {
            Some(content) => content.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            cos_path: None,
            dist_dir: default_dist_dir(),
            development_env: BTreeMap::new(),
        }
    }
}

impl FromStr for ControlConfig {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        let mut config: ControlConfig = toml::from_str(data).map_err(ConfigError::Deserialize)?;

        // INVARIANT: Perform shell expansion on every string value.
        config.cos_path = config.cos_path.as_deref().map(expand).transpose()?;
        config.dist_dir = expand(&config.dist_dir)?;
        config.development_env = config
            .development_env
            .iter()
            .map(|(key, value)| Ok((key.clone(), expand(value)?)))
            .collect::<Result<_>>()?;

        Ok(config)
    }
}

fn default_dist_dir() -> String {
    "./dist".into()
}

/// User-level defaults for the lint bootstrapper.
///
/// Command-line flags always take precedence over these.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
pub struct JoylintDefaults {
    /// Package manager to install dependencies with.
    pub manager: Option<PackageManager>,

    /// Frontend framework of target projects.
    pub framework: Option<Framework>,

    /// Treat target projects as workspace roots.
    pub workspace: Option<bool>,
}

impl JoylintDefaults {
    /// Load defaults from target file, or empty defaults if it is missing.
    ///
    /// # Errors
    ///
    /// - Return [`ConfigError::Read`] if file exists but cannot be read.
    /// - Return [`ConfigError::Deserialize`] if file is malformed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        match read_optional(path.as_ref())? {
            Some(content) => content.parse(),
            None => Ok(Self::default()),
        }
    }
}

impl FromStr for JoylintDefaults {
    type Err = ConfigError;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        toml::from_str(data).map_err(ConfigError::Deserialize)
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match read_to_string(path) {
        Ok(content) => {
            debug!("read configuration at {:?}", path.display());
            Ok(Some(content))
        }
        Err(err) if err.kind() == ErrorKind::NotFound => {
            debug!("no configuration at {:?}", path.display());
            Ok(None)
        }
        Err(err) => Err(ConfigError::Read {
            source: err,
            path: path.to_path_buf(),
        }),
    }
}

fn expand(value: &str) -> Result<String> {
    Ok(shellexpand::full(value)
        .map_err(ConfigError::ShellExpansion)?
        .into_owned())
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("failed to read configuration at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Failed to deserialize configuration.
    #[error(transparent)]
    Deserialize(#[from] toml::de::Error),

    /// Failed to perform shell expansion on configuration.
    #[error(transparent)]
    ShellExpansion(#[from] shellexpand::LookupError<std::env::VarError>),
}

/// Friendly result alias :3
type Result<T, E = ConfigError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[sealed_test(env = [("BLAH", "/home/blah/blah")])]
    fn deserialize_control_config() -> anyhow::Result<()> {
        let result: ControlConfig = r#"
            cos_path = "cos://releases/$BLAH"

            [development_env]
            PORT = "3000"
            API_ROOT = "$BLAH/api"
        "#
        .parse()?;

        let expect = ControlConfig {
            cos_path: Some("cos://releases//home/blah/blah".into()),
            dist_dir: "./dist".into(),
            development_env: BTreeMap::from([
                ("API_ROOT".into(), "/home/blah/blah/api".into()),
                ("PORT".into(), "3000".into()),
            ]),
        };
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn control_config_rejects_undefined_variable() {
        let result = r#"dist_dir = "$JOYLINT_UNSET_VARIABLE/dist""#.parse::<ControlConfig>();
        assert!(matches!(result, Err(ConfigError::ShellExpansion(_))));
    }

    #[sealed_test]
    fn control_config_missing_file_is_default() -> anyhow::Result<()> {
        let result = ControlConfig::load(std::env::current_dir()?)?;
        assert_eq!(result, ControlConfig::default());

        Ok(())
    }

    #[sealed_test]
    fn control_config_loads_from_project() -> anyhow::Result<()> {
        std::fs::write(CONTROL_CONFIG_FILE, "dist_dir = \"build\"\n")?;
        let result = ControlConfig::load(std::env::current_dir()?)?;
        assert_eq!(result.dist_dir, "build");
        assert_eq!(result.cos_path, None);

        Ok(())
    }

    #[test]
    fn deserialize_joylint_defaults() -> anyhow::Result<()> {
        let result: JoylintDefaults = r#"
            manager = "pnpm"
            framework = "vue3"
            workspace = true
        "#
        .parse()?;

        let expect = JoylintDefaults {
            manager: Some(PackageManager::Pnpm),
            framework: Some(Framework::Vue3),
            workspace: Some(true),
        };
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn joylint_defaults_reject_unknown_manager() {
        let result = r#"manager = "bun""#.parse::<JoylintDefaults>();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }
}
