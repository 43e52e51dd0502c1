// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Path resolution utilities.
//!
//! Determine relevent path information for files that joylint reads or
//! scaffolds, but does not own.

use std::path::{Path, PathBuf};

/// Name of hidden directory holding joylint's hook scripts in a project.
pub const JOYLINT_DIR: &str = ".joylint";

/// Name of husky's hook directory in a project.
pub const HUSKY_DIR: &str = ".husky";

/// Name of release configuration file in a project.
pub const CONTROL_CONFIG_FILE: &str = "control.toml";

/// Determine default absolute path to user-level joylint defaults.
///
/// Uses XDG Base Directory path `$XDG_CONFIG_HOME/joylint/config.toml`. Does
/// not check if the path returned actually exists.
///
/// # Errors
///
/// - Return [`NoConfigDir`] if configuration directory cannot be determined.
///
/// # See Also
///
/// - [XDG Base Directory](https://wiki.archlinux.org/title/XDG_Base_Directory)
pub fn default_config_file() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|path| path.join("joylint").join("config.toml"))
        .ok_or(NoConfigDir)
}

/// Path to joylint's hook script directory inside target project.
pub fn joylint_dir(cwd: impl AsRef<Path>) -> PathBuf {
    cwd.as_ref().join(JOYLINT_DIR)
}

/// Path to husky's hook directory inside target project.
pub fn husky_dir(cwd: impl AsRef<Path>) -> PathBuf {
    cwd.as_ref().join(HUSKY_DIR)
}

/// No way to determine user's configuration directory.
///
/// # See Also
///
/// - [`dirs::config_dir`](https://docs.rs/dirs/latest/dirs/fn.config_dir.html)
#[derive(Clone, Debug, thiserror::Error)]
#[error("cannot determine absolute path to user's configuration directory")]
pub struct NoConfigDir;

/// Friendly result alias :3
pub type Result<T, E = NoConfigDir> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[cfg(target_os = "linux")]
    #[sealed_test(env = [("XDG_CONFIG_HOME", "/home/blah/.config")])]
    fn default_config_file_follows_xdg() -> anyhow::Result<()> {
        assert_eq!(
            default_config_file()?,
            PathBuf::from("/home/blah/.config/joylint/config.toml")
        );

        Ok(())
    }

    #[test]
    fn project_relative_dirs() {
        assert_eq!(joylint_dir("/srv/app"), PathBuf::from("/srv/app/.joylint"));
        assert_eq!(husky_dir("/srv/app"), PathBuf::from("/srv/app/.husky"));
    }
}
