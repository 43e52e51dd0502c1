// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Project manifest reading.
//!
//! A frontend project declares its dependencies in a `package.json` file at
//! its top-level. Joylint mostly cares about two keys of that file:
//! `dependencies` and `devDependencies`. It also peeks at `eslintConfig` and
//! `prettier`, where a project may keep its lint configuration inline.
//! Everything else is ignored.
//!
//! The manifest is read fresh every time it is needed. Package managers
//! rewrite it behind our back, so nothing read from it is ever cached.

use serde::Deserialize;
use std::{
    collections::BTreeMap,
    fs::read_to_string,
    io::ErrorKind,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::{debug, instrument};

/// File name of project manifest.
pub const MANIFEST_FILE: &str = "package.json";

/// Layout of the parts of `package.json` that joylint reads.
#[derive(Default, Debug, PartialEq, Eq, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageManifest {
    /// Runtime dependencies.
    #[serde(default)]
    pub dependencies: Option<BTreeMap<String, String>>,

    /// Development dependencies.
    #[serde(default)]
    pub dev_dependencies: Option<BTreeMap<String, String>>,

    /// Inline ESLint configuration.
    #[serde(default)]
    pub eslint_config: Option<serde_json::Value>,

    /// Inline Prettier configuration.
    #[serde(default)]
    pub prettier: Option<serde_json::Value>,
}

impl PackageManifest {
    /// Load manifest of project at target directory.
    ///
    /// # Errors
    ///
    /// - Return [`ManifestError::NotFound`] if `package.json` is missing.
    /// - Return [`ManifestError::Read`] if `package.json` cannot be read.
    /// - Return [`ManifestError::Parse`] if `package.json` is not a valid
    ///   manifest.
    #[instrument(skip(cwd), level = "debug")]
    pub fn load(cwd: impl AsRef<Path>) -> Result<Self> {
        let path = cwd.as_ref().join(MANIFEST_FILE);
        debug!("read manifest at {:?}", path.display());

        let content = read_to_string(&path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => ManifestError::NotFound { path: path.clone() },
            _ => ManifestError::Read {
                source: err,
                path: path.clone(),
            },
        })?;

        content
            .parse()
            .map_err(|err| ManifestError::Parse { source: err, path })
    }

    /// Merge runtime and development dependencies into one snapshot.
    ///
    /// # Invariant
    ///
    /// - Runtime dependency entries win. Development dependencies only add
    ///   names that are not already present.
    pub fn snapshot(&self) -> ManifestSnapshot {
        let mut installed = self.dependencies.clone().unwrap_or_default();
        for (name, version) in self.dev_dependencies.iter().flatten() {
            installed
                .entry(name.clone())
                .or_insert_with(|| version.clone());
        }

        ManifestSnapshot { installed }
    }
}

impl FromStr for PackageManifest {
    type Err = serde_json::Error;

    fn from_str(data: &str) -> Result<Self, Self::Err> {
        serde_json::from_str(data)
    }
}

/// Merged view of every dependency a project already declares.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct ManifestSnapshot {
    installed: BTreeMap<String, String>,
}

impl ManifestSnapshot {
    /// Version of installed dependency, if any.
    pub fn version_of(&self, name: impl AsRef<str>) -> Option<&str> {
        self.installed.get(name.as_ref()).map(String::as_str)
    }

    /// Check if dependency is declared by manifest.
    pub fn contains(&self, name: impl AsRef<str>) -> bool {
        self.installed.contains_key(name.as_ref())
    }

    pub fn len(&self) -> usize {
        self.installed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.installed.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ManifestSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            installed: iter
                .into_iter()
                .map(|(name, version)| (name.into(), version.into()))
                .collect(),
        }
    }
}

/// Manifest error types.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// No manifest at expected location.
    #[error("no manifest found at {:?}", path.display())]
    NotFound { path: PathBuf },

    /// Manifest exists, but cannot be read.
    #[error("failed to read manifest at {:?}", path.display())]
    Read {
        #[source]
        source: std::io::Error,
        path: PathBuf,
    },

    /// Manifest content is malformed.
    #[error("failed to parse manifest at {:?}", path.display())]
    Parse {
        #[source]
        source: serde_json::Error,
        path: PathBuf,
    },
}

/// Friendly result alias :3
type Result<T, E = ManifestError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use sealed_test::prelude::*;

    #[test]
    fn snapshot_keeps_runtime_versions() -> anyhow::Result<()> {
        let manifest: PackageManifest = indoc! {r#"
            {
                "name": "demo",
                "dependencies": { "react": "18.0.0", "lodash": "^4.17.21" },
                "devDependencies": { "react": "17.0.2", "eslint": "^8.0.0" }
            }
        "#}
        .parse()?;

        let result = manifest.snapshot();
        let expect = ManifestSnapshot::from_iter([
            ("eslint", "^8.0.0"),
            ("lodash", "^4.17.21"),
            ("react", "18.0.0"),
        ]);
        assert_eq!(result, expect);

        Ok(())
    }

    #[test]
    fn snapshot_tolerates_missing_and_null_maps() -> anyhow::Result<()> {
        let manifest: PackageManifest =
            r#"{ "name": "demo", "dependencies": null }"#.parse()?;
        assert!(manifest.snapshot().is_empty());

        let manifest: PackageManifest = r#"{ "devDependencies": { "husky": "^8.0.0" } }"#.parse()?;
        assert_eq!(manifest.snapshot().version_of("husky"), Some("^8.0.0"));

        Ok(())
    }

    #[test]
    fn parse_inline_lint_config() -> anyhow::Result<()> {
        let manifest: PackageManifest = indoc! {r#"
            {
                "eslintConfig": { "extends": ["react-app"] },
                "prettier": "@company/prettier-config"
            }
        "#}
        .parse()?;
        assert!(manifest.eslint_config.is_some());
        assert_eq!(
            manifest.prettier,
            Some(serde_json::json!("@company/prettier-config"))
        );

        let manifest: PackageManifest = "{}".parse()?;
        assert_eq!(manifest.eslint_config, None);
        assert_eq!(manifest.prettier, None);

        Ok(())
    }

    #[sealed_test]
    fn load_missing_manifest() {
        let result = PackageManifest::load(std::env::current_dir().unwrap());
        assert!(matches!(result, Err(ManifestError::NotFound { .. })));
    }

    #[sealed_test]
    fn load_malformed_manifest() {
        std::fs::write(MANIFEST_FILE, "{ not json").unwrap();
        let result = PackageManifest::load(std::env::current_dir().unwrap());
        assert!(matches!(result, Err(ManifestError::Parse { .. })));

        std::fs::write(MANIFEST_FILE, "[1, 2, 3]").unwrap();
        let result = PackageManifest::load(std::env::current_dir().unwrap());
        assert!(matches!(result, Err(ManifestError::Parse { .. })));
    }

    #[sealed_test]
    fn load_reads_fresh_each_time() -> anyhow::Result<()> {
        let cwd = std::env::current_dir()?;
        std::fs::write(MANIFEST_FILE, r#"{ "dependencies": { "vue": "^2.7.0" } }"#)?;
        assert!(PackageManifest::load(&cwd)?.snapshot().contains("vue"));

        std::fs::write(MANIFEST_FILE, r#"{ "dependencies": { "vue": "^3.4.0" } }"#)?;
        assert_eq!(
            PackageManifest::load(&cwd)?.snapshot().version_of("vue"),
            Some("^3.4.0")
        );

        Ok(())
    }
}
