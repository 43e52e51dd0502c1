// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

use crate::{write_manifest, RecordingShell};

use joylint::{
    install::InstallError, manifest::ManifestError, syscall::exit_code_of, Dependency, Installer,
    PackageManager,
};
use pretty_assertions::assert_eq;
use sealed_test::prelude::*;
use std::env::current_dir;

#[sealed_test]
fn install_skips_declared_dependencies() -> anyhow::Result<()> {
    let cwd = current_dir()?;
    write_manifest(&cwd, r#"{ "dependencies": { "react": "18.0.0" } }"#);
    let shell = RecordingShell::new();

    let installed = Installer::new(&shell, PackageManager::Npm).install(
        &cwd,
        &[
            Dependency::new("react"),
            Dependency::with_version("eslint", "8.0.0"),
        ],
    )?;

    assert_eq!(installed, 1);
    assert_eq!(
        shell.command_lines(),
        vec!["npm install -D eslint@8.0.0 --no-audit --loglevel error --verbose"]
    );
    assert_eq!(shell.calls()[0].cwd.as_deref(), Some(cwd.as_path()));

    Ok(())
}

#[sealed_test]
fn install_pnpm_workspace_root() -> anyhow::Result<()> {
    let cwd = current_dir()?;
    write_manifest(&cwd, r#"{ "name": "monorepo", "private": true }"#);
    let shell = RecordingShell::new();

    let installed = Installer::new(&shell, PackageManager::Pnpm)
        .workspace(true)
        .install(
            &cwd,
            &[Dependency::new("a"), Dependency::with_version("b", "1.0.0")],
        )?;

    assert_eq!(installed, 2);
    assert_eq!(shell.calls()[0].program, "pnpm");
    assert_eq!(
        shell.calls()[0].args,
        vec!["add", "-w", "-D", "a@latest", "b@1.0.0"]
    );

    Ok(())
}

#[sealed_test]
fn install_nothing_when_everything_is_declared() -> anyhow::Result<()> {
    let cwd = current_dir()?;
    write_manifest(
        &cwd,
        r#"{
            "dependencies": { "husky": "^9.0.0" },
            "devDependencies": { "lint-staged": "^15.0.0" }
        }"#,
    );
    let shell = RecordingShell::new();
    let installer = Installer::new(&shell, PackageManager::Yarn);

    let installed = installer.install(
        &cwd,
        &[
            Dependency::with_version("husky", "^8.0.0"),
            Dependency::new("lint-staged"),
        ],
    )?;
    assert_eq!(installed, 0);

    let installed = installer.install(&cwd, &[])?;
    assert_eq!(installed, 0);
    assert!(shell.calls().is_empty());

    Ok(())
}

#[sealed_test]
fn install_fails_without_manifest() {
    let shell = RecordingShell::new();
    let result = Installer::new(&shell, PackageManager::Npm)
        .install(current_dir().unwrap(), &[Dependency::new("eslint")]);

    assert!(matches!(
        result,
        Err(InstallError::Manifest(ManifestError::NotFound { .. }))
    ));
    assert!(shell.calls().is_empty());
}

#[sealed_test]
fn install_fails_on_malformed_manifest() {
    write_manifest(current_dir().unwrap(), r#"{ "dependencies": "#);
    let shell = RecordingShell::new();
    let result = Installer::new(&shell, PackageManager::Npm)
        .install(current_dir().unwrap(), &[Dependency::new("eslint")]);

    assert!(matches!(
        result,
        Err(InstallError::Manifest(ManifestError::Parse { .. }))
    ));
    assert!(shell.calls().is_empty());
}

#[sealed_test]
fn install_propagates_package_manager_exit_code() {
    write_manifest(current_dir().unwrap(), "{}");
    let shell = RecordingShell::new().failing("yarn", 127);
    let result = Installer::new(&shell, PackageManager::Yarn)
        .install(current_dir().unwrap(), &[Dependency::new("eslint")]);

    let error = anyhow::Error::from(result.unwrap_err());
    let source: &(dyn std::error::Error + 'static) = error.as_ref();
    assert_eq!(exit_code_of(source), 127);
}
