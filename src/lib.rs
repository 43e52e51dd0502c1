// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Lint tooling and release chores for frontend projects.
//!
//! Joylint bootstraps ESLint, Prettier, and husky commit hooks in a frontend
//! project, and drives the build and release chores of that project. It
//! never reimplements what Node.js tooling already does well. Instead it
//! drives package managers, Git, and friends as external programs through
//! [`syscall::Syscall`].
//!
//! # Idempotent Installation
//!
//! The one rule joylint never breaks: a dependency that a project already
//! declares in its manifest is never reinstalled by joylint, not even when
//! its version differs from the one joylint recommends. See [`install`].

pub mod config;
pub mod control;
pub mod install;
pub mod manifest;
pub mod path;
pub mod preset;
pub mod prompt;
pub mod setup;
pub mod syscall;

pub use install::{Dependency, InstallPlan, Installer, PackageManager};
pub use manifest::{ManifestSnapshot, PackageManifest};
pub use setup::{Framework, Setup};
