// SPDX-FileCopyrightText: 2025 Jason Pena <jasonpena@awkless.com>
// SPDX-License-Identifier: MIT

//! Interactive choice prompts.
//!
//! Commands that need the user to pick something only ever ask one kind of
//! question: choose one of N labeled options, maybe with a default. That
//! question is modeled by the [`Chooser`] trait, so commands stay
//! independent of the prompting backend.
//!
//! The real backend is [`InquireChooser`]. When standard input is not a
//! terminal it cannot draw its selection menu, so it falls back to reading a
//! plain line from standard input instead. [`Preselected`] answers without
//! asking anybody, for answers supplied up front.

use inquire::{InquireError, Select};
use std::io::{stdin, stderr, BufRead, Write};
use tracing::debug;

/// Ask the user to choose one of N labeled options.
pub trait Chooser {
    /// Choose one option.
    ///
    /// Answers are whatever the user picked. Line-based backends may return
    /// free text that is not one of the options, so callers must still
    /// validate the answer.
    fn choose(&self, message: &str, options: &[&str], default: Option<&str>) -> Result<String>;
}

/// Selection menu through [`inquire`].
#[derive(Debug, Default, Clone, Copy)]
pub struct InquireChooser;

impl InquireChooser {
    /// Construct new selection menu chooser.
    pub fn new() -> Self {
        Self
    }
}

impl Chooser for InquireChooser {
    fn choose(&self, message: &str, options: &[&str], default: Option<&str>) -> Result<String> {
        let cursor = default
            .and_then(|default| options.iter().position(|option| *option == default))
            .unwrap_or(0);

        match Select::new(message, options.to_vec())
            .with_starting_cursor(cursor)
            .prompt()
        {
            Ok(answer) => Ok(answer.to_string()),
            Err(InquireError::NotTTY) => {
                debug!("no terminal for selection menu, read plain line instead");
                let mut err = stderr().lock();
                write!(err, "{message} ({}): ", options.join("/")).map_err(PromptError::Io)?;
                err.flush().map_err(PromptError::Io)?;

                read_answer(stdin().lock(), default)
            }
            Err(err) => Err(PromptError::Inquire(err)),
        }
    }
}

/// Answer read from a single line of input.
///
/// Empty lines select the default, if any.
///
/// # Errors
///
/// - Return [`PromptError::Io`] if the line cannot be read.
/// - Return [`PromptError::NoAnswer`] if the line is empty and there is no
///   default to fall back on.
pub fn read_answer(mut reader: impl BufRead, default: Option<&str>) -> Result<String> {
    let mut line = String::new();
    reader.read_line(&mut line).map_err(PromptError::Io)?;

    match (line.trim(), default) {
        ("", Some(default)) => Ok(default.to_string()),
        ("", None) => Err(PromptError::NoAnswer),
        (answer, _) => Ok(answer.to_string()),
    }
}

/// Answer known before anything was asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preselected(pub String);

impl Preselected {
    pub fn new(answer: impl Into<String>) -> Self {
        Self(answer.into())
    }
}

impl Chooser for Preselected {
    fn choose(&self, _message: &str, _options: &[&str], _default: Option<&str>) -> Result<String> {
        Ok(self.0.clone())
    }
}

/// Prompt error types.
#[derive(Debug, thiserror::Error)]
pub enum PromptError {
    /// Selection menu failed or was cancelled.
    #[error(transparent)]
    Inquire(#[from] InquireError),

    /// Plain line prompt failed.
    #[error(transparent)]
    Io(std::io::Error),

    /// User gave no answer and there is no default.
    #[error("no answer given")]
    NoAnswer,
}

/// Friendly result alias :3
pub type Result<T, E = PromptError> = std::result::Result<T, E>;
